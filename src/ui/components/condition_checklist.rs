use dioxus::prelude::*;

use crate::domain::{ConditionCategory, ConditionFlag, ConditionReport};
use crate::ui::theme;

/// Interactive checklist behind the condition score. Each category renders its
/// three criteria as toggles plus the weighted score they currently produce.
#[component]
pub fn ConditionChecklist(report: ConditionReport, on_toggle: EventHandler<ConditionFlag>) -> Element {
    rsx! {
        div {
            class: "grid gap-4 sm:grid-cols-2",
            for category in ConditionCategory::ALL {
                CategoryPanel {
                    category,
                    report: report.clone(),
                    on_toggle: on_toggle.clone(),
                }
            }
        }
    }
}

#[component]
fn CategoryPanel(
    category: ConditionCategory,
    report: ConditionReport,
    on_toggle: EventHandler<ConditionFlag>,
) -> Element {
    let score = report.category_score(category);

    rsx! {
        section {
            class: "{theme::panel_border()} p-4",
            div { class: "flex items-center justify-between",
                h3 { class: "text-sm font-semibold text-slate-200", "{category.label()}" }
                span {
                    class: "rounded-full bg-slate-800 px-2 py-0.5 text-xs font-semibold {theme::score_text_class(score)}",
                    "{score}"
                }
            }
            ul { class: "mt-3 space-y-2",
                for flag in category.flags() {
                    FlagToggle {
                        flag,
                        checked: report.flag(flag),
                        on_toggle: on_toggle.clone(),
                    }
                }
            }
        }
    }
}

#[component]
fn FlagToggle(flag: ConditionFlag, checked: bool, on_toggle: EventHandler<ConditionFlag>) -> Element {
    let row = if checked {
        "flex w-full items-center justify-between rounded-lg border border-indigo-500/40 bg-indigo-500/10 px-3 py-2 text-left text-sm text-slate-200 transition"
    } else {
        "flex w-full items-center justify-between rounded-lg border border-slate-800 bg-slate-900/60 px-3 py-2 text-left text-sm text-slate-500 transition hover:border-slate-600"
    };
    let mark = if checked { "✓" } else { "✗" };
    let weight = flag.weight();

    rsx! {
        li {
            button {
                class: "{row}",
                onclick: move |_| on_toggle.call(flag),
                span { class: "flex items-center gap-2",
                    span { class: "text-xs", "{mark}" }
                    span { "{flag.label()}" }
                }
                if weight > 0 {
                    span { class: "shrink-0 text-xs text-slate-500", "+{weight}" }
                } else {
                    span { class: "shrink-0 text-xs text-slate-600", "info" }
                }
            }
        }
    }
}
