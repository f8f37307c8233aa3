use dioxus::prelude::*;

use crate::domain::{condition_label, suggested_price, ConditionReport};
use crate::ui::components::listing_card::format_dzd;
use crate::ui::theme;

/// Live pricing panel for the sell flow: overall score dial next to the
/// discount the checklist applies to the entered market price.
#[component]
pub fn PriceSummary(
    report: ConditionReport,
    market_price: String,
    on_market_price: EventHandler<String>,
) -> Element {
    let overall = report.overall_score();
    let overall_label = condition_label(overall);
    let parsed = market_price.trim().parse::<f64>().unwrap_or(0.0);
    let suggested = suggested_price(parsed, overall);
    let reference = if parsed.is_finite() && parsed > 0.0 {
        parsed.floor() as u64
    } else {
        0
    };
    let discount = reference.saturating_sub(suggested);

    rsx! {
        section {
            class: "{theme::panel_border()} p-4",
            h3 { class: "{theme::section_title()}", "Suggested Price" }
            div { class: "mt-4 flex items-center gap-6",
                div { class: "{theme::score_circle_class(overall)}",
                    "{overall}"
                    small { "{overall_label}" }
                }
                div { class: "flex-1 space-y-3",
                    div {
                        label { class: "{theme::label_class()}", "Market price (new, DZD)" }
                        input {
                            class: "mt-1 w-full {theme::input_small()}",
                            inputmode: "decimal",
                            value: "{market_price}",
                            oninput: move |evt| on_market_price.call(evt.value()),
                            placeholder: "e.g. 2400",
                        }
                    }
                    if reference > 0 {
                        div { class: "flex items-center justify-between text-sm",
                            span { class: "{theme::text_muted()}", "Condition discount" }
                            span { class: "text-rose-300", "-{format_dzd(discount)}" }
                        }
                        div { class: "flex items-center justify-between text-sm",
                            span { class: "{theme::text_muted()}", "You would ask" }
                            span { class: "text-lg font-semibold text-emerald-300", "{format_dzd(suggested)}" }
                        }
                    } else {
                        p { class: "text-xs {theme::text_muted()}",
                            "Enter the price of a new copy to get a suggestion."
                        }
                    }
                }
            }
        }
    }
}
