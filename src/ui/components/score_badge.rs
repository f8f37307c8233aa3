use dioxus::prelude::*;

use crate::domain::condition_label;

#[component]
pub fn ScoreBadge(score: u8) -> Element {
    let color = match score {
        90..=100 => "bg-emerald-500/10 text-emerald-300 border-emerald-500/40",
        75..=89 => "bg-lime-500/10 text-lime-300 border-lime-500/40",
        50..=74 => "bg-amber-500/10 text-amber-300 border-amber-500/40",
        25..=49 => "bg-orange-500/10 text-orange-300 border-orange-500/40",
        _ => "bg-rose-500/10 text-rose-300 border-rose-500/40",
    };
    let label = condition_label(score);

    rsx! {
        span {
            class: "inline-flex items-center gap-1 rounded-full border px-2 py-0.5 text-xs font-medium {color}",
            "{label}"
            span { class: "opacity-80", "{score}" }
        }
    }
}
