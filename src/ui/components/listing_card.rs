use dioxus::prelude::*;

use crate::domain::{Listing, ListingStatus};
use crate::ui::components::score_badge::ScoreBadge;

#[component]
pub fn ListingCard(listing: Listing, selected: bool, on_select: EventHandler<i64>) -> Element {
    let frame = if selected {
        "rounded-xl border border-indigo-500/60 bg-indigo-500/10 p-3 text-left transition"
    } else {
        "rounded-xl border border-slate-800 bg-slate-900/40 p-3 text-left transition hover:border-indigo-500/60 hover:bg-slate-900/80"
    };
    let listing_id = listing.id;
    let price_display = format_dzd(listing.price);
    let location = listing
        .location
        .clone()
        .unwrap_or_else(|| "Location not set".to_string());
    let views_display = format!("{} views", listing.views);

    rsx! {
        button {
            class: "{frame}",
            onclick: move |_| on_select.call(listing_id),
            div { class: "relative",
                div { class: "cover-frame",
                    if let Some(ref cover) = listing.cover_url {
                        img { src: "{cover}", alt: "{listing.title}" }
                    } else {
                        span { class: "cover-fallback", "📚" }
                    }
                }
                if listing.status != ListingStatus::Active {
                    span {
                        class: "absolute top-2 right-2 rounded-full bg-slate-900/80 px-2 py-0.5 text-xs font-semibold uppercase tracking-wide text-amber-300",
                        "{listing.status.label()}"
                    }
                }
            }
            h3 { class: "clamp-2 mt-3 text-sm font-semibold text-slate-100", "{listing.title}" }
            p { class: "mt-1 truncate text-xs text-slate-500", "{listing.authors}" }
            div { class: "mt-2 flex items-center justify-between",
                span { class: "text-lg font-semibold text-indigo-300", "{price_display}" }
                ScoreBadge { score: listing.condition_score }
            }
            div { class: "mt-2 flex items-center justify-between text-xs text-slate-500",
                span { class: "truncate", "{location}" }
                span { class: "shrink-0", "{views_display}" }
            }
        }
    }
}

/// Renders a dinar amount with thousands grouping, e.g. `15 000 DZD`.
pub fn format_dzd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped.push_str(" DZD");
    grouped
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::format_dzd;

    #[test]
    fn groups_thousands_with_spaces() {
        assert_eq!(format_dzd(0), "0 DZD");
        assert_eq!(format_dzd(950), "950 DZD");
        assert_eq!(format_dzd(15_000), "15 000 DZD");
        assert_eq!(format_dzd(1_200_000), "1 200 000 DZD");
    }
}
