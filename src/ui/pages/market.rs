use std::time::SystemTime;

use dioxus::prelude::*;

use crate::{
    app::{CatalogRefresh, CACHE_TTL},
    domain::{
        filter_listings, sort_listings, AppState, CacheResource, CatalogSort, Listing,
        ListingStatus,
    },
    infra::kitab::KitabClient,
    ui::{
        components::{
            kpi_card::KpiCard,
            listing_card::{format_dzd, ListingCard},
            score_badge::ScoreBadge,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

const MIN_SCORE_CHOICES: [(Option<u8>, &str); 4] =
    [(None, "Any"), (Some(50), "50+"), (Some(75), "75+"), (Some(90), "90+")];

#[component]
pub fn MarketPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let catalog_refresh = use_context::<Signal<CatalogRefresh>>();

    let selected_listing = use_signal(|| None::<i64>);

    let listings = state.with(|st| st.listings.clone());
    let categories = state.with(|st| st.categories.clone());
    let filter = state.with(|st| st.filter.clone());
    let sort = state.with(|st| st.sort);

    let mut visible = filter_listings(&listings, &filter);
    sort_listings(&mut visible, sort);

    let available = listings
        .iter()
        .filter(|listing| listing.status == ListingStatus::Active)
        .count();
    let median = median_price(&visible).map(format_dzd);
    let condition = average_condition(&visible).map(|score| format!("{score} / 100"));

    let detail = selected_listing().and_then(|id| state.with(|st| st.listing(id).cloned()));

    let on_select = {
        let mut selected_listing = selected_listing.clone();
        let state = state.clone();
        move |id: i64| {
            selected_listing.set(Some(id));
            // Refetch so the detail panel shows the server-side view count.
            let mut state = state.clone();
            spawn(async move {
                let Ok(client) = KitabClient::new() else {
                    return;
                };
                match client.get_listing(id).await {
                    Ok(listing) => state.with_mut(|st| st.upsert_listing(listing)),
                    Err(err) => println!("[market] Could not refresh listing {id}: {err}"),
                }
            });
        }
    };

    let on_refresh = {
        let state = state.clone();
        let toasts = toasts.clone();
        let catalog_refresh = catalog_refresh.clone();
        move |_| {
            request_catalog_refresh(state.clone(), catalog_refresh.clone());
            push_toast(toasts.clone(), ToastKind::Info, "Refreshing the shelf...");
        }
    };

    let on_send = {
        let state = state.clone();
        let toasts = toasts.clone();
        let selected_listing = selected_listing.clone();
        move |body: String| {
            if body.trim().is_empty() {
                push_toast(toasts.clone(), ToastKind::Warning, "Write a short message first.");
                return;
            }
            let listing = selected_listing().and_then(|id| state.with(|st| st.listing(id).cloned()));
            let Some(listing) = listing else {
                return;
            };
            let Some(seller) = listing.seller.clone() else {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "This listing has no seller attached.",
                );
                return;
            };

            let mut state = state.clone();
            let toasts = toasts.clone();
            spawn(async move {
                let Ok(client) = KitabClient::new() else {
                    push_toast(toasts.clone(), ToastKind::Error, "Failed to initialise API client.");
                    return;
                };
                match client.start_conversation(seller.id, listing.id, &body).await {
                    Ok(conversation) => {
                        state.with_mut(|st| {
                            st.conversations.retain(|entry| entry.id != conversation.id);
                            st.conversations.insert(0, conversation);
                        });
                        push_toast(
                            toasts.clone(),
                            ToastKind::Success,
                            format!("Message sent to {}.", seller.username),
                        );
                    }
                    Err(err) => {
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Could not contact the seller: {err}"),
                        );
                    }
                }
            });
        }
    };

    let mut state_for_query = state.clone();
    let mut state_for_sort = state.clone();
    let mut state_for_status = state.clone();

    let count_label = format!("{} of {} books", visible.len(), listings.len());
    let status_only_active = filter.status == Some(ListingStatus::Active);

    rsx! {
        div { class: "space-y-8",
            section {
                class: "grid gap-4 sm:grid-cols-3",
                KpiCard {
                    title: "Books Available".to_string(),
                    value: available.to_string(),
                    description: Some("Active listings on the shelf".to_string()),
                }
                KpiCard {
                    title: "Median Asking Price".to_string(),
                    value: median.unwrap_or_else(|| "n/a".to_string()),
                    description: Some("Across the current selection".to_string()),
                }
                KpiCard {
                    title: "Average Condition".to_string(),
                    value: condition.unwrap_or_else(|| "n/a".to_string()),
                    description: Some("Checklist score of visible books".to_string()),
                }
            }

            section {
                class: "space-y-3 rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-4",
                div { class: "flex flex-wrap items-end gap-4",
                    div { class: "flex-1 min-w-[200px]",
                        label { class: "{theme::label_class()}", "Search" }
                        input {
                            class: "mt-1 w-full {theme::input_small()}",
                            value: "{filter.query}",
                            oninput: move |evt| {
                                state_for_query.with_mut(|st| st.filter.query = evt.value());
                            },
                            placeholder: "Title, author or ISBN",
                        }
                    }
                    div { class: "w-32",
                        label { class: "{theme::label_class()}", "Sort" }
                        select {
                            class: "mt-1 w-full {theme::input_small()}",
                            onchange: move |evt| {
                                if let Ok(index) = evt.value().parse::<usize>() {
                                    if let Some(choice) = CatalogSort::ALL.get(index) {
                                        state_for_sort.with_mut(|st| st.sort = *choice);
                                    }
                                }
                            },
                            for (index, choice) in CatalogSort::ALL.iter().enumerate() {
                                option {
                                    value: "{index}",
                                    selected: *choice == sort,
                                    "{choice.label()}"
                                }
                            }
                        }
                    }
                    button {
                        class: if status_only_active { theme::btn_small_active() } else { theme::btn_small_inactive() },
                        onclick: move |_| {
                            state_for_status.with_mut(|st| {
                                st.filter.status = if st.filter.status.is_some() {
                                    None
                                } else {
                                    Some(ListingStatus::Active)
                                };
                            });
                        },
                        "Available only"
                    }
                }
                CategoryChips { categories }
                MinScoreChips { current: filter.min_score }
            }

            section {
                class: "grid gap-6 lg:grid-cols-[2fr,1fr]",
                div { class: "space-y-4",
                    div { class: "flex items-center justify-between",
                        h2 { class: "text-sm font-semibold text-slate-200", "{count_label}" }
                        button {
                            class: "{theme::link_class()}",
                            onclick: on_refresh,
                            "Refresh"
                        }
                    }
                    if visible.is_empty() {
                        div {
                            class: "{theme::panel_border()} p-6 text-center text-sm text-slate-500",
                            "No books match the current filters."
                        }
                    } else {
                        div { class: "grid gap-4 sm:grid-cols-2",
                            for listing in visible {
                                ListingCard {
                                    listing: listing.clone(),
                                    selected: Some(listing.id) == selected_listing(),
                                    on_select: on_select.clone(),
                                }
                            }
                        }
                    }
                }
                div { class: "space-y-4",
                    h2 { class: "text-sm font-semibold text-slate-200", "Details" }
                    if let Some(listing) = detail {
                        ListingDetail { listing, on_send: on_send.clone() }
                    } else {
                        div {
                            class: "{theme::panel_border()} p-6 text-sm text-slate-500",
                            "Pick a book from the shelf to see its condition breakdown and contact the seller."
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CategoryChips(categories: Vec<String>) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let current = state.with(|st| st.filter.category.clone());

    rsx! {
        div { class: "flex flex-wrap gap-2",
            button {
                class: if current.is_none() { theme::btn_small_active() } else { theme::btn_small_inactive() },
                onclick: move |_| state.with_mut(|st| st.filter.category = None),
                "All"
            }
            for category in categories {
                {
                    let active = current.as_deref() == Some(category.as_str());
                    let value = category.clone();
                    rsx! {
                        button {
                            class: if active { theme::btn_small_active() } else { theme::btn_small_inactive() },
                            onclick: move |_| {
                                let value = value.clone();
                                state.with_mut(|st| st.filter.category = Some(value));
                            },
                            "{category}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn MinScoreChips(current: Option<u8>) -> Element {
    let mut state = use_context::<Signal<AppState>>();

    rsx! {
        div { class: "flex flex-wrap items-center gap-2",
            span { class: "text-xs uppercase {theme::text_muted()}", "Condition" }
            for (threshold, label) in MIN_SCORE_CHOICES {
                button {
                    class: if current == threshold { theme::btn_small_active() } else { theme::btn_small_inactive() },
                    onclick: move |_| state.with_mut(|st| st.filter.min_score = threshold),
                    "{label}"
                }
            }
        }
    }
}

#[component]
fn ListingDetail(listing: Listing, on_send: EventHandler<String>) -> Element {
    let mut address = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut note = use_signal(String::new);

    let price = format_dzd(listing.price);
    let listed = humanize_age(listing.created_at);
    let seller_name = listing
        .seller
        .as_ref()
        .map(|seller| seller.username.clone());
    let can_contact = listing.seller.is_some() && listing.status == ListingStatus::Active;

    let on_submit = {
        let on_send = on_send.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let body = compose_contact_message(&address(), &phone(), &note());
            on_send.call(body);
            note.set(String::new());
        }
    };

    rsx! {
        div {
            class: "{theme::panel_border()} space-y-4 p-4",
            div { class: "flex items-start gap-4",
                div { class: "w-32 shrink-0",
                    div { class: "cover-frame",
                        if let Some(ref cover) = listing.cover_url {
                            img { src: "{cover}", alt: "{listing.title}" }
                        } else {
                            span { class: "cover-fallback", "📚" }
                        }
                    }
                }
                div { class: "space-y-1",
                    h3 { class: "text-lg font-semibold text-slate-100", "{listing.title}" }
                    p { class: "text-sm text-slate-400", "{listing.authors}" }
                    p { class: "text-xl font-semibold text-indigo-300", "{price}" }
                    div { class: "flex items-center gap-2",
                        ScoreBadge { score: listing.condition_score }
                        span { class: "text-xs {theme::text_muted()}", "{listing.status.label()}" }
                    }
                }
            }
            if let Some(ref description) = listing.description {
                p { class: "clamp-3 text-sm leading-relaxed text-slate-400", "{description}" }
            }
            ul { class: "space-y-1 text-xs text-slate-500",
                li { "Category: {listing.category}" }
                if let Some(pages) = listing.page_count {
                    li { "Pages: {pages}" }
                }
                if let Some(ref isbn) = listing.isbn {
                    li { "ISBN: {isbn}" }
                }
                if let Some(ref location) = listing.location {
                    li { "Location: {location}" }
                }
                li { "Listed {listed} with {listing.views} views" }
            }
            if !listing.photos.is_empty() {
                div { class: "flex gap-2",
                    for photo in listing.photos.iter() {
                        img { class: "h-12 w-10 rounded object-cover", src: "{photo}" }
                    }
                }
            }
            if can_contact {
                form {
                    class: "space-y-3 border-t border-slate-800 pt-3",
                    onsubmit: on_submit,
                    if let Some(ref name) = seller_name {
                        h4 { class: "{theme::section_title()}", "Contact {name}" }
                    }
                    textarea {
                        class: "w-full {theme::input_small()}",
                        rows: "3",
                        value: "{note}",
                        oninput: move |evt| note.set(evt.value()),
                        placeholder: "Is this book still available?",
                    }
                    div { class: "grid gap-3 sm:grid-cols-2",
                        input {
                            class: "{theme::input_small()}",
                            value: "{address}",
                            oninput: move |evt| address.set(evt.value()),
                            placeholder: "Meeting point (optional)",
                        }
                        input {
                            class: "{theme::input_small()}",
                            value: "{phone}",
                            oninput: move |evt| phone.set(evt.value()),
                            placeholder: "Phone (optional)",
                        }
                    }
                    button { class: "{theme::btn_primary()}", r#type: "submit", "Send" }
                }
            } else if listing.status != ListingStatus::Active {
                p { class: "border-t border-slate-800 pt-3 text-xs {theme::text_muted()}",
                    "This book is no longer available."
                }
            } else {
                p { class: "border-t border-slate-800 pt-3 text-xs {theme::text_muted()}",
                    "Seller details are unavailable for this listing."
                }
            }
        }
    }
}

/// Bumps the catalog fetch tick when the cached copy is older than the TTL.
pub fn request_catalog_refresh(state: Signal<AppState>, mut refresh: Signal<CatalogRefresh>) {
    let needs_fetch = state.with(|st| {
        st.is_stale(&CacheResource::Catalog, CACHE_TTL) || st.listings.is_empty()
    });

    if needs_fetch {
        println!("[market] Queueing catalog refresh");
        refresh.with_mut(|tick| tick.0 += 1);
    } else {
        println!("[market] Skipping catalog refresh; cache still fresh.");
    }
}

pub fn humanize_age(moment: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(moment)
        .unwrap_or_default()
        .as_secs();
    if age < 60 {
        "just now".to_string()
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}

/// Joins the free-text note with the optional pickup details into the
/// opening message of a conversation.
pub fn compose_contact_message(address: &str, phone: &str, note: &str) -> String {
    let mut parts = Vec::new();
    let note = note.trim();
    if !note.is_empty() {
        parts.push(note.to_string());
    }
    let address = address.trim();
    if !address.is_empty() {
        parts.push(format!("Meeting point: {address}"));
    }
    let phone = phone.trim();
    if !phone.is_empty() {
        parts.push(format!("Phone: {phone}"));
    }
    parts.join("\n")
}

fn median_price(listings: &[Listing]) -> Option<u64> {
    if listings.is_empty() {
        return None;
    }
    let mut prices: Vec<u64> = listings.iter().map(|listing| listing.price).collect();
    prices.sort_unstable();
    Some(prices[prices.len() / 2])
}

fn average_condition(listings: &[Listing]) -> Option<u8> {
    if listings.is_empty() {
        return None;
    }
    let total: u32 = listings
        .iter()
        .map(|listing| u32::from(listing.condition_score))
        .sum();
    Some((total / listings.len() as u32) as u8)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::domain::ListingStatus;
    use pretty_assertions::assert_eq;

    fn listing(id: i64, price: u64, score: u8) -> Listing {
        Listing {
            id,
            title: format!("Book {id}"),
            authors: String::new(),
            category: "Fiction".to_string(),
            description: None,
            location: None,
            price,
            market_price: None,
            condition_score: score,
            status: ListingStatus::Active,
            cover_url: None,
            photos: Vec::new(),
            page_count: None,
            publication_date: None,
            isbn: None,
            seller: None,
            views: 0,
            created_at: SystemTime::UNIX_EPOCH + Duration::from_secs(id as u64),
        }
    }

    #[test]
    fn contact_message_skips_blank_sections() {
        assert_eq!(
            compose_contact_message("Didouche Mourad", "0550 12 34 56", "Still available?"),
            "Still available?\nMeeting point: Didouche Mourad\nPhone: 0550 12 34 56"
        );
        assert_eq!(
            compose_contact_message("  ", "", "Still available?"),
            "Still available?"
        );
        assert_eq!(compose_contact_message("", "", "   "), "");
    }

    #[test]
    fn median_uses_the_upper_middle_price() {
        assert_eq!(median_price(&[]), None);
        assert_eq!(
            median_price(&[listing(1, 400, 80), listing(2, 900, 80), listing(3, 700, 80)]),
            Some(700)
        );
        assert_eq!(
            median_price(&[listing(1, 400, 80), listing(2, 900, 80)]),
            Some(900)
        );
    }

    #[test]
    fn average_condition_truncates_toward_zero() {
        assert_eq!(average_condition(&[]), None);
        assert_eq!(
            average_condition(&[listing(1, 0, 80), listing(2, 0, 85)]),
            Some(82)
        );
    }
}
