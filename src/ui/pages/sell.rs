use dioxus::prelude::*;

use crate::{
    app::{persist_user_state, Route, CACHE_TTL},
    domain::{condition_label, AppState, CacheResource, ListingDraft, SellStep},
    infra::kitab::{normalize_isbn, KitabClient, NewListing},
    ui::{
        components::{
            condition_checklist::ConditionChecklist,
            listing_card::format_dzd,
            price_summary::PriceSummary,
            stepper::Stepper,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

const MAX_PHOTOS: usize = 4;

#[component]
pub fn SellPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let step = state.with(|st| st.draft.step);

    rsx! {
        div { class: "space-y-8",
            section {
                class: "{theme::panel_border()} px-6 py-5",
                Stepper { current: step }
            }
            match step {
                SellStep::Identify => rsx! { IdentifyStep {} },
                SellStep::Condition => rsx! { ConditionStep {} },
                SellStep::Review => rsx! { ReviewStep {} },
            }
        }
    }
}

#[component]
fn IdentifyStep() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let lookup_request = use_context::<Signal<Option<String>>>();

    let draft = state.with(|st| st.draft.clone());
    let categories = state.with(|st| st.categories.clone());

    let lookup_key = normalize_isbn(&draft.isbn);
    let lookup = state.with(|st| {
        if lookup_key.is_empty() {
            None
        } else {
            st.lookups.get(&lookup_key).cloned()
        }
    });
    let searching = !lookup_key.is_empty() && lookup_request() == Some(lookup_key.clone());
    let show_form = draft.manual_entry || !draft.title.is_empty();

    let on_lookup = {
        let state = state.clone();
        let toasts = toasts.clone();
        let lookup_request = lookup_request.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let raw = state.with(|st| st.draft.isbn.clone());
            if normalize_isbn(&raw).is_empty() {
                push_toast(toasts.clone(), ToastKind::Warning, "Type an ISBN first.");
                return;
            }
            request_isbn_lookup(state.clone(), lookup_request.clone(), &raw);
        }
    };

    let on_use_book = {
        let state = state.clone();
        let toasts = toasts.clone();
        let lookup = lookup.clone();
        move |_| {
            let Some(book) = lookup.as_ref().and_then(|entry| entry.book.clone()) else {
                return;
            };
            let mut state = state.clone();
            state.with_mut(|st| st.draft.apply_book(&book));
            persist_user_state(&state);
            push_toast(
                toasts.clone(),
                ToastKind::Success,
                format!("Filled in \"{}\".", book.title),
            );
        }
    };

    let on_manual = {
        let mut state = state.clone();
        move |_| {
            state.with_mut(|st| st.draft.manual_entry = true);
        }
    };

    let on_continue = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let title_missing = state.with(|st| st.draft.title.trim().is_empty());
            if title_missing {
                push_toast(
                    toasts.clone(),
                    ToastKind::Error,
                    "The listing needs at least a title.",
                );
                return;
            }
            let mut state = state.clone();
            state.with_mut(|st| st.draft.step = SellStep::Condition);
            persist_user_state(&state);
        }
    };

    rsx! {
        div { class: "space-y-6",
            section {
                class: "{theme::panel_border()} p-6",
                h2 { class: "{theme::section_title()}", "Which book are you selling?" }
                form {
                    class: "mt-4 flex flex-wrap items-end gap-4",
                    onsubmit: on_lookup,
                    div { class: "flex-1 min-w-[200px]",
                        label { class: "{theme::label_class()}", "ISBN" }
                        input {
                            class: "mt-1 w-full {theme::input_class()}",
                            value: "{draft.isbn}",
                            oninput: move |evt| state.with_mut(|st| st.draft.isbn = evt.value()),
                            placeholder: "e.g. 978-9947-0-1234-5",
                        }
                    }
                    button { class: "{theme::btn_primary()}", r#type: "submit", "Look up" }
                }
                if searching {
                    p { class: "mt-3 text-sm {theme::text_muted()}", "Searching the catalog..." }
                }
                if let Some(ref result) = lookup {
                    if let Some(ref book) = result.book {
                        div {
                            class: "mt-4 flex items-start justify-between gap-4 rounded-lg border border-emerald-500/40 bg-emerald-500/10 p-4",
                            div {
                                p { class: "text-sm font-semibold text-emerald-100", "{book.title}" }
                                p { class: "text-xs text-emerald-300", "{book.authors_display()}" }
                                if let Some(ref publisher) = book.publisher {
                                    p { class: "mt-1 text-xs {theme::text_muted()}", "{publisher}" }
                                }
                            }
                            button {
                                class: "{theme::btn_secondary()} shrink-0",
                                onclick: on_use_book,
                                "Use this book"
                            }
                        }
                    } else {
                        div {
                            class: "mt-4 rounded-lg border border-amber-500/40 bg-amber-500/10 p-4 text-sm text-amber-100",
                            p {
                                {result.message.clone().unwrap_or_else(|| "No book found for that ISBN.".to_string())}
                            }
                            button {
                                class: "mt-2 {theme::link_class()}",
                                onclick: on_manual,
                                "Enter the details manually"
                            }
                        }
                    }
                }
                if !show_form {
                    button {
                        class: "mt-4 {theme::link_class()}",
                        onclick: on_manual,
                        "No ISBN? Enter the details manually"
                    }
                }
            }

            if show_form {
                BookForm { categories }
            }

            div { class: "flex justify-end",
                button { class: "{theme::btn_primary()}", onclick: on_continue, "Continue to condition" }
            }
        }
    }
}

#[component]
fn BookForm(categories: Vec<String>) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let draft = state.with(|st| st.draft.clone());

    rsx! {
        section {
            class: "{theme::panel_border()} p-6",
            h2 { class: "{theme::section_title()}", "Book Details" }
            div { class: "mt-4 grid gap-4 sm:grid-cols-2",
                div {
                    label { class: "{theme::label_class()}", "Title" }
                    input {
                        class: "mt-1 w-full {theme::input_small()}",
                        value: "{draft.title}",
                        oninput: move |evt| state.with_mut(|st| st.draft.title = evt.value()),
                    }
                }
                div {
                    label { class: "{theme::label_class()}", "Authors" }
                    input {
                        class: "mt-1 w-full {theme::input_small()}",
                        value: "{draft.authors}",
                        oninput: move |evt| state.with_mut(|st| st.draft.authors = evt.value()),
                    }
                }
                div {
                    label { class: "{theme::label_class()}", "Category" }
                    input {
                        class: "mt-1 w-full {theme::input_small()}",
                        value: "{draft.category}",
                        oninput: move |evt| state.with_mut(|st| st.draft.category = evt.value()),
                        list: "category-list",
                        placeholder: "e.g. Fiction",
                    }
                    datalist {
                        id: "category-list",
                        for category in categories.iter() {
                            option { value: category.clone() }
                        }
                    }
                }
                div {
                    label { class: "{theme::label_class()}", "Pages" }
                    input {
                        class: "mt-1 w-full {theme::input_small()}",
                        inputmode: "numeric",
                        value: "{draft.page_count}",
                        oninput: move |evt| state.with_mut(|st| st.draft.page_count = evt.value()),
                    }
                }
                div {
                    label { class: "{theme::label_class()}", "Location" }
                    input {
                        class: "mt-1 w-full {theme::input_small()}",
                        value: "{draft.location}",
                        oninput: move |evt| state.with_mut(|st| st.draft.location = evt.value()),
                        placeholder: "City or neighbourhood",
                    }
                }
                div {
                    label { class: "{theme::label_class()}", "Cover image URL" }
                    input {
                        class: "mt-1 w-full {theme::input_small()}",
                        value: "{draft.cover_url}",
                        oninput: move |evt| state.with_mut(|st| st.draft.cover_url = evt.value()),
                    }
                }
            }
            div { class: "mt-4",
                label { class: "{theme::label_class()}", "Description" }
                textarea {
                    class: "mt-1 w-full {theme::input_small()}",
                    rows: "3",
                    value: "{draft.description}",
                    oninput: move |evt| state.with_mut(|st| st.draft.description = evt.value()),
                    placeholder: "Edition, translation, anything a buyer should know.",
                }
            }
        }
    }
}

#[component]
fn ConditionStep() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let draft = state.with(|st| st.draft.clone());

    let on_toggle = {
        let state = state.clone();
        move |flag| {
            let mut state = state.clone();
            state.with_mut(|st| st.draft.condition.toggle(flag));
            persist_user_state(&state);
        }
    };

    let on_market_price = {
        let mut state = state.clone();
        move |value: String| {
            state.with_mut(|st| st.draft.market_price = value);
        }
    };

    let on_back = {
        let state = state.clone();
        move |_| {
            let mut state = state.clone();
            state.with_mut(|st| st.draft.step = SellStep::Identify);
            persist_user_state(&state);
        }
    };

    let on_continue = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let market_price = state.with(|st| st.draft.market_price_value());
            if market_price <= 0.0 {
                push_toast(
                    toasts.clone(),
                    ToastKind::Error,
                    "Enter the market price of a new copy to price your book.",
                );
                return;
            }
            let mut state = state.clone();
            state.with_mut(|st| st.draft.step = SellStep::Review);
            persist_user_state(&state);
        }
    };

    rsx! {
        div { class: "space-y-6",
            section {
                h2 { class: "text-sm font-semibold text-slate-200", "Be honest about the condition" }
                p { class: "mt-1 text-xs {theme::text_muted()}",
                    "Each unchecked box lowers the score and the price suggestion. Buyers see the full checklist."
                }
            }
            ConditionChecklist {
                report: draft.condition.clone(),
                on_toggle,
            }
            PriceSummary {
                report: draft.condition.clone(),
                market_price: draft.market_price.clone(),
                on_market_price,
            }
            div { class: "flex justify-between",
                button { class: "{theme::btn_ghost()}", onclick: on_back, "Back" }
                button { class: "{theme::btn_primary()}", onclick: on_continue, "Continue to photos" }
            }
        }
    }
}

#[component]
fn ReviewStep() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();

    let mut photo_input = use_signal(String::new);
    let mut publishing = use_signal(|| false);

    let draft = state.with(|st| st.draft.clone());
    let overall = draft.condition.overall_score();
    let overall_label = condition_label(overall);
    let suggested = format_dzd(draft.suggested_price());
    let market = format_dzd(draft.market_price_value().floor() as u64);

    let on_add_photo = {
        let state = state.clone();
        let toasts = toasts.clone();
        let mut photo_input = photo_input.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let path = photo_input().trim().to_string();
            if path.is_empty() {
                return;
            }
            let full = state.with(|st| st.draft.photos.len() >= MAX_PHOTOS);
            if full {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    format!("Up to {MAX_PHOTOS} photos per listing."),
                );
                return;
            }
            let mut state = state.clone();
            state.with_mut(|st| st.draft.photos.push(path));
            persist_user_state(&state);
            photo_input.set(String::new());
        }
    };

    let on_back = {
        let state = state.clone();
        move |_| {
            let mut state = state.clone();
            state.with_mut(|st| st.draft.step = SellStep::Condition);
            persist_user_state(&state);
        }
    };

    let on_publish = {
        let state = state.clone();
        let toasts = toasts.clone();
        let mut publishing = publishing.clone();
        move |_| {
            if publishing() {
                return;
            }
            let draft = state.with(|st| st.draft.clone());
            if draft.title.trim().is_empty() {
                push_toast(toasts.clone(), ToastKind::Error, "The listing needs a title.");
                return;
            }
            if draft.market_price_value() <= 0.0 {
                push_toast(
                    toasts.clone(),
                    ToastKind::Error,
                    "Go back and enter a market price first.",
                );
                return;
            }

            publishing.set(true);
            let payload = build_listing_payload(&draft);
            let mut state = state.clone();
            let toasts = toasts.clone();
            let nav = nav.clone();
            spawn(async move {
                let Ok(client) = KitabClient::new() else {
                    publishing.set(false);
                    push_toast(toasts.clone(), ToastKind::Error, "Failed to initialise API client.");
                    return;
                };
                match client.create_listing(&payload).await {
                    Ok(listing) => {
                        state.with_mut(|st| {
                            st.upsert_listing(listing);
                            st.draft = ListingDraft::default();
                        });
                        persist_user_state(&state);
                        publishing.set(false);
                        push_toast(toasts.clone(), ToastKind::Success, "Your book is on the shelf.");
                        nav.push(Route::Market {});
                    }
                    Err(err) => {
                        publishing.set(false);
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Could not publish the listing: {err}"),
                        );
                    }
                }
            });
        }
    };

    let publish_label = if publishing() { "Publishing..." } else { "Publish listing" };

    rsx! {
        div { class: "space-y-6",
            section {
                class: "{theme::panel_border()} p-6",
                h2 { class: "{theme::section_title()}", "Photos" }
                p { class: "mt-1 text-xs {theme::text_muted()}",
                    "Add up to {MAX_PHOTOS} photo links showing the actual copy."
                }
                form {
                    class: "mt-3 flex gap-3",
                    onsubmit: on_add_photo,
                    input {
                        class: "flex-1 {theme::input_small()}",
                        value: "{photo_input}",
                        oninput: move |evt| photo_input.set(evt.value()),
                        placeholder: "https://...",
                    }
                    button { class: "{theme::btn_secondary()}", r#type: "submit", "Add" }
                }
                if !draft.photos.is_empty() {
                    ul { class: "mt-3 space-y-2",
                        for (index, photo) in draft.photos.iter().enumerate() {
                            li {
                                class: "flex items-center justify-between rounded-lg border border-slate-800 bg-slate-900/60 px-3 py-2 text-xs text-slate-300",
                                span { class: "truncate", "{photo}" }
                                button {
                                    class: "ml-3 shrink-0 text-xs uppercase tracking-wide text-rose-300 hover:text-rose-100",
                                    onclick: move |_| {
                                        let mut state = state.clone();
                                        state.with_mut(|st| {
                                            if index < st.draft.photos.len() {
                                                st.draft.photos.remove(index);
                                            }
                                        });
                                        persist_user_state(&state);
                                    },
                                    "Remove"
                                }
                            }
                        }
                    }
                }
            }

            section {
                class: "{theme::panel_border()} p-6",
                h2 { class: "{theme::section_title()}", "Ready to publish" }
                div { class: "mt-4 flex items-center gap-6",
                    div { class: "{theme::score_circle_class(overall)}",
                        "{overall}"
                        small { "{overall_label}" }
                    }
                    div { class: "space-y-1 text-sm",
                        p { class: "text-lg font-semibold text-slate-100", "{draft.title}" }
                        p { class: "text-slate-400", "{draft.authors}" }
                        p { class: "{theme::text_muted()}", "Market price {market}" }
                        p { class: "text-emerald-300", "Asking {suggested}" }
                    }
                }
            }

            div { class: "flex justify-between",
                button { class: "{theme::btn_ghost()}", onclick: on_back, "Back" }
                button { class: "{theme::btn_primary()}", onclick: on_publish, "{publish_label}" }
            }
        }
    }
}

/// Sets the lookup request signal when the ISBN is not already answered by
/// the session cache.
pub fn request_isbn_lookup(
    state: Signal<AppState>,
    mut lookup_request: Signal<Option<String>>,
    raw_isbn: &str,
) {
    let isbn = normalize_isbn(raw_isbn);
    if isbn.is_empty() {
        return;
    }
    let resource = CacheResource::Lookup(isbn.clone());
    let needs_fetch = state.with(|st| {
        let stale = st.is_stale(&resource, CACHE_TTL);
        let missing = !st.lookups.contains_key(&isbn);
        stale || missing
    });

    if needs_fetch {
        println!("[sell] Queueing ISBN lookup for {isbn}");
        lookup_request.set(Some(isbn));
    } else {
        println!("[sell] Lookup for {isbn} already cached; skipping fetch.");
    }
}

fn build_listing_payload(draft: &ListingDraft) -> NewListing {
    NewListing {
        isbn: draft.isbn.trim().to_string(),
        title: draft.title.trim().to_string(),
        authors: draft.authors.trim().to_string(),
        publisher: none_if_empty(&draft.publisher),
        publication_date: none_if_empty(&draft.published_date),
        description: none_if_empty(&draft.description),
        page_count: draft.page_count.trim().parse().ok(),
        category: if draft.category.trim().is_empty() {
            "Other".to_string()
        } else {
            draft.category.trim().to_string()
        },
        cover_image_url: none_if_empty(&draft.cover_url),
        location: none_if_empty(&draft.location),
        market_price: draft.market_price_value(),
        price: draft.suggested_price(),
        condition_score: draft.condition.overall_score(),
        scoring_details: draft.condition.clone(),
        custom_images: draft.photos.clone(),
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConditionFlag;
    use pretty_assertions::assert_eq;

    fn draft() -> ListingDraft {
        let mut draft = ListingDraft::default();
        draft.isbn = " 978-2-07-036002-4 ".to_string();
        draft.title = "  L'Étranger ".to_string();
        draft.authors = "Albert Camus".to_string();
        draft.category = "Fiction".to_string();
        draft.page_count = "184".to_string();
        draft.market_price = "1500".to_string();
        draft
    }

    #[test]
    fn payload_trims_fields_and_prices_from_the_checklist() {
        let mut draft = draft();
        draft.condition.toggle(ConditionFlag::CoverClean);

        let payload = build_listing_payload(&draft);
        assert_eq!(payload.title, "L'Étranger");
        assert_eq!(payload.isbn, "978-2-07-036002-4");
        assert_eq!(payload.page_count, Some(184));
        assert_eq!(payload.publisher, None);
        assert_eq!(payload.condition_score, 95);
        assert_eq!(payload.price, 1425);
        assert_eq!(payload.market_price, 1500.0);
    }

    #[test]
    fn payload_defaults_the_category_and_drops_blank_options() {
        let mut draft = draft();
        draft.category = "   ".to_string();
        draft.location = " Oran ".to_string();

        let payload = build_listing_payload(&draft);
        assert_eq!(payload.category, "Other");
        assert_eq!(payload.location, Some("Oran".to_string()));
        assert_eq!(payload.description, None);
    }

    #[test]
    fn blank_market_price_suggests_zero() {
        let mut draft = draft();
        draft.market_price = "  ".to_string();
        let payload = build_listing_payload(&draft);
        assert_eq!(payload.market_price, 0.0);
        assert_eq!(payload.price, 0);
    }
}
