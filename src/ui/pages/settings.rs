use dioxus::prelude::*;

use crate::{
    app::{persist_user_state, CatalogRefresh, InboxRefresh},
    domain::{AppState, CacheResource, ListingDraft},
    infra::kitab::KitabClient,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        pages::{
            market::{humanize_age, request_catalog_refresh},
            messages::request_inbox_refresh,
        },
        theme,
    },
    util::{assets, version},
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let catalog_refresh = use_context::<Signal<CatalogRefresh>>();
    let inbox_refresh = use_context::<Signal<InboxRefresh>>();

    let mut checking_updates = use_signal(|| false);

    let cache_entries = state.with(|st| {
        st.cache
            .iter()
            .map(|(resource, time)| (cache_label(resource), humanize_age(*time)))
            .collect::<Vec<_>>()
    });
    let draft_summary = state.with(|st| {
        if st.draft.title.trim().is_empty() {
            None
        } else {
            Some(format!(
                "\"{}\" ({})",
                st.draft.title.trim(),
                st.draft.step.label()
            ))
        }
    });
    let version_display = version::version_label();

    let on_clear_cache = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            state.with_mut(|st| st.cache.clear());
            spawn(async move {
                if let Ok(client) = KitabClient::new() {
                    client.clear_cache().await;
                }
            });
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Cleared cached timestamps. Data will refresh on next fetch.",
            );
        }
    };

    let on_refresh_catalog = {
        let state = state.clone();
        let toasts = toasts.clone();
        let catalog_refresh = catalog_refresh.clone();
        move |_| {
            request_catalog_refresh(state.clone(), catalog_refresh.clone());
            push_toast(toasts.clone(), ToastKind::Info, "Refreshing listings and categories...");
        }
    };

    let on_refresh_inbox = {
        let state = state.clone();
        let toasts = toasts.clone();
        let inbox_refresh = inbox_refresh.clone();
        move |_| {
            request_inbox_refresh(state.clone(), inbox_refresh.clone());
            push_toast(toasts.clone(), ToastKind::Info, "Refreshing conversations and notifications...");
        }
    };

    let on_reset_draft = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let mut state = state.clone();
            state.with_mut(|st| st.draft = ListingDraft::default());
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Info, "Sell draft cleared.");
        }
    };

    let on_check_updates = {
        let toasts = toasts.clone();
        let mut checking_updates = checking_updates.clone();
        move |_| {
            if checking_updates() {
                return;
            }
            checking_updates.set(true);
            let toasts = toasts.clone();
            spawn(async move {
                match version::check_for_update().await {
                    Ok(info) => {
                        if info.update_available() {
                            let latest = info.latest_display().unwrap_or("a newer version");
                            push_toast(
                                toasts.clone(),
                                ToastKind::Info,
                                format!("{latest} is available at {}", version::APP_REPO_URL),
                            );
                        } else {
                            push_toast(toasts.clone(), ToastKind::Success, "You are up to date.");
                        }
                    }
                    Err(err) => {
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Update check failed: {err}"),
                        );
                    }
                }
                checking_updates.set(false);
            });
        }
    };

    let update_label = if checking_updates() { "Checking..." } else { "Check for Updates" };

    rsx! {
        div { class: "space-y-8",
            section {
                class: "rounded-xl border border-slate-800 bg-slate-900/40 p-6",
                h2 { class: "{theme::section_title()}", "Cache Status" }
                if cache_entries.is_empty() {
                    p { class: "mt-3 text-sm text-slate-400", "No cached fetches yet." }
                } else {
                    ul {
                        class: "mt-3 space-y-2 text-sm text-slate-300",
                        for (label, age) in cache_entries {
                            li { class: "flex items-center justify-between rounded-lg border border-slate-800 bg-slate-900/60 px-3 py-2",
                                span { "{label}" }
                                span { class: "text-xs text-slate-500", "{age}" }
                            }
                        }
                    }
                }
                button {
                    class: "mt-4 rounded-lg border border-amber-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-amber-200 hover:bg-amber-500/10",
                    onclick: on_clear_cache,
                    "Clear Cache Timestamps"
                }
            }

            section {
                class: "rounded-xl border border-slate-800 bg-slate-900/40 p-6",
                h2 { class: "{theme::section_title()}", "Data Controls" }
                p { class: "mt-2 text-sm text-slate-400", "Trigger background refreshes without waiting for the cache to expire." }
                div { class: "mt-3 flex flex-wrap gap-3",
                    button {
                        class: "rounded-lg border border-indigo-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-indigo-200 hover:bg-indigo-500/10",
                        onclick: on_refresh_catalog,
                        "Refresh Catalog"
                    }
                    button {
                        class: "rounded-lg border border-indigo-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-indigo-200 hover:bg-indigo-500/10",
                        onclick: on_refresh_inbox,
                        "Refresh Inbox"
                    }
                }
            }

            section {
                class: "rounded-xl border border-slate-800 bg-slate-900/40 p-6",
                h2 { class: "{theme::section_title()}", "Sell Draft" }
                if let Some(ref summary) = draft_summary {
                    p { class: "mt-2 text-sm text-slate-400", "In progress: {summary}" }
                } else {
                    p { class: "mt-2 text-sm text-slate-400", "No draft in progress." }
                }
                button {
                    class: "mt-3 rounded-lg border border-rose-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-rose-300 hover:bg-rose-500/10",
                    onclick: on_reset_draft,
                    "Clear Draft"
                }
            }

            section {
                class: "rounded-xl border border-slate-800 bg-slate-900/40 p-6",
                h2 { class: "{theme::section_title()}", "Updates" }
                p { class: "mt-2 text-sm text-slate-400", "Running {version_display}" }
                button {
                    class: "mt-3 {theme::btn_secondary()}",
                    onclick: on_check_updates,
                    "{update_label}"
                }
            }

            section {
                class: "flex flex-col items-center gap-3 rounded-xl border border-slate-800 bg-slate-900/40 p-6 text-center text-slate-400",
                h2 { class: "{theme::section_title()}", "About" }
                img {
                    class: "h-12 w-auto opacity-80",
                    src: assets::logo_data_uri(),
                    alt: "Kitab Market logo",
                }
                p {
                    class: "text-sm",
                    "Book metadata comes from Google Books through the Kitab Market API."
                }
                p {
                    class: "text-xs text-slate-500",
                    "Prices are suggestions; the deal is always between readers."
                }
            }
        }
    }
}

fn cache_label(resource: &CacheResource) -> String {
    match resource {
        CacheResource::Catalog => "Catalog".to_string(),
        CacheResource::Inbox => "Inbox".to_string(),
        CacheResource::Lookup(isbn) => format!("ISBN {isbn}"),
    }
}
