use std::time::{Duration, SystemTime};

use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::{AppState, CacheResource},
    infra::kitab::{CacheStatus, KitabClient},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{MarketPage, MessagesPage, NotificationsPage, SellPage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

/// Shared TTL for API data before the pages queue a refresh.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 15);

/// Fetch tick for listings and categories; bumping it re-runs the catalog task.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CatalogRefresh(pub u64);

/// Fetch tick for conversations and notifications.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InboxRefresh(pub u64);

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/market")]
    Market {},
    #[route("/sell")]
    Sell {},
    #[route("/messages")]
    Messages {},
    #[route("/notifications")]
    Notifications {},
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
            }
        }
    });
    use_context_provider(|| state.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    // ISBN lookup trigger shared across routes.
    let lookup_request = use_signal(|| None::<String>);
    use_context_provider(|| lookup_request.clone());

    // Fetch ticks; pages bump these to re-run the background tasks below.
    let catalog_refresh = use_signal(|| CatalogRefresh(0));
    use_context_provider(|| catalog_refresh.clone());
    let inbox_refresh = use_signal(|| InboxRefresh(0));
    use_context_provider(|| inbox_refresh.clone());

    let _catalog = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let catalog_refresh = catalog_refresh.clone();
        move || async move {
            fetch_catalog(state.clone(), toasts.clone(), catalog_refresh.clone()).await
        }
    });

    let _inbox = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let inbox_refresh = inbox_refresh.clone();
        move || async move { fetch_inbox(state.clone(), toasts.clone(), inbox_refresh.clone()).await }
    });

    let _lookups = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let lookup_request = lookup_request.clone();
        move || async move {
            fetch_lookup(state.clone(), toasts.clone(), lookup_request.clone()).await
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        document::Style { "{assets::tailwind_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        println!("Failed to persist user state: {err}");
    }
}

async fn fetch_catalog(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    catalog_refresh: Signal<CatalogRefresh>,
) -> Option<CacheStatus> {
    let CatalogRefresh(tick) = catalog_refresh();
    println!("[catalog] Fetch task running (tick {tick})");

    let Ok(client) = KitabClient::new() else {
        push_toast(
            toasts.clone(),
            ToastKind::Error,
            "Failed to initialise API client.",
        );
        return None;
    };

    match client.get_categories().await {
        Ok(cache) => state.with_mut(|st| st.categories = cache.categories),
        Err(err) => println!("[catalog] Could not load categories: {err}"),
    }

    match client.get_listings().await {
        Ok(payload) => {
            state.with_mut(|st| {
                st.listings = payload.data.clone();
                st.cache
                    .record_fetch(CacheResource::Catalog, payload.fetched_at);
            });
            if payload.status == CacheStatus::Stale {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Loaded cached listings; data might be stale.",
                );
            }
            Some(payload.status)
        }
        Err(err) => {
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load listings: {err}"),
            );
            None
        }
    }
}

async fn fetch_inbox(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    inbox_refresh: Signal<InboxRefresh>,
) -> Option<SystemTime> {
    let InboxRefresh(tick) = inbox_refresh();
    println!("[inbox] Fetch task running (tick {tick})");

    let Ok(client) = KitabClient::new() else {
        push_toast(
            toasts.clone(),
            ToastKind::Error,
            "Failed to initialise API client for the inbox.",
        );
        return None;
    };

    let mut fetched_any = false;
    match client.get_conversations().await {
        Ok(conversations) => {
            fetched_any = true;
            state.with_mut(|st| st.conversations = conversations);
        }
        Err(err) => println!("[inbox] Could not load conversations: {err}"),
    }
    match client.get_notifications().await {
        Ok(notifications) => {
            fetched_any = true;
            state.with_mut(|st| st.notifications = notifications);
        }
        Err(err) => println!("[inbox] Could not load notifications: {err}"),
    }

    if !fetched_any {
        push_toast(toasts.clone(), ToastKind::Error, "Could not reach the inbox.");
        return None;
    }

    let fetched_at = SystemTime::now();
    state.with_mut(|st| st.cache.record_fetch(CacheResource::Inbox, fetched_at));
    Some(fetched_at)
}

async fn fetch_lookup(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    mut lookup_request: Signal<Option<String>>,
) -> Option<(String, CacheStatus)> {
    let Some(isbn) = lookup_request() else {
        return None;
    };

    let Ok(client) = KitabClient::new() else {
        push_toast(
            toasts.clone(),
            ToastKind::Error,
            "Failed to initialise API client for ISBN lookup.",
        );
        lookup_request.set(None);
        return None;
    };

    println!("[isbn] Starting lookup for {isbn}");

    match client.lookup_isbn(&isbn).await {
        Ok(payload) => {
            lookup_request.set(None);
            state.with_mut(|st| {
                st.lookups.insert(isbn.clone(), payload.data.clone());
                st.cache
                    .record_fetch(CacheResource::Lookup(isbn.clone()), payload.fetched_at);
            });
            Some((isbn, payload.status))
        }
        Err(err) => {
            lookup_request.set(None);
            println!("[isbn] Lookup failed for {isbn}: {err}");
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("ISBN lookup failed: {err}"),
            );
            None
        }
    }
}

#[component]
pub fn Market() -> Element {
    rsx! { Shell { MarketPage {} } }
}

#[component]
pub fn Sell() -> Element {
    rsx! { Shell { SellPage {} } }
}

#[component]
pub fn Messages() -> Element {
    rsx! { Shell { MessagesPage {} } }
}

#[component]
pub fn Notifications() -> Element {
    rsx! { Shell { NotificationsPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
