use dioxus::prelude::*;

use crate::{
    domain::{AppState, NotificationKind},
    infra::kitab::KitabClient,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        pages::market::humanize_age,
        theme,
    },
};

#[component]
pub fn NotificationsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let notifications = state.with(|st| st.notifications.clone());
    let unread = notifications
        .iter()
        .filter(|notification| !notification.read)
        .count();

    let on_mark_all = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            if unread == 0 {
                push_toast(toasts.clone(), ToastKind::Info, "Nothing unread.");
                return;
            }
            let mut state = state.clone();
            state.with_mut(|st| {
                for notification in st.notifications.iter_mut() {
                    notification.read = true;
                }
            });
            spawn(async move {
                let Ok(client) = KitabClient::new() else {
                    return;
                };
                // Next inbox fetch reconciles if this call fails.
                if let Err(err) = client.mark_all_notifications_read().await {
                    println!("[inbox] Could not mark notifications read: {err}");
                }
            });
        }
    };

    let on_mark = {
        let state = state.clone();
        move |id: i64| {
            let mut state = state.clone();
            let already_read = state.with(|st| {
                st.notifications
                    .iter()
                    .find(|notification| notification.id == id)
                    .map(|notification| notification.read)
                    .unwrap_or(true)
            });
            if already_read {
                return;
            }
            state.with_mut(|st| {
                if let Some(notification) = st
                    .notifications
                    .iter_mut()
                    .find(|notification| notification.id == id)
                {
                    notification.read = true;
                }
            });
            spawn(async move {
                let Ok(client) = KitabClient::new() else {
                    return;
                };
                if let Err(err) = client.mark_notification_read(id).await {
                    println!("[inbox] Could not mark notification {id} read: {err}");
                }
            });
        }
    };

    rsx! {
        div { class: "space-y-4",
            div { class: "flex items-center justify-between",
                h2 { class: "text-sm font-semibold text-slate-200",
                    if unread > 0 {
                        "Notifications ({unread} unread)"
                    } else {
                        "Notifications"
                    }
                }
                button { class: "{theme::link_class()}", onclick: on_mark_all, "Mark all read" }
            }
            if notifications.is_empty() {
                div {
                    class: "{theme::panel_border()} p-6 text-center text-sm text-slate-500",
                    "Nothing yet. You will hear about messages, reservations and price drops here."
                }
            } else {
                ul { class: "space-y-2",
                    for notification in notifications {
                        {
                            let frame = if notification.read {
                                "flex w-full items-start gap-3 rounded-xl border border-slate-800 bg-slate-900/40 p-4 text-left opacity-80"
                            } else {
                                "flex w-full items-start gap-3 rounded-xl border border-indigo-500/40 bg-indigo-500/10 p-4 text-left"
                            };
                            let icon = kind_icon(notification.kind);
                            let age = humanize_age(notification.created_at);
                            let id = notification.id;
                            let on_mark = on_mark.clone();
                            rsx! {
                                li {
                                    button {
                                        class: "{frame}",
                                        onclick: move |_| on_mark(id),
                                        span { class: "text-lg", "{icon}" }
                                        span { class: "flex-1",
                                            span { class: "flex items-center gap-2",
                                                span { class: "text-sm font-semibold text-slate-100", "{notification.title}" }
                                                span { class: "rounded-full bg-slate-800 px-2 py-0.5 text-xs {theme::text_muted()}",
                                                    "{notification.kind.label()}"
                                                }
                                            }
                                            if !notification.body.is_empty() {
                                                span { class: "mt-1 block text-sm text-slate-400", "{notification.body}" }
                                            }
                                            span { class: "mt-1 block text-xs text-slate-500", "{age}" }
                                        }
                                        if !notification.read {
                                            span { class: "mt-1 online-dot shrink-0" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn kind_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::MessageReceived => "💬",
        NotificationKind::AnnouncementSold => "🤝",
        NotificationKind::AnnouncementReserved => "📌",
        NotificationKind::PriceDrop => "💸",
        NotificationKind::NewRating | NotificationKind::RatingReply => "⭐",
        NotificationKind::LowRatingAlert => "⚠️",
        NotificationKind::AccountSuspended | NotificationKind::AccountReactivated => "👤",
        NotificationKind::Other => "🔔",
    }
}
