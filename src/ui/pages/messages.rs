use std::time::SystemTime;

use dioxus::prelude::*;
use uuid::Uuid;

use crate::{
    app::{InboxRefresh, CACHE_TTL},
    domain::{AppState, CacheResource, ChatMessage, Conversation},
    infra::kitab::KitabClient,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
};

#[component]
pub fn MessagesPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let inbox_refresh = use_context::<Signal<InboxRefresh>>();

    let mut search = use_signal(String::new);
    let selected = use_signal(|| None::<i64>);
    let mut composer = use_signal(String::new);

    let conversations = state.with(|st| st.conversations.clone());
    let visible: Vec<Conversation> = conversations
        .iter()
        .filter(|conversation| conversation.matches(&search()))
        .cloned()
        .collect();

    let active_id = selected().or_else(|| visible.first().map(|conversation| conversation.id));
    let active = active_id.and_then(|id| {
        conversations
            .iter()
            .find(|conversation| conversation.id == id)
            .cloned()
    });

    let on_select = {
        let mut state = state.clone();
        let mut selected = selected.clone();
        move |id: i64| {
            selected.set(Some(id));
            // Opening a thread counts as reading it.
            state.with_mut(|st| {
                if let Some(conversation) =
                    st.conversations.iter_mut().find(|entry| entry.id == id)
                {
                    conversation.unread = 0;
                }
            });
        }
    };

    let on_refresh = {
        let state = state.clone();
        let toasts = toasts.clone();
        let inbox_refresh = inbox_refresh.clone();
        move |_| {
            request_inbox_refresh(state.clone(), inbox_refresh.clone());
            push_toast(toasts.clone(), ToastKind::Info, "Refreshing conversations...");
        }
    };

    let on_send = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let body = composer().trim().to_string();
            if body.is_empty() {
                return;
            }
            let Some(conversation_id) = active_id else {
                return;
            };

            // Show the message immediately; reconcile with the server copy below.
            let local_id = Uuid::new_v4().to_string();
            let mut state = state.clone();
            state.with_mut(|st| {
                if let Some(conversation) = st
                    .conversations
                    .iter_mut()
                    .find(|entry| entry.id == conversation_id)
                {
                    conversation.messages.push(ChatMessage {
                        id: local_id.clone(),
                        body: body.clone(),
                        outgoing: true,
                        sent_at: SystemTime::now(),
                    });
                }
            });
            composer.set(String::new());

            let toasts = toasts.clone();
            spawn(async move {
                let Ok(client) = KitabClient::new() else {
                    remove_local_message(state, conversation_id, &local_id);
                    push_toast(toasts.clone(), ToastKind::Error, "Failed to initialise API client.");
                    return;
                };
                match client.send_message(conversation_id, &body).await {
                    Ok(sent) => {
                        state.with_mut(|st| {
                            if let Some(conversation) = st
                                .conversations
                                .iter_mut()
                                .find(|entry| entry.id == conversation_id)
                            {
                                if let Some(slot) = conversation
                                    .messages
                                    .iter_mut()
                                    .find(|message| message.id == local_id)
                                {
                                    *slot = sent;
                                }
                            }
                        });
                    }
                    Err(err) => {
                        remove_local_message(state, conversation_id, &local_id);
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Message not sent: {err}"),
                        );
                    }
                }
            });
        }
    };

    rsx! {
        section {
            class: "grid gap-6 lg:grid-cols-[1fr,2fr]",
            div { class: "space-y-4",
                div { class: "flex items-center justify-between",
                    h2 { class: "text-sm font-semibold text-slate-200", "Conversations" }
                    button { class: "{theme::link_class()}", onclick: on_refresh, "Refresh" }
                }
                input {
                    class: "w-full {theme::input_small()}",
                    value: "{search}",
                    oninput: move |evt| search.set(evt.value()),
                    placeholder: "Search by reader or book",
                }
                if visible.is_empty() {
                    div {
                        class: "{theme::panel_border()} p-6 text-sm text-slate-500",
                        "No conversations yet. Contact a seller from the market page to start one."
                    }
                } else {
                    ul { class: "space-y-2",
                        for conversation in visible {
                            ConversationRow {
                                conversation: conversation.clone(),
                                active: Some(conversation.id) == active_id,
                                on_select: on_select.clone(),
                            }
                        }
                    }
                }
            }

            div {
                if let Some(conversation) = active {
                    ChatPane { conversation, composer, on_send: on_send.clone() }
                } else {
                    div {
                        class: "{theme::panel_border()} p-6 text-sm text-slate-500",
                        "Select a conversation to read it."
                    }
                }
            }
        }
    }
}

#[component]
fn ConversationRow(
    conversation: Conversation,
    active: bool,
    on_select: EventHandler<i64>,
) -> Element {
    let frame = if active {
        "flex w-full items-center gap-3 rounded-xl border border-indigo-500/60 bg-indigo-500/10 p-3 text-left"
    } else {
        "flex w-full items-center gap-3 rounded-xl border border-slate-800 bg-slate-900/40 p-3 text-left transition hover:border-slate-600"
    };
    let id = conversation.id;
    let initials = conversation.initials();
    let preview = conversation
        .last_message()
        .map(|message| message.body.clone())
        .unwrap_or_else(|| "No messages yet".to_string());
    let timestamp = conversation
        .last_message()
        .map(|message| message.time_label());

    rsx! {
        li {
            button {
                class: "{frame}",
                onclick: move |_| on_select.call(id),
                span {
                    class: "flex h-10 w-10 shrink-0 items-center justify-center rounded-full bg-indigo-500/20 text-sm font-semibold text-indigo-200",
                    "{initials}"
                }
                span { class: "flex-1 overflow-hidden",
                    span { class: "flex items-center gap-2",
                        span { class: "text-sm font-semibold text-slate-100", "{conversation.peer_name}" }
                        if conversation.online {
                            span { class: "online-dot" }
                        }
                    }
                    if let Some(ref title) = conversation.listing_title {
                        span { class: "block truncate text-xs text-indigo-300", "{title}" }
                    }
                    span { class: "block truncate text-xs text-slate-500", "{preview}" }
                }
                span { class: "flex shrink-0 flex-col items-end gap-1",
                    if let Some(ref label) = timestamp {
                        span { class: "text-xs text-slate-500", "{label}" }
                    }
                    if conversation.unread > 0 {
                        span {
                            class: "rounded-full bg-rose-500 px-2 py-0.5 text-xs font-semibold text-white",
                            "{conversation.unread}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ChatPane(
    conversation: Conversation,
    composer: Signal<String>,
    on_send: EventHandler<FormEvent>,
) -> Element {
    let mut composer = composer;
    let presence = if conversation.online { "online" } else { "offline" };

    rsx! {
        div {
            class: "{theme::panel_border()} flex flex-col",
            div { class: "flex items-center justify-between border-b border-slate-800 px-4 py-3",
                div {
                    h2 { class: "text-sm font-semibold text-slate-100", "{conversation.peer_name}" }
                    if let Some(ref title) = conversation.listing_title {
                        p { class: "text-xs text-indigo-300", "about {title}" }
                    }
                }
                span { class: "flex items-center gap-2 text-xs text-slate-500",
                    if conversation.online {
                        span { class: "online-dot" }
                    }
                    "{presence}"
                }
            }
            div { class: "flex max-h-96 flex-col gap-2 overflow-y-auto p-4",
                if conversation.messages.is_empty() {
                    p { class: "text-center text-xs text-slate-500", "Say hello." }
                }
                for message in conversation.messages.iter() {
                    div {
                        class: if message.outgoing { "bubble-out" } else { "bubble-in" },
                        p { class: "text-sm", "{message.body}" }
                        p { class: "mt-1 text-right text-xs opacity-50", "{message.time_label()}" }
                    }
                }
            }
            form {
                class: "flex gap-3 border-t border-slate-800 p-4",
                onsubmit: move |evt| on_send.call(evt),
                input {
                    class: "flex-1 {theme::input_small()}",
                    value: "{composer}",
                    oninput: move |evt| composer.set(evt.value()),
                    placeholder: "Write a message",
                }
                button { class: "{theme::btn_primary()}", r#type: "submit", "Send" }
            }
        }
    }
}

/// Bumps the inbox fetch tick when conversations or notifications are stale.
pub fn request_inbox_refresh(state: Signal<AppState>, mut refresh: Signal<InboxRefresh>) {
    let needs_fetch = state.with(|st| {
        st.is_stale(&CacheResource::Inbox, CACHE_TTL) || st.conversations.is_empty()
    });

    if needs_fetch {
        println!("[inbox] Queueing inbox refresh");
        refresh.with_mut(|tick| tick.0 += 1);
    } else {
        println!("[inbox] Skipping inbox refresh; cache still fresh.");
    }
}

fn remove_local_message(mut state: Signal<AppState>, conversation_id: i64, message_id: &str) {
    state.with_mut(|st| {
        if let Some(conversation) = st
            .conversations
            .iter_mut()
            .find(|entry| entry.id == conversation_id)
        {
            conversation
                .messages
                .retain(|message| message.id != message_id);
        }
    });
}
