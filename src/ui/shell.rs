use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::AppState;
use crate::util::assets;

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let unread_messages = state.with(|s| s.unread_messages());
    let unread_notifications = state.with(|s| s.unread_notifications()) as u32;

    rsx! {
        div { class: "min-h-screen bg-slate-950 text-slate-100 font-sans",
            header {
                class: "border-b border-slate-900/60 bg-slate-950/90 backdrop-blur px-6 py-4",
                div { class: "mx-auto flex max-w-6xl items-center justify-between gap-4",
                    div { class: "flex items-center gap-3",
                        img {
                            class: "h-10 w-auto",
                            src: assets::logo_data_uri(),
                            alt: "Kitab Market",
                        }
                        p { class: "text-xs text-slate-500 italic", "used books, reader to reader" }
                    }
                    nav { class: "flex gap-2 text-sm justify-end",
                        NavButton { active: matches!(current_route, Route::Market {}), onclick: move |_| { nav.push(Route::Market {}); }, label: "🛒 Browse", badge: 0 }
                        NavButton { active: matches!(current_route, Route::Sell {}), onclick: move |_| { nav.push(Route::Sell {}); }, label: "🏷️ Sell", badge: 0 }
                        NavButton { active: matches!(current_route, Route::Messages {}), onclick: move |_| { nav.push(Route::Messages {}); }, label: "💬 Messages", badge: unread_messages }
                        NavButton { active: matches!(current_route, Route::Notifications {}), onclick: move |_| { nav.push(Route::Notifications {}); }, label: "🔔 Alerts", badge: unread_notifications }
                        NavButton { active: matches!(current_route, Route::Settings {}), onclick: move |_| { nav.push(Route::Settings {}); }, label: "⚙️", badge: 0 }
                    }
                }
            }
            main { class: "mx-auto max-w-6xl px-6 py-10",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str, badge: u32) -> Element {
    let class = if active {
        "relative min-w-[5.5rem] rounded-lg border border-indigo-500/60 bg-indigo-500/15 px-4 py-2 font-semibold text-indigo-300"
    } else {
        "relative min-w-[5.5rem] rounded-lg border border-transparent px-4 py-2 text-slate-400 transition hover:border-slate-700 hover:bg-slate-900/80 hover:text-slate-200"
    };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
            if badge > 0 {
                span {
                    class: "absolute -top-1 -right-1 rounded-full bg-rose-500 px-2 py-0.5 text-xs font-semibold text-white",
                    "{badge}"
                }
            }
        }
    }
}
