use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, VisibilityState};
use yew::prelude::*;

use crate::services::logging::Logger;
use crate::session::poller::ActivityWindow;

/// Configuration for ambient-signal tracking
#[derive(Clone, PartialEq)]
pub struct ActivitySignalsConfig {
    pub enable_logging: bool,
}

impl Default for ActivitySignalsConfig {
    fn default() -> Self {
        Self {
            enable_logging: false, // Disable by default for production
        }
    }
}

/// The two ambient signals the poller adapts to.
#[derive(Clone, Copy, PartialEq)]
pub struct ActivitySignals {
    pub page_visible: bool,
    /// True while the last interaction is inside the activity window
    pub user_active: bool,
}

/// Hook tracking user activity and page visibility for the adaptive poller.
///
/// Listens for pointer movement, clicks, touches and key presses on the
/// document plus `visibilitychange`. Every interaction marks the flag
/// active; the flags are `use_state_eq`, so a stream of pointer events does
/// not re-render anything while the value is unchanged. An interaction
/// while idle flips the flag immediately, which restarts the poll loop at
/// the active interval without waiting for the next tick boundary.
#[hook]
pub fn use_activity_signals(config: Option<ActivitySignalsConfig>) -> ActivitySignals {
    let config = config.unwrap_or_default();

    // Opening the portal counts as an interaction.
    let page_visible = use_state_eq(|| true);
    let user_active = use_state_eq(|| true);
    let activity_window = use_mut_ref(ActivityWindow::default);
    let idle_watch_armed = use_mut_ref(|| false);

    // Track if component is mounted to avoid touching state after unmount
    let is_mounted = use_mut_ref(|| true);

    let handle_interaction = {
        let user_active = user_active.clone();
        let activity_window = activity_window.clone();
        let idle_watch_armed = idle_watch_armed.clone();
        let is_mounted = is_mounted.clone();
        let config = config.clone();

        Callback::from(move |event_type: &'static str| {
            if !*is_mounted.borrow() {
                return;
            }

            let now = js_sys::Date::now();
            activity_window.borrow_mut().record(now);

            // Unconditional: the handle's own deref can lag a render behind,
            // so gating the set on it would miss the idle-to-active edge.
            user_active.set(true);
            if config.enable_logging {
                Logger::debug_with_component(
                    "activity-signals",
                    &format!("Interaction: {}", event_type),
                );
            }

            // One idle watcher at a time; it keeps re-arming itself while
            // interactions extend the window and flips the flag when the
            // window finally runs out.
            if !*idle_watch_armed.borrow() {
                *idle_watch_armed.borrow_mut() = true;

                let user_active = user_active.clone();
                let activity_window = activity_window.clone();
                let idle_watch_armed = idle_watch_armed.clone();
                let is_mounted = is_mounted.clone();

                spawn_local(async move {
                    loop {
                        let remaining = activity_window
                            .borrow()
                            .ms_until_idle(js_sys::Date::now());
                        match remaining {
                            Some(ms) => TimeoutFuture::new(ms.ceil() as u32).await,
                            None => break,
                        }
                        if !*is_mounted.borrow() {
                            break;
                        }
                    }
                    let idle_now = !activity_window.borrow().is_active(js_sys::Date::now());
                    if *is_mounted.borrow() && idle_now {
                        user_active.set(false);
                    }
                    *idle_watch_armed.borrow_mut() = false;
                });
            }
        })
    };

    // Set up document listeners on mount
    {
        let handle_interaction = handle_interaction.clone();
        let page_visible = page_visible.clone();

        use_effect_with((), move |_| {
            let window = window().expect("should have window");
            let document = window.document().expect("should have document");

            let interaction_closure = |event_type: &'static str| {
                let handle_interaction = handle_interaction.clone();
                Closure::wrap(Box::new(move |_: web_sys::Event| {
                    handle_interaction.emit(event_type);
                }) as Box<dyn FnMut(_)>)
            };

            let handle_visibility = {
                let page_visible = page_visible.clone();
                let document = document.clone();
                Closure::wrap(Box::new(move |_: web_sys::Event| {
                    page_visible.set(document.visibility_state() == VisibilityState::Visible);
                }) as Box<dyn FnMut(_)>)
            };

            let event_listeners = vec![
                ("pointermove", interaction_closure("pointermove")),
                ("pointerdown", interaction_closure("pointerdown")),
                ("touchstart", interaction_closure("touchstart")),
                ("keydown", interaction_closure("keydown")),
            ];

            for (event_type, closure) in event_listeners.iter() {
                let _ = document
                    .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref());
            }
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                handle_visibility.as_ref().unchecked_ref(),
            );

            // Seed the activity window and arm the idle watcher.
            handle_interaction.emit("mount");

            move || {
                for (event_type, closure) in event_listeners.iter() {
                    let _ = document.remove_event_listener_with_callback(
                        event_type,
                        closure.as_ref().unchecked_ref(),
                    );
                }
                let _ = document.remove_event_listener_with_callback(
                    "visibilitychange",
                    handle_visibility.as_ref().unchecked_ref(),
                );
            }
        });
    }

    // Cleanup on component unmount
    {
        let is_mounted = is_mounted.clone();

        use_effect_with((), move |_| {
            move || {
                *is_mounted.borrow_mut() = false;
            }
        });
    }

    ActivitySignals {
        page_visible: *page_visible,
        user_active: *user_active,
    }
}
