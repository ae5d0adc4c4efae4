use std::cell::Cell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::logging::Logger;

/// Result from the session poller hook
pub struct UseSessionPollerResult {
    pub is_running: bool,
}

/// Hook running the adaptive background fetch loop.
///
/// Exactly one loop is alive at a time: changing `interval_ms` runs the old
/// effect's cleanup (which cancels its loop) before the new loop starts, so
/// mode changes can never stack concurrent fetch loops. Each iteration
/// sleeps first, then emits one silent refresh; the refresh callback owns
/// its own error handling, so a failed fetch never ends the loop.
#[hook]
pub fn use_session_poller(interval_ms: u32, refresh: Callback<()>) -> UseSessionPollerResult {
    let is_running = use_state(|| false);

    {
        let is_running = is_running.clone();
        let refresh = refresh.clone();

        use_effect_with(interval_ms, move |interval| {
            let interval = *interval;
            let cancelled = Rc::new(Cell::new(false));
            is_running.set(true);

            Logger::debug_with_component(
                "session-poller",
                &format!("Fetch loop (re)scheduled every {}ms", interval),
            );

            {
                let cancelled = cancelled.clone();
                spawn_local(async move {
                    loop {
                        TimeoutFuture::new(interval).await;
                        if cancelled.get() {
                            break;
                        }
                        refresh.emit(());
                    }
                });
            }

            move || {
                cancelled.set(true);
            }
        });
    }

    UseSessionPollerResult {
        is_running: *is_running,
    }
}
