use std::cell::Cell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use shared::Reward;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::LedgerClient;
use crate::services::date_utils;
use crate::services::dialog::blocking_alert;
use crate::services::logging::Logger;
use crate::session::controller::PortalSession;
use crate::session::focus::{DISPLAY_TICK_MS, PULSE_INTERVAL_MS};
use crate::session::merge::NEW_TASK_NOTICE_MS;

#[derive(Clone, PartialEq)]
pub struct PortalSessionState {
    pub session: PortalSession,
    /// Visible loading indicator; silent background fetches never set it
    pub loading: bool,
    /// One-shot "new tasks arrived" notice, auto-dismissed
    pub toast: Option<String>,
}

pub struct UsePortalSessionResult {
    pub state: PortalSessionState,
    pub actions: UsePortalSessionActions,
}

#[derive(Clone, PartialEq)]
pub struct UsePortalSessionActions {
    /// Fetch today's snapshot; the flag selects silent (poller) vs visible
    /// (manual) behavior
    pub refresh: Callback<bool>,
    pub toggle_checkin: Callback<String>,
    pub redeem_reward: Callback<Reward>,
    pub start_focus: Callback<String>,
    pub stop_focus: Callback<String>,
}

/// Hook owning the portal session state and all transitions on it.
///
/// The authoritative `PortalSession` lives in one shared cell, never in a
/// state handle: the memoized action callbacks and the background loops
/// outlive any single render, and a handle they captured would keep handing
/// them the value it had when they were created. Mutations go through the
/// cell and bump an epoch counter to schedule the re-render.
///
/// Network I/O is fire-and-forget per action; the cooperative thread is
/// never blocked. While a focus session is running two extra loops exist:
/// the 1-second display tick and the 15-second pulse. Both are cancelled
/// when the session stops or the component unmounts.
#[hook]
pub fn use_portal_session(api: &LedgerClient) -> UsePortalSessionResult {
    let session = use_mut_ref(PortalSession::default);
    let session_epoch = use_mut_ref(|| 0u32);
    let rendered_epoch = use_state(|| 0u32);
    let loading = use_state(|| false);
    let toast = use_state(|| Option::<String>::None);
    let toast_generation = use_mut_ref(|| 0u64);

    let mark_session_changed = {
        let session_epoch = session_epoch.clone();
        let rendered_epoch = rendered_epoch.clone();

        Callback::from(move |_: ()| {
            let next = {
                let mut epoch = session_epoch.borrow_mut();
                *epoch += 1;
                *epoch
            };
            rendered_epoch.set(next);
        })
    };

    let show_new_task_toast = {
        let toast = toast.clone();
        let toast_generation = toast_generation.clone();

        Callback::from(move |count: usize| {
            let message = if count == 1 {
                "1 new task arrived!".to_string()
            } else {
                format!("{} new tasks arrived!", count)
            };
            toast.set(Some(message));

            let generation = {
                let mut current = toast_generation.borrow_mut();
                *current += 1;
                *current
            };
            let toast = toast.clone();
            let toast_generation = toast_generation.clone();
            spawn_local(async move {
                TimeoutFuture::new(NEW_TASK_NOTICE_MS).await;
                // A newer toast restarts the clock; only the latest dismisses.
                if *toast_generation.borrow() == generation {
                    toast.set(None);
                }
            });
        })
    };

    let refresh = {
        let api = api.clone();
        let session = session.clone();
        let loading = loading.clone();
        let mark_session_changed = mark_session_changed.clone();
        let show_new_task_toast = show_new_task_toast.clone();

        use_callback((), move |silent: bool, _| {
            let api = api.clone();
            let session = session.clone();
            let loading = loading.clone();
            let mark_session_changed = mark_session_changed.clone();
            let show_new_task_toast = show_new_task_toast.clone();

            spawn_local(async move {
                if !silent {
                    loading.set(true);
                }

                match api.get_today_data(&date_utils::get_current_date()).await {
                    Ok(snapshot) => {
                        let outcome = session.borrow_mut().apply_snapshot(snapshot);
                        if outcome.changed {
                            mark_session_changed.emit(());
                        }
                        if let Some(count) = outcome.new_task_count {
                            show_new_task_toast.emit(count);
                        }
                    }
                    Err(e) => {
                        if silent {
                            Logger::warn_with_component(
                                "portal-session",
                                &format!("Background refresh failed: {}", e),
                            );
                        } else {
                            blocking_alert(&format!("Couldn't load today's data: {}", e));
                        }
                    }
                }

                if !silent {
                    loading.set(false);
                }
            });
        })
    };

    let toggle_checkin = {
        let api = api.clone();
        let session = session.clone();
        let mark_session_changed = mark_session_changed.clone();

        use_callback((), move |task_id: String, _| {
            let api = api.clone();
            let session = session.clone();
            let mark_session_changed = mark_session_changed.clone();

            // Mark the toggle in flight before the request leaves so a
            // concurrent snapshot cannot flip this task underneath it.
            session.borrow_mut().begin_toggle(&task_id);
            mark_session_changed.emit(());

            spawn_local(async move {
                match api.toggle_checkin(&task_id).await {
                    Ok(response) => {
                        session.borrow_mut().confirm_toggle(&task_id, response);
                        mark_session_changed.emit(());
                    }
                    Err(e) => {
                        session.borrow_mut().abort_toggle(&task_id);
                        mark_session_changed.emit(());
                        blocking_alert(&format!("Couldn't update the task: {}", e));
                    }
                }
            });
        })
    };

    let redeem_reward = {
        let api = api.clone();
        let session = session.clone();
        let mark_session_changed = mark_session_changed.clone();

        use_callback((), move |reward: Reward, _| {
            let affordable = session.borrow().can_afford(reward.cost);
            if !affordable {
                blocking_alert("Not enough candy for that reward yet!");
                return;
            }

            let api = api.clone();
            let session = session.clone();
            let mark_session_changed = mark_session_changed.clone();
            spawn_local(async move {
                match api.redeem_reward(&reward.id, reward.cost).await {
                    Ok(response) => {
                        let entry = session.borrow_mut().confirm_redemption(
                            &reward,
                            response,
                            js_sys::Date::now(),
                        );
                        mark_session_changed.emit(());
                        Logger::info_with_component(
                            "portal-session",
                            &format!(
                                "Redeemed {} for {:.0} candy, {:.1} left",
                                entry.reward_name, entry.cost, entry.remaining_points
                            ),
                        );
                    }
                    Err(e) => {
                        blocking_alert(&format!("Couldn't redeem {}: {}", reward.name, e));
                    }
                }
            });
        })
    };

    let start_focus = {
        let api = api.clone();
        let session = session.clone();
        let mark_session_changed = mark_session_changed.clone();

        use_callback((), move |task_id: String, _| {
            let started = session
                .borrow_mut()
                .start_focus(&task_id, js_sys::Date::now());
            match started {
                Ok(update) => {
                    mark_session_changed.emit(());
                    let api = api.clone();
                    spawn_local(async move {
                        if let Err(e) = api.update_focus_status(&update).await {
                            Logger::warn_with_component(
                                "focus-session",
                                &format!("Active status update failed: {}", e),
                            );
                        }
                    });
                }
                Err(e) => blocking_alert(&e.to_string()),
            }
        })
    };

    let stop_focus = {
        let api = api.clone();
        let session = session.clone();
        let mark_session_changed = mark_session_changed.clone();

        use_callback((), move |task_id: String, _| {
            let stopped = session
                .borrow_mut()
                .stop_focus(&task_id, js_sys::Date::now());
            match stopped {
                Ok(summary) => {
                    // The session is over client-side from here on; the log
                    // append and the inactive status are attempted
                    // independently and a failure in either is only logged.
                    mark_session_changed.emit(());

                    let log = summary.log;
                    let log_api = api.clone();
                    spawn_local(async move {
                        if let Err(e) = log_api.record_focus(&log).await {
                            Logger::error_with_component(
                                "focus-session",
                                &format!("Focus log append failed: {}", e),
                            );
                        }
                    });

                    let status_api = api.clone();
                    spawn_local(async move {
                        let inactive = shared::FocusStatusUpdate::inactive();
                        if let Err(e) = status_api.update_focus_status(&inactive).await {
                            Logger::warn_with_component(
                                "focus-session",
                                &format!("Inactive status update failed: {}", e),
                            );
                        }
                    });
                }
                Err(e) => blocking_alert(&e.to_string()),
            }
        })
    };

    // Display tick and pulse loops, alive only while a session runs.
    {
        let api = api.clone();
        let session_cell = session.clone();
        let mark_session_changed = mark_session_changed.clone();
        let focus_running = session.borrow().focus().is_running();

        use_effect_with(focus_running, move |running| {
            let cancelled = Rc::new(Cell::new(false));

            if *running {
                {
                    let session = session_cell.clone();
                    let mark_session_changed = mark_session_changed.clone();
                    let cancelled = cancelled.clone();
                    spawn_local(async move {
                        loop {
                            TimeoutFuture::new(DISPLAY_TICK_MS).await;
                            if cancelled.get() {
                                break;
                            }
                            let ticked = {
                                let mut current = session.borrow_mut();
                                if current.focus().is_running() {
                                    current.tick_focus();
                                    true
                                } else {
                                    false
                                }
                            };
                            if !ticked {
                                break;
                            }
                            mark_session_changed.emit(());
                        }
                    });
                }

                {
                    let session = session_cell.clone();
                    let cancelled = cancelled.clone();
                    spawn_local(async move {
                        loop {
                            TimeoutFuture::new(PULSE_INTERVAL_MS).await;
                            if cancelled.get() {
                                break;
                            }
                            let pulse = session.borrow().focus_pulse();
                            let Some(pulse) = pulse else {
                                break;
                            };
                            if let Err(e) = api.update_focus_status(&pulse).await {
                                Logger::warn_with_component(
                                    "focus-session",
                                    &format!("Pulse failed, next one retries: {}", e),
                                );
                            }
                        }
                    });
                }
            }

            move || {
                cancelled.set(true);
            }
        });
    }

    let session_snapshot = session.borrow().clone();
    UsePortalSessionResult {
        state: PortalSessionState {
            session: session_snapshot,
            loading: *loading,
            toast: (*toast).clone(),
        },
        actions: UsePortalSessionActions {
            refresh,
            toggle_checkin,
            redeem_reward,
            start_focus,
            stop_focus,
        },
    }
}
