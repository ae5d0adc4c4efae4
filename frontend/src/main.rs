mod components;
mod hooks;
mod services;
mod session;

use web_sys::window;
use yew::prelude::*;

use components::{NewTaskToast, PortalHeader, RewardsPanel, TaskList};
use hooks::{use_activity_signals, use_portal_session, use_session_poller};
use services::api::LedgerClient;
use session::poller::PollMode;

fn query_param(search: &str, key: &str) -> Option<String> {
    let prefix = format!("{}=", key);
    search
        .trim_start_matches('?')
        .split('&')
        .find_map(|pair| pair.strip_prefix(prefix.as_str()).map(|v| v.to_string()))
        .filter(|value| !value.is_empty())
}

fn location_search() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// Opaque bearer token for the child portal. Taken from the `token` query
/// parameter when present; the client never parses its contents.
fn portal_token() -> String {
    query_param(&location_search(), "token").unwrap_or_else(|| "demo-child-token".to_string())
}

/// Build the ledger client, pointed at the `api` query parameter's endpoint
/// when one is given so the portal can be served against a non-default
/// backend.
fn portal_client() -> LedgerClient {
    let token = portal_token();
    match query_param(&location_search(), "api") {
        Some(endpoint) => LedgerClient::with_endpoint(endpoint, token),
        None => LedgerClient::new(token),
    }
}

#[function_component(App)]
fn app() -> Html {
    let api = use_state(portal_client);

    let portal = use_portal_session(&api);
    let signals = use_activity_signals(None);

    let poll_mode = PollMode::select(signals.page_visible, signals.user_active);
    let silent_refresh = {
        let refresh = portal.actions.refresh.clone();
        Callback::from(move |_| refresh.emit(true))
    };
    let _poller = use_session_poller(poll_mode.interval_ms(), silent_refresh);

    // Initial visible load; every fetch after this one comes from the
    // adaptive poller or the manual refresh button.
    use_effect_with((), {
        let refresh = portal.actions.refresh.clone();
        move |_| {
            refresh.emit(false);
            || ()
        }
    });

    let manual_refresh = {
        let refresh = portal.actions.refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(false))
    };

    html! {
        <>
            <PortalHeader
                session={portal.state.session.clone()}
                loading={portal.state.loading}
                on_refresh={manual_refresh}
            />
            <NewTaskToast message={portal.state.toast.clone()} />

            <main class="main">
                <div class="container">
                    {if !portal.state.session.loaded() && portal.state.loading {
                        html! { <div class="loading">{"Loading today's tasks..."}</div> }
                    } else {
                        html! {
                            <>
                                <TaskList
                                    session={portal.state.session.clone()}
                                    on_toggle={portal.actions.toggle_checkin.clone()}
                                    on_start_focus={portal.actions.start_focus.clone()}
                                    on_stop_focus={portal.actions.stop_focus.clone()}
                                />
                                <RewardsPanel
                                    session={portal.state.session.clone()}
                                    on_redeem={portal.actions.redeem_reward.clone()}
                                />
                            </>
                        }
                    }}
                </div>
            </main>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::query_param;

    #[test]
    fn query_param_picks_out_the_named_pair() {
        let search = "?token=abc123&api=http://ledger.local/api/portal";
        assert_eq!(query_param(search, "token"), Some("abc123".to_string()));
        assert_eq!(
            query_param(search, "api"),
            Some("http://ledger.local/api/portal".to_string())
        );
    }

    #[test]
    fn query_param_ignores_missing_and_empty_values() {
        assert_eq!(query_param("", "token"), None);
        assert_eq!(query_param("?token=", "token"), None);
        assert_eq!(query_param("?api=http://x", "token"), None);
    }
}

