use yew::prelude::*;

use crate::session::controller::PortalSession;

#[derive(Properties, PartialEq)]
pub struct PortalHeaderProps {
    pub session: PortalSession,
    pub loading: bool,
    pub on_refresh: Callback<MouseEvent>,
}

#[function_component(PortalHeader)]
pub fn portal_header(props: &PortalHeaderProps) -> Html {
    let name = props
        .session
        .profile()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "...".to_string());
    let avatar = props
        .session
        .profile()
        .map(|p| p.avatar.clone())
        .unwrap_or_default();

    html! {
        <header class="header">
            <div class="container">
                <div class="profile-badge">
                    <span class="avatar">{avatar}</span>
                    <h1>{format!("{}'s Candy Jar", name)}</h1>
                </div>
                <div class="balance-display">
                    <span class="balance-label">{"Candy:"}</span>
                    <span class="balance-amount">{format!("{:.1}", props.session.points())}</span>
                    <span class="streak">{format!("{} day streak", props.session.streak())}</span>
                </div>
                <button
                    class="btn refresh-btn"
                    onclick={props.on_refresh.clone()}
                    disabled={props.loading}
                >
                    {if props.loading { "Loading..." } else { "Refresh" }}
                </button>
            </div>
        </header>
    }
}
