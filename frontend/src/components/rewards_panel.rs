use shared::Reward;
use yew::prelude::*;

use crate::session::controller::PortalSession;

#[derive(Properties, PartialEq)]
pub struct RewardsPanelProps {
    pub session: PortalSession,
    pub on_redeem: Callback<Reward>,
}

#[function_component(RewardsPanel)]
pub fn rewards_panel(props: &RewardsPanelProps) -> Html {
    let session = &props.session;

    html! {
        <section class="rewards-section">
            <h2>{"Candy Shop"}</h2>
            <div class="rewards-grid">
                {for session.rewards().iter().map(|reward| {
                    let affordable = session.can_afford(reward.cost);
                    let on_redeem = {
                        let on_redeem = props.on_redeem.clone();
                        let reward = reward.clone();
                        Callback::from(move |_: MouseEvent| on_redeem.emit(reward.clone()))
                    };

                    html! {
                        <div class="reward-card">
                            <span class="reward-icon">{&reward.icon}</span>
                            <span class="reward-name">{&reward.name}</span>
                            <span class="reward-cost">{format!("{:.0} candy", reward.cost)}</span>
                            <button
                                class="btn redeem-btn"
                                onclick={on_redeem}
                                disabled={!affordable}
                            >
                                {"Redeem"}
                            </button>
                        </div>
                    }
                })}
            </div>

            {if !session.redemptions().is_empty() {
                html! {
                    <div class="redemption-history">
                        <h3>{"Redeemed today"}</h3>
                        <ul>
                            {for session.redemptions().iter().map(|entry| {
                                html! {
                                    <li class="redemption-row">
                                        <span class="redemption-name">{&entry.reward_name}</span>
                                        <span class="redemption-cost">{format!("-{:.0}", entry.cost)}</span>
                                        <span class="redemption-balance">
                                            {format!("{:.1} left", entry.remaining_points)}
                                        </span>
                                    </li>
                                }
                            })}
                        </ul>
                    </div>
                }
            } else { html! {} }}
        </section>
    }
}
