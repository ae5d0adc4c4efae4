use yew::prelude::*;

use crate::services::date_utils::format_clock;
use crate::session::controller::PortalSession;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
    pub session: PortalSession,
    pub on_toggle: Callback<String>,
    pub on_start_focus: Callback<String>,
    pub on_stop_focus: Callback<String>,
}

#[function_component(TaskList)]
pub fn task_list(props: &TaskListProps) -> Html {
    let session = &props.session;
    let focus = session.focus();

    html! {
        <section class="tasks-section">
            <h2>{"Today's Tasks"}</h2>
            {if session.tasks().is_empty() {
                html! { <div class="empty-state">{"No tasks yet today."}</div> }
            } else {
                html! {
                    <ul class="task-list">
                        {for session.tasks().iter().map(|task| {
                            let task_id = task.id.clone();
                            let checked = session.is_checked(&task_id);
                            let toggle_pending = session.is_toggle_pending(&task_id);
                            let running_here = focus.running_task() == Some(task_id.as_str());

                            let on_toggle = {
                                let on_toggle = props.on_toggle.clone();
                                let task_id = task_id.clone();
                                Callback::from(move |_: Event| on_toggle.emit(task_id.clone()))
                            };

                            let focus_button = if running_here {
                                let on_stop = {
                                    let on_stop_focus = props.on_stop_focus.clone();
                                    let task_id = task_id.clone();
                                    Callback::from(move |_: MouseEvent| on_stop_focus.emit(task_id.clone()))
                                };
                                html! {
                                    <button class="btn focus-btn running" onclick={on_stop}>
                                        {format!("Stop {}", format_clock(focus.elapsed_seconds()))}
                                    </button>
                                }
                            } else {
                                let on_start = {
                                    let on_start_focus = props.on_start_focus.clone();
                                    let task_id = task_id.clone();
                                    Callback::from(move |_: MouseEvent| on_start_focus.emit(task_id.clone()))
                                };
                                html! {
                                    <button
                                        class="btn focus-btn"
                                        onclick={on_start}
                                        disabled={focus.is_running()}
                                    >
                                        {"Focus"}
                                    </button>
                                }
                            };

                            html! {
                                <li class={if checked { "task-row done" } else { "task-row" }}>
                                    <input
                                        type="checkbox"
                                        checked={checked}
                                        disabled={toggle_pending}
                                        onchange={on_toggle}
                                    />
                                    <span class="task-slot">{&task.time_slot}</span>
                                    <span class="task-title">{&task.title}</span>
                                    {if task.required {
                                        html! { <span class="badge required">{"required"}</span> }
                                    } else { html! {} }}
                                    <span class="task-points">{format!("+{:.0}", task.points)}</span>
                                    {if task.focus_seconds > 0 {
                                        html! {
                                            <span class="task-focus-total">
                                                {format!("focused {}", format_clock(task.focus_seconds))}
                                            </span>
                                        }
                                    } else { html! {} }}
                                    {focus_button}
                                </li>
                            }
                        })}
                    </ul>
                }
            }}
        </section>
    }
}
