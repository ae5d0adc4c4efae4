use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NewTaskToastProps {
    pub message: Option<String>,
}

/// One-shot notice that the poller found more tasks than last time.
/// Dismissal is driven by the session hook, not by this component.
#[function_component(NewTaskToast)]
pub fn new_task_toast(props: &NewTaskToastProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <div class="toast new-tasks">{message}</div>
        },
        None => html! {},
    }
}
