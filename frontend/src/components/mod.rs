mod header;
mod new_task_toast;
mod rewards_panel;
mod task_list;

pub use header::PortalHeader;
pub use new_task_toast::NewTaskToast;
pub use rewards_panel::RewardsPanel;
pub use task_list::TaskList;
