pub struct Logger;

impl Logger {
    pub fn debug_with_component(component: &str, message: &str) {
        gloo::console::debug!(format!("[{}] {}", component, message));
    }

    pub fn info_with_component(component: &str, message: &str) {
        gloo::console::info!(format!("[{}] {}", component, message));
    }

    pub fn warn_with_component(component: &str, message: &str) {
        gloo::console::warn!(format!("[{}] {}", component, message));
    }

    pub fn error_with_component(component: &str, message: &str) {
        gloo::console::error!(format!("[{}] {}", component, message));
    }
}
