use web_sys::window;

/// Blocking alert for failures of user-initiated actions (manual refresh,
/// checkin toggles, redemption). Background failures never come through
/// here; they go to the console logger instead.
pub fn blocking_alert(message: &str) {
    if let Some(window) = window() {
        let _ = window.alert_with_message(message);
    }
}
