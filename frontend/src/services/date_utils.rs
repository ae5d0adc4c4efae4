/// Get current date in YYYY-MM-DD format
pub fn get_current_date() -> String {
    use js_sys::Date;
    let now = Date::new_0();
    let year = now.get_full_year();
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    format!("{:04}-{:02}-{:02}", year as u32, month as u32, day as u32)
}

/// Format accumulated seconds as a clock string for the timer display,
/// "M:SS" under an hour and "H:MM:SS" from there on.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
