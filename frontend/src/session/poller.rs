//! Adaptive poll interval selection.
//!
//! The poll loop itself lives in `hooks::use_session_poller`; this module is
//! the pure part, fed with timestamps so it can be exercised without a
//! browser.

/// Poll interval while the user interacted recently and the page is visible.
pub const ACTIVE_POLL_MS: u32 = 4_000;
/// Poll interval after the activity window expires with the page visible.
pub const IDLE_POLL_MS: u32 = 60_000;
/// Poll interval while the page is not visible.
pub const HIDDEN_POLL_MS: u32 = 300_000;
/// How long after the last interaction the session still counts as active.
pub const IDLE_AFTER_MS: f64 = 60_000.0;

/// Freshness mode the poller is in, re-selected whenever an ambient signal
/// changes. Hidden overrides activity recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    Active,
    Idle,
    Hidden,
}

impl PollMode {
    pub fn select(page_visible: bool, user_active: bool) -> PollMode {
        if !page_visible {
            PollMode::Hidden
        } else if user_active {
            PollMode::Active
        } else {
            PollMode::Idle
        }
    }

    pub fn interval_ms(self) -> u32 {
        match self {
            PollMode::Active => ACTIVE_POLL_MS,
            PollMode::Idle => IDLE_POLL_MS,
            PollMode::Hidden => HIDDEN_POLL_MS,
        }
    }
}

/// Records when the user last interacted with the page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivityWindow {
    last_interaction_ms: Option<f64>,
}

impl ActivityWindow {
    pub fn record(&mut self, now_ms: f64) {
        self.last_interaction_ms = Some(now_ms);
    }

    /// True when an interaction happened within the last [`IDLE_AFTER_MS`].
    /// A session with no interactions yet is idle.
    pub fn is_active(&self, now_ms: f64) -> bool {
        self.ms_until_idle(now_ms).is_some()
    }

    /// How long until the window expires, or `None` when already idle.
    pub fn ms_until_idle(&self, now_ms: f64) -> Option<f64> {
        let at = self.last_interaction_ms?;
        let remaining = IDLE_AFTER_MS - (now_ms - at);
        (remaining > 0.0).then_some(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_overrides_activity() {
        assert_eq!(PollMode::select(false, true), PollMode::Hidden);
        assert_eq!(PollMode::select(false, false), PollMode::Hidden);
    }

    #[test]
    fn visible_modes_follow_activity() {
        assert_eq!(PollMode::select(true, true), PollMode::Active);
        assert_eq!(PollMode::select(true, false), PollMode::Idle);
    }

    #[test]
    fn intervals_match_freshness_targets() {
        let active = PollMode::Active.interval_ms();
        assert!((3_000..=5_000).contains(&active));
        assert_eq!(PollMode::Idle.interval_ms(), 60_000);
        assert_eq!(PollMode::Hidden.interval_ms(), 300_000);
    }

    #[test]
    fn activity_window_expires_after_a_minute() {
        let mut window = ActivityWindow::default();
        assert!(!window.is_active(0.0));

        window.record(10_000.0);
        assert!(window.is_active(10_000.0));
        assert!(window.is_active(69_999.0));
        assert!(!window.is_active(70_000.0));
    }

    #[test]
    fn remaining_time_counts_down_to_none() {
        let mut window = ActivityWindow::default();
        assert_eq!(window.ms_until_idle(0.0), None);

        window.record(0.0);
        assert_eq!(window.ms_until_idle(0.0), Some(60_000.0));
        assert_eq!(window.ms_until_idle(45_000.0), Some(15_000.0));
        assert_eq!(window.ms_until_idle(60_000.0), None);
    }

    #[test]
    fn new_interaction_reopens_the_window() {
        let mut window = ActivityWindow::default();
        window.record(0.0);
        assert!(!window.is_active(90_000.0));

        window.record(90_000.0);
        assert!(window.is_active(90_001.0));
    }

    #[test]
    fn interaction_while_idle_selects_the_active_mode_again() {
        let mut window = ActivityWindow::default();
        window.record(0.0);

        let now = 120_000.0;
        assert_eq!(PollMode::select(true, window.is_active(now)), PollMode::Idle);

        // Any interaction event must bring the poller straight back.
        window.record(now);
        assert_eq!(PollMode::select(true, window.is_active(now)), PollMode::Active);
    }
}
