//! Focus timer state machine.
//!
//! One child runs at most one focused-work interval at a time. The elapsed
//! counter is driven by a local one-second tick so the displayed time never
//! waits on the network; pulses and the final log are emitted by the caller
//! from the payloads returned here.

use shared::{FocusLog, FocusStatusUpdate};
use thiserror::Error;

use super::rfc3339_from_ms;

/// Cadence of the live-status pulse while a session is running.
pub const PULSE_INTERVAL_MS: u32 = 15_000;
/// Cadence of the local display tick.
pub const DISPLAY_TICK_MS: u32 = 1_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FocusError {
    #[error("Finish the current task first!")]
    AlreadyRunning,
    #[error("No focus session is running.")]
    NotRunning,
    #[error("Finish the current task first!")]
    DifferentTask,
    #[error("That task isn't on today's list.")]
    UnknownTask,
}

#[derive(Debug, Clone, PartialEq)]
enum FocusState {
    Idle,
    Running {
        task_id: String,
        task_title: String,
        started_at_ms: f64,
        elapsed_seconds: u64,
    },
}

/// Everything a valid stop produces: the durable log plus the seconds to
/// fold into the task's accumulated focus time.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusStopSummary {
    pub log: FocusLog,
    pub elapsed_seconds: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FocusTimer {
    state: FocusState,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self {
            state: FocusState::Idle,
        }
    }
}

impl FocusTimer {
    pub fn is_running(&self) -> bool {
        matches!(self.state, FocusState::Running { .. })
    }

    pub fn running_task(&self) -> Option<&str> {
        match &self.state {
            FocusState::Running { task_id, .. } => Some(task_id),
            FocusState::Idle => None,
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        match &self.state {
            FocusState::Running {
                elapsed_seconds, ..
            } => *elapsed_seconds,
            FocusState::Idle => 0,
        }
    }

    /// Begin a session on `task_id`. Returns the status update to send
    /// (fire-and-forget) so the parent side sees the session immediately.
    pub fn start(
        &mut self,
        task_id: &str,
        task_title: &str,
        now_ms: f64,
    ) -> Result<FocusStatusUpdate, FocusError> {
        if self.is_running() {
            return Err(FocusError::AlreadyRunning);
        }
        self.state = FocusState::Running {
            task_id: task_id.to_string(),
            task_title: task_title.to_string(),
            started_at_ms: now_ms,
            elapsed_seconds: 0,
        };
        Ok(FocusStatusUpdate::active(task_title, 0))
    }

    /// Advance the elapsed counter by one second. No-op while idle.
    pub fn tick(&mut self) {
        if let FocusState::Running {
            elapsed_seconds, ..
        } = &mut self.state
        {
            *elapsed_seconds += 1;
        }
    }

    /// Current live-status payload, only while running. A failed pulse is
    /// not retried out-of-band; the next scheduled pulse carries the
    /// corrected duration anyway.
    pub fn pulse(&self) -> Option<FocusStatusUpdate> {
        match &self.state {
            FocusState::Running {
                task_title,
                elapsed_seconds,
                ..
            } => Some(FocusStatusUpdate::active(task_title, *elapsed_seconds)),
            FocusState::Idle => None,
        }
    }

    /// End the session, only valid for the task that is running. The local
    /// transition to idle is unconditional once validated; delivery of the
    /// log and the inactive status is the caller's at-least-once concern.
    pub fn stop(&mut self, task_id: &str, now_ms: f64) -> Result<FocusStopSummary, FocusError> {
        match &self.state {
            FocusState::Idle => Err(FocusError::NotRunning),
            FocusState::Running {
                task_id: running_id,
                ..
            } if running_id != task_id => Err(FocusError::DifferentTask),
            FocusState::Running {
                task_id: running_id,
                task_title,
                started_at_ms,
                elapsed_seconds,
            } => {
                let ended_at_ms = now_ms.max(*started_at_ms);
                let log = FocusLog {
                    task_id: running_id.clone(),
                    task_title: task_title.clone(),
                    started_at: rfc3339_from_ms(*started_at_ms),
                    ended_at: rfc3339_from_ms(ended_at_ms),
                    duration_seconds: *elapsed_seconds,
                };
                let summary = FocusStopSummary {
                    elapsed_seconds: *elapsed_seconds,
                    log,
                };
                self.state = FocusState::Idle;
                Ok(summary)
            }
        }
    }
}
