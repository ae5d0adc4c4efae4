//! Session controller owning all mutable portal state.
//!
//! Presentation reads through the accessors; every mutation goes through a
//! transition function so the single-active-session and clamping rules are
//! enforced here and not by which buttons happen to be disabled.

use std::collections::HashSet;

use shared::{
    clamp_points, sort_tasks_by_slot, FocusStatusUpdate, RedeemRewardResponse, RedemptionLog,
    Reward, Task, TodaySnapshot, ToggleCheckinResponse,
};

use super::focus::{FocusError, FocusStopSummary, FocusTimer};
use super::merge::{MergeOutcome, SnapshotMerge};
use super::rfc3339_from_ms;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortalSession {
    snapshot: Option<TodaySnapshot>,
    merge: SnapshotMerge,
    focus: FocusTimer,
    /// Tasks with a toggle request in flight; a concurrent snapshot must not
    /// flip these until the server confirms or the request fails.
    pending_toggles: HashSet<String>,
    redemptions: Vec<RedemptionLog>,
}

impl PortalSession {
    // ---- read-only views ----

    pub fn loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&TodaySnapshot> {
        self.snapshot.as_ref()
    }

    /// Today's tasks in slot order.
    pub fn tasks(&self) -> Vec<Task> {
        let mut tasks = self
            .snapshot
            .as_ref()
            .map(|s| s.tasks.clone())
            .unwrap_or_default();
        sort_tasks_by_slot(&mut tasks);
        tasks
    }

    pub fn points(&self) -> f64 {
        self.snapshot.as_ref().map(|s| s.points).unwrap_or(0.0)
    }

    pub fn streak(&self) -> u32 {
        self.snapshot.as_ref().map(|s| s.streak).unwrap_or(0)
    }

    pub fn profile(&self) -> Option<&shared::ChildProfile> {
        self.snapshot.as_ref().map(|s| &s.profile)
    }

    pub fn rewards(&self) -> Vec<Reward> {
        self.snapshot
            .as_ref()
            .map(|s| s.rewards.clone())
            .unwrap_or_default()
    }

    pub fn is_checked(&self, task_id: &str) -> bool {
        self.snapshot
            .as_ref()
            .map(|s| s.is_checked(task_id))
            .unwrap_or(false)
    }

    pub fn is_toggle_pending(&self, task_id: &str) -> bool {
        self.pending_toggles.contains(task_id)
    }

    pub fn redemptions(&self) -> &[RedemptionLog] {
        &self.redemptions
    }

    pub fn focus(&self) -> &FocusTimer {
        &self.focus
    }

    // ---- snapshot reconciliation ----

    /// Absorb a polled snapshot. Untouched fields are replaced wholesale;
    /// tasks with a toggle in flight keep their local checkin state until
    /// the toggle resolves.
    pub fn apply_snapshot(&mut self, mut next: TodaySnapshot) -> MergeOutcome {
        if let Some(current) = &self.snapshot {
            for task_id in &self.pending_toggles {
                let locally_checked = current.is_checked(task_id);
                next.checkins.retain(|id| id != task_id);
                if locally_checked {
                    next.checkins.push(task_id.clone());
                }
                if let Some(task) = next.tasks.iter_mut().find(|t| &t.id == task_id) {
                    task.completed = locally_checked;
                }
            }
        }

        let outcome = self.merge.absorb(self.snapshot.as_ref(), &next);
        if outcome.changed {
            self.snapshot = Some(next);
        }
        outcome
    }

    // ---- checkin toggles (confirmed server-side before any mutation) ----

    pub fn begin_toggle(&mut self, task_id: &str) {
        self.pending_toggles.insert(task_id.to_string());
    }

    pub fn confirm_toggle(&mut self, task_id: &str, response: ToggleCheckinResponse) {
        self.pending_toggles.remove(task_id);
        if let Some(snapshot) = &mut self.snapshot {
            let checked = response.checkins.iter().any(|id| id == task_id);
            snapshot.checkins = response.checkins;
            snapshot.points = clamp_points(response.points);
            snapshot.profile.points = snapshot.points;
            if let Some(task) = snapshot.tasks.iter_mut().find(|t| t.id == task_id) {
                task.completed = checked;
            }
        }
    }

    pub fn abort_toggle(&mut self, task_id: &str) {
        self.pending_toggles.remove(task_id);
    }

    // ---- focus session ----

    pub fn start_focus(
        &mut self,
        task_id: &str,
        now_ms: f64,
    ) -> Result<FocusStatusUpdate, FocusError> {
        let title = self
            .snapshot
            .as_ref()
            .and_then(|s| s.task(task_id))
            .map(|t| t.title.clone())
            .ok_or(FocusError::UnknownTask)?;
        self.focus.start(task_id, &title, now_ms)
    }

    pub fn tick_focus(&mut self) {
        self.focus.tick();
    }

    pub fn focus_pulse(&self) -> Option<FocusStatusUpdate> {
        self.focus.pulse()
    }

    /// Stop the running session and fold its seconds into the task's
    /// accumulated focus time. The session is over client-side regardless of
    /// whether the log append later succeeds.
    pub fn stop_focus(
        &mut self,
        task_id: &str,
        now_ms: f64,
    ) -> Result<FocusStopSummary, FocusError> {
        let summary = self.focus.stop(task_id, now_ms)?;
        if let Some(task) = self
            .snapshot
            .as_mut()
            .and_then(|s| s.tasks.iter_mut().find(|t| t.id == task_id))
        {
            task.focus_seconds += summary.elapsed_seconds;
        }
        Ok(summary)
    }

    // ---- reward redemption ----

    /// Local pre-check; the ledger revalidates on redeem.
    pub fn can_afford(&self, cost: f64) -> bool {
        self.points() >= cost
    }

    pub fn confirm_redemption(
        &mut self,
        reward: &Reward,
        response: RedeemRewardResponse,
        now_ms: f64,
    ) -> RedemptionLog {
        if let Some(snapshot) = &mut self.snapshot {
            snapshot.points = response.points;
            snapshot.profile.points = response.points;
        }
        let entry = RedemptionLog {
            reward_id: reward.id.clone(),
            reward_name: reward.name.clone(),
            cost: reward.cost,
            remaining_points: response.points,
            redeemed_at: rfc3339_from_ms(now_ms),
        };
        self.redemptions.push(entry.clone());
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_fixtures::{reward, snapshot_with_tasks};

    /// Server-side toggle semantics: flip membership, adjust points by the
    /// task's value, clamp at zero.
    struct FakeLedger {
        checkins: Vec<String>,
        points: f64,
    }

    impl FakeLedger {
        fn from_session(session: &PortalSession) -> Self {
            let snapshot = session.snapshot().unwrap();
            Self {
                checkins: snapshot.checkins.clone(),
                points: snapshot.points,
            }
        }

        fn toggle(&mut self, task: &Task) -> ToggleCheckinResponse {
            if let Some(pos) = self.checkins.iter().position(|id| id == &task.id) {
                self.checkins.remove(pos);
                self.points = clamp_points(self.points - task.points);
            } else {
                self.checkins.push(task.id.clone());
                self.points = clamp_points(self.points + task.points);
            }
            ToggleCheckinResponse {
                checkins: self.checkins.clone(),
                points: self.points,
            }
        }
    }

    fn session_with_points(points: f64) -> PortalSession {
        let mut snapshot = snapshot_with_tasks(3);
        snapshot.points = points;
        snapshot.profile.points = points;
        let mut session = PortalSession::default();
        session.apply_snapshot(snapshot);
        session
    }

    fn run_toggle(session: &mut PortalSession, ledger: &mut FakeLedger, task: &Task) {
        session.begin_toggle(&task.id);
        let response = ledger.toggle(task);
        session.confirm_toggle(&task.id, response);
    }

    #[test]
    fn toggle_round_trip_restores_the_balance() {
        let mut session = session_with_points(87.8);
        let task = session.tasks()[0].clone();
        let mut ledger = FakeLedger::from_session(&session);

        run_toggle(&mut session, &mut ledger, &task);
        assert!((session.points() - 92.8).abs() < 1e-9);
        assert!(session.is_checked(&task.id));

        run_toggle(&mut session, &mut ledger, &task);
        assert!((session.points() - 87.8).abs() < 1e-9);
        assert!(!session.is_checked(&task.id));
    }

    #[test]
    fn toggle_parity_over_many_flips() {
        let mut session = session_with_points(10.0);
        let task = session.tasks()[0].clone();
        let mut ledger = FakeLedger::from_session(&session);

        for _ in 0..6 {
            run_toggle(&mut session, &mut ledger, &task);
        }
        assert!((session.points() - 10.0).abs() < 1e-9);

        run_toggle(&mut session, &mut ledger, &task);
        assert!((session.points() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn uncheck_clamps_at_zero() {
        let mut session = session_with_points(3.0);
        let task = session.tasks()[0].clone();
        let mut ledger = FakeLedger::from_session(&session);

        run_toggle(&mut session, &mut ledger, &task);
        assert!((session.points() - 8.0).abs() < 1e-9);

        // Balance dropped elsewhere before the uncheck lands.
        ledger.points = 2.0;
        run_toggle(&mut session, &mut ledger, &task);
        assert_eq!(session.points(), 0.0);
    }

    #[test]
    fn pending_toggle_survives_a_concurrent_snapshot() {
        let mut session = session_with_points(20.0);
        let task = session.tasks()[0].clone();
        session.begin_toggle(&task.id);

        // Poller delivers a snapshot that claims the task is checked.
        let mut stale = session.snapshot().unwrap().clone();
        stale.checkins.push(task.id.clone());
        session.apply_snapshot(stale);
        assert!(!session.is_checked(&task.id));
        assert!(session.is_toggle_pending(&task.id));

        // Confirmation applies server truth and clears the pending mark.
        session.confirm_toggle(
            &task.id,
            ToggleCheckinResponse {
                checkins: vec![task.id.clone()],
                points: 25.0,
            },
        );
        assert!(session.is_checked(&task.id));
        assert!(!session.is_toggle_pending(&task.id));
    }

    #[test]
    fn redeem_requires_sufficient_balance() {
        let session = session_with_points(300.0);
        assert!(!session.can_afford(500.0));
        assert_eq!(session.points(), 300.0);
        assert!(session.redemptions().is_empty());
    }

    #[test]
    fn successful_redemption_appends_one_log_entry() {
        let mut session = session_with_points(500.0);
        let prize = reward("r9", 500.0);
        assert!(session.can_afford(prize.cost));

        let entry =
            session.confirm_redemption(&prize, RedeemRewardResponse { points: 0.0 }, 1_000.0);
        assert_eq!(entry.cost, 500.0);
        assert_eq!(entry.remaining_points, 0.0);
        assert_eq!(session.points(), 0.0);
        assert_eq!(session.redemptions().len(), 1);
    }

    #[test]
    fn start_focus_on_unknown_task_is_rejected() {
        let mut session = session_with_points(20.0);
        assert_eq!(
            session.start_focus("nope", 0.0).unwrap_err(),
            FocusError::UnknownTask
        );
    }

    #[test]
    fn stop_focus_accumulates_task_time() {
        let mut session = session_with_points(20.0);
        let task_id = session.tasks()[0].id.clone();

        session.start_focus(&task_id, 0.0).unwrap();
        for _ in 0..30 {
            session.tick_focus();
        }
        let summary = session.stop_focus(&task_id, 30_000.0).unwrap();
        assert_eq!(summary.elapsed_seconds, 30);

        let tracked = session
            .snapshot()
            .unwrap()
            .task(&task_id)
            .unwrap()
            .focus_seconds;
        assert_eq!(tracked, 30);

        // A second session on the same task keeps accumulating.
        session.start_focus(&task_id, 60_000.0).unwrap();
        session.tick_focus();
        session.stop_focus(&task_id, 61_000.0).unwrap();
        let tracked = session
            .snapshot()
            .unwrap()
            .task(&task_id)
            .unwrap()
            .focus_seconds;
        assert_eq!(tracked, 31);
    }

    #[test]
    fn starting_a_second_task_is_rejected_with_state_intact() {
        let mut session = session_with_points(20.0);
        let first = session.tasks()[0].id.clone();
        let second = session.tasks()[1].id.clone();

        session.start_focus(&first, 0.0).unwrap();
        assert_eq!(
            session.start_focus(&second, 1_000.0).unwrap_err(),
            FocusError::AlreadyRunning
        );
        assert_eq!(session.focus().running_task(), Some(first.as_str()));
    }

    #[test]
    fn fresh_session_reads_as_empty() {
        let session = PortalSession::default();
        assert!(!session.loaded());
        assert!(session.tasks().is_empty());
        assert_eq!(session.points(), 0.0);
        assert!(!session.can_afford(1.0));
    }
}
