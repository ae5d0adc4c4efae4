//! Reconciliation of polled snapshots with the cached copy.

use shared::TodaySnapshot;

/// How long the "new tasks" toast stays on screen before auto-dismissing.
pub const NEW_TASK_NOTICE_MS: u32 = 5_000;

/// What absorbing one snapshot produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The snapshot differs structurally from the cached one; skipping
    /// no-op re-renders when the server state is unchanged.
    pub changed: bool,
    /// How many tasks arrived since the previous snapshot, when the list
    /// grew and a baseline exists to compare against.
    pub new_task_count: Option<usize>,
}

/// Tracks the task-count baseline across snapshots.
///
/// The first snapshot after session start sets the baseline without a
/// notification; there is no history to compare against. A shrinking list
/// (parent removed a task) updates the baseline silently.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapshotMerge {
    baseline_task_count: Option<usize>,
}

impl SnapshotMerge {
    pub fn absorb(
        &mut self,
        previous: Option<&TodaySnapshot>,
        next: &TodaySnapshot,
    ) -> MergeOutcome {
        let changed = previous.map_or(true, |cached| cached != next);

        let new_task_count = match self.baseline_task_count {
            Some(baseline) if next.tasks.len() > baseline => Some(next.tasks.len() - baseline),
            _ => None,
        };
        self.baseline_task_count = Some(next.tasks.len());

        MergeOutcome {
            changed,
            new_task_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_fixtures::snapshot_with_tasks;

    #[test]
    fn first_snapshot_never_notifies() {
        let mut merge = SnapshotMerge::default();
        let snapshot = snapshot_with_tasks(3);

        let outcome = merge.absorb(None, &snapshot);
        assert!(outcome.changed);
        assert_eq!(outcome.new_task_count, None);
    }

    #[test]
    fn growth_after_baseline_reports_the_difference() {
        let mut merge = SnapshotMerge::default();
        let first = snapshot_with_tasks(3);
        merge.absorb(None, &first);

        let second = snapshot_with_tasks(5);
        let outcome = merge.absorb(Some(&first), &second);
        assert_eq!(outcome.new_task_count, Some(2));
    }

    #[test]
    fn shrinking_list_updates_baseline_silently() {
        let mut merge = SnapshotMerge::default();
        let first = snapshot_with_tasks(4);
        merge.absorb(None, &first);

        let removed = snapshot_with_tasks(2);
        let outcome = merge.absorb(Some(&first), &removed);
        assert_eq!(outcome.new_task_count, None);

        // Growth is now measured against the shrunken baseline.
        let regrown = snapshot_with_tasks(3);
        let outcome = merge.absorb(Some(&removed), &regrown);
        assert_eq!(outcome.new_task_count, Some(1));
    }

    #[test]
    fn identical_snapshot_reports_unchanged() {
        let mut merge = SnapshotMerge::default();
        let snapshot = snapshot_with_tasks(2);
        merge.absorb(None, &snapshot);

        let same = snapshot.clone();
        let outcome = merge.absorb(Some(&snapshot), &same);
        assert!(!outcome.changed);
        assert_eq!(outcome.new_task_count, None);
    }

    #[test]
    fn value_change_without_count_change_is_detected() {
        let mut merge = SnapshotMerge::default();
        let snapshot = snapshot_with_tasks(2);
        merge.absorb(None, &snapshot);

        let mut updated = snapshot.clone();
        updated.points += 5.0;
        let outcome = merge.absorb(Some(&snapshot), &updated);
        assert!(outcome.changed);
        assert_eq!(outcome.new_task_count, None);
    }
}
