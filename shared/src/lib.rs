use serde::{Deserialize, Serialize};

/// A task scheduled for one child on one day.
///
/// Tasks are published by a parent for a specific date and become historical
/// (read-only) once the day rolls over. The completion flag and accumulated
/// focus time are the only fields mutated by child actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Scheduled slot as "HH:MM"; lexicographic order is chronological order
    pub time_slot: String,
    /// Candy points awarded when the task is checked in
    pub points: f64,
    pub completed: bool,
    pub required: bool,
    /// Owning date as "YYYY-MM-DD"
    pub date: String,
    pub category: String,
    /// Total seconds from finished focus sessions on this task
    pub focus_seconds: u64,
}

/// A parent-defined reward that candy points can be redeemed for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub icon: String,
    pub category: String,
}

/// A child profile as the ledger reports it.
///
/// `is_focusing`, `focus_task` and `focus_duration` are the live-status
/// fields overwritten by focus pulses for parent-side display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub points: f64,
    pub is_focusing: bool,
    pub focus_task: Option<String>,
    pub focus_duration: u64,
}

/// Durable record of one completed focus session. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FocusLog {
    pub task_id: String,
    pub task_title: String,
    /// RFC 3339 timestamps
    pub started_at: String,
    pub ended_at: String,
    pub duration_seconds: u64,
}

/// Durable record of one reward redemption. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionLog {
    pub reward_id: String,
    pub reward_name: String,
    pub cost: f64,
    /// Balance immediately after the redemption
    pub remaining_points: f64,
    pub redeemed_at: String,
}

/// Authoritative server state for one child on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodaySnapshot {
    pub tasks: Vec<Task>,
    /// Ids of tasks checked in today
    pub checkins: Vec<String>,
    pub streak: u32,
    pub points: f64,
    pub profile: ChildProfile,
    pub rewards: Vec<Reward>,
}

impl TodaySnapshot {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn is_checked(&self, task_id: &str) -> bool {
        self.checkins.iter().any(|id| id == task_id)
    }
}

/// Request body for every ledger call.
///
/// The token is an opaque capability identifying the child or parent; the
/// client never parses it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiRequest {
    pub action: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Response envelope for every ledger call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub message: Option<String>,
}

/// Response payload for `toggle_checkin`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCheckinResponse {
    pub checkins: Vec<String>,
    pub points: f64,
}

/// Response payload for `redeem_reward`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRewardResponse {
    pub points: f64,
}

/// Payload for `update_focus_status`, overwriting the child's live status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FocusStatusUpdate {
    pub is_focusing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl FocusStatusUpdate {
    pub fn active(task_title: &str, duration: u64) -> Self {
        Self {
            is_focusing: true,
            task_title: Some(task_title.to_string()),
            duration: Some(duration),
        }
    }

    pub fn inactive() -> Self {
        Self {
            is_focusing: false,
            task_title: None,
            duration: None,
        }
    }
}

/// Sort tasks by their "HH:MM" slot; ties keep their relative order.
pub fn sort_tasks_by_slot(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.time_slot.cmp(&b.time_slot));
}

/// Checkin-driven point changes never take the balance below zero.
pub fn clamp_points(points: f64) -> f64 {
    points.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, slot: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            time_slot: slot.to_string(),
            points: 5.0,
            completed: false,
            required: false,
            date: "2026-03-01".to_string(),
            category: "study".to_string(),
            focus_seconds: 0,
        }
    }

    #[test]
    fn tasks_sort_chronologically_by_slot() {
        let mut tasks = vec![task("a", "16:30"), task("b", "07:45"), task("c", "09:00")];
        sort_tasks_by_slot(&mut tasks);
        let order: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn clamp_never_goes_negative() {
        assert_eq!(clamp_points(12.5), 12.5);
        assert_eq!(clamp_points(0.0), 0.0);
        assert_eq!(clamp_points(-3.0), 0.0);
    }

    #[test]
    fn request_omits_empty_data() {
        let request = ApiRequest {
            action: "get_today_data".to_string(),
            token: "opaque".to_string(),
            data: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("data"));
    }

    #[test]
    fn status_update_constructors() {
        let active = FocusStatusUpdate::active("Math homework", 45);
        assert!(active.is_focusing);
        assert_eq!(active.duration, Some(45));

        let inactive = FocusStatusUpdate::inactive();
        assert!(!inactive.is_focusing);
        assert_eq!(inactive.task_title, None);
    }
}
