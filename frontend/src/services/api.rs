use gloo::net::http::Request;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::{
    ApiRequest, ApiResponse, FocusLog, FocusStatusUpdate, RedeemRewardResponse, TodaySnapshot,
    ToggleCheckinResponse,
};

/// Client for the external task/reward ledger.
///
/// Every call is a POST to a single endpoint with an `{action, token, data}`
/// body; the token is an opaque capability and is never inspected here.
#[derive(Clone, PartialEq)]
pub struct LedgerClient {
    endpoint: String,
    token: String,
}

impl LedgerClient {
    /// Create a client against the default child-portal endpoint
    pub fn new(token: String) -> Self {
        Self {
            endpoint: "http://localhost:3000/api/portal".to_string(),
            token,
        }
    }

    /// Create a client with a custom endpoint
    pub fn with_endpoint(endpoint: String, token: String) -> Self {
        Self { endpoint, token }
    }

    /// Fetch the authoritative snapshot for a date ("YYYY-MM-DD")
    pub async fn get_today_data(&self, date: &str) -> Result<TodaySnapshot, String> {
        let data = self
            .call("get_today_data", Some(json!({ "date": date })))
            .await?;
        decode(data, "today snapshot")
    }

    /// Flip membership of a task in today's checkin set
    pub async fn toggle_checkin(&self, task_id: &str) -> Result<ToggleCheckinResponse, String> {
        let data = self
            .call("toggle_checkin", Some(json!({ "taskId": task_id })))
            .await?;
        decode(data, "toggle result")
    }

    /// Redeem a reward; the ledger revalidates the balance and rejects
    /// without mutating when it is insufficient
    pub async fn redeem_reward(
        &self,
        reward_id: &str,
        cost: f64,
    ) -> Result<RedeemRewardResponse, String> {
        let data = self
            .call(
                "redeem_reward",
                Some(json!({ "rewardId": reward_id, "cost": cost })),
            )
            .await?;
        decode(data, "redeem result")
    }

    /// Append a focus log. At-least-once: a retry after an ambiguous failure
    /// may append twice
    pub async fn record_focus(&self, log: &FocusLog) -> Result<(), String> {
        let data = serde_json::to_value(log)
            .map_err(|e| format!("Failed to serialize focus log: {}", e))?;
        self.call("record_focus", Some(data)).await?;
        Ok(())
    }

    /// Overwrite the child's live focus-status fields for parent-side display
    pub async fn update_focus_status(&self, update: &FocusStatusUpdate) -> Result<(), String> {
        let data = serde_json::to_value(update)
            .map_err(|e| format!("Failed to serialize focus status: {}", e))?;
        self.call("update_focus_status", Some(data)).await?;
        Ok(())
    }

    async fn call(
        &self,
        action: &str,
        data: Option<serde_json::Value>,
    ) -> Result<Option<serde_json::Value>, String> {
        let body = ApiRequest {
            action: action.to_string(),
            token: self.token.clone(),
            data,
        };

        match Request::post(&self.endpoint)
            .json(&body)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<ApiResponse>().await {
                        Ok(envelope) if envelope.success => Ok(envelope.data),
                        Ok(envelope) => Err(envelope
                            .message
                            .unwrap_or_else(|| "Unknown error".to_string())),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}

/// Required fields are validated here, at the ledger boundary; anything the
/// envelope carried that does not decode into the typed payload is an error.
fn decode<T: DeserializeOwned>(
    data: Option<serde_json::Value>,
    what: &str,
) -> Result<T, String> {
    let value = data.ok_or_else(|| format!("Response missing {}", what))?;
    serde_json::from_value(value).map_err(|e| format!("Failed to parse {}: {}", what, e))
}
