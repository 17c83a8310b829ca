use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInStatus {
    Completed,
    Partial,
    Failed,
}

impl CheckInStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" | "done" => Some(CheckInStatus::Completed),
            "partial" => Some(CheckInStatus::Partial),
            "failed" => Some(CheckInStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: u64,
    pub goal_id: u64,
    pub user_id: u64,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    pub status: CheckInStatus,
    #[serde(default)]
    pub review_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /checkins`. The server records it for today,
/// replacing an earlier check-in for the same goal and day.
#[derive(Debug, Clone, Serialize)]
pub struct NewCheckIn {
    pub goal_id: u64,
    pub status: CheckInStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub review_notes: String,
}

/// Per-goal tally of check-in outcomes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalSummary {
    pub goal_id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub partial: u64,
    #[serde(default)]
    pub failed: u64,
}

impl GoalSummary {
    pub fn total(&self) -> u64 {
        self.completed + self.partial + self.failed
    }

    /// Share of check-ins marked completed, 0.0 when there are none.
    pub fn completion_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.completed as f64 / total as f64,
        }
    }
}
