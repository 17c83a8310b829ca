use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three kinds of commitment a goal can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalType {
    #[serde(rename = "I_WILL")]
    IWill,
    #[serde(rename = "I_WONT")]
    IWont,
    #[serde(rename = "I_WANT")]
    IWant,
}

impl GoalType {
    /// Parse the wire value or a loose user-typed variant ("will", "i-wont").
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.trim_start_matches('i') {
            "will" => Some(GoalType::IWill),
            "wont" => Some(GoalType::IWont),
            "want" => Some(GoalType::IWant),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GoalType::IWill => "I will",
            GoalType::IWont => "I won't",
            GoalType::IWant => "I want",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: u64,
    pub user_id: u64,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Payload for `POST /goals`.
#[derive(Debug, Clone, Serialize)]
pub struct NewGoal {
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub title: String,
}

/// Payload for `PATCH /goals/:id/status`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusUpdate<'a> {
    pub status: &'a str,
}
