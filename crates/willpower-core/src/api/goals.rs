//! Goal and check-in endpoints.
//!
//! All of these require an authorized client; obtain one from
//! `SessionStore::authorized_client`.

use reqwest::Method;

use crate::models::goal::StatusUpdate;
use crate::models::{CheckIn, Goal, GoalSummary, NewCheckIn, NewGoal};

use super::{ApiClient, ApiError};

impl ApiClient {
    // ===== Goals =====

    pub async fn fetch_goals(&self) -> Result<Vec<Goal>, ApiError> {
        self.send(self.request(Method::GET, "/goals")).await
    }

    pub async fn fetch_goal(&self, goal_id: u64) -> Result<Goal, ApiError> {
        self.send(self.request(Method::GET, &format!("/goals/{}", goal_id)))
            .await
    }

    pub async fn create_goal(&self, goal: &NewGoal) -> Result<Goal, ApiError> {
        self.send(self.json_request(Method::POST, "/goals", goal))
            .await
    }

    pub async fn update_goal_status(&self, goal_id: u64, status: &str) -> Result<(), ApiError> {
        let path = format!("/goals/{}/status", goal_id);
        self.send_empty(self.json_request(Method::PATCH, &path, &StatusUpdate { status }))
            .await
    }

    /// Move a goal to the recycle bin.
    pub async fn delete_goal(&self, goal_id: u64) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, &format!("/goals/{}", goal_id)))
            .await
    }

    /// Goals currently in the recycle bin. The server purges them after 30 days.
    pub async fn fetch_deleted_goals(&self) -> Result<Vec<Goal>, ApiError> {
        self.send(self.request(Method::GET, "/goals/recycle-bin"))
            .await
    }

    pub async fn restore_goal(&self, goal_id: u64) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::POST, &format!("/goals/{}/restore", goal_id)))
            .await
    }

    pub async fn permanently_delete_goal(&self, goal_id: u64) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, &format!("/goals/{}/permanent", goal_id)))
            .await
    }

    // ===== Check-ins =====

    pub async fn record_check_in(&self, check_in: &NewCheckIn) -> Result<CheckIn, ApiError> {
        self.send(self.json_request(Method::POST, "/checkins", check_in))
            .await
    }

    pub async fn fetch_check_ins(&self, goal_id: u64) -> Result<Vec<CheckIn>, ApiError> {
        let builder = self
            .request(Method::GET, "/checkins")
            .query(&[("goal_id", goal_id)]);
        self.send(builder).await
    }

    /// Per-goal tallies, optionally restricted to one `YYYY-MM-DD` day.
    pub async fn fetch_summaries(&self, date: Option<&str>) -> Result<Vec<GoalSummary>, ApiError> {
        let mut builder = self.request(Method::GET, "/checkins/summary");
        if let Some(date) = date {
            builder = builder.query(&[("date", date)]);
        }
        self.send(builder).await
    }
}
