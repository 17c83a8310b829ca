//! Data models for Willpower Forge entities.
//!
//! This module contains the data structures exchanged with the API:
//!
//! - Auth payloads: `Credentials`, `Registration`, `LoginData`, `Identity`
//! - `Goal`, `NewGoal`: "I will / I won't / I want" commitments
//! - `CheckIn`, `GoalSummary`: daily check-ins and their per-goal tallies
//! - `ApiEnvelope`: the `{code, message, data}` wrapper on every response

pub mod auth;
pub mod check_in;
pub mod goal;

pub use auth::{ApiEnvelope, Credentials, Identity, LoginData, Registration};
pub use check_in::{CheckIn, CheckInStatus, GoalSummary, NewCheckIn};
pub use goal::{Goal, GoalType, NewGoal};
