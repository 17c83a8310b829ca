//! REST API client module for Willpower Forge services.
//!
//! This module provides the `ApiClient` for communicating with the
//! Willpower Forge API (`/api/v1`) to register, log in, and manage
//! goals and check-ins.
//!
//! The API uses JWT bearer token authentication obtained through
//! the `/auth/login` endpoint.

pub mod client;
pub mod error;
pub mod goals;

pub use client::{authorize, ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
