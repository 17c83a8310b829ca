use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape returned by the API: `{"code": 40101, "message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: i64,
    message: String,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Prefer the server's own message, fall back to the raw body.
    fn display_message(body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) if !parsed.message.is_empty() => {
                tracing::debug!(code = parsed.code, "API error envelope");
                Self::truncate_body(&parsed.message)
            }
            _ => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::display_message(body);
        match status.as_u16() {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                message,
            },
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::RateLimited => Some(429),
            ApiError::ServerError { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }

    /// The message meant for a form-level error display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::AccessDenied(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::ServerError { message: m, .. }
            | ApiError::InvalidResponse(m) => m.clone(),
            other => other.to_string(),
        }
    }
}
