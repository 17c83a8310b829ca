use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The API rejected the call or could not be reached.
    /// `status` is `None` for transport failures and malformed replies.
    #[error("{message}")]
    RequestFailed { status: Option<u16>, message: String },
}

impl AuthError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::RequestFailed { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AuthError::RequestFailed { message, .. } => message,
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        let message = match &err {
            ApiError::NetworkError(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::NetworkError(e) if e.is_connect() => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => other.user_message(),
        };
        AuthError::RequestFailed {
            status: err.status(),
            message,
        }
    }
}
