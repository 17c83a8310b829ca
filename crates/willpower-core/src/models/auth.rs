use std::fmt;

use serde::{Deserialize, Serialize};

/// Username length bounds enforced by the account service.
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;

/// Password length bounds enforced by the account service.
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 100;

/// Wrapper the API puts around every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Login form payload.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account creation payload.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

impl Registration {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check the payload against the server's length rules before sending it.
    /// Returns a message suitable for a form-level error.
    pub fn validation_error(&self) -> Option<&'static str> {
        let username_len = self.username.chars().count();
        let password_len = self.password.chars().count();

        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&username_len) {
            Some("Username must be between 3 and 50 characters")
        } else if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&password_len) {
            Some("Password must be between 8 and 100 characters")
        } else {
            None
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `data` of a successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user_id: u64,
}

/// The locally cached user, populated only by a fresh login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter22");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_registration_validation() {
        assert_eq!(Registration::new("alice", "password1").validation_error(), None);
        assert!(Registration::new("al", "password1").validation_error().is_some());
        assert!(Registration::new("a".repeat(51), "password1").validation_error().is_some());
        assert!(Registration::new("alice", "short").validation_error().is_some());
        assert!(Registration::new("alice", "p".repeat(101)).validation_error().is_some());
    }

    #[test]
    fn test_parse_login_envelope() {
        let json = r#"{"code":0,"message":"Login successful","data":{"token":"abc","user_id":42}}"#;
        let envelope: ApiEnvelope<LoginData> = serde_json::from_str(json)
            .expect("Failed to parse login test JSON");
        let data = envelope.data.expect("login data");
        assert_eq!(data.token, "abc");
        assert_eq!(data.user_id, 42);
        assert_eq!(envelope.message, "Login successful");
    }

    #[test]
    fn test_parse_envelope_without_data() {
        let json = r#"{"code":0,"message":"User registered successfully"}"#;
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(json)
            .expect("Failed to parse register test JSON");
        assert!(envelope.data.is_none());
    }
}
