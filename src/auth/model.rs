use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login / verify request payload
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both fields, or `None` when either is missing or empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

/// Result of a credential check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub authenticated: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AuthResponse {
    pub fn granted(message: &str, username: &str) -> Self {
        Self {
            authenticated: true,
            message: message.to_string(),
            username: Some(username.to_string()),
        }
    }

    pub fn denied(message: &str) -> Self {
        Self {
            authenticated: false,
            message: message.to_string(),
            username: None,
        }
    }
}

/// Admin usernames, returned to an authenticated caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminListResponse {
    pub admins: Vec<String>,
}
