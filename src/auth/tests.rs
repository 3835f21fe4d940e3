//! Unit tests for authentication module

use crate::auth::model::{AuthResponse, LoginRequest};

#[test]
fn test_credentials_present() {
    let request = LoginRequest {
        username: Some("admin123".to_string()),
        password: Some("admin123".to_string()),
    };
    assert_eq!(request.credentials(), Some(("admin123", "admin123")));
}

#[test]
fn test_credentials_missing_or_empty() {
    let missing_password = LoginRequest {
        username: Some("admin123".to_string()),
        password: None,
    };
    assert_eq!(missing_password.credentials(), None);

    let empty_username = LoginRequest {
        username: Some(String::new()),
        password: Some("secret".to_string()),
    };
    assert_eq!(empty_username.credentials(), None);

    assert_eq!(LoginRequest::default().credentials(), None);
}

#[test]
fn test_login_request_deserialization_tolerates_missing_fields() {
    let request: LoginRequest = serde_json::from_str(r#"{"username": "admin123"}"#).unwrap();
    assert_eq!(request.username.as_deref(), Some("admin123"));
    assert!(request.password.is_none());
}

#[test]
fn test_auth_response_serialization() {
    let granted = serde_json::to_value(AuthResponse::granted("Login successful", "admin123"))
        .expect("Failed to serialize granted response");
    assert_eq!(granted["authenticated"], true);
    assert_eq!(granted["username"], "admin123");

    let denied = serde_json::to_value(AuthResponse::denied("Invalid credentials"))
        .expect("Failed to serialize denied response");
    assert_eq!(denied["authenticated"], false);
    assert!(denied.get("username").is_none());
}
