use actix_web::HttpResponse;

use super::model::{AuthResponse, LoginRequest};
use crate::{AppState, ErrorResponse};

/// Check the credentials carried by a request body.
///
/// There is no session: every protected request sends the credentials again.
/// Returns the authenticated username, or the response to send back.
pub async fn validate_request_credentials(
    state: &AppState,
    body: &LoginRequest,
) -> Result<String, HttpResponse> {
    let (username, password) = body.credentials().ok_or_else(|| {
        HttpResponse::BadRequest().json(AuthResponse::denied(
            "Username and password are required",
        ))
    })?;

    match state.admins.verify(username, password).await {
        Ok(true) => Ok(username.to_string()),
        Ok(false) => {
            log::warn!("Rejected admin credentials for '{}'", username);
            Err(HttpResponse::Unauthorized().json(AuthResponse::denied("Invalid credentials")))
        }
        Err(e) => {
            log::error!("Database error during credential check: {}", e);
            Err(HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Credential check failed")))
        }
    }
}
