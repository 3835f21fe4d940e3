use actix_web::{web, HttpResponse, Responder};

use super::middleware::validate_request_credentials;
use super::model::{AdminListResponse, AuthResponse, LoginRequest};
use crate::AppState;

/// Login endpoint
#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing username or password", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AuthResponse)
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    match validate_request_credentials(&state, &body).await {
        Ok(username) => {
            log::info!("Admin '{}' logged in", username);
            HttpResponse::Ok().json(AuthResponse::granted("Login successful", &username))
        }
        Err(response) => response,
    }
}

/// Re-check credentials held by the dashboard
#[utoipa::path(
    post,
    path = "/admin/verify",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials valid", body = AuthResponse),
        (status = 400, description = "Missing username or password", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AuthResponse)
    )
)]
pub async fn verify(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    match validate_request_credentials(&state, &body).await {
        Ok(username) => {
            HttpResponse::Ok().json(AuthResponse::granted("Credentials verified", &username))
        }
        Err(response) => response,
    }
}

/// List admin usernames (protected)
#[utoipa::path(
    post,
    path = "/admin/admins",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin list", body = AdminListResponse),
        (status = 400, description = "Missing username or password", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AuthResponse)
    )
)]
pub async fn list_admins(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> impl Responder {
    if let Err(response) = validate_request_credentials(&state, &body).await {
        return response;
    }

    match state.admins.list_admins().await {
        Ok(admins) => HttpResponse::Ok().json(AdminListResponse { admins }),
        Err(e) => {
            log::error!("Failed to get admins: {}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Failed to get admins"))
        }
    }
}

/// Configure admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/login", web::post().to(login))
            .route("/verify", web::post().to(verify))
            .route("/admins", web::post().to(list_admins)),
    );
}
