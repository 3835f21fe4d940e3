use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{error, http::header, web, App, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod certificate;
pub mod config;
pub mod db;
pub mod health;
pub mod pdf;

pub use crate::config::AppConfig;
pub use crate::db::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::certificate::handlers::submit_form,
        crate::certificate::handlers::submit_form_with_documents,
        crate::certificate::handlers::get_pdf,
        crate::certificate::handlers::list_pdfs,
        crate::certificate::handlers::get_submission,
        crate::auth::handlers::login,
        crate::auth::handlers::verify,
        crate::auth::handlers::list_admins,
        crate::health::health
    ),
    components(
        schemas(
            certificate::models::BirthRecord,
            certificate::models::SubmitFormRequest,
            certificate::documents::SubmitWithDocumentsRequest,
            certificate::models::SubmitFormResponse,
            certificate::models::SubmitFailure,
            certificate::models::ArtifactListing,
            auth::model::LoginRequest,
            auth::model::AuthResponse,
            auth::model::AdminListResponse,
            health::HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Certificate Service", description = "Form submission and certificate endpoints."),
        (name = "Authentication", description = "Admin credential checks."),
        (name = "Health", description = "Service liveness check.")
    )
)]
pub struct ApiDoc;

/// JSON extractor settings: malformed bodies answer with an `ErrorResponse`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected malformed JSON body: {}", err);
        let response =
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}

/// Register every API route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(certificate::handlers::config)
        .configure(auth::handlers::config)
        .configure(health::config);
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to open the databases. Check SUBMISSIONS_DB_PATH, ARTIFACTS_DB_PATH and ADMIN_DB_PATH. Error: {}",
                e
            );
            std::process::exit(1);
        }
    };

    match app_state.admins.list_admins().await {
        Ok(admins) => log::info!("Admin accounts: {}", admins.join(", ")),
        Err(e) => log::warn!("Could not list admin accounts: {}", e),
    }

    let prometheus = match PrometheusMetricsBuilder::new("birth_certificate_server")
        .endpoint("/metrics")
        .build()
    {
        Ok(prometheus) => prometheus,
        Err(e) => {
            log::error!("Failed to create Prometheus metrics middleware: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Starting server at http://{}:{}",
        config.host,
        config.port
    );
    log::info!(
        "Certificates directory: {}",
        config.certificates_dir.display()
    );

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
