use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde_json::Value;

use crate::certificate::documents::{
    parse_submission_multipart, remove_documents, save_documents, ParsedSubmission,
    SubmitWithDocumentsRequest,
};
use crate::certificate::models::{
    ArtifactListing, BirthRecord, SubmitFailure, SubmitFormRequest, SubmitFormResponse,
};
use crate::pdf::common::certificate_file_name;
use crate::{AppState, ErrorResponse};

const INLINE_FILE_NAME: &str = "birth_certificate.pdf";

/// Persist a form payload as received.
async fn store_submission(state: &AppState, form: &Value) -> Result<i64, HttpResponse> {
    match state.submissions.insert(form).await {
        Ok(id) => {
            info!("Submission {} stored", id);
            Ok(id)
        }
        Err(e) => {
            error!("Error submitting form: {}", e);
            Err(HttpResponse::InternalServerError().json(SubmitFailure::submit_failed(&e.to_string())))
        }
    }
}

/// Render the certificate of a stored submission and record it as an artifact.
///
/// The submission is kept whatever happens here.
async fn generate_certificate(state: &AppState, submission_id: i64) -> HttpResponse {
    let file_name = certificate_file_name(submission_id, Utc::now());
    let file_path = state.certificates_dir.join(&file_name);

    debug!("Rendering certificate for submission {}", submission_id);
    if let Err(e) = state.renderer.render(submission_id, &file_path).await {
        error!("Error generating PDF for submission {}: {}", submission_id, e);
        return HttpResponse::InternalServerError().json(SubmitFailure::pdf_failed(submission_id));
    }

    let file_path_text = file_path.to_string_lossy().into_owned();
    match state
        .artifacts
        .insert(submission_id, &file_path_text, &file_name)
        .await
    {
        Ok(pdf_id) => {
            info!(
                "Certificate {} stored as artifact {} for submission {}",
                file_name, pdf_id, submission_id
            );
            HttpResponse::Ok().json(SubmitFormResponse {
                message: "Form data submitted and PDF generated successfully!".to_string(),
                pdf_id,
                submission_id,
                pdf_file_name: file_name,
            })
        }
        Err(e) => {
            error!(
                "Failed to record artifact for submission {}: {}",
                submission_id, e
            );
            if let Err(remove_err) = tokio::fs::remove_file(&file_path).await {
                warn!(
                    "Could not remove unrecorded certificate {}: {}",
                    file_path.display(),
                    remove_err
                );
            }
            HttpResponse::InternalServerError().json(SubmitFailure::pdf_failed(submission_id))
        }
    }
}

#[utoipa::path(
    post,
    path = "/submit-form",
    tag = "Certificate Service",
    request_body = SubmitFormRequest,
    responses(
        (status = 200, description = "Form stored and certificate generated", body = SubmitFormResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Submission or certificate generation failed", body = SubmitFailure)
    )
)]
pub async fn submit_form(
    state: web::Data<AppState>,
    body: web::Json<SubmitFormRequest>,
) -> impl Responder {
    info!("Executing submit_form handler");
    let form = body.into_inner().form_data;

    match store_submission(&state, &form).await {
        Ok(submission_id) => generate_certificate(&state, submission_id).await,
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/submit-form-with-documents",
    tag = "Certificate Service",
    request_body(content = inline(SubmitWithDocumentsRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Form and documents stored, certificate generated", body = SubmitFormResponse),
        (status = 400, description = "Malformed multipart body", body = ErrorResponse),
        (status = 500, description = "Submission or certificate generation failed", body = SubmitFailure)
    )
)]
pub async fn submit_form_with_documents(
    state: web::Data<AppState>,
    payload: Multipart,
) -> HttpResponse {
    info!("Executing submit_form_with_documents handler");

    let ParsedSubmission {
        mut form,
        documents,
    } = match parse_submission_multipart(payload).await {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Rejected multipart submission: {}", e);
            return e.into();
        }
    };

    debug!("Saving {} Aadhaar document(s)", documents.len());
    let saved = match save_documents(&state.documents_dir, documents, &mut form).await {
        Ok(saved) => saved,
        Err(e) => {
            error!("Failed to save Aadhaar documents: {}", e);
            return e.into();
        }
    };

    match store_submission(&state, &form).await {
        Ok(submission_id) => generate_certificate(&state, submission_id).await,
        Err(response) => {
            remove_documents(&saved).await;
            response
        }
    }
}

#[utoipa::path(
    get,
    path = "/pdf/{id}",
    tag = "Certificate Service",
    params(("id" = i64, Path, description = "Artifact id")),
    responses(
        (status = 200, description = "Certificate PDF", content_type = "application/pdf"),
        (status = 404, description = "Artifact or file not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn get_pdf(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> HttpResponse {
    let pdf_id = path.into_inner();
    info!("Executing get_pdf handler for id: {}", pdf_id);

    let file_path = match state.artifacts.file_path_by_id(pdf_id).await {
        Ok(Some(file_path)) => file_path,
        Ok(None) => {
            warn!("PDF {} not found: no artifact row", pdf_id);
            return HttpResponse::NotFound().json(ErrorResponse::not_found("PDF not found."));
        }
        Err(e) => {
            error!("Error serving PDF {}: {}", pdf_id, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error serving PDF."));
        }
    };

    match NamedFile::open_async(&file_path).await {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Inline,
                parameters: vec![DispositionParam::Filename(INLINE_FILE_NAME.to_string())],
            })
            .into_response(&req),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "PDF {} not found: file {} missing on disk",
                pdf_id, file_path
            );
            HttpResponse::NotFound().json(ErrorResponse::not_found("PDF not found."))
        }
        Err(e) => {
            error!("Error opening PDF file {}: {}", file_path, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error serving PDF."))
        }
    }
}

#[utoipa::path(
    get,
    path = "/pdfs",
    tag = "Certificate Service",
    responses(
        (status = 200, description = "All certificates, newest first", body = Vec<ArtifactListing>),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_pdfs(state: web::Data<AppState>) -> impl Responder {
    info!("Executing list_pdfs handler");
    match state.artifacts.list_all_joined(&state.submissions).await {
        Ok(listings) => HttpResponse::Ok().json(listings),
        Err(e) => {
            error!("Error fetching PDFs: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error fetching PDFs."))
        }
    }
}

#[utoipa::path(
    get,
    path = "/submission/{id}",
    tag = "Certificate Service",
    params(("id" = i64, Path, description = "Submission id")),
    responses(
        (status = 200, description = "Form data exactly as submitted", body = BirthRecord),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn get_submission(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let submission_id = path.into_inner();
    info!("Executing get_submission handler for id: {}", submission_id);

    match state.submissions.get(submission_id).await {
        Ok(Some(form)) => HttpResponse::Ok().json(form),
        Ok(None) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found("Submission not found."))
        }
        Err(e) => {
            error!("Error fetching submission {}: {}", submission_id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Error fetching submission."))
        }
    }
}

/// Configure certificate routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/submit-form", web::post().to(submit_form))
        .route(
            "/submit-form-with-documents",
            web::post().to(submit_form_with_documents),
        )
        .route("/pdf/{id}", web::get().to(get_pdf))
        .route("/pdfs", web::get().to(list_pdfs))
        .route("/submission/{id}", web::get().to(get_submission));
}
