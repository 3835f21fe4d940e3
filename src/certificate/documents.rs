//! Multipart intake of a form together with the parents' Aadhaar documents.
//!
//! The form travels as JSON in the `data` part; `fatherAadhaarFile` and
//! `motherAadhaarFile` are optional file parts. Saved files are recorded in the
//! form payload under `fatherAadhaarFilePath` / `motherAadhaarFilePath`.

use actix_multipart::{Field, Multipart};
use actix_web::HttpResponse;
use chrono::Utc;
use futures::StreamExt;
use log::warn;
use sanitize_filename::sanitize;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use utoipa::ToSchema;

use crate::ErrorResponse;

const DATA_FIELD: &str = "data";

/// Multipart body accepted by `POST /submit-form-with-documents`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWithDocumentsRequest {
    /// JSON-encoded form data.
    pub data: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub father_aadhaar_file: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub mother_aadhaar_file: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Father,
    Mother,
}

impl Parent {
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "fatherAadhaarFile" => Some(Parent::Father),
            "motherAadhaarFile" => Some(Parent::Mother),
            _ => None,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Parent::Father => "father",
            Parent::Mother => "mother",
        }
    }

    /// Key under which the saved file's path is recorded in the form payload.
    pub fn path_key(self) -> &'static str {
        match self {
            Parent::Father => "fatherAadhaarFilePath",
            Parent::Mother => "motherAadhaarFilePath",
        }
    }
}

#[derive(Debug)]
pub struct UploadedDocument {
    pub parent: Parent,
    pub original_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct ParsedSubmission {
    pub form: Value,
    pub documents: Vec<UploadedDocument>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Multipart field error: {0}")]
    Field(String),
    #[error("Missing 'data' part with the form data")]
    MissingData,
    #[error("Invalid form data: {0}")]
    InvalidData(String),
    #[error("Form data must be a JSON object when documents are attached")]
    NotAnObject,
    #[error("Failed to save document: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DocumentError> for HttpResponse {
    fn from(error: DocumentError) -> Self {
        match error {
            DocumentError::Io(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string())),
        }
    }
}

async fn read_field(field: &mut Field) -> Result<Vec<u8>, DocumentError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| DocumentError::Field(e.to_string()))?;
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

/// Collect the form payload and any non-empty document parts.
///
/// Unknown parts are skipped. A repeated document part replaces the earlier one.
pub async fn parse_submission_multipart(
    mut multipart: Multipart,
) -> Result<ParsedSubmission, DocumentError> {
    let mut form = None;
    let mut documents: Vec<UploadedDocument> = Vec::new();

    while let Some(item) = multipart.next().await {
        let mut field = item.map_err(|e| DocumentError::Field(e.to_string()))?;
        let (name, file_name) = {
            let disposition = field.content_disposition().ok_or_else(|| {
                DocumentError::Field("Content disposition not found".to_string())
            })?;
            let name = disposition
                .get_name()
                .ok_or_else(|| DocumentError::Field("Field name not found".to_string()))?;
            (name.to_string(), disposition.get_filename().map(str::to_string))
        };

        if name == DATA_FIELD {
            let bytes = read_field(&mut field).await?;
            let value = serde_json::from_slice(&bytes)
                .map_err(|e| DocumentError::InvalidData(e.to_string()))?;
            form = Some(value);
        } else if let Some(parent) = Parent::from_field(&name) {
            let bytes = read_field(&mut field).await?;
            if bytes.is_empty() {
                continue;
            }
            documents.retain(|doc| doc.parent != parent);
            documents.push(UploadedDocument {
                parent,
                original_name: file_name.unwrap_or_default(),
                bytes,
            });
        }
    }

    Ok(ParsedSubmission {
        form: form.ok_or(DocumentError::MissingData)?,
        documents,
    })
}

/// Name of a saved document: parent, upload instant and the sanitized original name.
pub fn stored_file_name(parent: Parent, original_name: &str, millis: i64) -> String {
    let cleaned = sanitize(original_name);
    if cleaned.is_empty() {
        format!("{}_{}", parent.prefix(), millis)
    } else {
        format!("{}_{}_{}", parent.prefix(), millis, cleaned)
    }
}

/// Write the documents into `dir` and record their paths in `form`.
///
/// Returns the written paths. On failure the files written so far are removed.
pub async fn save_documents(
    dir: &Path,
    documents: Vec<UploadedDocument>,
    form: &mut Value,
) -> Result<Vec<PathBuf>, DocumentError> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }
    let fields = form.as_object_mut().ok_or(DocumentError::NotAnObject)?;

    let millis = Utc::now().timestamp_millis();
    let mut saved = Vec::with_capacity(documents.len());
    for doc in documents {
        let path = dir.join(stored_file_name(doc.parent, &doc.original_name, millis));
        if let Err(e) = tokio::fs::write(&path, &doc.bytes).await {
            remove_documents(&saved).await;
            return Err(e.into());
        }
        fields.insert(
            doc.parent.path_key().to_string(),
            Value::String(path.to_string_lossy().into_owned()),
        );
        saved.push(path);
    }

    Ok(saved)
}

pub async fn remove_documents(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Could not remove document {}: {}", path.display(), e);
        }
    }
}
