//! PDF generation for birth certificates.
//!
//! - `common` - formatting helpers and file naming
//! - `layout` - page flow, wrapping and pagination on `lopdf`
//! - `certificate` - the certificate's fixed content

pub mod certificate;
pub mod common;
pub mod layout;

use chrono::{Local, NaiveDate};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::certificate::models::BirthRecord;
use crate::db::{StoreError, SubmissionStore};
use layout::PageLayout;

/// Errors that can occur during certificate generation.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no data found for submission ID: {0}")]
    SubmissionNotFound(i64),
    #[error("submission {0} does not hold a readable birth record: {1}")]
    InvalidSubmission(i64, #[source] serde_json::Error),
    #[error("failed to load submission: {0}")]
    Store(#[from] StoreError),
    #[error("failed to assemble PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Build the certificate PDF bytes for a submission.
pub fn render_certificate_bytes(
    submission_id: i64,
    record: &BirthRecord,
    generated_on: NaiveDate,
) -> Result<Vec<u8>, RenderError> {
    let blocks = certificate::certificate_blocks(submission_id, record, generated_on);
    let title = format!(
        "Birth Certificate {}",
        common::certificate_number(submission_id)
    );
    let mut doc = PageLayout::default().build_document(&blocks, &title)?;

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Renders stored submissions into certificate files.
#[derive(Clone)]
pub struct CertificateRenderer {
    submissions: SubmissionStore,
}

impl CertificateRenderer {
    pub fn new(submissions: SubmissionStore) -> Self {
        Self { submissions }
    }

    /// Render the certificate for `submission_id` to `path`, dated today.
    pub async fn render(&self, submission_id: i64, path: &Path) -> Result<(), RenderError> {
        self.render_dated(submission_id, path, Local::now().date_naive())
            .await
    }

    /// Render with an explicit generation date; output is byte-identical for identical input.
    ///
    /// The file is written to a temporary sibling and moved to `path` only once
    /// complete, so a failed render leaves nothing at `path`.
    pub async fn render_dated(
        &self,
        submission_id: i64,
        path: &Path,
        generated_on: NaiveDate,
    ) -> Result<(), RenderError> {
        let form = self
            .submissions
            .get(submission_id)
            .await?
            .ok_or(RenderError::SubmissionNotFound(submission_id))?;
        let record = BirthRecord::from_form(&form)
            .map_err(|e| RenderError::InvalidSubmission(submission_id, e))?;

        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let bytes = render_certificate_bytes(submission_id, &record, generated_on)?;
            write_atomically(&target, &bytes)
        })
        .await??;

        log::debug!(
            "Certificate for submission {} written to {}",
            submission_id,
            path.display()
        );
        Ok(())
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut staging = tempfile::Builder::new()
        .prefix(".rendering-")
        .suffix(".pdf")
        .tempfile_in(&dir)?;
    staging.write_all(bytes)?;
    staging.as_file().sync_all()?;
    staging.persist(path).map_err(|e| e.error)?;
    Ok(())
}
