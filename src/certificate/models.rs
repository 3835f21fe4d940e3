use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Birth registration form as read by the certificate renderer.
///
/// Submissions are stored as raw JSON; this typed view is decoded only when a
/// certificate is drawn. Required fields fall back to empty strings when absent
/// and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BirthRecord {
    #[serde(default)]
    #[schema(example = "Aarav")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default)]
    #[schema(example = "Sharma")]
    pub last_name: String,
    #[serde(default)]
    #[schema(example = "2020-01-01")]
    pub date_of_birth: String,
    /// One of `male`, `female` or `other`.
    #[serde(default)]
    #[schema(example = "male")]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "10:30")]
    pub time_of_birth: Option<String>,
    #[serde(default)]
    #[schema(example = "Mumbai")]
    pub place_of_birth: String,
    #[serde(default)]
    pub father_name: String,
    #[serde(default)]
    #[schema(example = "111122223333")]
    pub father_aadhaar_number: String,
    #[serde(default)]
    pub mother_name: String,
    #[serde(default)]
    #[schema(example = "444455556666")]
    pub mother_aadhaar_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar_consent_given: Option<bool>,
}

impl BirthRecord {
    /// Decode the typed view of a stored form payload.
    pub fn from_form(form: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(form)
    }

    /// First, middle (when given) and last name joined by single spaces.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn has_official_information(&self) -> bool {
        present(&self.issuing_authority).is_some() || present(&self.registration_number).is_some()
    }
}

/// Treat empty optional strings the same as missing ones.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormRequest {
    /// Stored verbatim, whatever its shape.
    #[schema(value_type = BirthRecord)]
    pub form_data: Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormResponse {
    pub message: String,
    pub pdf_id: i64,
    pub submission_id: i64,
    #[schema(example = "birth_certificate_1_1735689600000.pdf")]
    pub pdf_file_name: String,
}

/// Failure body of `POST /submit-form`.
///
/// `submission_id` is set when the form was stored but its document was not
/// produced.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFailure {
    pub message: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<i64>,
}

impl SubmitFailure {
    pub fn submit_failed(detail: &str) -> Self {
        Self {
            message: "Error submitting form data".to_string(),
            error: detail.to_string(),
            submission_id: None,
        }
    }

    pub fn pdf_failed(submission_id: i64) -> Self {
        Self {
            message: "Form submitted but PDF generation failed".to_string(),
            error: "PDF generation failed".to_string(),
            submission_id: Some(submission_id),
        }
    }
}

/// Metadata row describing one generated certificate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: i64,
    pub submission_id: i64,
    pub file_path: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

/// An artifact joined with the form data of its submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactListing {
    pub id: i64,
    pub submission_id: i64,
    pub file_name: String,
    #[schema(value_type = Option<BirthRecord>)]
    pub submission_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl ArtifactListing {
    pub fn new(artifact: Artifact, submission_data: Option<Value>) -> Self {
        Self {
            id: artifact.id,
            submission_id: artifact.submission_id,
            file_name: artifact.file_name,
            submission_data,
            created_at: artifact.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_record_deserialization_defaults_missing_fields() {
        let json = r#"{
            "firstName": "Test",
            "lastName": "User",
            "gender": "male",
            "aadhaarConsentGiven": true
        }"#;

        let record: BirthRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.first_name, "Test");
        assert_eq!(record.place_of_birth, "");
        assert_eq!(record.middle_name, None);
        assert_eq!(record.aadhaar_consent_given, Some(true));
    }

    #[test]
    fn test_from_form_ignores_unknown_fields() {
        let form = serde_json::json!({
            "firstName": "Aarav",
            "nationality": "Indian",
            "fatherAadhaarFilePath": "/srv/docs/father_1.pdf"
        });

        let record = BirthRecord::from_form(&form).unwrap();
        assert_eq!(record.first_name, "Aarav");
        assert_eq!(record.last_name, "");
    }

    #[test]
    fn test_from_form_rejects_mistyped_values() {
        let form = serde_json::json!({ "fatherAadhaarNumber": 111122223333u64 });
        assert!(BirthRecord::from_form(&form).is_err());

        assert!(BirthRecord::from_form(&serde_json::json!("not a form")).is_err());
    }

    #[test]
    fn test_birth_record_omits_absent_optionals() {
        let record = BirthRecord {
            first_name: "Aarav".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["firstName"], "Aarav");
        assert!(value.get("middleName").is_none());
        assert!(value.get("issuingAuthority").is_none());
    }

    #[test]
    fn test_full_name_skips_missing_middle_name() {
        let mut record = BirthRecord {
            first_name: "Aarav".to_string(),
            last_name: "Sharma".to_string(),
            ..Default::default()
        };
        assert_eq!(record.full_name(), "Aarav Sharma");

        record.middle_name = Some("Kumar".to_string());
        assert_eq!(record.full_name(), "Aarav Kumar Sharma");

        record.middle_name = Some(String::new());
        assert_eq!(record.full_name(), "Aarav Sharma");
    }

    #[test]
    fn test_has_official_information() {
        let mut record = BirthRecord::default();
        assert!(!record.has_official_information());

        record.registration_number = Some(String::new());
        assert!(!record.has_official_information());

        record.registration_number = Some("REG-42".to_string());
        assert!(record.has_official_information());
    }

    #[test]
    fn test_submit_failure_shapes() {
        let failed = serde_json::to_value(SubmitFailure::submit_failed("disk full")).unwrap();
        assert_eq!(failed["message"], "Error submitting form data");
        assert!(failed.get("submissionId").is_none());

        let pdf = serde_json::to_value(SubmitFailure::pdf_failed(7)).unwrap();
        assert_eq!(pdf["error"], "PDF generation failed");
        assert_eq!(pdf["submissionId"], 7);
    }
}
