mod common;

use birth_certificate_server::config::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use birth_certificate_server::db::{AdminStore, ArtifactStore, SubmissionStore};
use chrono::{Duration, TimeZone, Utc};
use common::{sample_form, setup_test_app_state};
use serde_json::json;

#[tokio::test]
async fn test_submission_round_trip() {
    let (_dir, state) = setup_test_app_state().await;

    let mut form = sample_form();
    form["middleName"] = json!("Kumar");
    form["issuingAuthority"] = json!("Municipal Corporation");
    form["aadhaarConsentGiven"] = json!(true);

    let id = state.submissions.insert(&form).await.unwrap();
    let stored = state.submissions.get(id).await.unwrap();
    assert_eq!(stored, Some(form));
}

#[tokio::test]
async fn test_submission_stored_verbatim() {
    let (_dir, state) = setup_test_app_state().await;

    let form = json!({
        "firstName": "Aarav",
        "nationality": "Indian",
        "fatherAadhaarNumber": 111122223333u64,
        "siblings": [{ "name": "Diya", "age": 4 }],
        "notes": null
    });

    let id = state.submissions.insert(&form).await.unwrap();
    assert_eq!(state.submissions.get(id).await.unwrap(), Some(form));

    let raw = state.submissions.get_raw(id).await.unwrap().unwrap();
    assert!(raw.starts_with(r#"{"firstName":"Aarav","nationality":"Indian""#));
}

#[tokio::test]
async fn test_non_object_payload_is_stored() {
    let (_dir, state) = setup_test_app_state().await;

    let id = state.submissions.insert(&json!("just text")).await.unwrap();
    assert_eq!(state.submissions.get(id).await.unwrap(), Some(json!("just text")));
}

#[tokio::test]
async fn test_submission_ids_are_monotonic() {
    let (_dir, state) = setup_test_app_state().await;

    let first = state.submissions.insert(&sample_form()).await.unwrap();
    let second = state.submissions.insert(&json!({})).await.unwrap();
    let third = state.submissions.insert(&sample_form()).await.unwrap();

    assert_eq!(first, 1);
    assert!(first < second && second < third);
}

#[tokio::test]
async fn test_missing_submission_is_none() {
    let (_dir, state) = setup_test_app_state().await;
    assert_eq!(state.submissions.get(42).await.unwrap(), None);
    assert_eq!(state.submissions.get_raw(42).await.unwrap(), None);
}

#[tokio::test]
async fn test_stores_reopen_with_existing_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("form_submissions.db");

    let id = {
        let store = SubmissionStore::open(&path).await.unwrap();
        store.insert(&sample_form()).await.unwrap()
    };

    let reopened = SubmissionStore::open(&path).await.unwrap();
    assert_eq!(reopened.get(id).await.unwrap(), Some(sample_form()));
    let next = reopened.insert(&sample_form()).await.unwrap();
    assert!(next > id);
}

#[tokio::test]
async fn test_artifact_insert_and_lookup() {
    let (_dir, state) = setup_test_app_state().await;

    let pdf_id = state
        .artifacts
        .insert(7, "/tmp/birth_certificate_7_1.pdf", "birth_certificate_7_1.pdf")
        .await
        .unwrap();

    let artifact = state.artifacts.get_by_id(pdf_id).await.unwrap().unwrap();
    assert_eq!(artifact.submission_id, 7);
    assert_eq!(artifact.file_name, "birth_certificate_7_1.pdf");

    let path = state.artifacts.file_path_by_id(pdf_id).await.unwrap();
    assert_eq!(path.as_deref(), Some("/tmp/birth_certificate_7_1.pdf"));

    assert!(state.artifacts.get_by_id(999).await.unwrap().is_none());
    assert!(state.artifacts.file_path_by_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let (_dir, state) = setup_test_app_state().await;

    let t1 = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    let t2 = t1 + Duration::minutes(5);
    let t3 = t2 + Duration::milliseconds(250);

    let mut ids = Vec::new();
    for (name, created_at) in [("Aarav", t1), ("Diya", t2), ("Kabir", t3)] {
        let mut form = sample_form();
        form["firstName"] = json!(name);
        let submission_id = state.submissions.insert(&form).await.unwrap();
        let file_name = format!("birth_certificate_{}.pdf", submission_id);
        ids.push(
            state
                .artifacts
                .insert_at(submission_id, &file_name, &file_name, created_at)
                .await
                .unwrap(),
        );
    }

    let listings = state
        .artifacts
        .list_all_joined(&state.submissions)
        .await
        .unwrap();
    let listed: Vec<i64> = listings.iter().map(|l| l.id).collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
    assert_eq!(listings[0].created_at, t3);
    assert_eq!(
        listings[0].submission_data.as_ref().unwrap()["firstName"],
        "Kabir"
    );
}

#[tokio::test]
async fn test_listing_orders_by_time_not_id() {
    let (_dir, state) = setup_test_app_state().await;

    let later = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let earlier = later - Duration::days(1);

    let newer = state
        .artifacts
        .insert_at(1, "a.pdf", "a.pdf", later)
        .await
        .unwrap();
    let older = state
        .artifacts
        .insert_at(2, "b.pdf", "b.pdf", earlier)
        .await
        .unwrap();

    let artifacts = state.artifacts.list_all().await.unwrap();
    let listed: Vec<i64> = artifacts.iter().map(|a| a.id).collect();
    assert_eq!(listed, vec![newer, older]);
}

#[tokio::test]
async fn test_listing_tolerates_missing_submission() {
    let (_dir, state) = setup_test_app_state().await;

    let submission_id = state.submissions.insert(&sample_form()).await.unwrap();
    state
        .artifacts
        .insert(submission_id, "present.pdf", "present.pdf")
        .await
        .unwrap();
    state
        .artifacts
        .insert(404, "orphan.pdf", "orphan.pdf")
        .await
        .unwrap();

    let listings = state
        .artifacts
        .list_all_joined(&state.submissions)
        .await
        .unwrap();
    assert_eq!(listings.len(), 2);

    let orphan = listings.iter().find(|l| l.submission_id == 404).unwrap();
    assert!(orphan.submission_data.is_none());
    let present = listings
        .iter()
        .find(|l| l.submission_id == submission_id)
        .unwrap();
    assert_eq!(present.submission_data, Some(sample_form()));
}

#[tokio::test]
async fn test_default_admin_seeded_on_startup() {
    let (_dir, state) = setup_test_app_state().await;

    assert!(state
        .admins
        .verify(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .await
        .unwrap());
    assert!(!state
        .admins
        .verify(DEFAULT_ADMIN_USERNAME, "wrong-password")
        .await
        .unwrap());
    assert!(!state
        .admins
        .verify("nobody", DEFAULT_ADMIN_PASSWORD)
        .await
        .unwrap());
    assert_eq!(
        state.admins.list_admins().await.unwrap(),
        vec![DEFAULT_ADMIN_USERNAME.to_string()]
    );
}

#[tokio::test]
async fn test_seed_only_when_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = AdminStore::open(&dir.path().join("admin.db")).await.unwrap();

    assert!(store.seed_default("root", "first").await.unwrap());
    assert!(!store.seed_default("other", "second").await.unwrap());

    assert_eq!(store.count().await.unwrap(), 1);
    assert!(store.verify("root", "first").await.unwrap());
    assert!(!store.verify("other", "second").await.unwrap());
}

#[tokio::test]
async fn test_artifact_store_standalone() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(&dir.path().join("nested/pdf_metadata.db"))
        .await
        .unwrap();
    assert!(store.list_all().await.unwrap().is_empty());
}
