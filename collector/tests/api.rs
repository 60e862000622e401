//! End-to-end handler tests for the collection API.
//!
//! Drives the route handlers directly against an `AppState` backed by a
//! temp data directory, covering the ingest → read-back → export →
//! download → stats flow.

use std::fs;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Json;
use serde_json::{Value, json};
use tempfile::TempDir;

use collector::error::ApiError;
use collector::routes;
use collector::state::AppState;

fn test_state() -> (TempDir, AppState) {
    let temp = tempfile::tempdir().expect("tempdir");
    let data_dir = temp.path().join("data");
    fs::create_dir_all(&data_dir).expect("create data dir");
    (temp, AppState::new(data_dir))
}

fn sample_payload(session: &str) -> Value {
    json!({
        "sessionId": session,
        "performance": {"responseTime": 120},
        "satisfaction": {"usabilityRating": 4},
        "demographic": {"deviceType": "mobile", "academicLevel": "undergrad"}
    })
}

async fn submit(state: &AppState, payload: Value) -> routes::SubmitResponse {
    let Json(response) = routes::submit(State(state.clone()), Json(payload))
        .await
        .expect("submit succeeds");
    response
}

async fn record_count(state: &AppState) -> usize {
    let Json(health) = routes::health(State(state.clone())).await;
    assert_eq!(health.status, "healthy");
    health.total_records
}

#[tokio::test]
async fn submit_assigns_id_and_mirrors_to_file() {
    let (_temp, state) = test_state();

    let response = submit(&state, sample_payload("s1")).await;
    assert!(response.success);
    assert_eq!(response.message, "Data received successfully");
    assert_eq!(response.total_submissions, 1);

    // The mirror file is named after the generated id and holds the record.
    let path = state
        .data_dir
        .join(format!("submission_{}.json", response.submission_id));
    let contents = fs::read_to_string(&path).expect("mirror file exists");
    let record: Value = serde_json::from_str(&contents).expect("mirror parses");
    assert_eq!(record["sessionId"], json!("s1"));
    assert_eq!(record["submissionId"], json!(response.submission_id));
}

#[tokio::test]
async fn submission_ids_are_unique() {
    let (_temp, state) = test_state();

    let first = submit(&state, sample_payload("s1")).await;
    let second = submit(&state, sample_payload("s2")).await;
    assert_ne!(first.submission_id, second.submission_id);
    assert_eq!(second.total_submissions, 2);
}

#[tokio::test]
async fn missing_required_field_is_rejected_and_not_stored() {
    let (_temp, state) = test_state();

    for field in ["sessionId", "performance", "satisfaction", "demographic"] {
        let mut payload = sample_payload("s1");
        payload.as_object_mut().expect("object").remove(field);

        let err = routes::submit(State(state.clone()), Json(payload))
            .await
            .expect_err("missing field rejected");
        assert!(matches!(err, ApiError::MissingField(name) if name == field));
    }

    assert_eq!(record_count(&state).await, 0);
}

#[tokio::test]
async fn wrong_shape_required_field_is_rejected_and_not_stored() {
    let (_temp, state) = test_state();

    let mut payload = sample_payload("s1");
    payload["demographic"] = json!("not an object");

    let err = routes::submit(State(state.clone()), Json(payload))
        .await
        .expect_err("wrong shape rejected");
    assert!(matches!(err, ApiError::InvalidPayload(_)));
    assert_eq!(record_count(&state).await, 0);
}

#[tokio::test]
async fn data_returns_all_records_in_submission_order() {
    let (_temp, state) = test_state();

    for session in ["s1", "s2", "s3"] {
        submit(&state, sample_payload(session)).await;
    }

    let Json(data) = routes::get_all_data(State(state.clone())).await;
    assert!(data.success);
    assert_eq!(data.count, 3);
    let sessions: Vec<&str> = data.data.iter().map(|s| s.session_id.as_str()).collect();
    assert_eq!(sessions, vec!["s1", "s2", "s3"]);

    assert_eq!(record_count(&state).await, 3);
}

#[tokio::test]
async fn export_on_empty_collection_is_not_found() {
    let (_temp, state) = test_state();

    let err = routes::export_csv(State(state.clone()))
        .await
        .expect_err("empty export rejected");
    assert!(matches!(err, ApiError::NoData));
}

#[tokio::test]
async fn export_writes_snapshot_and_download_serves_it() {
    let (_temp, state) = test_state();
    submit(&state, sample_payload("s1")).await;
    submit(&state, sample_payload("s2")).await;

    let Json(export) = routes::export_csv(State(state.clone()))
        .await
        .expect("export succeeds");
    assert!(export.success);
    assert_eq!(export.message, "Exported 2 records");
    assert_eq!(
        export.download_url,
        format!("/api/download/{}", export.filename)
    );

    // Header row plus one row per submission.
    let contents =
        fs::read_to_string(state.data_dir.join(&export.filename)).expect("snapshot exists");
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.lines().next().expect("header").starts_with("submissionId,sessionId"));

    let response = routes::download(State(state.clone()), Path(export.filename.clone()))
        .await
        .expect("download succeeds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("content type"),
        "text/csv"
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .expect("disposition"),
        &format!("attachment; filename=\"{}\"", export.filename)
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    assert_eq!(body, contents.as_bytes());
}

#[tokio::test]
async fn download_missing_file_is_not_found() {
    let (_temp, state) = test_state();

    let err = routes::download(State(state.clone()), Path("nope.csv".to_string()))
        .await
        .expect_err("missing file rejected");
    assert!(matches!(err, ApiError::FileNotFound));
}

#[tokio::test]
async fn download_refuses_to_escape_the_data_directory() {
    let (temp, state) = test_state();

    // A real file one level above the data directory must stay unreachable.
    fs::write(temp.path().join("secret.txt"), "top secret").expect("write secret");

    let err = routes::download(State(state.clone()), Path("../secret.txt".to_string()))
        .await
        .expect_err("traversal rejected");
    assert!(matches!(err, ApiError::FileNotFound));
}

#[tokio::test]
async fn stats_on_empty_collection_is_not_found() {
    let (_temp, state) = test_state();

    let err = routes::get_statistics(State(state.clone()))
        .await
        .expect_err("empty stats rejected");
    assert!(matches!(err, ApiError::NoData));
}

#[tokio::test]
async fn stats_for_single_full_submission() {
    let (_temp, state) = test_state();
    submit(&state, sample_payload("s1")).await;

    let Json(response) = routes::get_statistics(State(state.clone()))
        .await
        .expect("stats succeed");
    assert!(response.success);

    let stats = response.statistics;
    assert_eq!(stats.total_submissions, 1);
    assert_eq!(stats.avg_response_time, 120.0);
    assert_eq!(stats.avg_usability_rating, 4.0);
    assert_eq!(stats.device_types.get("mobile"), Some(&1));
    assert_eq!(stats.academic_levels.get("undergrad"), Some(&1));
}

#[tokio::test]
async fn stats_bucket_missing_demographics_under_unknown() {
    let (_temp, state) = test_state();
    submit(&state, sample_payload("s1")).await;
    submit(
        &state,
        json!({
            "sessionId": "s2",
            "performance": {},
            "satisfaction": {},
            "demographic": {}
        }),
    )
    .await;

    let Json(response) = routes::get_statistics(State(state.clone()))
        .await
        .expect("stats succeed");
    let stats = response.statistics;
    assert_eq!(stats.device_types.values().sum::<usize>(), 2);
    assert_eq!(stats.device_types.get("Unknown"), Some(&1));
    assert_eq!(stats.academic_levels.get("Unknown"), Some(&1));
    // Records without responseTime are excluded from the average.
    assert_eq!(stats.avg_response_time, 120.0);
}
