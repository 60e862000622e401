//! HTTP route handlers for the collection API.

use std::fs;

use anyhow::Context;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::export;
use crate::state::AppState;
use crate::stats::{self, Statistics};
use crate::store;
use crate::submission::{Submission, SubmissionInput};

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/submit", post(submit))
        .route("/data", get(get_all_data))
        .route("/export/csv", get(export_csv))
        .route("/download/{filename}", get(download))
        .route("/stats", get(get_statistics))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub total_records: usize,
}

/// GET /api/health - liveness plus record count.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let total_records = state.store.lock().await.len();
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        total_records,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub submission_id: String,
    pub total_submissions: usize,
}

/// POST /api/submit - validate and ingest one submission.
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let input = SubmissionInput::parse(payload)?;
    let submission = input.into_submission(Uuid::new_v4().to_string(), Utc::now().to_rfc3339());

    let mut store = state.store.lock().await;
    let total_submissions = store.append(submission.clone());
    // Mirror after the append; a write failure surfaces as 500 without
    // rolling back the in-memory record.
    store::write_submission_file(&state.data_dir, &submission)?;

    info!(
        session_id = %submission.session_id,
        submission_id = %submission.submission_id,
        "submission received"
    );

    Ok(Json(SubmitResponse {
        success: true,
        message: "Data received successfully",
        submission_id: submission.submission_id,
        total_submissions,
    }))
}

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Submission>,
}

/// GET /api/data - dump the full collection in insertion order.
pub async fn get_all_data(State(state): State<AppState>) -> Json<DataResponse> {
    let store = state.store.lock().await;
    Json(DataResponse {
        success: true,
        count: store.len(),
        data: store.all().to_vec(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
}

/// GET /api/export/csv - write a timestamped CSV snapshot into the data
/// directory.
pub async fn export_csv(State(state): State<AppState>) -> Result<Json<ExportResponse>, ApiError> {
    let store = state.store.lock().await;
    if store.is_empty() {
        return Err(ApiError::NoData);
    }

    let filename = export::export_filename();
    let path = state.data_dir.join(&filename);
    export::write_csv(&path, store.all())?;

    info!(count = store.len(), filename = %filename, "exported csv snapshot");

    Ok(Json(ExportResponse {
        success: true,
        message: format!("Exported {} records", store.len()),
        download_url: format!("/api/download/{filename}"),
        filename,
    }))
}

/// GET /api/download/:filename - return a data-directory file as an
/// attachment.
///
/// Only bare filenames resolve; anything with path separators or `..` is
/// treated as not found.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state
        .data_file_path(&filename)
        .ok_or(ApiError::FileNotFound)?;
    if !path.is_file() {
        return Err(ApiError::FileNotFound);
    }

    let contents = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    let content_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    };
    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, contents).into_response())
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub statistics: Statistics,
}

/// GET /api/stats - aggregate statistics over the collection.
pub async fn get_statistics(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let store = state.store.lock().await;
    if store.is_empty() {
        return Err(ApiError::NoData);
    }
    Ok(Json(StatsResponse {
        success: true,
        statistics: stats::compute(store.all()),
    }))
}
