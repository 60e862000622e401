//! CSV snapshot export of the submission collection.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;

use crate::submission::Submission;

/// Fixed column set, in order.
pub const CSV_COLUMNS: [&str; 10] = [
    "submissionId",
    "sessionId",
    "receivedAt",
    "responseTime",
    "pageLoadTime",
    "errorRate",
    "usabilityRating",
    "satisfactionRating",
    "academicLevel",
    "deviceType",
];

/// Timestamped export filename, distinct per second.
pub fn export_filename() -> String {
    format!("survey_export_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"))
}

/// Write a point-in-time CSV snapshot: header row plus one row per
/// submission in insertion order. Absent fields become empty cells; no
/// coercion or validation is applied.
pub fn write_csv(path: &Path, submissions: &[Submission]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create export {}", path.display()))?;
    writer.write_record(CSV_COLUMNS).context("write header")?;

    for submission in submissions {
        writer
            .write_record([
                submission.submission_id.clone(),
                submission.session_id.clone(),
                submission.received_at.clone(),
                cell(submission.performance.response_time.as_ref()),
                cell(submission.performance.page_load_time.as_ref()),
                cell(submission.performance.error_rate.as_ref()),
                cell(submission.satisfaction.usability_rating.as_ref()),
                cell(submission.satisfaction.satisfaction_rating.as_ref()),
                cell(submission.demographic.academic_level.as_ref()),
                cell(submission.demographic.device_type.as_ref()),
            ])
            .with_context(|| format!("write row for {}", submission.submission_id))?;
    }

    writer
        .flush()
        .with_context(|| format!("flush export {}", path.display()))
}

/// CSV cell rendering: strings verbatim, absent and null empty, anything
/// else as its JSON text.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
