//! Typed submission schema with parse-time validation.
//!
//! The wire shape is camelCase JSON. Known nested fields are kept as raw
//! [`Value`]s so export and statistics can decide how to interpret them;
//! unknown keys at every level are preserved via `#[serde(flatten)]` so
//! `GET /api/data` echoes records back verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Top-level fields a payload must carry to be accepted.
pub const REQUIRED_FIELDS: [&str; 4] = ["sessionId", "performance", "satisfaction", "demographic"];

/// One ingested record, as stored and served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Server-generated UUID, unique for the process lifetime.
    pub submission_id: String,
    /// Server-generated RFC 3339 ingestion timestamp.
    pub received_at: String,
    pub session_id: String,
    pub performance: Performance,
    pub satisfaction: Satisfaction,
    pub demographic: Demographic,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_load_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Satisfaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usability_rating: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_rating: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Demographic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_level: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated payload, before the server-assigned fields exist.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    pub session_id: String,
    pub performance: Performance,
    pub satisfaction: Satisfaction,
    pub demographic: Demographic,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubmissionInput {
    /// Parse a raw JSON payload.
    ///
    /// Presence of the required top-level fields is checked first so the
    /// error names the field; shape mismatches (e.g. `demographic` not an
    /// object) surface as [`ApiError::InvalidPayload`].
    pub fn parse(payload: Value) -> Result<Self, ApiError> {
        let object = payload
            .as_object()
            .ok_or_else(|| ApiError::InvalidPayload("payload must be a JSON object".to_string()))?;
        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(ApiError::MissingField(field));
            }
        }
        serde_json::from_value(payload).map_err(|err| ApiError::InvalidPayload(err.to_string()))
    }

    /// Attach the server-assigned identifier and timestamp.
    pub fn into_submission(mut self, submission_id: String, received_at: String) -> Submission {
        // Server-assigned keys win over caller-supplied ones.
        self.extra.remove("submissionId");
        self.extra.remove("receivedAt");
        Submission {
            submission_id,
            received_at,
            session_id: self.session_id,
            performance: self.performance,
            satisfaction: self.satisfaction,
            demographic: self.demographic,
            extra: self.extra,
        }
    }
}
