//! Aggregate statistics over the submission collection.
//!
//! Pure computation, no I/O. Numeric fields count toward an average only
//! when present and parseable as a number (JSON number, or a string that
//! parses as one); everything else is skipped rather than failing the
//! request. Frequency maps bucket absent values under `"Unknown"`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::submission::Submission;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_submissions: usize,
    pub avg_response_time: f64,
    pub avg_usability_rating: f64,
    pub device_types: BTreeMap<String, usize>,
    pub academic_levels: BTreeMap<String, usize>,
}

/// Compute statistics over the collection in insertion order.
pub fn compute(submissions: &[Submission]) -> Statistics {
    let avg_response_time = mean(
        submissions
            .iter()
            .filter_map(|s| numeric(s.performance.response_time.as_ref())),
    );
    let avg_usability_rating = mean(
        submissions
            .iter()
            .filter_map(|s| numeric(s.satisfaction.usability_rating.as_ref())),
    );

    let mut device_types = BTreeMap::new();
    let mut academic_levels = BTreeMap::new();
    for submission in submissions {
        *device_types
            .entry(bucket(submission.demographic.device_type.as_ref()))
            .or_insert(0) += 1;
        *academic_levels
            .entry(bucket(submission.demographic.academic_level.as_ref()))
            .or_insert(0) += 1;
    }

    Statistics {
        total_submissions: submissions.len(),
        avg_response_time,
        avg_usability_rating,
        device_types,
        academic_levels,
    }
}

/// Numeric reading of a nested field, if it has one.
fn numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Arithmetic mean; 0 when no value qualifies.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (count, sum) = values.fold((0usize, 0.0), |(count, sum), v| (count + 1, sum + v));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Frequency-map key for a demographic field.
fn bucket(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => "Unknown".to_string(),
        Some(other) => other.to_string(),
    }
}
