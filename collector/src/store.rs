//! In-memory submission collection with a per-submission file mirror.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::submission::Submission;

/// Append-only, insertion-ordered collection of submissions.
///
/// Resets to empty on process restart; the file mirror in the data
/// directory persists independently and is never read back.
#[derive(Debug, Default)]
pub struct SubmissionStore {
    submissions: Vec<Submission>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Append a submission and return the post-insert size.
    pub fn append(&mut self, submission: Submission) -> usize {
        self.submissions.push(submission);
        self.submissions.len()
    }

    /// All submissions in insertion order.
    pub fn all(&self) -> &[Submission] {
        &self.submissions
    }
}

/// File mirror path for a submission id.
pub fn submission_path(data_dir: &Path, submission_id: &str) -> PathBuf {
    data_dir.join(format!("submission_{submission_id}.json"))
}

/// Write the file mirror (pretty JSON, trailing newline).
pub fn write_submission_file(data_dir: &Path, submission: &Submission) -> Result<PathBuf> {
    let path = submission_path(data_dir, &submission.submission_id);
    let mut buf = serde_json::to_string_pretty(submission).context("serialize submission")?;
    buf.push('\n');
    fs::write(&path, buf).with_context(|| format!("write submission {}", path.display()))?;
    Ok(path)
}
