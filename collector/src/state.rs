//! Shared application state for the collection server.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::store::SubmissionStore;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Directory holding per-submission files and CSV exports.
    pub data_dir: PathBuf,
    /// Mutex-guarded submission collection.
    pub store: Arc<Mutex<SubmissionStore>>,
}

impl AppState {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            store: Arc::new(Mutex::new(SubmissionStore::new())),
        }
    }

    /// Resolve `filename` inside the data directory.
    ///
    /// Returns `None` unless `filename` is a single normal path component,
    /// which confines downloads to the data directory.
    pub fn data_file_path(&self, filename: &str) -> Option<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.data_dir.join(name)),
            _ => None,
        }
    }
}
