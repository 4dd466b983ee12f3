use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use log::debug;

use crate::data::filter::Criteria;
use crate::data::loader::load_csv;
use crate::data::model::Dataset;
use crate::data::recompute;
use crate::data::summary::Summary;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// DatasetHandle – load once, share read-only
// ---------------------------------------------------------------------------

/// Owned handle to the session's dataset.
///
/// The file is read on first access and the same `Arc` is returned from then
/// on. There is no reload; a failed load is not cached and will be retried on
/// the next access.
#[derive(Debug)]
pub struct DatasetHandle {
    path: PathBuf,
    cell: OnceLock<Arc<Dataset>>,
}

impl DatasetHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    /// A handle that is already populated, e.g. for tests or a file picked in
    /// the UI.
    pub fn from_dataset(path: impl Into<PathBuf>, dataset: Dataset) -> Self {
        let handle = Self::new(path);
        let _ = handle.cell.set(Arc::new(dataset));
        handle
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The dataset, loading it if this is the first access.
    pub fn get_or_load(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }
        let loaded = Arc::new(load_csv(&self.path)?);
        // A concurrent caller may have won the race; keep whichever landed.
        let dataset = self.cell.get_or_init(|| loaded);
        debug!("Dataset handle for {} initialised", self.path.display());
        Ok(Arc::clone(dataset))
    }

    /// Filter and summarize the cached dataset.
    pub fn recompute(&self, criteria: &Criteria) -> Result<Summary, LoadError> {
        let dataset = self.get_or_load()?;
        Ok(recompute(&dataset, criteria))
    }
}
