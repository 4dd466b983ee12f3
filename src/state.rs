use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::export::export_to_path;
use crate::data::filter::{filtered_indices, Criteria};
use crate::data::model::{CategoricalField, Dataset, Record};
use crate::data::summary::{summarize, Summary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None if the startup load failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Active filter selection.
    pub criteria: Criteria,

    /// Indices of rows passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// Outputs for the current selection (cached).
    pub summary: Option<Summary>,

    /// Category colours for the scatter chart.
    pub category_colors: Option<ColorMap>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Fatal startup error. When set, nothing but this message is shown.
    pub load_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            criteria: Criteria::default(),
            visible_indices: Vec::new(),
            summary: None,
            category_colors: None,
            status_message: None,
            load_error: None,
        }
    }
}

impl AppState {
    /// State for a dataset that failed to load.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            load_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Ingest the session dataset with an initial selection.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>, criteria: Criteria) {
        self.category_colors = dataset
            .unique_values
            .get(&CategoricalField::Category)
            .map(ColorMap::new);
        self.criteria = criteria;
        self.dataset = Some(dataset);
        self.load_error = None;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and `summary` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.criteria);
            self.summary = Some(summarize(
                self.visible_indices.iter().map(|&i| &ds.records[i]),
            ));
        }
    }

    /// Rows passing the current selection.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        let records = self.dataset.as_deref().map(|ds| ds.records.as_slice());
        self.visible_indices
            .iter()
            .filter_map(move |&i| records.and_then(|r| r.get(i)))
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, field: CategoricalField, value: &str) {
        self.criteria.toggle(field, value);
        self.refilter();
    }

    /// Drop the constraint on one column.
    pub fn clear_filter(&mut self, field: CategoricalField) {
        self.criteria.clear(field);
        self.refilter();
    }

    /// Drop every constraint.
    pub fn clear_all_filters(&mut self) {
        self.criteria.clear_all();
        self.refilter();
    }

    /// Write the visible rows to `path`.
    pub fn export_visible(&self, path: &Path) -> Result<usize> {
        export_to_path(self.visible_records(), path)
            .with_context(|| format!("exporting to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Arc<Dataset> {
        let rows = ["R1", "R2", "R1"]
            .iter()
            .map(|route| Record {
                route: route.to_string(),
                total_amount: 10.0,
                ..Record::default()
            })
            .collect();
        Arc::new(Dataset::from_records(rows))
    }

    #[test]
    fn set_dataset_computes_summary() {
        let mut state = AppState::default();
        state.set_dataset(dataset(), Criteria::new());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.summary.as_ref().unwrap().kpis.total_revenue, 30.0);
    }

    #[test]
    fn toggling_refilters() {
        let mut state = AppState::default();
        state.set_dataset(dataset(), Criteria::new());
        state.toggle_filter_value(CategoricalField::Route, "R2");
        assert_eq!(state.visible_indices, vec![1]);
        assert_eq!(state.visible_records().count(), 1);
        state.clear_filter(CategoricalField::Route);
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn failed_state_has_no_dataset() {
        let state = AppState::failed("file not found: `Final_bus.csv`");
        assert!(state.dataset.is_none());
        assert!(state.summary.is_none());
        assert_eq!(state.visible_records().count(), 0);
    }

    #[test]
    fn export_writes_visible_rows() {
        let mut state = AppState::default();
        let criteria = Criteria::new().with(CategoricalField::Route, ["R1"]);
        state.set_dataset(dataset(), criteria);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(state.export_visible(&path).unwrap(), 2);
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
