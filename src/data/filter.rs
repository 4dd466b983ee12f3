use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::model::{CategoricalField, Dataset, Record};

// ---------------------------------------------------------------------------
// Criteria: which values are selected per categorical column
// ---------------------------------------------------------------------------

/// Per-column selection state.
///
/// A column without an entry is unconstrained. Entries are only created from
/// non-empty selections; an empty set can only arise from [`Criteria::and`]
/// on disjoint selections and matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    selections: BTreeMap<CategoricalField, BTreeSet<String>>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Criteria::set`].
    pub fn with<I, S>(mut self, field: CategoricalField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(field, values.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the selection for `field`. An empty set clears the constraint.
    pub fn set(&mut self, field: CategoricalField, values: BTreeSet<String>) {
        if values.is_empty() {
            self.selections.remove(&field);
        } else {
            self.selections.insert(field, values);
        }
    }

    /// Add or remove a single value from a column's selection.
    pub fn toggle(&mut self, field: CategoricalField, value: &str) {
        let selected = self.selections.entry(field).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        if selected.is_empty() {
            self.selections.remove(&field);
        }
    }

    pub fn clear(&mut self, field: CategoricalField) {
        self.selections.remove(&field);
    }

    pub fn clear_all(&mut self) {
        self.selections.clear();
    }

    /// The active selection for `field`, if constrained.
    pub fn selected(&self, field: CategoricalField) -> Option<&BTreeSet<String>> {
        self.selections.get(&field)
    }

    pub fn is_selected(&self, field: CategoricalField, value: &str) -> bool {
        self.selections
            .get(&field)
            .is_some_and(|selected| selected.contains(value))
    }

    /// Whether every row passes.
    pub fn is_unconstrained(&self) -> bool {
        self.selections.is_empty()
    }

    /// Conjunction of two criteria: per column, the intersection of both
    /// selections.
    pub fn and(&self, other: &Criteria) -> Criteria {
        let mut selections = self.selections.clone();
        for (field, theirs) in &other.selections {
            selections
                .entry(*field)
                .and_modify(|ours| ours.retain(|v| theirs.contains(v)))
                .or_insert_with(|| theirs.clone());
        }
        Criteria { selections }
    }

    /// A record passes when its value is selected in every constrained column.
    pub fn matches(&self, record: &Record) -> bool {
        self.selections
            .iter()
            .all(|(field, selected)| selected.contains(record.get(*field)))
    }
}

// ---------------------------------------------------------------------------
// Applying criteria
// ---------------------------------------------------------------------------

/// Return indices of rows that pass all active criteria, in source order.
pub fn filtered_indices(dataset: &Dataset, criteria: &Criteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(i, _)| i)
        .collect()
}

/// Rows that pass all active criteria, borrowed from `dataset`.
pub fn filtered_records<'a>(dataset: &'a Dataset, criteria: &Criteria) -> Vec<&'a Record> {
    dataset
        .records
        .iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// The filtered view as a new dataset. `dataset` is left untouched.
pub fn filter(dataset: &Dataset, criteria: &Criteria) -> Dataset {
    if criteria.is_unconstrained() {
        return dataset.clone();
    }
    Dataset::from_records(
        filtered_records(dataset, criteria)
            .into_iter()
            .cloned()
            .collect(),
    )
}
