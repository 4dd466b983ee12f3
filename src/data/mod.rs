/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///   Final_bus.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + rename + coerce fares → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Criteria (AND of equality sets) → filtered rows
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ summary   │   │  export   │  KPIs, groups, insights / CSV download
///   └──────────┘   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;

use log::debug;

use filter::{filtered_records, Criteria};
use model::Dataset;
use summary::{summarize, Summary};

/// Recompute every output for a new filter selection.
pub fn recompute(dataset: &Dataset, criteria: &Criteria) -> Summary {
    let rows = filtered_records(dataset, criteria);
    debug!("Recomputing summary over {} of {} rows", rows.len(), dataset.len());
    summarize(rows)
}
