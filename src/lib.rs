//! Bus travel data exploration: load a ticket CSV, filter it by categorical
//! columns, and summarize the selection for the dashboard.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod state;

pub use data::filter::Criteria;
pub use data::model::{CategoricalField, Dataset, Field, Record};
pub use data::recompute;
pub use data::summary::Summary;
pub use error::{ExportError, LoadError};
pub use session::DatasetHandle;
