//! Compare functional-abundance tables from HUMAnN (read mapping) and
//! PICRUSt2 (phylogenetic inference) and render summary figures.

pub mod color;
pub mod data;
pub mod error;
pub mod plot;
pub mod reconcile;
pub mod stats;
pub mod visualization;

pub use data::filter::normalize_identifier;
pub use data::loader::{load_table, load_table_by_name};
pub use data::merge::{merge, DuplicatePolicy};
pub use data::model::{AbundanceRecord, AbundanceTable, MergedRow, MergedTable};
pub use error::TableError;
pub use stats::{correlate, top_n_overlap};
