use std::path::PathBuf;

use thiserror::Error;

/// Fatal table-level failures. Per-row data problems never surface here;
/// the loader drops those rows and counts them in a [`LoadReport`].
///
/// [`LoadReport`]: crate::data::model::LoadReport
#[derive(Debug, Error)]
pub enum TableError {
    #[error("input not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("{}: expected at least {required} columns, found {found}", .path.display())]
    TooFewColumns {
        path: PathBuf,
        required: usize,
        found: usize,
    },

    #[error("column '{column}' not in {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("duplicate identifier '{0}'")]
    DuplicateIdentifier(String),

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T, E = TableError> = std::result::Result<T, E>;
