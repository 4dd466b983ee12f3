use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring the source table into memory. Either variant halts the
/// dashboard before anything is rendered.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: `{}`", path.display())]
    NotFound { path: PathBuf },

    #[error("could not open `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse `{}` as CSV", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// The path that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::NotFound { path } | LoadError::Io { path, .. } | LoadError::Parse { path, .. } => {
                path
            }
        }
    }
}

/// Why a readable source is not a usable table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("missing header row")]
    MissingHeader,

    #[error("line {line}: expected at most {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Failure while writing the filtered view back out.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing CSV")]
    Csv(#[from] csv::Error),

    #[error("writing export file")]
    Io(#[from] std::io::Error),
}
