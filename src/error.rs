use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a line list, building or drawing an epicurve.
/// Unparseable dates are not errors, they become missing values.
#[derive(Error, Debug)]
pub enum EpicurveError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("unknown frequency '{0}', expected day, month, or year")]
    UnknownFrequency(String),

    #[error("failed to draw chart: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, EpicurveError>;
