//! Error types for oar-core
//!
//! Domain errors raised by session construction, judgment storage, and the
//! export merge. Service layers map these onto HTTP responses.

use thiserror::Error;

/// Convenience Result type using the oar-core Error
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The upload parsed but produced zero data rows
    #[error("Dataset is empty: nothing to annotate")]
    EmptyDataset,

    /// The dataset lacks columns the rubric requires
    #[error("Dataset is missing required columns: {}. Available columns: {}",
        missing.join(", "), available.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// Judgment index outside the dataset bounds
    #[error("Record index {index} out of range for {len} records")]
    IndexOutOfRange { index: usize, len: usize },

    /// Records and judgments diverged in length
    #[error("Export shape mismatch: {records} records but {judgments} judgment slots")]
    ShapeMismatch { records: usize, judgments: usize },

    /// A rubric schema failed structural validation
    #[error("Invalid rubric schema: {0}")]
    InvalidSchema(String),
}
