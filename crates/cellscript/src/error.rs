//! Error types for the cellscript API surface
//!
//! Formula problems are reported as diagnostics, never as errors; this
//! type exists only for API misuse at the facade boundary.

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Lookup of a cell name nothing has declared or referenced
    #[error("Unknown cell: {0}")]
    UnknownCell(String),
}
