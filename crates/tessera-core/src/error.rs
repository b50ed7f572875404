//! Error types for tessera-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the document model
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// A shared string was loaded out of declaration order
    #[error("Shared string index {found} is not contiguous (expected {expected})")]
    NonContiguousSharedString { expected: u32, found: u32 },

    /// A cell-format record references a registry entry that does not exist
    #[error("Cell format {xf} references {table} {index}, but only {len} are declared")]
    StyleIndexOutOfRange {
        table: &'static str,
        index: u32,
        len: usize,
        xf: usize,
    },

    /// A cell-format reference that is not an integer
    #[error("Cell format {xf} has a non-numeric {table} reference '{value}'")]
    InvalidStyleReference {
        table: &'static str,
        value: String,
        xf: usize,
    },
}
