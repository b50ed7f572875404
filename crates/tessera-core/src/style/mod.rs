//! Style-sheet definitions and usage accounting
//!
//! This module contains:
//! - [`RawStyleSheet`] - The style part's sections, captured as records
//! - [`normalize_records`] - Single-record vs. list normalization
//! - [`StyleTables`] - Indexed font/fill/border registries with usage counts
//!
//! Only the definitions are decoded here. Computing a cell's resolved
//! appearance from them is left to consumers.

mod raw;
mod tables;

pub use raw::{normalize_records, RawStyleSheet};
pub use tables::{StyleEntry, StyleTables};
