//! # tessera-core
//!
//! Core document model for the tessera spreadsheet reader.
//!
//! This crate provides the types a decoded workbook is made of:
//! - [`CellAddress`] and [`AddressCodec`] - A1-style label decoding
//! - [`SharedStringTable`] - Deduplicated text referenced by index from cells
//! - [`StyleTables`] - Indexed font/fill/border registries with usage counts
//! - [`SheetData`] - Sparse, row-major cell grid
//! - [`Workbook`], [`Worksheet`], [`Cell`] - The document itself
//!
//! Nothing here performs I/O; the `tessera-xlsx` crate populates these types.
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::{CellAddress, CellValue, Worksheet};
//!
//! let mut sheet = Worksheet::new("Sheet1");
//! let addr = CellAddress::decode("B3").unwrap();
//! sheet.cells_mut().get_or_create(addr.row, addr.col).value = CellValue::Integer(42);
//!
//! assert_eq!(sheet.cell("B3").unwrap().value, CellValue::Integer(42));
//! assert!(sheet.cell("B4").is_none());
//! ```

pub mod cell;
pub mod error;
pub mod record;
pub mod shared_strings;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{
    AddressCodec, Cell, CellAddress, CellRange, CellType, CellValue, Formula, SharedString,
    SheetData,
};
pub use error::{Error, Result};
pub use record::XmlRecord;
pub use shared_strings::SharedStringTable;
pub use style::{normalize_records, RawStyleSheet, StyleEntry, StyleTables};
pub use workbook::{DocumentProperties, PreservedPart, PreservedParts, Workbook};
pub use worksheet::{DecodeIssue, DecodeIssueKind, RowStyle, SheetMetadata, Worksheet};

/// Maximum number of rows in a worksheet (format limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (format limit)
pub const MAX_COLS: u32 = 16_384;
