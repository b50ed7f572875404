//! # tessera
//!
//! A Rust library for reading spreadsheet packages into a typed document
//! model.
//!
//! tessera reads XLSX-family packages (`.xlsx`, `.xlsm`, `.xltx`, `.xltm`)
//! in one streaming pass per worksheet and produces a [`Workbook`]: sparse
//! cell grids, the shared string table, style registries with usage counts,
//! document properties, and the opaque parts needed to write the package back
//! out.
//!
//! ## Features
//!
//! - Full-fidelity or data-only reads ([`ReadOptions::with_data_only`])
//! - Low-memory reads that drop write-back data ([`ReadOptions::with_read_only`])
//! - Lenient or strict type coercion ([`ReadOptions::with_strict`])
//! - Concurrent worksheet decoding with the `parallel` feature
//!
//! ## Example
//!
//! ```rust,no_run
//! use tessera::prelude::*;
//!
//! let workbook = tessera::open("report.xlsx")?;
//! for sheet in workbook.worksheets() {
//!     println!("{}: {} cells", sheet.name(), sheet.cells().cell_count());
//! }
//!
//! let values_only = tessera::open_with("report.xlsx", &ReadOptions::new().with_data_only(true))?;
//! if let Some(cell) = values_only.worksheet(0).and_then(|s| s.cell("B2")) {
//!     println!("B2 = {}", cell.value);
//! }
//! # Ok::<(), tessera::XlsxError>(())
//! ```

pub mod prelude;

// Re-export core types
pub use tessera_core::{
    AddressCodec,
    // Cell types
    Cell,
    CellAddress,
    CellRange,
    CellType,
    CellValue,
    DecodeIssue,
    DecodeIssueKind,
    DocumentProperties,
    // Error types
    Error,
    Formula,
    PreservedPart,
    PreservedParts,
    Result,
    RowStyle,
    SharedString,
    SharedStringTable,
    SheetData,
    SheetMetadata,
    // Style types
    StyleEntry,
    StyleTables,
    // Main types
    Workbook,
    Worksheet,
    XmlRecord,
    // Constants
    MAX_COLS,
    MAX_ROWS,
};

// Re-export I/O types
pub use tessera_xlsx::{ReadOptions, XlsxError, XlsxReader, XlsxResult, ACCEPTED_EXTENSIONS};

use std::path::Path;

/// Open a spreadsheet package with full-fidelity defaults
pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
    XlsxReader::read_file(path)
}

/// Open a spreadsheet package with explicit options
pub fn open_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> XlsxResult<Workbook> {
    XlsxReader::read_file_with(path, options)
}

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt: Sized {
    /// Open a workbook from a file
    fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self>;

    /// Open a workbook from a file with explicit options
    fn open_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> XlsxResult<Self>;
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        open(path)
    }

    fn open_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> XlsxResult<Workbook> {
        open_with(path, options)
    }
}
