//! Prelude module - common imports for tessera users
//!
//! ```rust
//! use tessera::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellAddress,
    CellRange,
    CellType,
    CellValue,
    DecodeIssue,
    // Error types
    Error,
    Result,
    // Read configuration
    ReadOptions,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    Worksheet,
    // I/O types
    XlsxError,
    XlsxReader,
};
