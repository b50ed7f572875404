//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] / [`AddressCodec`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`Cell`], [`CellValue`], [`CellType`], [`Formula`] - Decoded cell contents
//! - [`SheetData`] - Sparse grid holding a worksheet's cells

mod address;
mod storage;
mod value;

pub use address::{AddressCodec, CellAddress, CellRange};
pub use storage::SheetData;
pub use value::{Cell, CellType, CellValue, Formula, SharedString};
