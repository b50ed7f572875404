//! # tessera-xlsx
//!
//! XLSX (Office Open XML) ingestion for tessera.
//!
//! [`XlsxReader`] reads a package (a zip container or an extracted
//! directory) into a [`tessera_core::Workbook`]. Worksheets are decoded in
//! one streaming pass each; [`ReadOptions`] selects how much metadata is
//! kept.

pub mod error;
pub mod options;
pub mod package;
pub mod reader;
pub mod styles;
pub mod xml;

pub use error::{XlsxError, XlsxResult};
pub use options::ReadOptions;
pub use package::{check_extension, DirPackage, Package, ZipPackage, ACCEPTED_EXTENSIONS};
pub use reader::XlsxReader;
