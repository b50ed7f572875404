//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading
///
/// Every variant is fatal for the whole document. Cell-local problems that
/// decoding can step over are recorded on the worksheet instead.
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML error with the part it occurred in
    #[error("XML error in {part}: {source}")]
    MalformedXml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// The file name does not carry a recognized extension
    #[error("Not a spreadsheet package: {path}")]
    FormatRejected { path: String },

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A shared-string or style index that does not exist in its table
    #[error("{part}: {kind} index {index} out of range ({len} entries){}", cell_suffix(.cell))]
    IndexOutOfRange {
        part: String,
        kind: &'static str,
        index: u32,
        len: usize,
        cell: Option<String>,
    },

    /// Cell content that cannot be coerced to its declared type
    #[error("{part}: cell {cell} has '{value}', expected {expected}")]
    TypeCoercion {
        part: String,
        cell: String,
        value: String,
        expected: &'static str,
    },

    /// The application part lists fewer sheet titles than the workbook declares
    #[error("Workbook declares {declared} sheets but only {titles} sheet titles were found")]
    SheetNameMismatch { declared: usize, titles: usize },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] tessera_core::Error),
}

fn cell_suffix(cell: &Option<String>) -> String {
    cell.as_ref()
        .map(|c| format!(" at cell {}", c))
        .unwrap_or_default()
}

impl XlsxError {
    /// Attach a part name to a bare XML error
    pub(crate) fn xml_in(part: &str, source: quick_xml::Error) -> Self {
        XlsxError::MalformedXml {
            part: part.to_string(),
            source,
        }
    }
}
