//! Worksheet type

use std::collections::BTreeMap;
use std::fmt;

use crate::cell::{Cell, CellAddress, CellRange, SheetData};
use crate::record::XmlRecord;

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: SheetData,
    /// Declared row styles (full-fidelity reads only)
    row_styles: BTreeMap<u32, RowStyle>,
    /// Custom row heights (full-fidelity reads only)
    row_heights: BTreeMap<u32, f64>,
    /// Captured metadata blocks (full-fidelity reads only)
    metadata: SheetMetadata,
    /// Cell-local problems that did not abort decoding
    issues: Vec<DecodeIssue>,
}

/// Style declared on a `<row>` element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowStyle {
    /// Index into the cell-format list (0 when the row declares none)
    pub style: u32,
}

/// Worksheet-level blocks kept as opaque records
///
/// Each block appears at most once in a worksheet part; a block that was
/// absent stays `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetMetadata {
    /// `<sheetViews>`
    pub sheet_views: Option<XmlRecord>,
    /// The first view's `<pane>` (frozen or split panes)
    pub pane: Option<XmlRecord>,
    /// `<cols>`
    pub cols: Option<XmlRecord>,
    /// `<mergeCells>`
    pub merged_cells: Option<XmlRecord>,
    /// `<dataValidations>`
    pub data_validations: Option<XmlRecord>,
    /// `<legacyDrawing>`
    pub legacy_drawing: Option<XmlRecord>,
    /// `<extLst>`
    pub ext_lst: Option<XmlRecord>,
}

impl SheetMetadata {
    /// Check whether any block was captured
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A cell-local problem the decoder stepped over
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeIssue {
    /// Cell reference as written (or derived) in the source
    pub reference: String,
    /// What went wrong
    pub kind: DecodeIssueKind,
}

/// Kinds of [`DecodeIssue`]
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeIssueKind {
    /// The address label did not decode; the cell was skipped
    MalformedAddress,
    /// Content could not be coerced to the declared type; the field was left empty
    TypeCoercion {
        /// Raw content
        value: String,
        /// Type the content was expected to have
        expected: &'static str,
    },
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DecodeIssueKind::MalformedAddress => {
                write!(f, "malformed cell reference '{}'", self.reference)
            }
            DecodeIssueKind::TypeCoercion { value, expected } => write!(
                f,
                "cell {}: '{}' is not a valid {}",
                self.reference, value, expected
            ),
        }
    }
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get cell storage
    pub fn cells(&self) -> &SheetData {
        &self.cells
    }

    /// Get mutable cell storage
    pub fn cells_mut(&mut self) -> &mut SheetData {
        &mut self.cells
    }

    /// Get a cell by A1 label
    ///
    /// `None` covers both an invalid label and an address with no cell.
    pub fn cell(&self, label: &str) -> Option<&Cell> {
        let addr = CellAddress::parse(label).ok()?;
        self.cells.get(addr.row, addr.col)
    }

    /// Get a cell by position
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(row, col)
    }

    /// Bounding range of stored cells
    pub fn used_range(&self) -> Option<CellRange> {
        let (r0, c0, r1, c1) = self.cells.used_bounds()?;
        Some(CellRange::new(
            CellAddress::new(r0, c0),
            CellAddress::new(r1, c1),
        ))
    }

    // === Rows ===

    /// Declared style for a row
    pub fn row_style(&self, row: u32) -> Option<RowStyle> {
        self.row_styles.get(&row).copied()
    }

    /// Record a row's declared style
    pub fn set_row_style(&mut self, row: u32, style: RowStyle) {
        self.row_styles.insert(row, style);
    }

    /// All declared row styles
    pub fn row_styles(&self) -> &BTreeMap<u32, RowStyle> {
        &self.row_styles
    }

    /// Custom height for a row, if one was declared
    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    /// Record a custom row height
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    /// All custom row heights
    pub fn row_heights(&self) -> &BTreeMap<u32, f64> {
        &self.row_heights
    }

    // === Metadata ===

    /// Captured metadata blocks
    pub fn metadata(&self) -> &SheetMetadata {
        &self.metadata
    }

    /// Mutable access to metadata blocks
    pub fn metadata_mut(&mut self) -> &mut SheetMetadata {
        &mut self.metadata
    }

    /// Merged ranges parsed from the `<mergeCells>` block
    ///
    /// Entries whose `ref` does not parse are left out.
    pub fn merged_ranges(&self) -> Vec<CellRange> {
        let Some(block) = &self.metadata.merged_cells else {
            return Vec::new();
        };
        block
            .children_named("mergeCell")
            .filter_map(|m| m.attr("ref"))
            .filter_map(|r| CellRange::parse(r).ok())
            .collect()
    }

    // === Issues ===

    /// Cell-local problems recorded while decoding
    pub fn issues(&self) -> &[DecodeIssue] {
        &self.issues
    }

    /// Record a cell-local problem
    pub fn push_issue(&mut self, issue: DecodeIssue) {
        self.issues.push(issue);
    }
}
