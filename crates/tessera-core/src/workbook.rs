//! Workbook type - the main document structure

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};

use crate::shared_strings::SharedStringTable;
use crate::style::StyleTables;
use crate::worksheet::Worksheet;

/// A decoded workbook
///
/// Owns its worksheets together with the shared string table and style
/// registries they index into. Worksheets hold no pointer back to the
/// workbook; code that needs both borrows the workbook.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Worksheets in declared order
    worksheets: Vec<Worksheet>,
    /// Shared string table
    shared_strings: SharedStringTable,
    /// Serialized shared-strings part, kept for write-back
    shared_strings_xml: Option<String>,
    /// Resolved style registries (full-fidelity reads only)
    styles: Option<StyleTables>,
    /// Creator, timestamps, application info
    properties: DocumentProperties,
    /// Dates count from 1904-01-01 instead of 1900-01-01
    date1904: bool,
    /// Raw `<definedNames>` XML
    defined_names: Option<String>,
    /// Parts carried through without interpretation
    preserved: PreservedParts,
    /// Where the workbook was read from
    source_path: Option<PathBuf>,
}

/// Document metadata from the application and core-properties parts
///
/// Values are kept as written; the timestamp helpers parse on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentProperties {
    /// `dc:creator`
    pub creator: Option<String>,
    /// `cp:lastModifiedBy`
    pub last_modified_by: Option<String>,
    /// `dcterms:created`
    pub created: Option<String>,
    /// `dcterms:modified`
    pub modified: Option<String>,
    /// `Application`
    pub application: Option<String>,
    /// `Company`
    pub company: Option<String>,
    /// `AppVersion`
    pub app_version: Option<String>,
}

impl DocumentProperties {
    /// Creation time, if present and well-formed
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.created.as_deref()?)
    }

    /// Last modification time, if present and well-formed
    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.modified.as_deref()?)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

/// A package part carried through verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservedPart {
    /// File name within its collection (`externalLink1.xml`)
    pub name: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

/// Opaque parts kept for write-back
///
/// Each collection is keyed by discovery order starting at 1. `None` means
/// the collection was absent (or the read skipped it), not that it was empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreservedParts {
    /// `xl/externalLinks/`
    pub external_links: Option<BTreeMap<u32, PreservedPart>>,
    /// `xl/drawings/`
    pub drawings: Option<BTreeMap<u32, PreservedPart>>,
    /// `xl/printerSettings/`
    pub printer_settings: Option<BTreeMap<u32, PreservedPart>>,
    /// `xl/worksheets/_rels/`
    pub worksheet_rels: Option<BTreeMap<u32, PreservedPart>>,
    /// `xl/vbaProject.bin`
    pub macros: Option<PreservedPart>,
}

impl Workbook {
    /// Create an empty workbook with no worksheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name (case-sensitive)
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Iterate over worksheets in declared order
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Worksheet names in declared order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(|ws| ws.name()).collect()
    }

    /// Append a worksheet, returning its index
    pub fn add_worksheet(&mut self, worksheet: Worksheet) -> usize {
        self.worksheets.push(worksheet);
        self.worksheets.len() - 1
    }

    /// Shared string table
    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.shared_strings
    }

    /// Replace the shared string table
    pub fn set_shared_strings(&mut self, table: SharedStringTable) {
        self.shared_strings = table;
    }

    /// Serialized shared-strings part, if retained
    pub fn shared_strings_xml(&self) -> Option<&str> {
        self.shared_strings_xml.as_deref()
    }

    /// Retain the serialized shared-strings part
    pub fn set_shared_strings_xml(&mut self, xml: Option<String>) {
        self.shared_strings_xml = xml;
    }

    /// Resolved style registries
    pub fn styles(&self) -> Option<&StyleTables> {
        self.styles.as_ref()
    }

    /// Set the resolved style registries
    pub fn set_styles(&mut self, styles: Option<StyleTables>) {
        self.styles = styles;
    }

    /// Document metadata
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Mutable document metadata
    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    /// Whether the 1904 date system is in use
    pub fn date1904(&self) -> bool {
        self.date1904
    }

    /// Set the date system
    pub fn set_date1904(&mut self, date1904: bool) {
        self.date1904 = date1904;
    }

    /// Raw `<definedNames>` XML, if present
    pub fn defined_names(&self) -> Option<&str> {
        self.defined_names.as_deref()
    }

    /// Set the raw defined-names XML
    pub fn set_defined_names(&mut self, xml: Option<String>) {
        self.defined_names = xml;
    }

    /// Parts carried through verbatim
    pub fn preserved(&self) -> &PreservedParts {
        &self.preserved
    }

    /// Mutable access to preserved parts
    pub fn preserved_mut(&mut self) -> &mut PreservedParts {
        &mut self.preserved
    }

    /// Path the workbook was read from
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Record the source path
    pub fn set_source_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.source_path = Some(path.into());
    }
}
