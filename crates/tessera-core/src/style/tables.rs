use crate::error::{Error, Result};
use crate::record::XmlRecord;

use super::raw::{normalize_records, RawStyleSheet};

/// A registry entry: the definition plus how many cell formats use it
#[derive(Debug, Clone, PartialEq)]
pub struct StyleEntry {
    /// Captured definition record (`<font>`, `<fill>` or `<border>`)
    pub definition: XmlRecord,
    /// Number of cell-format records referencing this entry
    pub usage_count: u32,
}

impl StyleEntry {
    fn unused(definition: XmlRecord) -> Self {
        Self {
            definition,
            usage_count: 0,
        }
    }
}

/// Indexed style registries
///
/// Usage counts are computed once by [`StyleTables::resolve`] and are not
/// kept in sync with later edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleTables {
    /// Font registry, indexed by position in `<fonts>`
    pub fonts: Vec<StyleEntry>,
    /// Fill registry, indexed by position in `<fills>`
    pub fills: Vec<StyleEntry>,
    /// Border registry, indexed by position in `<borders>`
    pub borders: Vec<StyleEntry>,
    /// Cell-format records (`<cellXfs>/<xf>`); cells index into this list
    pub cell_xfs: Vec<XmlRecord>,
    /// Number formats, passed through
    pub num_fmts: Option<XmlRecord>,
    /// Cell-style formats (`<cellStyleXfs>`), passed through
    pub cell_style_xfs: Option<XmlRecord>,
    /// Named cell styles (`<cellStyles>`), passed through
    pub cell_styles: Option<XmlRecord>,
    /// Declared colors, passed through
    pub colors: Option<XmlRecord>,
}

impl StyleTables {
    /// Build the registries and count how often each entry is referenced
    ///
    /// Every `<xf>` in `cellXfs` bumps the count of the font, fill and border
    /// it names. An absent reference is skipped; a reference to an entry
    /// that does not exist is an error.
    pub fn resolve(raw: RawStyleSheet) -> Result<Self> {
        let mut fonts = registry(raw.fonts.as_ref(), "font");
        let mut fills = registry(raw.fills.as_ref(), "fill");
        let mut borders = registry(raw.borders.as_ref(), "border");
        let cell_xfs = normalize_records(raw.cell_xfs.as_ref(), "xf");

        for (xf_index, xf) in cell_xfs.iter().enumerate() {
            count_reference(xf, xf_index, "fontId", "font", &mut fonts)?;
            count_reference(xf, xf_index, "fillId", "fill", &mut fills)?;
            count_reference(xf, xf_index, "borderId", "border", &mut borders)?;
        }

        Ok(Self {
            fonts,
            fills,
            borders,
            cell_xfs,
            num_fmts: raw.num_fmts,
            cell_style_xfs: raw.cell_style_xfs,
            cell_styles: raw.cell_styles,
            colors: raw.colors,
        })
    }

    /// Number of cell-format records a cell style index may refer to
    pub fn cell_format_count(&self) -> usize {
        self.cell_xfs.len()
    }

    /// Get a cell-format record
    pub fn cell_format(&self, index: u32) -> Option<&XmlRecord> {
        self.cell_xfs.get(index as usize)
    }

    /// Get a font entry
    pub fn font(&self, index: u32) -> Option<&StyleEntry> {
        self.fonts.get(index as usize)
    }

    /// Get a fill entry
    pub fn fill(&self, index: u32) -> Option<&StyleEntry> {
        self.fills.get(index as usize)
    }

    /// Get a border entry
    pub fn border(&self, index: u32) -> Option<&StyleEntry> {
        self.borders.get(index as usize)
    }
}

fn registry(section: Option<&XmlRecord>, item: &str) -> Vec<StyleEntry> {
    normalize_records(section, item)
        .into_iter()
        .map(StyleEntry::unused)
        .collect()
}

fn count_reference(
    xf: &XmlRecord,
    xf_index: usize,
    attr: &str,
    table: &'static str,
    entries: &mut [StyleEntry],
) -> Result<()> {
    let Some(value) = xf.attr(attr) else {
        return Ok(());
    };

    let index: u32 = value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidStyleReference {
            table,
            value: value.to_string(),
            xf: xf_index,
        })?;

    let len = entries.len();
    let entry = entries
        .get_mut(index as usize)
        .ok_or(Error::StyleIndexOutOfRange {
            table,
            index,
            len,
            xf: xf_index,
        })?;
    entry.usage_count += 1;
    Ok(())
}
