use crate::record::XmlRecord;

/// The sections of a style part, each kept as its captured record
///
/// Sections absent from the source stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStyleSheet {
    /// `<numFmts>`
    pub num_fmts: Option<XmlRecord>,
    /// `<fonts>`
    pub fonts: Option<XmlRecord>,
    /// `<fills>`
    pub fills: Option<XmlRecord>,
    /// `<borders>`
    pub borders: Option<XmlRecord>,
    /// `<cellStyleXfs>`
    pub cell_style_xfs: Option<XmlRecord>,
    /// `<cellXfs>`
    pub cell_xfs: Option<XmlRecord>,
    /// `<cellStyles>`
    pub cell_styles: Option<XmlRecord>,
    /// `<colors>`
    pub colors: Option<XmlRecord>,
}

impl RawStyleSheet {
    /// Split a captured `<styleSheet>` record into its sections
    ///
    /// Unknown children are ignored. If a section appears more than once the
    /// first occurrence wins.
    pub fn from_root(root: &XmlRecord) -> Self {
        let section = |name: &str| root.child(name).cloned();
        Self {
            num_fmts: section("numFmts"),
            fonts: section("fonts"),
            fills: section("fills"),
            borders: section("borders"),
            cell_style_xfs: section("cellStyleXfs"),
            cell_xfs: section("cellXfs"),
            cell_styles: section("cellStyles"),
            colors: section("colors"),
        }
    }
}

/// Normalize a style section to an ordered sequence of `item` records
///
/// A section may hold any number of `item` children, or the section itself
/// may be passed in as a lone bare `item`. Both shapes, and a missing section,
/// come out as a plain list so later code can index it uniformly.
pub fn normalize_records(section: Option<&XmlRecord>, item: &str) -> Vec<XmlRecord> {
    match section {
        None => Vec::new(),
        Some(record) if record.local_name() == item => vec![record.clone()],
        Some(record) => record.children_named(item).cloned().collect(),
    }
}
