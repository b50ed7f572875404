//! Workbook-level parts: workbook.xml, its relationships, and the
//! application and core property parts

use std::io::BufRead;

use ahash::AHashMap;
use quick_xml::events::Event;
use tessera_core::DocumentProperties;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr_value, capture_element, xml_reader};

/// A `<sheet>` entry from workbook.xml
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    /// `name` attribute
    pub name: String,
    /// `r:id` attribute, resolved through workbook.xml.rels
    pub rel_id: Option<String>,
}

/// What the assembler needs from workbook.xml
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookInfo {
    /// Sheets in declared order
    pub sheets: Vec<SheetEntry>,
    /// `workbookPr/@date1904`
    pub date1904: bool,
    /// `<definedNames>` serialized back to XML
    pub defined_names: Option<String>,
}

/// Parse workbook.xml
pub fn read_workbook_xml<R: BufRead>(input: R, part: &str) -> XlsxResult<WorkbookInfo> {
    let mut reader = xml_reader(input);
    let mut buf = Vec::new();
    let mut info = WorkbookInfo::default();
    let mut in_sheets = false;
    let xml_err = |e| XlsxError::xml_in(part, e);

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) if in_sheets && e.local_name().as_ref() == b"sheet" => {
                let name = attr_value(&e, b"name").map_err(xml_err)?.unwrap_or_default();
                let rel_id = attr_value(&e, b"id").map_err(xml_err)?;
                info.sheets.push(SheetEntry { name, rel_id });
            }
            Event::Start(e) if e.local_name().as_ref() == b"sheets" => in_sheets = true,
            Event::End(e) if e.local_name().as_ref() == b"sheets" => in_sheets = false,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"workbookPr" => {
                info.date1904 = attr_value(&e, b"date1904")
                    .map_err(xml_err)?
                    .map_or(false, |v| v == "1" || v == "true");
            }
            Event::Start(e) if e.local_name().as_ref() == b"definedNames" => {
                let record = capture_element(&mut reader, &e, false).map_err(xml_err)?;
                info.defined_names = Some(record.to_xml());
            }
            Event::Empty(e) if e.local_name().as_ref() == b"definedNames" => {
                let record = capture_element(&mut reader, &e, true).map_err(xml_err)?;
                info.defined_names = Some(record.to_xml());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

/// Parse workbook.xml.rels into worksheet `Id -> part name`
pub fn read_workbook_rels<R: BufRead>(input: R, part: &str) -> XlsxResult<AHashMap<String, String>> {
    let mut reader = xml_reader(input);
    let mut buf = Vec::new();
    let mut rels = AHashMap::new();
    let xml_err = |e| XlsxError::xml_in(part, e);

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attr_value(&e, b"Id").map_err(xml_err)?;
                let target = attr_value(&e, b"Target").map_err(xml_err)?;
                let rel_type = attr_value(&e, b"Type").map_err(xml_err)?;

                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.ends_with("/worksheet") {
                        rels.insert(id, resolve_target(&target));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Targets are relative to `xl/` unless absolute within the package
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = vec!["xl"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// What the assembler needs from docProps/app.xml
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppProperties {
    /// `TitlesOfParts` entries; sheet names come first
    pub titles: Vec<String>,
    /// `Application`
    pub application: Option<String>,
    /// `Company`
    pub company: Option<String>,
    /// `AppVersion`
    pub app_version: Option<String>,
}

/// Parse docProps/app.xml
pub fn read_app_xml<R: BufRead>(input: R, part: &str) -> XlsxResult<AppProperties> {
    let mut app = AppProperties::default();
    visit_leaves(input, part, |path, text| match path {
        // Empty titles keep their slot so later titles stay aligned
        [_, b"TitlesOfParts", b"vector", b"lpstr"] => app.titles.push(text.to_string()),
        [_, b"Application"] => app.application = non_blank(text),
        [_, b"Company"] => app.company = non_blank(text),
        [_, b"AppVersion"] => app.app_version = non_blank(text),
        _ => {}
    })?;
    Ok(app)
}

/// Parse docProps/core.xml into the creator and timestamp fields
pub fn read_core_xml<R: BufRead>(
    input: R,
    part: &str,
    props: &mut DocumentProperties,
) -> XlsxResult<()> {
    visit_leaves(input, part, |path, text| {
        let value = non_blank(text);
        match path {
            [_, b"creator"] => props.creator = value,
            [_, b"lastModifiedBy"] => props.last_modified_by = value,
            [_, b"created"] => props.created = value,
            [_, b"modified"] => props.modified = value,
            _ => {}
        }
    })
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Call `visit` with the local-name path and full text of every element that
/// has no child elements, including empty and self-closing ones
fn visit_leaves<R: BufRead>(
    input: R,
    part: &str,
    mut visit: impl FnMut(&[&[u8]], &str),
) -> XlsxResult<()> {
    let mut reader = xml_reader(input);
    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut text = String::new();
    // Whether the innermost open element has seen no child element yet
    let mut leaf = false;
    let xml_err = |e| XlsxError::xml_in(part, e);

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) => {
                path.push(e.local_name().as_ref().to_vec());
                text.clear();
                leaf = true;
            }
            Event::Empty(e) => {
                path.push(e.local_name().as_ref().to_vec());
                let segments: Vec<&[u8]> = path.iter().map(Vec::as_slice).collect();
                visit(&segments, "");
                path.pop();
                leaf = false;
            }
            Event::Text(t) if leaf => text.push_str(&t.unescape().map_err(xml_err)?),
            Event::CData(c) if leaf => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::End(_) => {
                if leaf {
                    let segments: Vec<&[u8]> = path.iter().map(Vec::as_slice).collect();
                    visit(&segments, &text);
                }
                path.pop();
                text.clear();
                leaf = false;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
