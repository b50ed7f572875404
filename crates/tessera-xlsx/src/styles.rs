//! Style part reading
//!
//! The style part is small, so its `<styleSheet>` root is captured whole and
//! split into sections. Usage accounting happens in
//! [`StyleTables::resolve`].

use std::io::BufRead;

use quick_xml::events::Event;
use tessera_core::{Error as CoreError, RawStyleSheet, StyleTables};

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{capture_element, xml_reader};

/// Parse a style part into its raw sections
pub fn parse_style_sheet<R: BufRead>(input: R, part: &str) -> XlsxResult<RawStyleSheet> {
    let mut reader = xml_reader(input);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"styleSheet" => {
                let root = capture_element(&mut reader, &e, false)
                    .map_err(|err| XlsxError::xml_in(part, err))?;
                return Ok(RawStyleSheet::from_root(&root));
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"styleSheet" => {
                return Ok(RawStyleSheet::default());
            }
            Ok(Event::Eof) => {
                return Err(XlsxError::InvalidFormat(format!(
                    "{} has no styleSheet element",
                    part
                )))
            }
            Err(e) => return Err(XlsxError::xml_in(part, e)),
            _ => {}
        }
        buf.clear();
    }
}

/// Parse a style part and resolve its registries
pub fn read_styles<R: BufRead>(input: R, part: &str) -> XlsxResult<StyleTables> {
    let raw = parse_style_sheet(input, part)?;
    StyleTables::resolve(raw).map_err(|err| match err {
        CoreError::StyleIndexOutOfRange {
            table, index, len, ..
        } => XlsxError::IndexOutOfRange {
            part: part.to_string(),
            kind: table,
            index,
            len,
            cell: None,
        },
        other => XlsxError::Parse(format!("{}: {}", part, other)),
    })
}
