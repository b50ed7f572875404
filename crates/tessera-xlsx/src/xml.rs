//! Streaming XML helpers shared by the part readers
//!
//! Hot paths (rows and cells) are handled event by event. Blocks that are
//! kept as opaque metadata are materialized into an [`XmlRecord`] with
//! [`capture_element`], and blocks nobody needs are passed over with
//! [`skip_element`].

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tessera_core::XmlRecord;

/// Create an event reader over a part
///
/// Whitespace is preserved; callers decide what to trim.
pub fn xml_reader<R: BufRead>(input: R) -> Reader<R> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(false);
    reader
}

/// Materialize the element that `start` opened, including its whole subtree
///
/// The reader is left just past the element's closing tag. When the element
/// was self-closing nothing further is read.
pub fn capture_element<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'_>,
    self_closing: bool,
) -> Result<XmlRecord, quick_xml::Error> {
    let root = record_from_start(start)?;
    if self_closing {
        return Ok(root);
    }

    let mut stack = vec![root];
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => stack.push(record_from_start(&e)?),
            Event::Empty(e) => {
                let child = record_from_start(&e)?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(child);
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                push_text(&mut stack, &text);
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&raw));
            }
            Event::End(_) => {
                let Some(mut done) = stack.pop() else {
                    break;
                };
                finish_text(&mut done);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => return Ok(done),
                }
            }
            Event::Eof => {
                return Err(quick_xml::Error::UnexpectedEof(
                    String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    Err(quick_xml::Error::UnexpectedEof(
        String::from_utf8_lossy(start.name().as_ref()).into_owned(),
    ))
}

/// Skip past the closing tag of the element that `start` opened
///
/// A no-op for self-closing elements.
pub fn skip_element<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'_>,
    self_closing: bool,
) -> Result<(), quick_xml::Error> {
    if !self_closing {
        let mut buf = Vec::new();
        reader.read_to_end_into(start.name(), &mut buf)?;
    }
    Ok(())
}

fn record_from_start(start: &BytesStart<'_>) -> Result<XmlRecord, quick_xml::Error> {
    let mut record = XmlRecord::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        record.attributes.push((key, value));
    }
    Ok(record)
}

fn push_text(stack: &mut [XmlRecord], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.get_or_insert_with(String::new).push_str(text);
    }
}

// Whitespace between child elements is formatting, not content.
fn finish_text(record: &mut XmlRecord) {
    let blank = record
        .text
        .as_deref()
        .map_or(false, |t| t.trim().is_empty());
    if blank && (!record.children.is_empty() || record.text.as_deref() == Some("")) {
        record.text = None;
    }
}

/// Value of the attribute whose local name is `key`
pub fn attr_value(start: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in start.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Decode the `_xHHHH_` escapes used for characters XML cannot carry
///
/// Sequences that are incomplete or do not name a valid character are left
/// untouched.
pub fn decode_excel_escapes(s: &str) -> Cow<'_, str> {
    if !s.contains("_x") {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match escaped_char(candidate) {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push('_');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn escaped_char(candidate: &str) -> Option<char> {
    let bytes = candidate.as_bytes();
    if bytes.len() < 7 || bytes[6] != b'_' {
        return None;
    }
    let hex = candidate.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}
