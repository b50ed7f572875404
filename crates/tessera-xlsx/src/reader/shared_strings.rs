//! Shared strings part

use std::io::BufRead;

use log::warn;
use quick_xml::events::{BytesStart, Event};
use tessera_core::SharedStringTable;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr_value, decode_excel_escapes, skip_element, xml_reader};

// Upper bound on pre-allocation driven by the declared uniqueCount.
const MAX_PREALLOCATED_STRINGS: usize = 1 << 20;

/// Read the shared strings table
///
/// Each `<si>` becomes one entry, in order. Rich-text runs are concatenated;
/// phonetic runs (`<rPh>`) are not part of the value. With `read_only` the
/// table is built without a reverse index.
pub fn read_shared_strings<R: BufRead>(
    input: R,
    part: &str,
    read_only: bool,
) -> XlsxResult<SharedStringTable> {
    let mut reader = xml_reader(input);
    let mut buf = Vec::new();

    let mut table = if read_only {
        SharedStringTable::forward_only()
    } else {
        SharedStringTable::new()
    };
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut index: u32 = 0;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| XlsxError::xml_in(part, e))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sst" => table = table_for_sst(&e, part, read_only)?,
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" if in_si => {
                    skip_element(&mut reader, &e, false)
                        .map_err(|err| XlsxError::xml_in(part, err))?;
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"sst" => table = table_for_sst(&e, part, read_only)?,
                b"si" => {
                    table.intern_existing(index, "")?;
                    index += 1;
                }
                _ => {}
            },
            Event::Text(t) if in_t => {
                let text = t.unescape().map_err(|e| XlsxError::xml_in(part, e))?;
                current.push_str(&text);
            }
            Event::CData(c) if in_t => {
                current.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"si" => {
                    table.intern_existing(index, decode_excel_escapes(&current).into_owned())?;
                    index += 1;
                    in_si = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(table)
}

fn table_for_sst(start: &BytesStart<'_>, part: &str, read_only: bool) -> XlsxResult<SharedStringTable> {
    let count = declared_count(start, b"count", part)?;
    let unique_count = declared_count(start, b"uniqueCount", part)?;

    let capacity = unique_count.map_or(0, |n| (n as usize).min(MAX_PREALLOCATED_STRINGS));
    let mut table = SharedStringTable::with_capacity(capacity, !read_only);
    table.set_declared_counts(count, unique_count);
    Ok(table)
}

fn declared_count(start: &BytesStart<'_>, key: &[u8], part: &str) -> XlsxResult<Option<u32>> {
    let Some(raw) = attr_value(start, key).map_err(|e| XlsxError::xml_in(part, e))? else {
        return Ok(None);
    };
    match raw.trim().parse() {
        Ok(n) => Ok(Some(n)),
        Err(_) => {
            warn!(
                "{}: ignoring non-numeric {} '{}'",
                part,
                String::from_utf8_lossy(key),
                raw
            );
            Ok(None)
        }
    }
}
