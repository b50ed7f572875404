//! Streaming worksheet decoder
//!
//! One forward pass over a worksheet part. Rows and cells are decoded event
//! by event; the handful of metadata blocks kept on the worksheet are
//! captured as records when the read is full-fidelity and skipped otherwise.

use std::io::BufRead;

use log::warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tessera_core::{
    AddressCodec, CellAddress, CellType, CellValue, DecodeIssue, DecodeIssueKind, Formula,
    RowStyle, SharedStringTable, Worksheet, XmlRecord, MAX_COLS, MAX_ROWS,
};

use crate::error::{XlsxError, XlsxResult};
use crate::options::ReadOptions;
use crate::xml::{attr_value, capture_element, decode_excel_escapes, skip_element, xml_reader};

/// Read-only inputs shared by every worksheet of one workbook
#[derive(Debug, Clone, Copy)]
pub struct SheetContext<'a> {
    /// Part name, used in errors and log messages
    pub part: &'a str,
    /// Finalized shared string table
    pub shared_strings: &'a SharedStringTable,
    /// Size of the cell-format list cell style indices are checked against
    pub cell_format_count: Option<usize>,
    /// Read options
    pub options: &'a ReadOptions,
}

/// Decode one worksheet part
pub fn decode_worksheet<R: BufRead>(
    input: R,
    name: &str,
    ctx: &SheetContext<'_>,
) -> XlsxResult<Worksheet> {
    let mut reader = xml_reader(input);
    let mut decoder = WorksheetDecoder::new(name, ctx);
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| XlsxError::xml_in(ctx.part, e))?;
        if let Event::Eof = event {
            break;
        }
        decoder.handle(&mut reader, event)?;
        if decoder.region == Region::Done {
            break;
        }
        buf.clear();
    }

    decoder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Outside,
    Worksheet,
    SheetData,
    Row,
    Cell,
    Done,
}

/// Which child of `<c>` text currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellField {
    None,
    Value,
    Formula,
    InlineString,
    InlineText,
}

#[derive(Debug, Default)]
struct PendingCell {
    reference: String,
    row: u32,
    col: u32,
    type_attr: Option<String>,
    style_attr: Option<String>,
    value: Option<String>,
    inline: Option<String>,
    formula_text: Option<String>,
    formula_kind: Option<String>,
    formula_ref: Option<String>,
    formula_si: Option<String>,
}

struct WorksheetDecoder<'a> {
    ctx: &'a SheetContext<'a>,
    sheet: Worksheet,
    codec: AddressCodec,
    region: Region,
    field: CellField,
    text: String,
    current_row: u32,
    next_row: u32,
    next_col: u32,
    pending: Option<PendingCell>,
}

impl<'a> WorksheetDecoder<'a> {
    fn new(name: &str, ctx: &'a SheetContext<'a>) -> Self {
        Self {
            ctx,
            sheet: Worksheet::new(name),
            codec: AddressCodec::new(),
            region: Region::Outside,
            field: CellField::None,
            text: String::new(),
            current_row: 0,
            next_row: 0,
            next_col: 0,
            pending: None,
        }
    }

    fn full_fidelity(&self) -> bool {
        self.ctx.options.full_fidelity()
    }

    fn handle<R: BufRead>(&mut self, reader: &mut Reader<R>, event: Event<'_>) -> XlsxResult<()> {
        match self.region {
            Region::Outside => self.outside(reader, event),
            Region::Worksheet => self.in_worksheet(reader, event),
            Region::SheetData => self.in_sheet_data(reader, event),
            Region::Row => self.in_row(reader, event),
            Region::Cell => self.in_cell(reader, event),
            Region::Done => Ok(()),
        }
    }

    fn finish(self) -> XlsxResult<Worksheet> {
        match self.region {
            Region::Done => Ok(self.sheet),
            Region::Outside => Err(XlsxError::InvalidFormat(format!(
                "{} has no worksheet element",
                self.ctx.part
            ))),
            _ => Err(XlsxError::InvalidFormat(format!(
                "{} ended before </worksheet>",
                self.ctx.part
            ))),
        }
    }

    // === Regions ===

    fn outside<R: BufRead>(&mut self, reader: &mut Reader<R>, event: Event<'_>) -> XlsxResult<()> {
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"worksheet" => {
                self.region = Region::Worksheet;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"worksheet" => {
                self.region = Region::Done;
            }
            Event::Start(e) => self.skip(reader, &e, false)?,
            _ => {}
        }
        Ok(())
    }

    fn in_worksheet<R: BufRead>(
        &mut self,
        reader: &mut Reader<R>,
        event: Event<'_>,
    ) -> XlsxResult<()> {
        let (e, self_closing) = match event {
            Event::Start(e) => (e, false),
            Event::Empty(e) => (e, true),
            Event::End(e) if e.local_name().as_ref() == b"worksheet" => {
                self.region = Region::Done;
                return Ok(());
            }
            _ => return Ok(()),
        };

        let local = e.local_name();
        match local.as_ref() {
            b"sheetData" => {
                if !self_closing {
                    self.region = Region::SheetData;
                }
            }
            b"sheetViews" | b"cols" | b"mergeCells" | b"dataValidations" | b"extLst"
            | b"legacyDrawing"
                if self.full_fidelity() =>
            {
                let record = capture_element(reader, &e, self_closing)
                    .map_err(|err| XlsxError::xml_in(self.ctx.part, err))?;
                self.store_metadata(record);
            }
            _ => self.skip(reader, &e, self_closing)?,
        }
        Ok(())
    }

    fn in_sheet_data<R: BufRead>(
        &mut self,
        reader: &mut Reader<R>,
        event: Event<'_>,
    ) -> XlsxResult<()> {
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"row" => {
                self.begin_row(&e)?;
                self.region = Region::Row;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"row" => {
                if self.begin_row(&e)? {
                    // A self-closing row carries no cells
                    self.sheet.cells_mut().clear_row(self.current_row);
                }
            }
            Event::Start(e) => self.skip(reader, &e, false)?,
            Event::End(e) if e.local_name().as_ref() == b"sheetData" => {
                self.region = Region::Worksheet;
            }
            _ => {}
        }
        Ok(())
    }

    fn in_row<R: BufRead>(&mut self, reader: &mut Reader<R>, event: Event<'_>) -> XlsxResult<()> {
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"c" => {
                if self.begin_cell(&e)? {
                    self.region = Region::Cell;
                } else {
                    self.skip(reader, &e, false)?;
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                if self.begin_cell(&e)? {
                    self.finish_cell()?;
                }
            }
            Event::Start(e) => self.skip(reader, &e, false)?,
            Event::End(e) if e.local_name().as_ref() == b"row" => {
                self.region = Region::SheetData;
            }
            _ => {}
        }
        Ok(())
    }

    fn in_cell<R: BufRead>(&mut self, reader: &mut Reader<R>, event: Event<'_>) -> XlsxResult<()> {
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"v" => self.enter_field(CellField::Value),
                b"f" => {
                    self.read_formula_attrs(&e)?;
                    self.enter_field(CellField::Formula);
                }
                b"is" => {
                    if let Some(pending) = &mut self.pending {
                        pending.inline = Some(String::new());
                    }
                    self.field = CellField::InlineString;
                }
                b"r" if self.field == CellField::InlineString => {}
                b"t" if self.field == CellField::InlineString => {
                    self.field = CellField::InlineText;
                }
                _ => self.skip(reader, &e, false)?,
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"v" => {
                    if let Some(pending) = &mut self.pending {
                        pending.value = Some(String::new());
                    }
                }
                b"is" => {
                    if let Some(pending) = &mut self.pending {
                        pending.inline = Some(String::new());
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if self.field != CellField::None && self.field != CellField::InlineString {
                    let text = t
                        .unescape()
                        .map_err(|e| XlsxError::xml_in(self.ctx.part, e))?;
                    self.push_text(&text);
                }
            }
            Event::CData(c) => {
                if self.field != CellField::None && self.field != CellField::InlineString {
                    let raw = c.into_inner();
                    self.push_text(&String::from_utf8_lossy(&raw));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" if self.field == CellField::Value => {
                    let text = std::mem::take(&mut self.text);
                    if let Some(pending) = &mut self.pending {
                        pending.value = Some(text);
                    }
                    self.field = CellField::None;
                }
                b"f" if self.field == CellField::Formula => {
                    let text = std::mem::take(&mut self.text);
                    if let Some(pending) = &mut self.pending {
                        pending.formula_text = Some(text);
                    }
                    self.field = CellField::None;
                }
                b"t" if self.field == CellField::InlineText => {
                    self.field = CellField::InlineString;
                }
                b"is" => self.field = CellField::None,
                b"c" => {
                    self.finish_cell()?;
                    self.field = CellField::None;
                    self.region = Region::Row;
                }
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    // === Rows ===

    /// Returns false when the row label was malformed. The row still takes
    /// the next position so its cells are decoded by their own addresses.
    fn begin_row(&mut self, e: &BytesStart<'_>) -> XlsxResult<bool> {
        let (row, labelled) = match self.attr(e, b"r")? {
            Some(label) => match parse_row_label(&label) {
                Some(row) => (row, true),
                None => {
                    self.malformed_row(label)?;
                    (self.next_row, false)
                }
            },
            None => (self.next_row, true),
        };

        self.current_row = row;
        self.next_row = row.saturating_add(1);
        self.next_col = 0;

        if labelled && self.full_fidelity() && row < MAX_ROWS {
            let reference = (row as u64 + 1).to_string();

            let style = match self.attr(e, b"s")? {
                Some(raw) if !raw.trim().is_empty() => self
                    .coerce(&reference, &raw, "row style index", |s| s.parse::<u32>().ok())?
                    .unwrap_or(0),
                _ => 0,
            };
            self.sheet.set_row_style(row, RowStyle { style });

            if let Some(raw) = self.attr(e, b"ht")? {
                if !raw.trim().is_empty() {
                    let height = self.coerce(&reference, &raw, "row height", |s| {
                        s.parse::<f64>().ok().filter(|h| h.is_finite())
                    })?;
                    if let Some(height) = height {
                        self.sheet.set_row_height(row, height);
                    }
                }
            }
        }

        Ok(labelled)
    }

    fn malformed_row(&mut self, label: String) -> XlsxResult<()> {
        if self.ctx.options.strict {
            return Err(XlsxError::InvalidFormat(format!(
                "{}: malformed row label '{}'",
                self.ctx.part, label
            )));
        }

        warn!(
            "{}: malformed row label '{}'; placing its cells by their own references",
            self.ctx.part, label
        );
        self.sheet.push_issue(DecodeIssue {
            reference: label,
            kind: DecodeIssueKind::MalformedAddress,
        });
        Ok(())
    }

    // === Cells ===

    /// Returns false when the cell was skipped
    fn begin_cell(&mut self, e: &BytesStart<'_>) -> XlsxResult<bool> {
        let (reference, addr) = match self.attr(e, b"r")? {
            Some(label) => match self.decode_address(&label) {
                Some(addr) => (label, addr),
                None => {
                    self.malformed(label);
                    return Ok(false);
                }
            },
            None => {
                if self.current_row >= MAX_ROWS || self.next_col >= MAX_COLS {
                    let label = format!(
                        "row {} column {} out of range",
                        self.current_row as u64 + 1,
                        self.next_col as u64 + 1
                    );
                    self.malformed(label);
                    return Ok(false);
                }
                let addr = CellAddress::new(self.current_row, self.next_col);
                (addr.to_a1_string(), addr)
            }
        };

        self.next_col = addr.col + 1;
        self.sheet.cells_mut().get_or_create(addr.row, addr.col);

        self.pending = Some(PendingCell {
            reference,
            row: addr.row,
            col: addr.col,
            type_attr: self.attr(e, b"t")?,
            style_attr: self.attr(e, b"s")?,
            ..Default::default()
        });
        self.field = CellField::None;
        self.text.clear();
        Ok(true)
    }

    fn decode_address(&mut self, label: &str) -> Option<CellAddress> {
        self.codec
            .decode(label)
            .filter(|addr| addr.row < MAX_ROWS && addr.col < MAX_COLS)
    }

    fn read_formula_attrs(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        let kind = self.attr(e, b"t")?;
        let reference = self.attr(e, b"ref")?;
        let shared_index = self.attr(e, b"si")?;
        if let Some(pending) = &mut self.pending {
            pending.formula_kind = kind;
            pending.formula_ref = reference;
            pending.formula_si = shared_index;
        }
        Ok(())
    }

    fn finish_cell(&mut self) -> XlsxResult<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let datatype = CellType::from_attr(pending.type_attr.as_deref());
        let value = self.decode_value(&pending, datatype)?;

        let formula = pending
            .formula_text
            .filter(|text| !text.trim().is_empty())
            .map(|text| Formula {
                text,
                kind: pending.formula_kind,
                reference: pending.formula_ref,
                shared_index: pending.formula_si,
            });

        let style_index = match pending.style_attr.as_deref() {
            Some(raw) if self.full_fidelity() && !raw.trim().is_empty() => {
                self.decode_style_index(&pending.reference, raw)?
            }
            _ => 0,
        };

        let cell = self.sheet.cells_mut().get_or_create(pending.row, pending.col);
        cell.value = value;
        cell.datatype = datatype;
        cell.formula = formula;
        cell.style_index = style_index;
        Ok(())
    }

    fn decode_value(&mut self, pending: &PendingCell, datatype: CellType) -> XlsxResult<CellValue> {
        if datatype == CellType::InlineString {
            return Ok(match (&pending.inline, &pending.value) {
                (Some(text), _) | (None, Some(text)) if !text.is_empty() => {
                    CellValue::string(decode_excel_escapes(text))
                }
                _ => CellValue::Empty,
            });
        }

        let raw = match pending.value.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(CellValue::Empty),
        };
        // Text types keep whitespace; parsed types treat blank content as empty
        let text_type = matches!(datatype, CellType::RawString | CellType::Error);
        if !text_type && raw.trim().is_empty() {
            return Ok(CellValue::Empty);
        }
        let reference = pending.reference.as_str();

        let value = match datatype {
            CellType::SharedString => {
                let index = self.coerce(reference, raw, "shared string index", |s| {
                    s.parse::<u32>().ok()
                })?;
                match index {
                    Some(index) => CellValue::String(self.lookup_shared(reference, index)?),
                    None => CellValue::Empty,
                }
            }
            CellType::RawString => CellValue::string(decode_excel_escapes(raw)),
            CellType::Error => CellValue::Error(raw.to_string()),
            CellType::Boolean => self
                .coerce(reference, raw, "boolean", parse_boolean)?
                .map_or(CellValue::Empty, CellValue::Boolean),
            CellType::Numeric | CellType::InlineString => self
                .coerce(reference, raw, "number", parse_number)?
                .unwrap_or(CellValue::Empty),
        };
        Ok(value)
    }

    fn lookup_shared(
        &self,
        reference: &str,
        index: u32,
    ) -> XlsxResult<tessera_core::SharedString> {
        let table = self.ctx.shared_strings;
        table
            .lookup_by_index(index)
            .cloned()
            .ok_or_else(|| XlsxError::IndexOutOfRange {
                part: self.ctx.part.to_string(),
                kind: "shared string",
                index,
                len: table.len(),
                cell: Some(reference.to_string()),
            })
    }

    fn decode_style_index(&mut self, reference: &str, raw: &str) -> XlsxResult<u32> {
        let Some(index) = self.coerce(reference, raw, "style index", |s| s.parse::<u32>().ok())?
        else {
            return Ok(0);
        };

        if let Some(len) = self.ctx.cell_format_count {
            if index != 0 && index as usize >= len {
                return Err(XlsxError::IndexOutOfRange {
                    part: self.ctx.part.to_string(),
                    kind: "cell format",
                    index,
                    len,
                    cell: Some(reference.to_string()),
                });
            }
        }
        Ok(index)
    }

    // === Metadata ===

    fn store_metadata(&mut self, record: XmlRecord) {
        let name = record.local_name().to_string();
        let meta = self.sheet.metadata_mut();
        match name.as_str() {
            "sheetViews" if record.child("sheetView").is_some() => {
                meta.pane = record
                    .child("sheetView")
                    .and_then(|view| view.child("pane"))
                    .cloned();
                meta.sheet_views = Some(record);
            }
            "cols" => meta.cols = Some(record),
            "mergeCells" if record.child("mergeCell").is_some() => {
                meta.merged_cells = Some(record)
            }
            "dataValidations" if record.child("dataValidation").is_some() => {
                meta.data_validations = Some(record)
            }
            "extLst" => meta.ext_lst = Some(record),
            "legacyDrawing" => meta.legacy_drawing = Some(record),
            _ => {}
        }
    }

    // === Helpers ===

    fn enter_field(&mut self, field: CellField) {
        self.field = field;
        self.text.clear();
    }

    fn push_text(&mut self, text: &str) {
        match self.field {
            CellField::Value | CellField::Formula => self.text.push_str(text),
            CellField::InlineText => {
                if let Some(inline) = self.pending.as_mut().and_then(|p| p.inline.as_mut()) {
                    inline.push_str(text);
                }
            }
            CellField::None | CellField::InlineString => {}
        }
    }

    fn attr(&self, e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
        attr_value(e, key).map_err(|err| XlsxError::xml_in(self.ctx.part, err))
    }

    fn skip<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        e: &BytesStart<'_>,
        self_closing: bool,
    ) -> XlsxResult<()> {
        skip_element(reader, e, self_closing).map_err(|err| XlsxError::xml_in(self.ctx.part, err))
    }

    fn malformed(&mut self, reference: String) {
        warn!(
            "{}: skipping malformed cell reference '{}'",
            self.ctx.part, reference
        );
        self.sheet.push_issue(DecodeIssue {
            reference,
            kind: DecodeIssueKind::MalformedAddress,
        });
    }

    /// Apply `parse` to trimmed content. A failure is fatal in strict mode;
    /// otherwise it is recorded and `None` comes back.
    fn coerce<T>(
        &mut self,
        reference: &str,
        raw: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> XlsxResult<Option<T>> {
        if let Some(value) = parse(raw.trim()) {
            return Ok(Some(value));
        }

        if self.ctx.options.strict {
            return Err(XlsxError::TypeCoercion {
                part: self.ctx.part.to_string(),
                cell: reference.to_string(),
                value: raw.to_string(),
                expected,
            });
        }

        warn!(
            "{}: cell {} has '{}', expected {}; leaving it empty",
            self.ctx.part, reference, raw, expected
        );
        self.sheet.push_issue(DecodeIssue {
            reference: reference.to_string(),
            kind: DecodeIssueKind::TypeCoercion {
                value: raw.to_string(),
                expected,
            },
        });
        Ok(None)
    }
}

fn parse_row_label(label: &str) -> Option<u32> {
    let row: u32 = label.trim().parse().ok()?;
    (1..=MAX_ROWS).contains(&row).then(|| row - 1)
}

/// Numbers written with a decimal point or exponent are floats; everything
/// else must be an integer. Integers too large for i64 fall back to floats.
fn parse_number(s: &str) -> Option<CellValue> {
    let value = if s.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        CellValue::Float(s.parse::<f64>().ok()?)
    } else {
        match s.parse::<i64>() {
            Ok(n) => CellValue::Integer(n),
            Err(_) => CellValue::Float(s.parse::<f64>().ok()?),
        }
    };

    match value {
        CellValue::Float(f) if !f.is_finite() => None,
        other => Some(other),
    }
}

fn parse_boolean(s: &str) -> Option<bool> {
    match s {
        "1" | "true" | "TRUE" => Some(true),
        "0" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}
