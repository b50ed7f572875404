//! Cell values, types and formulas.

use crate::{worksheet, PackageBuilder};
use tessera_core::{CellType, CellValue, DecodeIssueKind};
use tessera_xlsx::{ReadOptions, XlsxError};

fn value(workbook: &tessera_core::Workbook, label: &str) -> CellValue {
    workbook
        .worksheet(0)
        .and_then(|s| s.cell(label))
        .map(|c| c.value.clone())
        .unwrap_or(CellValue::Empty)
}

#[test]
fn test_mixed_cell_types() {
    let workbook = PackageBuilder::new()
        .shared_strings(&["Name", "Widget"])
        .sheet(
            "Data",
            worksheet(
                r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>42</v></c><c r="C1"><v>3.25</v></c><c r="D1" t="b"><v>1</v></c></row>
<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" t="e"><v>#N/A</v></c><c r="C2" t="inlineStr"><is><t>inline</t></is></c><c r="D2" t="str"><f>"a"&amp;"b"</f><v>ab</v></c></row>"#,
                "",
            ),
        )
        .read();

    assert_eq!(value(&workbook, "A1"), CellValue::string("Name"));
    assert_eq!(value(&workbook, "B1"), CellValue::Integer(42));
    assert_eq!(value(&workbook, "C1"), CellValue::Float(3.25));
    assert_eq!(value(&workbook, "D1"), CellValue::Boolean(true));
    assert_eq!(value(&workbook, "A2"), CellValue::string("Widget"));
    assert_eq!(value(&workbook, "B2"), CellValue::Error("#N/A".into()));
    assert_eq!(value(&workbook, "C2"), CellValue::string("inline"));
    assert_eq!(value(&workbook, "D2"), CellValue::string("ab"));

    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.cell("A1").unwrap().datatype, CellType::SharedString);
    assert_eq!(sheet.cell("C2").unwrap().datatype, CellType::InlineString);
    let formula = sheet.cell("D2").unwrap().formula.as_ref().unwrap();
    assert_eq!(formula.text, r#""a"&"b""#);
    assert!(sheet.issues().is_empty());
}

#[test]
fn test_shared_formula_attributes() {
    let workbook = PackageBuilder::new()
        .sheet(
            "Sheet1",
            worksheet(
                r#"<row r="1"><c r="A1"><f t="shared" ref="A1:A3" si="0">B1*2</f><v>4</v></c></row><row r="2"><c r="A2"><f t="shared" si="0"/><v>6</v></c></row>"#,
                "",
            ),
        )
        .read();

    let sheet = workbook.worksheet(0).unwrap();
    let anchor = sheet.cell("A1").unwrap().formula.as_ref().unwrap();
    assert_eq!(anchor.kind.as_deref(), Some("shared"));
    assert_eq!(anchor.reference.as_deref(), Some("A1:A3"));
    assert_eq!(anchor.shared_index.as_deref(), Some("0"));

    // A dependent cell has no formula text of its own
    let dependent = sheet.cell("A2").unwrap();
    assert!(dependent.formula.is_none());
    assert_eq!(dependent.value, CellValue::Integer(6));
}

#[test]
fn test_implicit_positions() {
    let workbook = PackageBuilder::new()
        .sheet(
            "Sheet1",
            worksheet(
                r#"<row r="3"><c r="B3"><v>1</v></c><c><v>2</v></c></row><row><c><v>3</v></c></row>"#,
                "",
            ),
        )
        .read();

    assert_eq!(value(&workbook, "B3"), CellValue::Integer(1));
    assert_eq!(value(&workbook, "C3"), CellValue::Integer(2));
    assert_eq!(value(&workbook, "A4"), CellValue::Integer(3));
}

#[test]
fn test_shared_string_index_out_of_range() {
    let err = PackageBuilder::new()
        .shared_strings(&["only"])
        .sheet(
            "Sheet1",
            worksheet(r#"<row r="1"><c r="C1" t="s"><v>5</v></c></row>"#, ""),
        )
        .read_with(&ReadOptions::default())
        .unwrap_err();

    match err {
        XlsxError::IndexOutOfRange {
            part,
            kind,
            index,
            len,
            cell,
        } => {
            assert_eq!(part, "xl/worksheets/sheet1.xml");
            assert_eq!(kind, "shared string");
            assert_eq!((index, len), (5, 1));
            assert_eq!(cell.as_deref(), Some("C1"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_type_coercion_is_recorded() {
    let builder = PackageBuilder::new().sheet(
        "Sheet1",
        worksheet(
            r#"<row r="1"><c r="A1"><v>twelve</v></c><c r="B1"><v>12</v></c></row>"#,
            "",
        ),
    );

    let workbook = builder.read();
    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.cell("A1").unwrap().value, CellValue::Empty);
    assert_eq!(sheet.cell("B1").unwrap().value, CellValue::Integer(12));
    assert_eq!(sheet.issues().len(), 1);
    assert_eq!(sheet.issues()[0].reference, "A1");
    assert!(matches!(
        sheet.issues()[0].kind,
        DecodeIssueKind::TypeCoercion { expected: "number", .. }
    ));

    let err = builder
        .read_with(&ReadOptions::new().with_strict(true))
        .unwrap_err();
    assert!(matches!(err, XlsxError::TypeCoercion { ref cell, .. } if cell == "A1"));
}

#[test]
fn test_malformed_address_is_skipped() {
    let workbook = PackageBuilder::new()
        .sheet(
            "Sheet1",
            worksheet(
                r#"<row r="1"><c r="1A"><v>1</v></c><c r="B1"><v>2</v></c></row>"#,
                "",
            ),
        )
        .read();

    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.cells().cell_count(), 1);
    assert_eq!(sheet.issues()[0].kind, DecodeIssueKind::MalformedAddress);
    assert_eq!(sheet.issues()[0].reference, "1A");
}

#[test]
fn test_style_index_validated_against_cell_formats() {
    let ok = PackageBuilder::new()
        .sheet(
            "Sheet1",
            worksheet(r#"<row r="1"><c r="A1" s="1"><v>45000</v></c></row>"#, ""),
        )
        .read();
    assert_eq!(ok.worksheet(0).unwrap().cell("A1").unwrap().style_index, 1);

    let err = PackageBuilder::new()
        .sheet(
            "Sheet1",
            worksheet(r#"<row r="1"><c r="A1" s="9"><v>1</v></c></row>"#, ""),
        )
        .read_with(&ReadOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        XlsxError::IndexOutOfRange { kind: "cell format", index: 9, len: 2, .. }
    ));
}
