//! Worksheet metadata blocks, row attributes and merged ranges.

use crate::{PackageBuilder, MAIN_NS};
use tessera_core::{CellAddress, CellRange, RowStyle};

fn full_sheet() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <dimension ref="A1:C3"/>
  <sheetViews>
    <sheetView tabSelected="1" workbookViewId="0">
      <pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>
    </sheetView>
  </sheetViews>
  <sheetFormatPr defaultRowHeight="15"/>
  <cols><col min="1" max="1" width="24.5" customWidth="1"/></cols>
  <sheetData>
    <row r="1" s="1" customFormat="1" ht="30" customHeight="1"><c r="A1"><v>1</v></c></row>
    <row r="2"><c r="A2"><v>2</v></c></row>
    <row r="3" ht=""/>
  </sheetData>
  <mergeCells count="2"><mergeCell ref="A1:C1"/><mergeCell ref="B2:C3"/></mergeCells>
  <conditionalFormatting sqref="A1:A3"><cfRule type="cellIs" priority="1" operator="greaterThan"><formula>1</formula></cfRule></conditionalFormatting>
  <dataValidations count="1"><dataValidation type="list" sqref="A2"><formula1>"Yes,No"</formula1></dataValidation></dataValidations>
  <pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>
  <legacyDrawing r:id="rId1"/>
  <extLst><ext uri="{{CCE6A557-97BC-4b89-ADB6-D9C93CAAB3DF}}"><x14:dataValidations xmlns:x14="urn:x14" count="0"/></ext></extLst>
</worksheet>"#,
        MAIN_NS
    )
}

#[test]
fn test_metadata_blocks_are_captured() {
    let workbook = PackageBuilder::new().sheet("Sheet1", full_sheet()).read();
    let sheet = workbook.worksheet(0).unwrap();
    let meta = sheet.metadata();

    let pane = meta.pane.as_ref().unwrap();
    assert_eq!(pane.attr("state"), Some("frozen"));
    assert_eq!(pane.attr("topLeftCell"), Some("A2"));
    assert!(meta.sheet_views.is_some());

    let col = meta.cols.as_ref().and_then(|c| c.child("col")).unwrap();
    assert_eq!(col.attr("width"), Some("24.5"));

    let validation = meta
        .data_validations
        .as_ref()
        .and_then(|d| d.child("dataValidation"))
        .unwrap();
    assert_eq!(validation.attr("sqref"), Some("A2"));
    assert_eq!(
        validation.child("formula1").and_then(|f| f.text.as_deref()),
        Some("\"Yes,No\"")
    );

    assert_eq!(
        meta.legacy_drawing.as_ref().and_then(|d| d.attr("id")),
        Some("rId1")
    );
    assert!(meta.ext_lst.as_ref().and_then(|e| e.child("ext")).is_some());

    // Values after skipped blocks still decode
    assert_eq!(sheet.cells().cell_count(), 2);
}

#[test]
fn test_merged_ranges() {
    let workbook = PackageBuilder::new().sheet("Sheet1", full_sheet()).read();
    let ranges = workbook.worksheet(0).unwrap().merged_ranges();

    assert_eq!(
        ranges,
        vec![
            CellRange::new(CellAddress::new(0, 0), CellAddress::new(0, 2)),
            CellRange::new(CellAddress::new(1, 1), CellAddress::new(2, 2)),
        ]
    );
    assert_eq!(ranges[1].to_a1_string(), "B2:C3");
}

#[test]
fn test_row_styles_and_heights() {
    let workbook = PackageBuilder::new().sheet("Sheet1", full_sheet()).read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.row_style(0), Some(RowStyle { style: 1 }));
    assert_eq!(sheet.row_style(1), Some(RowStyle { style: 0 }));
    assert_eq!(sheet.row_height(0), Some(30.0));
    // Blank heights are not recorded
    assert_eq!(sheet.row_height(1), None);
    assert_eq!(sheet.row_height(2), None);
    assert_eq!(sheet.row_heights().len(), 1);
}

#[test]
fn test_empty_blocks_are_not_kept() {
    let xml = format!(
        r#"<worksheet xmlns="{}"><sheetViews/><sheetData/><mergeCells count="0"/></worksheet>"#,
        MAIN_NS
    );
    let workbook = PackageBuilder::new().sheet("Sheet1", xml).read();
    let sheet = workbook.worksheet(0).unwrap();
    assert!(sheet.metadata().is_empty());
    assert!(sheet.merged_ranges().is_empty());
    assert!(sheet.cells().is_empty());
}
