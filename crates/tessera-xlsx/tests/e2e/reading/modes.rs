//! Reduced, low-memory and concurrent reads.

use crate::{worksheet, PackageBuilder, MAIN_NS};
use tessera_core::CellValue;
use tessera_xlsx::{ReadOptions, XlsxError};

fn styled_package() -> PackageBuilder {
    let sheet = format!(
        r#"<worksheet xmlns="{}"><sheetViews><sheetView workbookViewId="0"/></sheetViews><sheetData><row r="1" s="1" ht="20"><c r="A1" s="1" t="s"><v>0</v></c><c r="B1"><f>1+1</f><v>2</v></c></row></sheetData><mergeCells count="1"><mergeCell ref="A1:B1"/></mergeCells></worksheet>"#,
        MAIN_NS
    );
    PackageBuilder::new()
        .shared_strings(&["hello"])
        .sheet("Sheet1", sheet)
        .part("docProps/core.xml", r#"<coreProperties><creator>Ada</creator></coreProperties>"#)
        .part("xl/drawings/drawing1.xml", "<wsDr/>")
}

#[test]
fn test_full_fidelity_defaults() {
    let workbook = styled_package().read();

    assert!(workbook.styles().is_some());
    assert_eq!(workbook.properties().creator.as_deref(), Some("Ada"));
    assert!(workbook.preserved().drawings.is_some());
    assert!(workbook.shared_strings().has_reverse_lookup());
    assert_eq!(workbook.shared_strings().reverse_lookup("hello"), Some(0));
    assert!(workbook.shared_strings_xml().unwrap().contains("<si><t>hello</t></si>"));

    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.cell("A1").unwrap().style_index, 1);
    assert!(!sheet.metadata().is_empty());
    assert_eq!(sheet.row_height(0), Some(20.0));
}

#[test]
fn test_data_only_skips_metadata() {
    let workbook = styled_package()
        .read_with(&ReadOptions::new().with_data_only(true))
        .unwrap();

    assert!(workbook.styles().is_none());
    assert!(workbook.properties().creator.is_none());
    assert!(workbook.properties().application.is_none());
    assert!(workbook.preserved().drawings.is_none());

    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.cell("A1").unwrap().value, CellValue::string("hello"));
    assert_eq!(sheet.cell("A1").unwrap().style_index, 0);
    assert_eq!(sheet.cell("B1").unwrap().formula.as_ref().unwrap().text, "1+1");
    assert!(sheet.metadata().is_empty());
    assert!(sheet.row_styles().is_empty());
    assert!(sheet.row_heights().is_empty());
}

#[test]
fn test_styles_part_requirement() {
    let builder = PackageBuilder::new()
        .sheet("Sheet1", worksheet(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#, ""))
        .without_styles();

    let err = builder.read_with(&ReadOptions::default()).unwrap_err();
    assert!(matches!(err, XlsxError::MissingPart(ref p) if p == "xl/styles.xml"));

    let workbook = builder
        .read_with(&ReadOptions::new().with_data_only(true))
        .unwrap();
    assert_eq!(
        workbook.worksheet(0).unwrap().cell("A1").unwrap().value,
        CellValue::Integer(1)
    );
}

#[test]
fn test_read_only_drops_write_back_data() {
    let workbook = styled_package()
        .read_with(&ReadOptions::new().with_read_only(true))
        .unwrap();

    assert!(!workbook.shared_strings().has_reverse_lookup());
    assert!(workbook.shared_strings_xml().is_none());
    assert_eq!(
        workbook.shared_strings().lookup_by_index(0).map(|s| s.as_str()),
        Some("hello")
    );
    // Metadata is still kept
    assert!(workbook.styles().is_some());
}

#[test]
fn test_parallel_preserves_sheet_order() {
    let mut builder = PackageBuilder::new().without_app();
    for i in 0..6 {
        let data = format!(r#"<row r="1"><c r="A1"><v>{}</v></c></row>"#, i);
        builder = builder.sheet(&format!("S{}", i), worksheet(&data, ""));
    }

    let sequential = builder.read();
    let parallel = builder
        .read_with(&ReadOptions::new().with_parallel(true))
        .unwrap();

    assert_eq!(sequential.sheet_names(), parallel.sheet_names());
    for (i, sheet) in parallel.worksheets().enumerate() {
        assert_eq!(sheet.name(), format!("S{}", i));
        assert_eq!(sheet.cell("A1").unwrap().value, CellValue::Integer(i as i64));
    }
}
