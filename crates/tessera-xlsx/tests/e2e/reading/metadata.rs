//! Document properties, sheet naming and preserved parts.

use crate::{worksheet, PackageBuilder};
use tessera_xlsx::XlsxError;

const CORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:creator>Ada</dc:creator><cp:lastModifiedBy>Grace</cp:lastModifiedBy><dcterms:created xsi:type="dcterms:W3CDTF">2020-01-02T03:04:05Z</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">2021-06-07T08:09:10Z</dcterms:modified></cp:coreProperties>"#;

fn empty_sheet() -> String {
    worksheet("", "")
}

#[test]
fn test_document_properties() {
    let workbook = PackageBuilder::new()
        .sheet("Sheet1", empty_sheet())
        .part("docProps/core.xml", CORE)
        .read();

    let props = workbook.properties();
    assert_eq!(props.creator.as_deref(), Some("Ada"));
    assert_eq!(props.last_modified_by.as_deref(), Some("Grace"));
    assert_eq!(props.created.as_deref(), Some("2020-01-02T03:04:05Z"));
    assert!(props.created_at().is_some());
    assert!(props.modified_at().is_some());
    assert_eq!(props.application.as_deref(), Some("Microsoft Excel"));
    assert_eq!(props.company.as_deref(), Some("Acme"));
    assert_eq!(props.app_version.as_deref(), Some("16.0300"));
}

#[test]
fn test_date_system_and_defined_names() {
    let workbook = PackageBuilder::new()
        .sheet("Sheet1", empty_sheet())
        .date1904()
        .defined_names(r#"<definedNames><definedName name="Total">Sheet1!$B$2</definedName></definedNames>"#)
        .read();

    assert!(workbook.date1904());
    let names = workbook.defined_names().unwrap();
    assert!(names.contains(r#"<definedName name="Total">Sheet1!$B$2</definedName>"#));

    let plain = PackageBuilder::new().sheet("Sheet1", empty_sheet()).read();
    assert!(!plain.date1904());
    assert!(plain.defined_names().is_none());
}

#[test]
fn test_sheet_names_come_from_titles() {
    let workbook = PackageBuilder::new()
        .sheet("one", empty_sheet())
        .sheet("two", empty_sheet())
        .app_titles(&["Revenue", "Costs", "Revenue!Print_Area"])
        .read();

    assert_eq!(workbook.sheet_names(), vec!["Revenue", "Costs"]);
    assert!(workbook.worksheet_by_name("Costs").is_some());
}

#[test]
fn test_sheet_names_without_app_part() {
    let workbook = PackageBuilder::new()
        .sheet("one", empty_sheet())
        .sheet("two", empty_sheet())
        .without_app()
        .read();

    assert_eq!(workbook.sheet_names(), vec!["one", "two"]);
    assert!(workbook.properties().application.is_none());
}

#[test]
fn test_too_few_titles() {
    let err = PackageBuilder::new()
        .sheet("one", empty_sheet())
        .sheet("two", empty_sheet())
        .app_titles(&["only"])
        .read_with(&Default::default())
        .unwrap_err();

    assert!(matches!(
        err,
        XlsxError::SheetNameMismatch {
            declared: 2,
            titles: 1
        }
    ));
}

#[test]
fn test_preserved_parts() {
    let workbook = PackageBuilder::new()
        .sheet("Sheet1", empty_sheet())
        .part("xl/externalLinks/externalLink1.xml", "<externalLink/>")
        .part("xl/externalLinks/_rels/externalLink1.xml.rels", "<Relationships/>")
        .part("xl/drawings/drawing2.xml", "<wsDr>2</wsDr>")
        .part("xl/drawings/drawing1.xml", "<wsDr>1</wsDr>")
        .part("xl/worksheets/_rels/sheet1.xml.rels", "<Relationships/>")
        .part("xl/vbaProject.bin", vec![0xD0, 0xCF, 0x11, 0xE0])
        .read();

    let preserved = workbook.preserved();

    let links = preserved.external_links.as_ref().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[&1].name, "externalLink1.xml");
    assert_eq!(links[&1].data, b"<externalLink/>");

    // Discovery order, not name order
    let drawings = preserved.drawings.as_ref().unwrap();
    assert_eq!(drawings[&1].name, "drawing2.xml");
    assert_eq!(drawings[&2].name, "drawing1.xml");

    assert_eq!(preserved.worksheet_rels.as_ref().unwrap().len(), 1);
    assert!(preserved.printer_settings.is_none());

    let macros = preserved.macros.as_ref().unwrap();
    assert_eq!(macros.name, "vbaProject.bin");
    assert_eq!(macros.data, vec![0xD0, 0xCF, 0x11, 0xE0]);
}
