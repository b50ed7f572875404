//! Common utilities for E2E tests.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use tessera_core::Workbook;
use tessera_xlsx::{ReadOptions, XlsxReader};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Styles with one font, fill and border and two cell formats
pub const DEFAULT_STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
  <fills count="1"><fill><patternFill patternType="none"/></fill></fills>
  <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="2">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
  </cellXfs>
</styleSheet>"#;

/// Wrap `<sheetData>` content (plus optional trailing blocks) in a worksheet
pub fn worksheet(sheet_data: &str, trailing: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData>{}</sheetData>{}</worksheet>"#,
        MAIN_NS, sheet_data, trailing
    )
}

/// Build a shared strings part from plain values
pub fn shared_strings(values: &[&str]) -> String {
    let items: String = values
        .iter()
        .map(|v| format!("<si><t>{}</t></si>", v))
        .collect();
    format!(
        r#"<sst xmlns="{}" count="{}" uniqueCount="{}">{}</sst>"#,
        MAIN_NS,
        values.len(),
        values.len(),
        items
    )
}

/// Builds a package in memory
///
/// Sheets are wired through workbook.xml.rels; the application part lists
/// the sheet titles unless disabled.
pub struct PackageBuilder {
    sheets: Vec<(String, String)>,
    parts: Vec<(String, Vec<u8>)>,
    styles: Option<String>,
    app_titles: Option<Vec<String>>,
    workbook_pr: String,
    defined_names: String,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            parts: Vec::new(),
            styles: Some(DEFAULT_STYLES.to_string()),
            app_titles: Some(Vec::new()),
            workbook_pr: String::new(),
            defined_names: String::new(),
        }
    }

    pub fn sheet(mut self, name: &str, xml: String) -> Self {
        self.sheets.push((name.to_string(), xml));
        self
    }

    pub fn part(mut self, name: &str, body: impl Into<Vec<u8>>) -> Self {
        self.parts.push((name.to_string(), body.into()));
        self
    }

    pub fn shared_strings(self, values: &[&str]) -> Self {
        let xml = shared_strings(values);
        self.part("xl/sharedStrings.xml", xml)
    }

    pub fn without_styles(mut self) -> Self {
        self.styles = None;
        self
    }

    pub fn without_app(mut self) -> Self {
        self.app_titles = None;
        self
    }

    /// Override the application part's title list
    pub fn app_titles(mut self, titles: &[&str]) -> Self {
        self.app_titles = Some(titles.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn date1904(mut self) -> Self {
        self.workbook_pr = r#"<workbookPr date1904="1"/>"#.to_string();
        self
    }

    pub fn defined_names(mut self, xml: &str) -> Self {
        self.defined_names = xml.to_string();
        self
    }

    fn entries(&self) -> Vec<(String, Vec<u8>)> {
        let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
        let mut add = |name: &str, body: String| entries.push((name.to_string(), body.into_bytes()));

        add(
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#.to_string(),
        );
        add(
            "_rels/.rels",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
        );

        let sheet_elems: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    name,
                    i + 1,
                    i + 1
                )
            })
            .collect();
        add(
            "xl/workbook.xml",
            format!(
                r#"<workbook xmlns="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}<sheets>{}</sheets>{}</workbook>"#,
                MAIN_NS, self.workbook_pr, sheet_elems, self.defined_names
            ),
        );

        let rels: String = (1..=self.sheets.len())
            .map(|i| {
                format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    i, i
                )
            })
            .collect();
        add(
            "xl/_rels/workbook.xml.rels",
            format!(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                rels
            ),
        );

        if let Some(titles) = &self.app_titles {
            let titles: Vec<String> = if titles.is_empty() {
                self.sheets.iter().map(|(n, _)| n.clone()).collect()
            } else {
                titles.clone()
            };
            let lpstrs: String = titles
                .iter()
                .map(|t| format!("<vt:lpstr>{}</vt:lpstr>", t))
                .collect();
            add(
                "docProps/app.xml",
                format!(
                    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>Microsoft Excel</Application><TitlesOfParts><vt:vector size="{}" baseType="lpstr">{}</vt:vector></TitlesOfParts><Company>Acme</Company><AppVersion>16.0300</AppVersion></Properties>"#,
                    titles.len(),
                    lpstrs
                ),
            );
        }

        if let Some(styles) = &self.styles {
            add("xl/styles.xml", styles.clone());
        }

        for (i, (_, xml)) in self.sheets.iter().enumerate() {
            add(&format!("xl/worksheets/sheet{}.xml", i + 1), xml.clone());
        }

        entries.extend(self.parts.iter().cloned());
        entries
    }

    /// Zip the package into memory
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            for (name, body) in self.entries() {
                zip.start_file(name, options).unwrap();
                zip.write_all(&body).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    /// Write the package's parts under `dir` as an extracted package
    pub fn extract_to(&self, dir: &Path) {
        for (name, body) in self.entries() {
            let path = name.split('/').fold(dir.to_path_buf(), |p, s| p.join(s));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, body).unwrap();
        }
    }

    pub fn read(&self) -> Workbook {
        XlsxReader::read(Cursor::new(self.build())).unwrap()
    }

    pub fn read_with(&self, options: &ReadOptions) -> tessera_xlsx::XlsxResult<Workbook> {
        XlsxReader::read_with(Cursor::new(self.build()), options)
    }
}
