//! XLSX reader
//!
//! [`XlsxReader`] drives the part readers in dependency order: the workbook
//! part, the property parts, styles, shared strings, then every worksheet.
//! Worksheets only depend on the finalized shared string table and the size
//! of the cell-format list, so they can be decoded independently.

mod shared_strings;
mod workbook;
mod worksheet;

use std::collections::BTreeMap;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::time::Instant;

use ahash::AHashMap;
use log::{debug, warn};
use tessera_core::{PreservedPart, SharedStringTable, Workbook, Worksheet};

use crate::error::{XlsxError, XlsxResult};
use crate::options::ReadOptions;
use crate::package::{check_extension, DirPackage, Package, ZipPackage};
use crate::styles::read_styles;

pub use shared_strings::read_shared_strings;
pub use workbook::{
    read_app_xml, read_core_xml, read_workbook_rels, read_workbook_xml, AppProperties, SheetEntry,
    WorkbookInfo,
};
pub use worksheet::{decode_worksheet, SheetContext};

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const APP_PART: &str = "docProps/app.xml";
const CORE_PART: &str = "docProps/core.xml";
const STYLES_PART: &str = "xl/styles.xml";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const MACROS_PART: &str = "xl/vbaProject.bin";

/// A worksheet to decode: display name and part name
#[derive(Debug, Clone)]
struct SheetJob {
    name: String,
    part: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path with default options
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        Self::read_file_with(path, &ReadOptions::default())
    }

    /// Read a workbook from a file path
    ///
    /// The extension is checked before the file is opened.
    pub fn read_file_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        check_extension(path)?;

        let mut package = ZipPackage::open(path)?;
        let mut workbook = Self::read_package(&mut package, options)?;
        workbook.set_source_path(path);
        Ok(workbook)
    }

    /// Read a workbook from a reader with default options
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        Self::read_with(reader, &ReadOptions::default())
    }

    /// Read a workbook from a reader
    pub fn read_with<R: Read + Seek>(reader: R, options: &ReadOptions) -> XlsxResult<Workbook> {
        let mut package = ZipPackage::new(reader)?;
        Self::read_package(&mut package, options)
    }

    /// Read an already-extracted package directory
    pub fn read_dir<P: AsRef<Path>>(path: P, options: &ReadOptions) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        let mut package = DirPackage::new(path)?;
        let mut workbook = Self::read_package(&mut package, options)?;
        workbook.set_source_path(path);
        Ok(workbook)
    }

    /// Read a workbook from any package backend
    pub fn read_package<P: Package + ?Sized>(
        package: &mut P,
        options: &ReadOptions,
    ) -> XlsxResult<Workbook> {
        let started = Instant::now();
        debug!("reading {}", package.describe());

        if !package.contains(CONTENT_TYPES_PART) {
            return Err(XlsxError::InvalidFormat(format!(
                "Missing {}",
                CONTENT_TYPES_PART
            )));
        }

        let mut workbook = Workbook::new();

        debug!("parsing {}", WORKBOOK_PART);
        let info = read_workbook_xml(&package.require_part(WORKBOOK_PART)?[..], WORKBOOK_PART)?;
        workbook.set_date1904(info.date1904);
        workbook.set_defined_names(info.defined_names.clone());

        let rels = match package.read_part(WORKBOOK_RELS_PART)? {
            Some(data) => read_workbook_rels(&data[..], WORKBOOK_RELS_PART)?,
            None => {
                debug!("{} not present", WORKBOOK_RELS_PART);
                AHashMap::new()
            }
        };

        // Sheet titles are needed even when properties are not kept
        let app = match package.read_part(APP_PART)? {
            Some(data) => {
                debug!("parsing {}", APP_PART);
                Some(read_app_xml(&data[..], APP_PART)?)
            }
            None => {
                debug!("{} not present", APP_PART);
                None
            }
        };

        if options.full_fidelity() {
            Self::read_properties(package, app.as_ref(), &mut workbook)?;

            debug!("parsing {}", STYLES_PART);
            let styles = read_styles(&package.require_part(STYLES_PART)?[..], STYLES_PART)?;
            workbook.set_styles(Some(styles));
        }

        let (shared_strings, shared_strings_xml) = Self::load_shared_strings(package, options)?;

        let jobs = Self::plan_sheets(&info, app.as_ref(), &rels)?;
        let cell_format_count = workbook.styles().map(|s| s.cell_format_count());

        let sheets_started = Instant::now();
        let sheets = if options.parallel {
            decode_parallel(package, &jobs, &shared_strings, cell_format_count, options)?
        } else {
            decode_sequential(package, &jobs, &shared_strings, cell_format_count, options)?
        };
        debug!(
            "decoded {} worksheets in {:?}",
            sheets.len(),
            sheets_started.elapsed()
        );

        for sheet in sheets {
            workbook.add_worksheet(sheet);
        }
        workbook.set_shared_strings(shared_strings);
        workbook.set_shared_strings_xml(shared_strings_xml);

        if options.full_fidelity() {
            Self::read_preserved(package, &mut workbook)?;
        }

        debug!("workbook read in {:?}", started.elapsed());
        Ok(workbook)
    }

    fn read_properties<P: Package + ?Sized>(
        package: &mut P,
        app: Option<&AppProperties>,
        workbook: &mut Workbook,
    ) -> XlsxResult<()> {
        if let Some(app) = app {
            let props = workbook.properties_mut();
            props.application = app.application.clone();
            props.company = app.company.clone();
            props.app_version = app.app_version.clone();
        }

        match package.read_part(CORE_PART)? {
            Some(data) => {
                debug!("parsing {}", CORE_PART);
                read_core_xml(&data[..], CORE_PART, workbook.properties_mut())?;
            }
            None => debug!("{} not present", CORE_PART),
        }
        Ok(())
    }

    fn load_shared_strings<P: Package + ?Sized>(
        package: &mut P,
        options: &ReadOptions,
    ) -> XlsxResult<(SharedStringTable, Option<String>)> {
        let started = Instant::now();

        if options.read_only {
            let table = match package.open_part(SHARED_STRINGS_PART)? {
                Some(input) => {
                    debug!("processing shared strings");
                    read_shared_strings(BufReader::new(input), SHARED_STRINGS_PART, true)?
                }
                None => {
                    debug!("{} not present", SHARED_STRINGS_PART);
                    SharedStringTable::forward_only()
                }
            };
            debug!("{} shared strings in {:?}", table.len(), started.elapsed());
            return Ok((table, None));
        }

        let Some(data) = package.read_part(SHARED_STRINGS_PART)? else {
            debug!("{} not present", SHARED_STRINGS_PART);
            return Ok((SharedStringTable::new(), None));
        };

        debug!("processing shared strings");
        let table = read_shared_strings(&data[..], SHARED_STRINGS_PART, false)?;
        let xml = match String::from_utf8(data) {
            Ok(xml) => Some(xml),
            Err(_) => {
                warn!("{} is not UTF-8; raw XML not retained", SHARED_STRINGS_PART);
                None
            }
        };
        debug!("{} shared strings in {:?}", table.len(), started.elapsed());
        Ok((table, xml))
    }

    /// Pair every declared sheet with its name and part
    fn plan_sheets(
        info: &WorkbookInfo,
        app: Option<&AppProperties>,
        rels: &AHashMap<String, String>,
    ) -> XlsxResult<Vec<SheetJob>> {
        let declared = info.sheets.len();
        let names: Vec<String> = match app {
            Some(app) if app.titles.len() < declared => {
                return Err(XlsxError::SheetNameMismatch {
                    declared,
                    titles: app.titles.len(),
                })
            }
            Some(app) => app.titles[..declared].to_vec(),
            None => info.sheets.iter().map(|s| s.name.clone()).collect(),
        };

        let jobs = info
            .sheets
            .iter()
            .zip(names)
            .enumerate()
            .map(|(idx, (sheet, name))| {
                let part = sheet
                    .rel_id
                    .as_ref()
                    .and_then(|id| rels.get(id))
                    .cloned()
                    .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", idx + 1));
                SheetJob { name, part }
            })
            .collect();
        Ok(jobs)
    }

    fn read_preserved<P: Package + ?Sized>(
        package: &mut P,
        workbook: &mut Workbook,
    ) -> XlsxResult<()> {
        let external_links = read_collection(package, "xl/externalLinks")?;
        let drawings = read_collection(package, "xl/drawings")?;
        let printer_settings = read_collection(package, "xl/printerSettings")?;
        let worksheet_rels = read_collection(package, "xl/worksheets/_rels")?;
        let macros = package.read_part(MACROS_PART)?.map(|data| PreservedPart {
            name: file_name(MACROS_PART).to_string(),
            data,
        });

        let preserved = workbook.preserved_mut();
        preserved.external_links = external_links;
        preserved.drawings = drawings;
        preserved.printer_settings = printer_settings;
        preserved.worksheet_rels = worksheet_rels;
        preserved.macros = macros;
        Ok(())
    }
}

fn decode_sequential<P: Package + ?Sized>(
    package: &mut P,
    jobs: &[SheetJob],
    shared_strings: &SharedStringTable,
    cell_format_count: Option<usize>,
    options: &ReadOptions,
) -> XlsxResult<Vec<Worksheet>> {
    let mut sheets = Vec::with_capacity(jobs.len());
    for job in jobs {
        let started = Instant::now();
        let input = package
            .open_part(&job.part)?
            .ok_or_else(|| XlsxError::MissingPart(job.part.clone()))?;
        let ctx = SheetContext {
            part: &job.part,
            shared_strings,
            cell_format_count,
            options,
        };
        let sheet = decode_worksheet(BufReader::new(input), &job.name, &ctx)?;
        debug!(
            "{} ({}): {} cells in {:?}",
            job.part,
            job.name,
            sheet.cells().cell_count(),
            started.elapsed()
        );
        sheets.push(sheet);
    }
    Ok(sheets)
}

/// Read every worksheet part, then decode them on the rayon pool
///
/// Results come back in declared order.
#[cfg(feature = "parallel")]
fn decode_parallel<P: Package + ?Sized>(
    package: &mut P,
    jobs: &[SheetJob],
    shared_strings: &SharedStringTable,
    cell_format_count: Option<usize>,
    options: &ReadOptions,
) -> XlsxResult<Vec<Worksheet>> {
    use rayon::prelude::*;

    let mut parts = Vec::with_capacity(jobs.len());
    for job in jobs {
        parts.push(package.require_part(&job.part)?);
    }

    jobs.par_iter()
        .zip(parts.par_iter())
        .map(|(job, data)| {
            let ctx = SheetContext {
                part: &job.part,
                shared_strings,
                cell_format_count,
                options,
            };
            decode_worksheet(&data[..], &job.name, &ctx)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn decode_parallel<P: Package + ?Sized>(
    package: &mut P,
    jobs: &[SheetJob],
    shared_strings: &SharedStringTable,
    cell_format_count: Option<usize>,
    options: &ReadOptions,
) -> XlsxResult<Vec<Worksheet>> {
    debug!("built without the parallel feature; decoding worksheets sequentially");
    decode_sequential(package, jobs, shared_strings, cell_format_count, options)
}

/// Every file of a collection, keyed from 1 in discovery order
fn read_collection<P: Package + ?Sized>(
    package: &mut P,
    dir: &str,
) -> XlsxResult<Option<BTreeMap<u32, PreservedPart>>> {
    let Some(names) = package.list_collection(dir) else {
        debug!("{} not present", dir);
        return Ok(None);
    };

    let mut parts = BTreeMap::new();
    for (idx, name) in names.iter().enumerate() {
        let data = package.require_part(name)?;
        parts.insert(
            idx as u32 + 1,
            PreservedPart {
                name: file_name(name).to_string(),
                data,
            },
        );
    }
    Ok(Some(parts))
}

fn file_name(part: &str) -> &str {
    part.rsplit('/').next().unwrap_or(part)
}
