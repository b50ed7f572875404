//! Tessera CLI - spreadsheet inspection tool

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tessera::prelude::*;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(author, version, about = "Spreadsheet package inspection tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document properties and per-sheet counts
    Info {
        /// Input spreadsheet file (xlsx, xlsm, xltx, xltm)
        input: PathBuf,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input spreadsheet file
        input: PathBuf,
    },

    /// Dump one sheet's populated cells, row by row
    Cells {
        /// Input spreadsheet file
        input: PathBuf,

        /// Sheet index (0-based) or name
        #[arg(short, long, default_value = "0")]
        sheet: String,

        /// Print formulas next to cached values
        #[arg(short, long)]
        formulas: bool,

        #[command(flatten)]
        read: ReadArgs,
    },
}

#[derive(Args)]
struct ReadArgs {
    /// Skip styles, properties and sheet metadata
    #[arg(long)]
    data_only: bool,

    /// Drop data only needed to write the workbook back out
    #[arg(long)]
    read_only: bool,

    /// Fail on cell content that does not match its declared type
    #[arg(long)]
    strict: bool,

    /// Decode worksheets concurrently
    #[arg(long)]
    parallel: bool,
}

impl ReadArgs {
    fn options(&self) -> ReadOptions {
        ReadOptions::new()
            .with_data_only(self.data_only)
            .with_read_only(self.read_only)
            .with_strict(self.strict)
            .with_parallel(self.parallel)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, read } => show_info(&input, &read.options()),
        Commands::Sheets { input } => list_sheets(&input),
        Commands::Cells {
            input,
            sheet,
            formulas,
            read,
        } => dump_cells(&input, &sheet, formulas, &read.options()),
    }
}

fn open(input: &Path, options: &ReadOptions) -> Result<Workbook> {
    Workbook::open_with(input, options)
        .with_context(|| format!("Failed to open '{}'", input.display()))
}

fn show_info(input: &Path, options: &ReadOptions) -> Result<()> {
    let workbook = open(input, options)?;
    let props = workbook.properties();

    println!("File: {}", input.display());
    for (label, value) in [
        ("Creator", &props.creator),
        ("Last modified by", &props.last_modified_by),
        ("Created", &props.created),
        ("Modified", &props.modified),
        ("Application", &props.application),
        ("Company", &props.company),
    ] {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }
    println!(
        "Date system: {}",
        if workbook.date1904() { "1904" } else { "1900" }
    );
    println!("Shared strings: {}", workbook.shared_strings().len());
    if let Some(styles) = workbook.styles() {
        println!(
            "Styles: {} fonts, {} fills, {} borders, {} cell formats",
            styles.fonts.len(),
            styles.fills.len(),
            styles.borders.len(),
            styles.cell_format_count()
        );
    }
    println!("Sheets: {}", workbook.sheet_count());

    for (i, sheet) in workbook.worksheets().enumerate() {
        let formula_count = sheet.cells().iter().filter(|c| c.formula.is_some()).count();

        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name());
        match sheet.used_range() {
            Some(range) => println!(
                "    Used range: {} ({} rows x {} columns)",
                range.to_a1_string(),
                range.row_count(),
                range.col_count()
            ),
            None => println!("    Used range: empty"),
        }
        println!("    Cells: {}", sheet.cells().cell_count());
        println!("    Formulas: {}", formula_count);
        if !sheet.merged_ranges().is_empty() {
            println!("    Merged ranges: {}", sheet.merged_ranges().len());
        }
        if !sheet.issues().is_empty() {
            println!("    Decode issues: {}", sheet.issues().len());
        }
    }

    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook = open(input, &ReadOptions::new().with_data_only(true))?;

    for (i, name) in workbook.sheet_names().iter().enumerate() {
        println!("{}\t{}", i, name);
    }

    Ok(())
}

fn dump_cells(input: &Path, selector: &str, formulas: bool, options: &ReadOptions) -> Result<()> {
    let workbook = open(input, options)?;
    let sheet = select_sheet(&workbook, selector)
        .with_context(|| format!("Sheet '{}' not found", selector))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for cell in sheet.cells().iter().filter(|c| !c.value.is_empty() || c.formula.is_some()) {
        let mut line = format!(
            "{}\t{}\t{}",
            cell.address().to_a1_string(),
            cell.value.type_name(),
            escape_field(&cell.value.to_string())
        );
        if formulas {
            if let Some(formula) = &cell.formula {
                line.push_str("\t=");
                line.push_str(&escape_field(&formula.text));
            }
        }
        writeln!(out, "{}", line).context("Failed to write to stdout")?;
    }
    for issue in sheet.issues() {
        eprintln!("warning: {}", issue);
    }
    out.flush().context("Failed to write to stdout")?;

    Ok(())
}

/// Resolve a sheet by 0-based index, falling back to its name
fn select_sheet<'a>(workbook: &'a Workbook, selector: &str) -> Option<&'a Worksheet> {
    selector
        .parse::<usize>()
        .ok()
        .and_then(|i| workbook.worksheet(i))
        .or_else(|| workbook.worksheet_by_name(selector))
}

/// Keep one cell per line
fn escape_field(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}
