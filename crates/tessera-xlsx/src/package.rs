//! Package access
//!
//! A package is a set of named parts. It is usually a zip container, but an
//! already-extracted directory with the same layout works as well.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use log::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};

/// File extensions accepted by [`check_extension`]
pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xltx", "xltm"];

/// Reject paths that do not name a spreadsheet package
///
/// Runs before any I/O. The comparison ignores ASCII case.
pub fn check_extension(path: &Path) -> XlsxResult<()> {
    let accepted = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });

    if accepted {
        Ok(())
    } else {
        Err(XlsxError::FormatRejected {
            path: path.display().to_string(),
        })
    }
}

/// Named-part access shared by the zip and directory backends
pub trait Package {
    /// Short description for log messages
    fn describe(&self) -> String;

    /// Check whether a part exists
    fn contains(&self, name: &str) -> bool;

    /// Open a part for streaming; `Ok(None)` when it does not exist
    fn open_part(&mut self, name: &str) -> XlsxResult<Option<Box<dyn Read + '_>>>;

    /// Files directly inside `dir`, in discovery order
    ///
    /// Subdirectories and `.DS_Store` files are left out. Returns `None` when
    /// the directory does not exist at all.
    fn list_collection(&self, dir: &str) -> Option<Vec<String>>;

    /// Read a whole part into memory; `Ok(None)` when it does not exist
    fn read_part(&mut self, name: &str) -> XlsxResult<Option<Vec<u8>>> {
        match self.open_part(name)? {
            Some(mut part) => {
                let mut data = Vec::new();
                part.read_to_end(&mut data)?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Read a part that must exist
    fn require_part(&mut self, name: &str) -> XlsxResult<Vec<u8>> {
        self.read_part(name)?
            .ok_or_else(|| XlsxError::MissingPart(name.to_string()))
    }
}

/// A zip container
pub struct ZipPackage<R: Read + Seek> {
    archive: ZipArchive<R>,
    names: Vec<String>,
}

impl<R: Read + Seek> ZipPackage<R> {
    /// Open a zip container
    pub fn new(reader: R) -> XlsxResult<Self> {
        let archive = ZipArchive::new(reader)?;
        let names = archive.file_names().map(str::to_string).collect();
        Ok(Self { archive, names })
    }
}

impl ZipPackage<BufReader<File>> {
    /// Open a zip container from disk
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> Package for ZipPackage<R> {
    fn describe(&self) -> String {
        format!("zip package ({} entries)", self.names.len())
    }

    fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn open_part(&mut self, name: &str) -> XlsxResult<Option<Box<dyn Read + '_>>> {
        match self.archive.by_name(name) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_collection(&self, dir: &str) -> Option<Vec<String>> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let mut seen_dir = false;
        let mut files = Vec::new();

        for name in &self.names {
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            seen_dir = true;
            if rest.is_empty() || rest.contains('/') || rest == ".DS_Store" {
                continue;
            }
            files.push(name.clone());
        }

        seen_dir.then_some(files)
    }
}

/// An extracted package directory
pub struct DirPackage {
    root: PathBuf,
}

impl DirPackage {
    /// Use `root` as the package root
    pub fn new<P: Into<PathBuf>>(root: P) -> XlsxResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(XlsxError::InvalidFormat(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    fn path_of(&self, name: &str) -> PathBuf {
        name.split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl Package for DirPackage {
    fn describe(&self) -> String {
        format!("directory package at {}", self.root.display())
    }

    fn contains(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    fn open_part(&mut self, name: &str) -> XlsxResult<Option<Box<dyn Read + '_>>> {
        match File::open(self.path_of(name)) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_collection(&self, dir: &str) -> Option<Vec<String>> {
        let entries = match fs::read_dir(self.path_of(dir)) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("collection {} not readable: {}", dir, e);
                return None;
            }
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().map_or(false, |t| t.is_file()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name != ".DS_Store")
            .collect();
        // read_dir order is platform dependent
        names.sort();

        let dir = dir.trim_end_matches('/');
        Some(names.into_iter().map(|n| format!("{}/{}", dir, n)).collect())
    }
}
