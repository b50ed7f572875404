//! Cell address and range types

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;

use crate::error::{Error, Result};

/// A zero-based cell address decoded from an A1-style label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in labels)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., Z=25, AA=26)
    pub col: u32,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Decode a label of the form `[A-Z]+[0-9]+`.
    ///
    /// Returns `None` for anything else, including lowercase letters, `$`
    /// markers, a missing part, or row `0`. Callers treat `None` as "not a
    /// valid cell reference".
    ///
    /// # Examples
    /// ```
    /// use tessera_core::CellAddress;
    ///
    /// assert_eq!(CellAddress::decode("A1"), Some(CellAddress::new(0, 0)));
    /// assert_eq!(CellAddress::decode("AB1"), Some(CellAddress::new(0, 27)));
    /// assert_eq!(CellAddress::decode("1A"), None);
    /// ```
    pub fn decode(label: &str) -> Option<Self> {
        let (letters, digits) = split_label(label)?;
        Some(Self {
            row: parse_row(digits)?,
            col: letters_to_column(letters)?,
        })
    }

    /// Parse a label, tolerating surrounding whitespace and absolute (`$`) markers.
    pub fn parse(s: &str) -> Result<Self> {
        let plain: String = s.trim().chars().filter(|&c| c != '$').collect();
        Self::decode(&plain).ok_or_else(|| Error::InvalidAddress(s.to_string()))
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1;

        while n > 0 {
            n -= 1;
            result.insert(0, ((n % 26) as u8 + b'A') as char);
            n /= 26;
        }

        result
    }

    /// Format as an A1-style label
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row as u64 + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Split a label into its column letters and row digits.
fn split_label(label: &str) -> Option<(&str, &str)> {
    let split = label
        .bytes()
        .position(|b| !b.is_ascii_uppercase())
        .unwrap_or(label.len());
    let (letters, digits) = label.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((letters, digits))
}

/// Base-26 without a zero digit: A=1..Z=26, summed from the rightmost letter.
fn letters_to_column(letters: &str) -> Option<u32> {
    let mut col: u64 = 0;
    let mut weight: u64 = 1;

    for b in letters.bytes().rev() {
        let digit = (b - b'A' + 1) as u64;
        col = col.checked_add(digit.checked_mul(weight)?)?;
        weight = weight.saturating_mul(26);
    }

    u32::try_from(col - 1).ok()
}

fn parse_row(digits: &str) -> Option<u32> {
    let row: u64 = digits.parse().ok()?;
    u32::try_from(row.checked_sub(1)?).ok()
}

/// Memoizing label decoder.
///
/// Worksheets reuse a handful of column prefixes thousands of times, so the
/// letters-to-index conversion is cached per prefix. The mapping depends only
/// on the alphabet, so one codec can be reused across documents; results are
/// identical to [`CellAddress::decode`].
#[derive(Debug, Default)]
pub struct AddressCodec {
    columns: AHashMap<Box<str>, u32>,
}

impl AddressCodec {
    /// Create a codec with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a label, consulting the column cache first
    pub fn decode(&mut self, label: &str) -> Option<CellAddress> {
        let (letters, digits) = split_label(label)?;
        let row = parse_row(digits)?;

        let col = match self.columns.get(letters) {
            Some(&col) => col,
            None => {
                let col = letters_to_column(letters)?;
                self.columns.insert(letters.into(), col);
                col
            }
        };

        Some(CellAddress { row, col })
    }

    /// Number of distinct column prefixes seen so far
    pub fn cached_columns(&self) -> usize {
        self.columns.len()
    }
}

/// A range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range, normalized so `start` is the top-left corner
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self {
            start: CellAddress::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellAddress::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let range = match s.split_once(':') {
            Some((start, end)) => Self::new(CellAddress::parse(start)?, CellAddress::parse(end)?),
            None => Self::single(CellAddress::parse(s)?),
        };
        Ok(range)
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
