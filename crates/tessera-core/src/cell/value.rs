//! Cell value types

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Represents the decoded value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// No value (the cell exists but its value element was absent or empty)
    #[default]
    Empty,

    /// Numeric content written without a decimal point
    Integer(i64),

    /// Numeric content written with a decimal point or exponent
    Float(f64),

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Text, either from the shared string table or stored in the cell
    String(SharedString),

    /// Error code text (#VALUE!, #REF!, etc.), kept verbatim
    Error(String),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        CellValue::String(SharedString::new(s))
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Integer(n) => Some(*n as f64),
            CellValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as an integer (no conversion from floats)
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as text
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Boolean(_) => "boolean",
            CellValue::String(_) => "string",
            CellValue::Error(_) => "error",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::String(s) => write!(f, "{}", s.as_str()),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

/// The declared type of a cell (the `t` attribute)
///
/// Numeric cells carry no type tag; anything unrecognised is decoded the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    /// No tag: numeric content or nothing at all
    #[default]
    Numeric,
    /// `s`: index into the shared string table
    SharedString,
    /// `inlineStr`: text stored in an `<is>` child
    InlineString,
    /// `str`: formula result text stored in the cell
    RawString,
    /// `e`: error code
    Error,
    /// `b`: boolean
    Boolean,
}

impl CellType {
    /// Map a `t` attribute to a cell type
    pub fn from_attr(tag: Option<&str>) -> Self {
        match tag {
            Some("s") => CellType::SharedString,
            Some("inlineStr") => CellType::InlineString,
            Some("str") => CellType::RawString,
            Some("e") => CellType::Error,
            Some("b") => CellType::Boolean,
            _ => CellType::Numeric,
        }
    }

    /// The `t` attribute for this type (`None` for numeric cells)
    pub fn as_attr(&self) -> Option<&'static str> {
        match self {
            CellType::Numeric => None,
            CellType::SharedString => Some("s"),
            CellType::InlineString => Some("inlineStr"),
            CellType::RawString => Some("str"),
            CellType::Error => Some("e"),
            CellType::Boolean => Some("b"),
        }
    }
}

/// A cell formula and its attributes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formula {
    /// Formula text without a leading `=`
    pub text: String,
    /// `t` attribute (`shared`, `array`, ...)
    pub kind: Option<String>,
    /// `ref` attribute: the range a shared or array formula covers
    pub reference: Option<String>,
    /// `si` attribute: shared formula group id
    pub shared_index: Option<String>,
}

impl Formula {
    /// Create a plain formula with no attributes
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A single decoded cell
///
/// The position is fixed at creation; [`SheetData`](super::SheetData) keeps
/// it equal to the grid address the cell is stored under.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub(crate) row: u32,
    pub(crate) col: u32,
    /// Decoded value
    pub value: CellValue,
    /// Declared (or reclassified) type
    pub datatype: CellType,
    /// Formula, if the cell has a non-empty one
    pub formula: Option<Formula>,
    /// Raw index into the cell-format list (0 = default)
    pub style_index: u32,
}

impl Cell {
    /// Create an empty cell at a position
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            ..Default::default()
        }
    }

    /// Create a cell holding a value
    pub fn with_value<V: Into<CellValue>>(row: u32, col: u32, value: V) -> Self {
        Self {
            value: value.into(),
            ..Self::new(row, col)
        }
    }

    /// Row index (0-based)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column index (0-based)
    pub fn col(&self) -> u32 {
        self.col
    }

    /// The cell's position as an address
    pub fn address(&self) -> super::CellAddress {
        super::CellAddress::new(self.row, self.col)
    }
}

/// Interned string for memory efficiency
///
/// Shared string table entries are referenced by many cells; using `Arc<str>`
/// lets every cell share the table's copy.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SharedString(Arc<str>);

impl SharedString {
    /// Create a new shared string
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        SharedString(Arc::from(s.as_ref()))
    }

    /// Get the string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the length of the string
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SharedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SharedString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SharedString {
    fn from(s: &str) -> Self {
        SharedString::new(s)
    }
}

impl From<String> for SharedString {
    fn from(s: String) -> Self {
        SharedString(Arc::from(s))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SharedString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SharedString {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(SharedString::from)
    }
}
