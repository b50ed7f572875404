//! Read options

/// Options for reading XLSX packages
///
/// The two mode flags are independent: `data_only` skips metadata, while
/// `read_only` skips data kept only for writing the workbook back out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Decode cell values, types and formulas only (default: false)
    ///
    /// Skips document properties, styles, preserved parts, row styles and
    /// heights, cell style indices and worksheet metadata blocks.
    pub data_only: bool,
    /// Drop write-back data (default: false)
    ///
    /// The shared string table is built without a reverse index and the
    /// serialized shared-strings part is not retained.
    pub read_only: bool,
    /// Fail on content that does not match its declared type (default: false)
    ///
    /// Otherwise the field is left empty and the problem is recorded on the
    /// worksheet.
    pub strict: bool,
    /// Decode worksheets concurrently (default: false)
    ///
    /// Only takes effect when built with the `parallel` feature.
    pub parallel: bool,
}

impl ReadOptions {
    /// Full-fidelity defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set reduced ("data-only") mode
    pub fn with_data_only(mut self, data_only: bool) -> Self {
        self.data_only = data_only;
        self
    }

    /// Set low-memory ("read-only") mode
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set strict type coercion
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set concurrent worksheet decoding
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether metadata should be captured
    pub fn full_fidelity(&self) -> bool {
        !self.data_only
    }
}
