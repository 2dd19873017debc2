//! Resolver configuration.
//!
//! The tunables that control cross-reference resolution. Historically these
//! were process-wide settings in similar parsers; here they are explicit
//! fields passed to [`crate::xref::XrefTable::with_config`] so that two
//! documents in one process can use different settings.

/// Configuration for cross-reference resolution.
///
/// # Example
///
/// ```
/// use pdf_xref::config::XrefConfig;
///
/// // Defaults: lazy per-row decoding, 5500 byte trailer window
/// let config = XrefConfig::default();
/// assert!(config.read_on_access);
///
/// // Eager mode decodes every classic table row up front
/// let eager = XrefConfig::eager();
/// assert!(!eager.read_on_access);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct XrefConfig {
    /// How many bytes back from end-of-file to search for the `startxref`
    /// keyword.
    ///
    /// The trailer of a conforming file sits within the last few hundred
    /// bytes, but files with long appended comments or junk need a larger
    /// window.
    pub trailer_search_len: usize,

    /// Resolve classic table rows only when an object is requested (true)
    /// or decode every row while walking the `Prev` chain (false).
    ///
    /// Lazy mode is faster when only a handful of objects are accessed;
    /// eager mode wins when the whole document is traversed.
    pub read_on_access: bool,

    /// Window growth step used while scanning forward for the `%PDF-`
    /// header.
    pub header_scan_chunk: usize,
}

impl Default for XrefConfig {
    fn default() -> Self {
        Self {
            trailer_search_len: 5500,
            read_on_access: true,
            header_scan_chunk: 100,
        }
    }
}

impl XrefConfig {
    /// Eager mode: decode complete classic tables during construction.
    pub fn eager() -> Self {
        Self {
            read_on_access: false,
            ..Self::default()
        }
    }

    /// Override the `startxref` search window.
    pub fn with_trailer_search_len(mut self, len: usize) -> Self {
        self.trailer_search_len = len;
        self
    }
}
