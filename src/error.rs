//! Error types for the library.
//!
//! The taxonomy separates recoverable token-level mismatches
//! ([`Error::UnexpectedToken`]) from structural failures that abort the
//! operation in progress. Callers of [`crate::parser::PdfParser::read_value`]
//! may catch `UnexpectedToken` and substitute `Null` or skip an element;
//! everything else propagates.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing a PDF file structure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The `%PDF-` header was not found anywhere in the file.
    #[error("Unable to find PDF file header")]
    InvalidHeader,

    /// A windowed read could not be satisfied because the underlying
    /// source is exhausted.
    #[error("End of file reached unexpectedly")]
    UnexpectedEof,

    /// Structural cross-reference error. Fatal to resolver construction.
    #[error("Invalid cross-reference: {0}")]
    InvalidXref(String),

    /// A token did not match an explicitly expected production.
    ///
    /// This is the recoverable class: dictionary and array parsing catch
    /// it to substitute `Null` or skip the offending element.
    #[error("Got unexpected token {found:?} at byte {offset}")]
    UnexpectedToken {
        /// Absolute byte offset of the token.
        offset: u64,
        /// Human-readable rendering of what was read.
        found: String,
    },

    /// Unrecoverable structural parse failure.
    #[error("Failed to parse at byte {offset}: {reason}")]
    Parse {
        /// Absolute byte offset where the error occurred.
        offset: u64,
        /// Reason for the failure.
        reason: String,
    },

    /// Stream filter decoding error.
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// A stream names a filter this crate does not implement.
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// IO error from the underlying byte source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is the recoverable token-mismatch class.
    pub fn is_token_error(&self) -> bool {
        matches!(self, Error::UnexpectedToken { .. })
    }
}
