//! Low-level PDF cross-reference resolution and object parsing.
//!
//! This crate answers one question about a PDF file: *where does object N
//! live, and what is its value?* It understands the full zoo of
//! cross-reference layouts — classic 20-byte-row tables, compressed xref
//! streams, hybrid files, and incremental-update `Prev` chains — and reads
//! only the bytes a lookup actually needs.
//!
//! It deliberately stops below the document model: no page tree, no content
//! streams, no fonts, no encryption. Those belong to higher layers; this
//! crate hands them correctly resolved objects.
//!
//! # Example
//!
//! ```
//! use pdf_xref::{Reader, XrefTable};
//!
//! // a minimal one-object document
//! let mut data = b"%PDF-1.4\n".to_vec();
//! let offset = data.len();
//! data.extend_from_slice(b"1 0 obj\n<</Type /Catalog>>\nendobj\n");
//! let xref = data.len();
//! data.extend_from_slice(b"xref\n0 2\n0000000000 65535 f \n");
//! data.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
//! data.extend_from_slice(
//!     format!("trailer\n<</Size 2 /Root 1 0 R>>\nstartxref\n{}\n%%EOF", xref).as_bytes(),
//! );
//!
//! let mut table = XrefTable::new(Reader::from_bytes(data))?;
//! let root = table.fetch(1, None)?.unwrap();
//! assert_eq!(root.as_dict().unwrap().get("Type").unwrap().as_name(), Some("Catalog"));
//! # Ok::<(), pdf_xref::Error>(())
//! ```

pub mod config;
pub mod decoders;
pub mod error;
pub mod object;
pub mod objstm;
pub mod parser;
pub mod reader;
pub mod tokenizer;
pub mod xref;

pub use config::XrefConfig;
pub use error::{Error, Result};
pub use object::{IndirectObject, Object, ObjectRef, Stream};
pub use objstm::ObjectStream;
pub use parser::{Expect, PdfParser};
pub use reader::Reader;
pub use tokenizer::{Token, Tokenizer};
pub use xref::{Compression, Location, XrefTable};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
