//! Error types for sprite assembly.

use thiserror::Error;

/// Errors surfaced while parsing source SVG or serializing the sprite.
#[derive(Debug, Error)]
pub enum Error {
    /// The source document is not well-formed XML.
    #[error("malformed XML at byte {position}")]
    Parse {
        /// Byte offset reported by the reader at the point of failure.
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// The source document contained no root element.
    #[error("source document has no root element")]
    NoRootElement,

    /// Input ended while an element was still open.
    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEof(String),

    /// Writer-side I/O failure. The serializer writes into an in-memory
    /// buffer, so this does not occur under normal construction.
    #[error("failed to write XML")]
    Io(#[from] std::io::Error),

    /// A serialized or parsed byte sequence was not valid UTF-8.
    #[error("XML content is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
