//! Error types for OxiHuff operations.
//!
//! Every fallible codec operation returns [`HuffError`]. Format errors are
//! fatal to the current call; I/O errors from the underlying streams are
//! wrapped unchanged. Refusing to compress because the output would grow is
//! not an error and is reported through the codec's return value instead.

use std::io;
use thiserror::Error;

/// The main error type for OxiHuff operations.
#[derive(Debug, Error)]
pub enum HuffError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The container does not start with the expected magic number.
    #[error("Invalid magic number: expected {expected:#010x}, found {found:#010x}")]
    InvalidMagic {
        /// Expected magic number.
        expected: u32,
        /// Value actually read.
        found: u32,
    },

    /// The header format selector is not one this codec understands.
    #[error("Unknown header format selector: {selector:#010x}")]
    UnknownHeaderFormat {
        /// The selector read from the stream.
        selector: u32,
    },

    /// The header that describes the code tree is malformed or truncated.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// The compressed body ended before the end-of-data code was reached.
    #[error("Corrupt stream: body ended at bit {bit_position} before the end-of-data code")]
    CorruptStream {
        /// Bit position (from the start of the container) where input ran out.
        bit_position: u64,
    },

    /// The stream ended inside a fixed-width preamble field.
    #[error("Unexpected end of stream at bit {bit_position}")]
    UnexpectedEof {
        /// Bit position where the stream ran out.
        bit_position: u64,
    },

    /// The codec API was driven in an order it does not support.
    #[error("Illegal usage: {message}")]
    IllegalUsage {
        /// What the caller did wrong.
        message: String,
    },

    /// A symbol occurs more often than a 32-bit count field can hold.
    #[error("Input too large: count for symbol {symbol} exceeds 32 bits")]
    InputTooLarge {
        /// Symbol whose count overflowed.
        symbol: u16,
    },
}

/// Result type alias for OxiHuff operations.
pub type Result<T> = std::result::Result<T, HuffError>;

impl HuffError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: u32, found: u32) -> Self {
        Self::InvalidMagic { expected, found }
    }

    /// Create an unknown header format error.
    pub fn unknown_header_format(selector: u32) -> Self {
        Self::UnknownHeaderFormat { selector }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a corrupt stream error.
    pub fn corrupt_stream(bit_position: u64) -> Self {
        Self::CorruptStream { bit_position }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(bit_position: u64) -> Self {
        Self::UnexpectedEof { bit_position }
    }

    /// Create an illegal usage error.
    pub fn illegal_usage(message: impl Into<String>) -> Self {
        Self::IllegalUsage {
            message: message.into(),
        }
    }

    /// Create an input too large error.
    pub fn input_too_large(symbol: u16) -> Self {
        Self::InputTooLarge { symbol }
    }

    /// Whether this error describes a malformed container rather than an
    /// I/O failure or API misuse.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic { .. }
                | Self::UnknownHeaderFormat { .. }
                | Self::InvalidHeader { .. }
                | Self::CorruptStream { .. }
                | Self::UnexpectedEof { .. }
        )
    }
}
