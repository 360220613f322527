//! # OxiHuff Core
//!
//! Core components for the OxiHuff Huffman codec.
//!
//! This crate provides the building blocks the codec is layered on:
//!
//! - [`bitstream`]: MSB-first bit-level I/O with an explicit end-of-stream sentinel
//! - [`error`]: Error types
//! - [`report`]: Status reporting for front-ends
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Codec API                                           │
//! │     estimate / compress / decompress, HuffConfig        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Container                                           │
//! │     magic, format selector, counts or tree header       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Model                                               │
//! │     frequency table, Huffman tree, code table           │
//! ├─────────────────────────────────────────────────────────┤
//! │ L0: BitStream (this crate)                              │
//! │     BitReader/BitWriter, HuffError, Reporter            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0x1FF, 9).unwrap();
//! let data = writer.finish().unwrap();
//!
//! let mut reader = BitReader::new(Cursor::new(data));
//! assert_eq!(reader.read_bits(9).unwrap(), Some(0x1FF));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod report;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use error::{HuffError, Result};
pub use report::{MessageLog, Reporter, SilentReporter, TracingReporter};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::error::{HuffError, Result};
    pub use crate::report::{Reporter, SilentReporter, TracingReporter};
}
