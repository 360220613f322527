//! # OxiHuff: Pure Rust Static Huffman Compression
//!
//! This crate compresses byte streams with a static Huffman code built from
//! the frequencies of the input, and decompresses the containers it writes.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Two header formats**: symbol counts or a pre-order serialized tree
//! - **Pre-flight estimate**: know the savings before writing anything
//! - **Refuses to enlarge**: unless forced, no container larger than its input
//! - **Deterministic**: identical input and format give identical output
//!
//! ## Container Format
//!
//! All fields are MSB-first. The last byte is padded with zero bits.
//!
//! ```text
//! MAGIC 0xFACE8200 (32) | FORMAT (32) | header | body codes | EOF code
//!
//! FORMAT "Stac" 0x53746163: 256 x count (32)
//! FORMAT "Tree" 0x54726565: tree bit length (32) | tree
//! ```
//!
//! The body ends with the code of a pseudo end-of-file symbol (256), so the
//! decoder knows where the data stops without a length field.
//!
//! ## Example
//!
//! ```rust
//! use oxihuff::{HeaderFormat, compress, decompress};
//!
//! let original = b"she sells sea shells by the sea shore".repeat(20);
//!
//! let compressed = compress(&original, HeaderFormat::Tree).unwrap();
//! assert!(compressed.len() < original.len());
//!
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Estimate, Then Compress
//!
//! Small inputs cost more in header than they save in body. The session API
//! mirrors the two passes:
//!
//! ```rust
//! use oxihuff::{CompressOutcome, HeaderFormat, HuffCompressor};
//!
//! let data = b"aaaa";
//! let mut compressor = HuffCompressor::new();
//!
//! // 32 bits of input against a 64-bit preamble and an 8192-bit header.
//! let saved = compressor.estimate(&data[..], HeaderFormat::Counts).unwrap();
//! assert_eq!(saved, 32 - (64 + 8192 + 5));
//!
//! let mut out = Vec::new();
//! let outcome = compressor.compress(&data[..], &mut out, false).unwrap();
//! assert_eq!(outcome, CompressOutcome::Refused { bits_saved: saved });
//! assert!(out.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod codes;
pub mod config;
mod decoder;
mod encoder;
pub mod frequency;
pub mod header;
pub mod queue;
pub mod tree;

pub use codes::CodeTable;
pub use config::{HeaderFormat, HuffConfig};
pub use decoder::{HuffDecompressor, decompress_stream};
pub use encoder::{CompressOutcome, CompressionPlan, HuffCompressor};
pub use frequency::FrequencyTable;
pub use oxihuff_core::error::{HuffError, Result};
pub use oxihuff_core::report::{MessageLog, Reporter, SilentReporter, TracingReporter};
pub use tree::{HuffmanTree, Node};

/// Compress `data` with the given header format.
///
/// The container is always written, even when it is larger than `data`.
/// Use [`compress_with`] to refuse enlarging output.
///
/// # Example
///
/// ```rust
/// use oxihuff::{HeaderFormat, compress};
///
/// let compressed = compress(b"Hello, World!", HeaderFormat::Tree).unwrap();
/// assert_eq!(&compressed[..4], &[0xFA, 0xCE, 0x82, 0x00]);
/// ```
pub fn compress(data: &[u8], format: HeaderFormat) -> Result<Vec<u8>> {
    let config = HuffConfig::new(format).with_force(true);
    let compressed = compress_with(data, &config)?;
    compressed.ok_or_else(|| HuffError::illegal_usage("forced compression was refused"))
}

/// Compress `data` according to `config`.
///
/// Returns `None` when the container would be larger than `data` and
/// `config.force` is not set.
///
/// # Example
///
/// ```rust
/// use oxihuff::{HuffConfig, compress_with};
///
/// // Too short to pay for a counts header.
/// assert_eq!(compress_with(b"tiny", &HuffConfig::COUNTS).unwrap(), None);
///
/// let forced = compress_with(b"tiny", &HuffConfig::COUNTS.with_force(true)).unwrap();
/// assert!(forced.is_some());
/// ```
pub fn compress_with(data: &[u8], config: &HuffConfig) -> Result<Option<Vec<u8>>> {
    let plan = CompressionPlan::build(data, config.header_format)?;
    let mut output = Vec::with_capacity(plan.compressed_bits().div_ceil(8) as usize);
    match plan.compress(data, &mut output, config.force)? {
        CompressOutcome::Written { .. } => Ok(Some(output)),
        CompressOutcome::Refused { .. } => Ok(None),
    }
}

/// Decompress a container produced by [`compress`] or [`compress_with`].
///
/// # Example
///
/// ```rust
/// use oxihuff::{HeaderFormat, compress, decompress};
///
/// let compressed = compress(b"", HeaderFormat::Counts).unwrap();
/// assert!(decompress(&compressed).unwrap().is_empty());
/// ```
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_stream(data, &mut output)?;
    Ok(output)
}

/// Bits that compressing `data` with `format` would save (negative if the
/// container would be larger).
///
/// # Example
///
/// ```rust
/// use oxihuff::{HeaderFormat, estimate};
///
/// assert!(estimate(b"aaaa", HeaderFormat::Tree).unwrap() < 0);
/// assert!(estimate(&[b'a'; 1000], HeaderFormat::Tree).unwrap() > 0);
/// ```
pub fn estimate(data: &[u8], format: HeaderFormat) -> Result<i64> {
    Ok(CompressionPlan::build(data, format)?.bits_saved())
}
