//! Huffman decoder (decompression).
//!
//! Decoding runs in three stages, each of which can reject the stream:
//!
//! 1. the magic number is checked (`InvalidMagic`),
//! 2. the format selector picks how the tree is rebuilt
//!    (`UnknownHeaderFormat`, `InvalidHeader`),
//! 3. the body is walked bit by bit from the root until the pseudo-EOF leaf
//!    is reached (`CorruptStream` if the bits run out first).
//!
//! Nothing after the pseudo-EOF code is read; trailing padding is ignored.

use crate::config::constants::{BITS_PER_WORD, PSEUDO_EOF};
use crate::header::{read_preamble, read_tree};
use crate::tree::{HuffmanTree, Node};
use oxihuff_core::bitstream::{BitReader, BitWriter};
use oxihuff_core::error::{HuffError, Result};
use oxihuff_core::report::{Reporter, TracingReporter};
use std::io::{Read, Write};
use tracing::debug;

/// Decompress one container from `input` into `output`.
///
/// Returns the number of bits written to `output`.
pub fn decompress_stream<R: Read, W: Write>(input: R, output: W) -> Result<u64> {
    let mut reader = BitReader::new(input);
    let format = read_preamble(&mut reader)?;
    let tree = read_tree(&mut reader, format)?;
    debug!(%format, header_end = reader.bits_read(), "decoding body");

    let mut writer = BitWriter::new(output);
    decode_body(&tree, &mut reader, &mut writer)?;

    let bits = writer.bits_written();
    writer.finish()?;
    debug!(bits, bits_read = reader.bits_read(), "decoded container");
    Ok(bits)
}

fn decode_body<R: Read, W: Write>(
    tree: &HuffmanTree,
    reader: &mut BitReader<R>,
    writer: &mut BitWriter<W>,
) -> Result<()> {
    let root = tree.root();
    let mut node = root;
    loop {
        match node {
            Node::Leaf { symbol, .. } => {
                if *symbol == PSEUDO_EOF {
                    return Ok(());
                }
                writer.write_bits(*symbol as u32, BITS_PER_WORD)?;
                node = root;
            }
            Node::Internal { left, right, .. } => {
                let bit = reader
                    .read_bit()?
                    .ok_or_else(|| HuffError::corrupt_stream(reader.bits_read()))?;
                node = if bit { right } else { left };
            }
        }
    }
}

/// Decompression front-end that reports through a [`Reporter`].
#[derive(Debug, Default)]
pub struct HuffDecompressor<P: Reporter = TracingReporter> {
    reporter: P,
}

impl HuffDecompressor {
    /// Create a decompressor that reports through `tracing`.
    pub fn new() -> Self {
        Self::with_reporter(TracingReporter)
    }
}

impl<P: Reporter> HuffDecompressor<P> {
    /// Create a decompressor that reports to `reporter`.
    pub fn with_reporter(reporter: P) -> Self {
        Self { reporter }
    }

    /// Decompress one container from `input` into `output`.
    ///
    /// Returns the number of bits written. Errors are reported before they
    /// are returned.
    pub fn decompress<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<u64> {
        self.reporter.report("uncompressing");
        match decompress_stream(input, output) {
            Ok(bits) => {
                self.reporter
                    .report(&format!("uncompressed: {bits} bits written"));
                Ok(bits)
            }
            Err(err) => {
                self.reporter.report(&err.to_string());
                Err(err)
            }
        }
    }

    /// The decompressor's reporter.
    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    /// Consume the decompressor and return its reporter.
    pub fn into_reporter(self) -> P {
        self.reporter
    }
}
