//! Huffman encoder (compression).
//!
//! Compression is a two-pass operation over the same content:
//!
//! 1. [`CompressionPlan::build`] counts the input, builds the tree and code
//!    table, and works out how many bits the container would save.
//! 2. [`CompressionPlan::compress`] reads the input again and writes the
//!    container, or refuses when it would be larger than the input.
//!
//! [`HuffCompressor`] wraps the two passes in an estimate/compress session
//! that reports progress through a [`Reporter`].

use crate::codes::CodeTable;
use crate::config::HeaderFormat;
use crate::config::constants::{ALPHABET_SIZE, PREAMBLE_BITS, PSEUDO_EOF};
use crate::frequency::FrequencyTable;
use crate::header::{write_header, write_preamble};
use crate::tree::HuffmanTree;
use oxihuff_core::bitstream::BitWriter;
use oxihuff_core::error::{HuffError, Result};
use oxihuff_core::report::{Reporter, TracingReporter};
use std::io::{ErrorKind, Read, Write};
use tracing::{debug, warn};

const READ_CHUNK: usize = 8 * 1024;

/// Result of a compress call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressOutcome {
    /// The container was written.
    Written {
        /// Bits written, padding excluded.
        bits: u64,
    },
    /// The container would be larger than the input and `force` was not set.
    /// Nothing was written.
    Refused {
        /// The (negative) savings estimate.
        bits_saved: i64,
    },
}

impl CompressOutcome {
    /// Bits written, or the negative savings estimate on refusal.
    pub fn bits(&self) -> i64 {
        match *self {
            CompressOutcome::Written { bits } => i64::try_from(bits).unwrap_or(i64::MAX),
            CompressOutcome::Refused { bits_saved } => bits_saved,
        }
    }

    /// Whether the container was written.
    pub fn is_written(&self) -> bool {
        matches!(self, CompressOutcome::Written { .. })
    }
}

/// Everything the compress pass needs, computed from one input.
#[derive(Debug, Clone)]
pub struct CompressionPlan {
    format: HeaderFormat,
    frequencies: FrequencyTable,
    tree: HuffmanTree,
    codes: CodeTable,
    header_bits: u64,
    body_bits: u64,
}

impl CompressionPlan {
    /// Count `input` and build the plan for `format`.
    pub fn build<R: Read>(input: R, format: HeaderFormat) -> Result<Self> {
        let frequencies = FrequencyTable::from_reader(input)?;
        Ok(Self::from_frequencies(frequencies, format))
    }

    /// Build the plan from counts that were already taken.
    pub fn from_frequencies(frequencies: FrequencyTable, format: HeaderFormat) -> Self {
        let tree = HuffmanTree::from_frequencies(&frequencies);
        let codes = CodeTable::from_tree(&tree);
        let header_bits = format.header_bits(tree.serialized_bits());
        let body_bits = codes.body_bits(&frequencies);

        debug!(
            %format,
            words = frequencies.total_words(),
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            header_bits,
            body_bits,
            "built compression plan"
        );

        Self {
            format,
            frequencies,
            tree,
            codes,
            header_bits,
            body_bits,
        }
    }

    /// Header format the container will use.
    pub fn header_format(&self) -> HeaderFormat {
        self.format
    }

    /// Counts the plan was built from.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Code tree.
    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Code of every present symbol.
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Bits of the header that follows the preamble.
    pub fn header_bits(&self) -> u64 {
        self.header_bits
    }

    /// Bits of the encoded body, pseudo-EOF code included.
    pub fn body_bits(&self) -> u64 {
        self.body_bits
    }

    /// Size of the container in bits, padding excluded.
    pub fn compressed_bits(&self) -> u64 {
        PREAMBLE_BITS + self.header_bits + self.body_bits
    }

    /// Uncompressed size minus container size; negative when compressing
    /// would enlarge the data.
    pub fn bits_saved(&self) -> i64 {
        self.frequencies.original_bits() as i64 - self.compressed_bits() as i64
    }

    /// Encode `input` into `output`.
    ///
    /// `input` must have the content the plan was built from. When the
    /// container would be larger than the input and `force` is false,
    /// nothing is written and [`CompressOutcome::Refused`] is returned.
    ///
    /// # Errors
    ///
    /// `IllegalUsage` if `input` holds a symbol the plan has no code for or
    /// different counts than the plan was built from. The output is
    /// incomplete in that case.
    pub fn compress<R: Read, W: Write>(
        &self,
        mut input: R,
        output: W,
        force: bool,
    ) -> Result<CompressOutcome> {
        let bits_saved = self.bits_saved();
        if bits_saved < 0 && !force {
            warn!(bits_saved, format = %self.format, "compression would enlarge data, refusing");
            return Ok(CompressOutcome::Refused { bits_saved });
        }

        let mut writer = BitWriter::new(output);
        write_preamble(&mut writer, self.format)?;
        write_header(&mut writer, self.format, &self.frequencies, &self.tree)?;
        debug!(bits = writer.bits_written(), "wrote header");

        let mut seen = [0u32; ALPHABET_SIZE];
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = match input.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..n] {
                self.write_code(&mut writer, byte as u16)?;
                seen[byte as usize] = seen[byte as usize].saturating_add(1);
            }
        }

        if seen[..] != *self.frequencies.byte_counts() {
            return Err(HuffError::illegal_usage(
                "input differs from the data the plan was built from",
            ));
        }
        self.write_code(&mut writer, PSEUDO_EOF)?;

        let bits = writer.bits_written();
        debug_assert_eq!(bits, self.compressed_bits());
        writer.finish()?;

        debug!(bits, bits_saved, "wrote container");
        Ok(CompressOutcome::Written { bits })
    }

    fn write_code<W: Write>(&self, writer: &mut BitWriter<W>, symbol: u16) -> Result<()> {
        let code = self.codes.code(symbol).ok_or_else(|| {
            HuffError::illegal_usage(format!(
                "symbol {symbol} was not in the data the plan was built from"
            ))
        })?;
        for &bit in code {
            writer.write_bit(bit)?;
        }
        Ok(())
    }
}

/// Estimate/compress session.
///
/// [`estimate`](Self::estimate) builds and keeps a [`CompressionPlan`];
/// [`compress`](Self::compress) uses it. Status messages go to the
/// session's [`Reporter`].
///
/// # Example
///
/// ```rust
/// use oxihuff::{HeaderFormat, HuffCompressor};
///
/// let data = b"abracadabra".repeat(100);
/// let mut compressor = HuffCompressor::new();
/// let saved = compressor.estimate(&data[..], HeaderFormat::Tree).unwrap();
/// assert!(saved > 0);
///
/// let mut out = Vec::new();
/// let outcome = compressor.compress(&data[..], &mut out, false).unwrap();
/// assert_eq!(outcome.bits(), data.len() as i64 * 8 - saved);
/// ```
#[derive(Debug)]
pub struct HuffCompressor<P: Reporter = TracingReporter> {
    plan: Option<CompressionPlan>,
    reporter: P,
}

impl HuffCompressor {
    /// Create a session that reports through `tracing`.
    pub fn new() -> Self {
        Self::with_reporter(TracingReporter)
    }
}

impl Default for HuffCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Reporter> HuffCompressor<P> {
    /// Create a session that reports to `reporter`.
    pub fn with_reporter(reporter: P) -> Self {
        Self {
            plan: None,
            reporter,
        }
    }

    /// Build a plan for `input` and return the bits it would save.
    ///
    /// Replaces any plan from an earlier call.
    pub fn estimate<R: Read>(&mut self, input: R, format: HeaderFormat) -> Result<i64> {
        self.reporter.report("reading and counting input");
        let plan = CompressionPlan::build(input, format)?;
        let bits_saved = plan.bits_saved();
        self.reporter.report(&format!(
            "{format} header: {} bits in, {} bits out, saved: {bits_saved} bits",
            plan.frequencies().original_bits(),
            plan.compressed_bits(),
        ));
        self.plan = Some(plan);
        Ok(bits_saved)
    }

    /// Compress `input` with the plan from the last [`estimate`](Self::estimate).
    ///
    /// # Errors
    ///
    /// `IllegalUsage` when no estimate was made or `input` does not match it.
    pub fn compress<R: Read, W: Write>(
        &mut self,
        input: R,
        output: W,
        force: bool,
    ) -> Result<CompressOutcome> {
        let Some(plan) = self.plan.as_ref() else {
            let err = HuffError::illegal_usage("compress called before estimate");
            self.reporter.report(&err.to_string());
            return Err(err);
        };

        match plan.compress(input, output, force) {
            Ok(outcome @ CompressOutcome::Written { bits }) => {
                self.reporter.report(&format!("compressed: {bits} bits written"));
                Ok(outcome)
            }
            Ok(outcome @ CompressOutcome::Refused { bits_saved }) => {
                self.reporter.report(&format!(
                    "compression would enlarge data by {} bits; skipping (set force to override)",
                    bits_saved.unsigned_abs()
                ));
                Ok(outcome)
            }
            Err(err) => {
                self.reporter.report(&err.to_string());
                Err(err)
            }
        }
    }

    /// Plan from the last estimate, if any.
    pub fn plan(&self) -> Option<&CompressionPlan> {
        self.plan.as_ref()
    }

    /// The session's reporter.
    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    /// Consume the session and return its reporter.
    pub fn into_reporter(self) -> P {
        self.reporter
    }
}
