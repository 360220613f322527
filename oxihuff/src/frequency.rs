//! Symbol frequency counting.

use crate::config::constants::{
    ALPHABET_SIZE, BITS_PER_WORD, PSEUDO_EOF, PSEUDO_EOF_COUNT, SYMBOL_COUNT,
};
use oxihuff_core::error::{HuffError, Result};
use std::io::{ErrorKind, Read};

const READ_CHUNK: usize = 8 * 1024;

/// Occurrence counts of every byte value plus the pseudo-EOF symbol.
///
/// The pseudo-EOF count is always [`PSEUDO_EOF_COUNT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; SYMBOL_COUNT],
    total_words: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    /// A table for empty input: only the pseudo-EOF symbol is present.
    pub fn new() -> Self {
        let mut counts = [0u32; SYMBOL_COUNT];
        counts[PSEUDO_EOF as usize] = PSEUDO_EOF_COUNT;
        Self {
            counts,
            total_words: 0,
        }
    }

    /// Count every byte of `reader` until end of stream.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut table = Self::new();
        let mut buf = [0u8; READ_CHUNK];

        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => table.add_bytes(&buf[..n])?,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(table)
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut table = Self::new();
        table.add_bytes(data)?;
        Ok(table)
    }

    /// Rebuild a table from the 256 counts carried by a counts header.
    pub fn from_counts(byte_counts: &[u32; ALPHABET_SIZE]) -> Self {
        let mut table = Self::new();
        table.counts[..ALPHABET_SIZE].copy_from_slice(byte_counts);
        table.total_words = byte_counts.iter().map(|&c| c as u64).sum();
        table
    }

    /// Add the bytes of `data` to the counts.
    pub fn add_bytes(&mut self, data: &[u8]) -> Result<()> {
        for &byte in data {
            let slot = &mut self.counts[byte as usize];
            *slot = slot
                .checked_add(1)
                .ok_or_else(|| HuffError::input_too_large(byte as u16))?;
        }
        self.total_words += data.len() as u64;
        Ok(())
    }

    /// Count of `symbol` (0 for symbols outside the alphabet).
    pub fn count(&self, symbol: u16) -> u32 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Counts of the 256 byte values, in symbol order.
    pub fn byte_counts(&self) -> &[u32] {
        &self.counts[..ALPHABET_SIZE]
    }

    /// Number of input words counted.
    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    /// Bits needed to store the counted input uncompressed.
    pub fn original_bits(&self) -> u64 {
        self.total_words * BITS_PER_WORD as u64
    }

    /// Number of distinct byte values that occur at least once.
    pub fn distinct_symbols(&self) -> usize {
        self.byte_counts().iter().filter(|&&c| c > 0).count()
    }

    /// Symbols with a non-zero count, in ascending symbol order, ending with
    /// the pseudo-EOF symbol.
    pub fn present(&self) -> impl Iterator<Item = (u16, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u16, count))
    }
}
