//! Container preamble and header encoding.
//!
//! ```text
//! MAGIC(32) | FORMAT(32) | header | body
//!
//! counts header: count[0](32) .. count[255](32)
//! tree header:   tree_bits(32) | pre-order tree (tree_bits)
//! ```
//!
//! The pseudo-EOF count is never transmitted; both sides assume
//! [`PSEUDO_EOF_COUNT`](crate::config::constants::PSEUDO_EOF_COUNT).

use crate::config::HeaderFormat;
use crate::config::constants::{ALPHABET_SIZE, BITS_PER_INT, MAGIC_NUMBER};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;
use oxihuff_core::bitstream::{BitReader, BitWriter};
use oxihuff_core::error::{HuffError, Result};
use std::io::{Read, Write};
use tracing::debug;

/// Write the magic number and format selector.
pub fn write_preamble<W: Write>(writer: &mut BitWriter<W>, format: HeaderFormat) -> Result<()> {
    writer.write_bits(MAGIC_NUMBER, BITS_PER_INT)?;
    writer.write_bits(format.selector(), BITS_PER_INT)
}

/// Write the header for `format`.
///
/// `table` supplies the counts for [`HeaderFormat::Counts`]; `tree` is
/// serialized for [`HeaderFormat::Tree`].
pub fn write_header<W: Write>(
    writer: &mut BitWriter<W>,
    format: HeaderFormat,
    table: &FrequencyTable,
    tree: &HuffmanTree,
) -> Result<()> {
    match format {
        HeaderFormat::Counts => {
            for &count in table.byte_counts() {
                writer.write_bits(count, BITS_PER_INT)?;
            }
        }
        HeaderFormat::Tree => {
            let tree_bits = u32::try_from(tree.serialized_bits())
                .map_err(|_| HuffError::invalid_header("tree too large for its length field"))?;
            writer.write_bits(tree_bits, BITS_PER_INT)?;
            tree.write(writer)?;
        }
    }
    Ok(())
}

/// Read and validate the magic number, then read the format selector.
///
/// # Errors
///
/// `InvalidMagic` or `UnknownHeaderFormat` for a foreign stream,
/// `UnexpectedEof` if the stream is shorter than the preamble.
pub fn read_preamble<R: Read>(reader: &mut BitReader<R>) -> Result<HeaderFormat> {
    let magic = read_field(reader)?;
    if magic != MAGIC_NUMBER {
        return Err(HuffError::invalid_magic(MAGIC_NUMBER, magic));
    }

    let selector = read_field(reader)?;
    HeaderFormat::from_selector(selector)
}

/// Read the header for `format` and rebuild the decoding tree.
pub fn read_tree<R: Read>(reader: &mut BitReader<R>, format: HeaderFormat) -> Result<HuffmanTree> {
    match format {
        HeaderFormat::Counts => {
            let mut counts = [0u32; ALPHABET_SIZE];
            for (symbol, count) in counts.iter_mut().enumerate() {
                *count = reader.read_bits(BITS_PER_INT)?.ok_or_else(|| {
                    HuffError::invalid_header(format!("counts header ends at symbol {symbol}"))
                })?;
            }
            let table = FrequencyTable::from_counts(&counts);
            debug!(
                distinct = table.distinct_symbols(),
                words = table.total_words(),
                "read counts header"
            );
            Ok(HuffmanTree::from_frequencies(&table))
        }
        HeaderFormat::Tree => {
            let tree_bits = reader
                .read_bits(BITS_PER_INT)?
                .ok_or_else(|| HuffError::invalid_header("tree header has no length field"))?;
            let tree = HuffmanTree::read(reader, tree_bits)?;
            debug!(tree_bits, leaves = tree.leaf_count(), "read tree header");
            Ok(tree)
        }
    }
}

fn read_field<R: Read>(reader: &mut BitReader<R>) -> Result<u32> {
    let position = reader.bits_read();
    reader
        .read_bits(BITS_PER_INT)?
        .ok_or_else(|| HuffError::unexpected_eof(position))
}
