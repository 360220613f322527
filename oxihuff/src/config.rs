//! Codec configuration and wire constants.

use oxihuff_core::error::{HuffError, Result};
use std::fmt;

/// Fixed values of the container format.
pub mod constants {
    /// Number of real symbols (byte values).
    pub const ALPHABET_SIZE: usize = 256;
    /// Symbol value of the pseudo end-of-file marker.
    pub const PSEUDO_EOF: u16 = 256;
    /// Real symbols plus the pseudo-EOF symbol.
    pub const SYMBOL_COUNT: usize = ALPHABET_SIZE + 1;
    /// Width of one input word.
    pub const BITS_PER_WORD: u8 = 8;
    /// Width of a symbol in a serialized tree (room for the pseudo-EOF value).
    pub const BITS_PER_SYMBOL: u8 = BITS_PER_WORD + 1;
    /// Width of every integer field in the container.
    pub const BITS_PER_INT: u8 = 32;
    /// First field of every container.
    pub const MAGIC_NUMBER: u32 = 0xFACE_8200;
    /// Selector for the counts header ("Stac").
    pub const STORE_COUNTS: u32 = 0x5374_6163;
    /// Selector for the serialized tree header ("Tree").
    pub const STORE_TREE: u32 = 0x5472_6565;
    /// Frequency assumed for the pseudo-EOF symbol on both sides.
    pub const PSEUDO_EOF_COUNT: u32 = 1;
    /// Magic number plus format selector.
    pub const PREAMBLE_BITS: u64 = 2 * BITS_PER_INT as u64;
}

use constants::{ALPHABET_SIZE, BITS_PER_INT, STORE_COUNTS, STORE_TREE};

/// How the code tree is transmitted in the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaderFormat {
    /// 256 32-bit symbol counts; the decoder rebuilds the tree from them.
    #[default]
    Counts,
    /// A 32-bit bit length followed by the pre-order serialized tree.
    Tree,
}

impl HeaderFormat {
    /// All supported formats.
    pub const ALL: [HeaderFormat; 2] = [HeaderFormat::Counts, HeaderFormat::Tree];

    /// The 32-bit selector written after the magic number.
    pub const fn selector(self) -> u32 {
        match self {
            HeaderFormat::Counts => STORE_COUNTS,
            HeaderFormat::Tree => STORE_TREE,
        }
    }

    /// Map a selector read from a container back to a format.
    pub fn from_selector(selector: u32) -> Result<Self> {
        match selector {
            STORE_COUNTS => Ok(HeaderFormat::Counts),
            STORE_TREE => Ok(HeaderFormat::Tree),
            other => Err(HuffError::unknown_header_format(other)),
        }
    }

    /// Header size in bits for a tree that serializes to `tree_bits` bits.
    ///
    /// The counts header does not depend on the tree.
    pub const fn header_bits(self, tree_bits: u64) -> u64 {
        match self {
            HeaderFormat::Counts => ALPHABET_SIZE as u64 * BITS_PER_INT as u64,
            HeaderFormat::Tree => BITS_PER_INT as u64 + tree_bits,
        }
    }

    /// Short lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            HeaderFormat::Counts => "counts",
            HeaderFormat::Tree => "tree",
        }
    }
}

impl fmt::Display for HeaderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options for the slice-level compression helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HuffConfig {
    /// Header format to write.
    pub header_format: HeaderFormat,
    /// Write the container even when it is larger than the input.
    pub force: bool,
}

impl HuffConfig {
    /// Counts header, refuse to enlarge.
    pub const COUNTS: Self = Self {
        header_format: HeaderFormat::Counts,
        force: false,
    };

    /// Tree header, refuse to enlarge.
    pub const TREE: Self = Self {
        header_format: HeaderFormat::Tree,
        force: false,
    };

    /// Create a configuration for the given header format.
    pub const fn new(header_format: HeaderFormat) -> Self {
        Self {
            header_format,
            force: false,
        }
    }

    /// Set whether enlarging output is written anyway.
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
