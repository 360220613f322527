//! Huffman tree construction and serialization.
//!
//! # Construction
//!
//! One leaf per symbol with a non-zero count is queued in ascending symbol
//! order, the pseudo-EOF symbol last. The two lowest entries of the
//! [`StableQueue`] are merged repeatedly (first removed becomes the left
//! child) until one node remains. Because the queue breaks frequency ties by
//! insertion order, the same counts always produce the same tree.
//!
//! # Serialized Form
//!
//! Pre-order: an internal node is a `0` bit followed by its left and right
//! subtrees; a leaf is a `1` bit followed by its 9-bit symbol.

use crate::config::constants::{BITS_PER_SYMBOL, PSEUDO_EOF, SYMBOL_COUNT};
use crate::frequency::FrequencyTable;
use crate::queue::StableQueue;
use oxihuff_core::bitstream::{BitReader, BitWriter};
use oxihuff_core::error::{HuffError, Result};
use std::io::{Read, Write};

/// Serialized size of a leaf: marker bit plus symbol.
const LEAF_BITS: u64 = 1 + BITS_PER_SYMBOL as u64;

/// Largest possible tree: every symbol present.
pub const MAX_SERIALIZED_BITS: u64 = SYMBOL_COUNT as u64 * LEAF_BITS + (SYMBOL_COUNT as u64 - 1);

/// Deepest leaf a full tree over [`SYMBOL_COUNT`] leaves can have.
pub const MAX_TREE_DEPTH: usize = SYMBOL_COUNT - 1;

/// A node of the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol.
    Leaf {
        /// Byte value, or [`PSEUDO_EOF`].
        symbol: u16,
        /// Count used to build the tree (0 when read from a tree header).
        frequency: u64,
    },
    /// A branch; `0` selects `left`, `1` selects `right`.
    Internal {
        /// Sum of the children's frequencies.
        frequency: u64,
        /// Subtree reached by a `0` bit.
        left: Box<Node>,
        /// Subtree reached by a `1` bit.
        right: Box<Node>,
    },
}

impl Node {
    fn internal(left: Node, right: Node) -> Self {
        Node::Internal {
            frequency: left.frequency() + right.frequency(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Frequency of this subtree.
    pub fn frequency(&self) -> u64 {
        match self {
            Node::Leaf { frequency, .. } | Node::Internal { frequency, .. } => *frequency,
        }
    }

    /// Symbol of a leaf, `None` for internal nodes.
    pub fn symbol(&self) -> Option<u16> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A full binary tree over the symbols of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build the tree for a frequency table.
    pub fn from_frequencies(table: &FrequencyTable) -> Self {
        let mut queue = StableQueue::with_capacity(SYMBOL_COUNT);
        for (symbol, count) in table.present() {
            let frequency = count as u64;
            queue.push(frequency, Node::Leaf { symbol, frequency });
        }

        loop {
            let Some((_, left)) = queue.pop() else {
                // Unreachable with a real table: the pseudo-EOF leaf is always queued.
                return Self {
                    root: Node::Leaf {
                        symbol: PSEUDO_EOF,
                        frequency: 0,
                    },
                };
            };
            let Some((_, right)) = queue.pop() else {
                return Self { root: left };
            };
            let merged = Node::internal(left, right);
            queue.push(merged.frequency(), merged);
        }
    }

    /// Root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Internal { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Number of internal nodes.
    pub fn internal_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Internal { left, right, .. } => 1 + count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Internal { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }

    /// Size of the pre-order serialization in bits.
    pub fn serialized_bits(&self) -> u64 {
        self.internal_count() as u64 + self.leaf_count() as u64 * LEAF_BITS
    }

    /// Write the pre-order serialization.
    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        fn write_node<W: Write>(node: &Node, writer: &mut BitWriter<W>) -> Result<()> {
            match node {
                Node::Leaf { symbol, .. } => {
                    writer.write_bit(true)?;
                    writer.write_bits(*symbol as u32, BITS_PER_SYMBOL)
                }
                Node::Internal { left, right, .. } => {
                    writer.write_bit(false)?;
                    write_node(left, writer)?;
                    write_node(right, writer)
                }
            }
        }
        write_node(&self.root, writer)
    }

    /// Read a serialization of exactly `bit_len` bits.
    ///
    /// # Errors
    ///
    /// `InvalidHeader` when the bits run out before the tree is complete, when
    /// bits are left over after it, when a leaf carries a value above the
    /// pseudo-EOF symbol, or when the root is a leaf other than pseudo-EOF.
    pub fn read<R: Read>(reader: &mut BitReader<R>, bit_len: u32) -> Result<Self> {
        if bit_len as u64 > MAX_SERIALIZED_BITS {
            return Err(HuffError::invalid_header(format!(
                "tree length {bit_len} exceeds the largest possible tree ({MAX_SERIALIZED_BITS} bits)"
            )));
        }

        let (root, remaining) = read_node(reader, bit_len, 0)?;
        let root = root.ok_or_else(|| {
            HuffError::invalid_header(format!("tree incomplete after {bit_len} bits"))
        })?;
        if remaining != 0 {
            return Err(HuffError::invalid_header(format!(
                "{remaining} bits left over after the tree"
            )));
        }
        match root {
            Node::Leaf { symbol, .. } if symbol != PSEUDO_EOF => {
                return Err(HuffError::invalid_header(format!(
                    "single-leaf tree holds symbol {symbol} instead of end-of-data"
                )));
            }
            _ => {}
        }

        Ok(Self { root })
    }
}

/// Read one subtree with `budget` bits left.
///
/// Returns the node, or `None` when the budget ran out before it was
/// complete, together with the budget that remains after it.
fn read_node<R: Read>(
    reader: &mut BitReader<R>,
    budget: u32,
    depth: usize,
) -> Result<(Option<Node>, u32)> {
    if budget == 0 {
        return Ok((None, 0));
    }
    if depth > MAX_TREE_DEPTH {
        return Err(HuffError::invalid_header(format!(
            "tree nested deeper than {MAX_TREE_DEPTH} levels"
        )));
    }

    let is_leaf = reader
        .read_bit()?
        .ok_or_else(|| HuffError::invalid_header("stream ended inside the tree"))?;
    let budget = budget - 1;

    if is_leaf {
        if budget < BITS_PER_SYMBOL as u32 {
            return Ok((None, 0));
        }
        let symbol = reader
            .read_bits(BITS_PER_SYMBOL)?
            .ok_or_else(|| HuffError::invalid_header("stream ended inside a tree leaf"))?;
        if symbol > PSEUDO_EOF as u32 {
            return Err(HuffError::invalid_header(format!(
                "tree leaf symbol {symbol} is out of range"
            )));
        }
        let leaf = Node::Leaf {
            symbol: symbol as u16,
            frequency: 0,
        };
        return Ok((Some(leaf), budget - BITS_PER_SYMBOL as u32));
    }

    let (left, budget) = read_node(reader, budget, depth + 1)?;
    let Some(left) = left else {
        return Ok((None, budget));
    };
    let (right, budget) = read_node(reader, budget, depth + 1)?;
    let Some(right) = right else {
        return Ok((None, budget));
    };
    Ok((Some(Node::internal(left, right)), budget))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tree_for(data: &[u8]) -> HuffmanTree {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data).unwrap())
    }

    fn serialize(tree: &HuffmanTree) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        tree.write(&mut writer).unwrap();
        assert_eq!(writer.bits_written(), tree.serialized_bits());
        writer.finish().unwrap()
    }

    /// Strip frequencies so trees read back from a header compare equal.
    fn shape(node: &Node) -> Node {
        match node {
            Node::Leaf { symbol, .. } => Node::Leaf {
                symbol: *symbol,
                frequency: 0,
            },
            Node::Internal { left, right, .. } => Node::internal(shape(left), shape(right)),
        }
    }

    #[test]
    fn test_four_a() {
        let tree = tree_for(b"aaaa");
        let root = tree.root();
        let Node::Internal {
            frequency,
            left,
            right,
        } = root
        else {
            panic!("root should be internal");
        };
        assert_eq!(*frequency, 5);
        // Pseudo-EOF has the lower count and is removed first.
        assert_eq!(left.symbol(), Some(PSEUDO_EOF));
        assert_eq!(right.symbol(), Some(b'a' as u16));
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.internal_count(), 1);
        assert_eq!(tree.serialized_bits(), 21);
    }

    #[test]
    fn test_empty_input_is_single_leaf() {
        let tree = tree_for(b"");
        assert_eq!(tree.root().symbol(), Some(PSEUDO_EOF));
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_shape_invariants() {
        let tree = tree_for(b"abracadabra");
        // a b r c d + pseudo-EOF
        assert_eq!(tree.leaf_count(), 6);
        assert_eq!(tree.internal_count(), 5);
        assert_eq!(tree.root().frequency(), 12);
    }

    #[test]
    fn test_tie_break_uses_insertion_order() {
        // a, b, c, d all once, plus pseudo-EOF once: the first merge takes a and b.
        let tree = tree_for(b"dcba");
        fn find_parent_of_a(node: &Node) -> Option<(u16, u16)> {
            match node {
                Node::Leaf { .. } => None,
                Node::Internal { left, right, .. } => match (left.symbol(), right.symbol()) {
                    (Some(l), Some(r)) if l == b'a' as u16 || r == b'a' as u16 => Some((l, r)),
                    _ => find_parent_of_a(left).or_else(|| find_parent_of_a(right)),
                },
            }
        }
        assert_eq!(
            find_parent_of_a(tree.root()),
            Some((b'a' as u16, b'b' as u16))
        );
    }

    #[test]
    fn test_serialize_roundtrip() {
        let tree = tree_for(b"the quick brown fox jumps over the lazy dog");
        let bytes = serialize(&tree);
        let bit_len = tree.serialized_bits() as u32;

        let mut reader = BitReader::new(Cursor::new(bytes));
        let read = HuffmanTree::read(&mut reader, bit_len).unwrap();
        assert_eq!(shape(read.root()), shape(tree.root()));
        assert_eq!(reader.bits_read(), bit_len as u64);
    }

    #[test]
    fn test_serialized_four_a() {
        // 0 | 1 100000000 | 1 001100001
        let bytes = serialize(&tree_for(b"aaaa"));
        assert_eq!(bytes, vec![0b0110_0000, 0b0001_0011, 0b0000_1000]);
    }

    #[test]
    fn test_read_truncated_budget() {
        let tree = tree_for(b"hello");
        let bytes = serialize(&tree);
        let bit_len = tree.serialized_bits() as u32 - 1;

        let mut reader = BitReader::new(Cursor::new(bytes));
        let err = HuffmanTree::read(&mut reader, bit_len).unwrap_err();
        assert!(matches!(err, HuffError::InvalidHeader { .. }));
    }

    #[test]
    fn test_read_leftover_budget() {
        let tree = tree_for(b"hello");
        let mut bytes = serialize(&tree);
        bytes.extend_from_slice(&[0, 0]);
        let bit_len = tree.serialized_bits() as u32 + 3;

        let mut reader = BitReader::new(Cursor::new(bytes));
        let err = HuffmanTree::read(&mut reader, bit_len).unwrap_err();
        assert!(err.to_string().contains("left over"));
    }

    #[test]
    fn test_read_symbol_out_of_range() {
        // 0 | 1 111111111 | 1 100000000
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(false).unwrap();
        writer.write_bit(true).unwrap();
        writer.write_bits(0x1FF, 9).unwrap();
        writer.write_bit(true).unwrap();
        writer.write_bits(PSEUDO_EOF as u32, 9).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = BitReader::new(Cursor::new(bytes));
        let err = HuffmanTree::read(&mut reader, 21).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_read_lone_data_leaf_rejected() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        writer.write_bits(b'x' as u32, 9).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = BitReader::new(Cursor::new(bytes));
        assert!(HuffmanTree::read(&mut reader, 10).is_err());
    }

    #[test]
    fn test_read_oversized_length_rejected() {
        let mut reader = BitReader::new(Cursor::new(vec![0u8; 16]));
        let err = HuffmanTree::read(&mut reader, u32::MAX).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_read_deep_nesting_rejected() {
        // 300 internal markers in a row.
        let mut reader = BitReader::new(Cursor::new(vec![0u8; 64]));
        let err = HuffmanTree::read(&mut reader, 2000).unwrap_err();
        assert!(err.to_string().contains("deeper"));
    }

    #[test]
    fn test_read_stream_ends_inside_tree() {
        let mut reader = BitReader::new(Cursor::new(vec![0u8; 1]));
        let err = HuffmanTree::read(&mut reader, 100).unwrap_err();
        assert!(matches!(err, HuffError::InvalidHeader { .. }));
    }
}
