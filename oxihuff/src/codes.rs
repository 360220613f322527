//! Symbol-to-code mapping derived from a Huffman tree.

use crate::config::constants::SYMBOL_COUNT;
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};

/// The bit string assigned to each leaf symbol of a tree.
///
/// A left step contributes `false` (0), a right step `true` (1). Codes come
/// from the paths of a full binary tree and are therefore prefix-free. The
/// only empty code belongs to the pseudo-EOF leaf of a single-leaf tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Vec<bool>>>,
}

impl CodeTable {
    /// Collect the root-to-leaf paths of `tree`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        fn walk(node: &Node, path: &mut Vec<bool>, codes: &mut [Option<Vec<bool>>]) {
            match node {
                Node::Leaf { symbol, .. } => {
                    if let Some(slot) = codes.get_mut(*symbol as usize) {
                        *slot = Some(path.clone());
                    }
                }
                Node::Internal { left, right, .. } => {
                    path.push(false);
                    walk(left, path, codes);
                    path.pop();
                    path.push(true);
                    walk(right, path, codes);
                    path.pop();
                }
            }
        }

        let mut codes = vec![None; SYMBOL_COUNT];
        walk(tree.root(), &mut Vec::new(), &mut codes);
        Self { codes }
    }

    /// Code of `symbol`, if the symbol has a leaf.
    pub fn code(&self, symbol: u16) -> Option<&[bool]> {
        self.codes.get(symbol as usize)?.as_deref()
    }

    /// Code length of `symbol`, if the symbol has a leaf.
    pub fn code_len(&self, symbol: u16) -> Option<usize> {
        self.code(symbol).map(<[bool]>::len)
    }

    /// Code of `symbol` as a string of `0` and `1`.
    pub fn code_string(&self, symbol: u16) -> Option<String> {
        self.code(symbol)
            .map(|bits| bits.iter().map(|&b| if b { '1' } else { '0' }).collect())
    }

    /// Symbols that have a code, with their codes, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &[bool])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_deref().map(|bits| (symbol as u16, bits)))
    }

    /// Number of symbols that have a code.
    pub fn assigned(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// Bits needed to encode every counted symbol, pseudo-EOF included.
    pub fn body_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .present()
            .map(|(symbol, count)| count as u64 * self.code_len(symbol).unwrap_or(0) as u64)
            .sum()
    }
}
