// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
    fmt::Debug,
};

use crate::{
    bit_reader::BitReader,
    bit_writer::BitWriter,
    error::{Error, Result},
};

/// Longest code a [Codebook] can hold.
pub const MAX_CODE_LENGTH: usize = 64;

/// Occurrence counts of the symbols of one sub-stream, in ascending
/// symbol order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable<S: Ord> {
    counts: BTreeMap<S, u32>,
}

impl<S: Ord> Default for FrequencyTable<S> {
    fn default() -> Self {
        FrequencyTable {
            counts: BTreeMap::new(),
        }
    }
}

impl<S: Ord + Copy + Debug> FrequencyTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_symbols<I: IntoIterator<Item = S>>(symbols: I) -> Result<Self> {
        let mut table = Self::new();
        for s in symbols {
            table.add(s)?;
        }
        Ok(table)
    }

    pub fn add(&mut self, symbol: S) -> Result<()> {
        let count = self.counts.entry(symbol).or_insert(0);
        *count = count.checked_add(1).ok_or(Error::ArithmeticOverflow)?;
        Ok(())
    }

    /// Sets the count of `symbol`, replacing any previous value.
    pub fn insert(&mut self, symbol: S, count: u32) {
        self.counts.insert(symbol, count);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, symbol: &S) -> u32 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, u32)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

#[derive(Clone, Debug)]
enum Node<S> {
    Leaf(S),
    Internal { left: usize, right: usize },
}

/// Huffman tree built from a [FrequencyTable].
///
/// Leaves are created in ascending symbol order; nodes are merged lowest
/// frequency first, and equal frequencies are ordered by creation. The
/// first of the two merged nodes becomes the left (`0`) child. Given the
/// same table, the encoder and the decoder always build the same tree.
#[derive(Clone, Debug)]
pub struct HuffmanTree<S> {
    // Node index doubles as creation order.
    nodes: Vec<Node<S>>,
    root: usize,
}

impl<S: Ord + Copy + Debug> HuffmanTree<S> {
    /// Symbols with a zero count get no leaf.
    pub fn build(table: &FrequencyTable<S>) -> Result<Self> {
        let mut nodes = Vec::with_capacity(table.len() * 2);
        let mut heap = BinaryHeap::with_capacity(table.len());
        for (symbol, count) in table.iter().filter(|&(_, c)| c > 0) {
            heap.push(Reverse((count as u64, nodes.len())));
            nodes.push(Node::Leaf(symbol));
        }
        if nodes.is_empty() {
            return Err(Error::EmptyFrequencyTable);
        }
        while let (Some(Reverse((fl, left))), Some(Reverse((fr, right)))) = (heap.pop(), heap.pop())
        {
            heap.push(Reverse((fl + fr, nodes.len())));
            nodes.push(Node::Internal { left, right });
        }
        let root = nodes.len() - 1;
        Ok(HuffmanTree { nodes, root })
    }

    /// Whether the tree has a single symbol, whose code is empty.
    pub fn is_degenerate(&self) -> bool {
        matches!(self.nodes[self.root], Node::Leaf(_))
    }

    /// Assigns every leaf the bits of its root-to-leaf path.
    pub fn codebook(&self) -> Result<Codebook<S>> {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(self.root, 0u64, 0usize)];
        while let Some((node, code, len)) = stack.pop() {
            match self.nodes[node] {
                Node::Leaf(symbol) => {
                    codes.insert(symbol, (code, len));
                }
                Node::Internal { left, right } => {
                    if len == MAX_CODE_LENGTH {
                        return Err(Error::HuffmanCodeTooLong(MAX_CODE_LENGTH));
                    }
                    stack.push((right, (code << 1) | 1, len + 1));
                    stack.push((left, code << 1, len + 1));
                }
            }
        }
        Ok(Codebook { codes })
    }

    /// Walks the tree one bit at a time from the root until a leaf is
    /// reached. A degenerate tree consumes no bits.
    pub fn read_symbol(&self, br: &mut BitReader) -> Result<S> {
        let mut node = self.root;
        loop {
            match self.nodes[node] {
                Node::Leaf(symbol) => return Ok(symbol),
                Node::Internal { left, right } => {
                    if br.total_bits_available() == 0 {
                        return Err(Error::IncompleteHuffmanCode);
                    }
                    node = if br.read_bit()? { right } else { left };
                }
            }
        }
    }
}

/// Symbol to `(code, length)` map, codes right-aligned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Codebook<S: Ord> {
    codes: BTreeMap<S, (u64, usize)>,
}

impl<S: Ord + Copy + Debug> Codebook<S> {
    pub fn code(&self, symbol: &S) -> Result<(u64, usize)> {
        self.codes
            .get(symbol)
            .copied()
            .ok_or_else(|| Error::SymbolNotInTable(format!("{symbol:?}")))
    }

    pub fn write_symbol(&self, bw: &mut BitWriter, symbol: &S) -> Result<()> {
        let (code, len) = self.code(symbol)?;
        bw.put_long_bits(code, len);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes as `0`/`1` strings, handy for inspection.
    pub fn to_strings(&self) -> BTreeMap<S, String> {
        self.codes
            .iter()
            .map(|(&s, &(code, len))| {
                let bits = (0..len)
                    .rev()
                    .map(|i| if (code >> i) & 1 == 1 { '1' } else { '0' })
                    .collect();
                (s, bits)
            })
            .collect()
    }
}
