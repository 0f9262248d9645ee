//! This module implements the flattened wavelet tree layout: every node
//! lives in one growable array in preorder, and a node addresses its
//! children by slot index instead of an ownership link.
//!
//! A node is appended before its children are built, so the descendants of
//! the node at slot `i` occupy a contiguous index range starting at `i + 1`.
//! Root-to-leaf walks therefore touch nearby array slots, which is friendlier
//! to the cache than chasing independently allocated nodes. Queries answer
//! exactly as [`WaveletTree`](crate::WaveletTree) does; the layout is purely
//! a locality decision.

use serde::{Deserialize, Serialize};

use crate::bitvector::RankBitVector;
use crate::utils::{interval_mid, n_levels, prefetch_read_NTA, stable_partition_by_mid};
use crate::{BuildUnsigned, KthUnsigned, RangeCountUnsigned, RankUnsigned, SpaceUsage};

/// Slot value marking an absent child.
const NO_CHILD: u32 = u32::MAX;

/// A node of the flattened tree. Children are slots in the backing array,
/// `NO_CHILD` when the node stops descent (single-symbol interval or empty
/// subsequence); the two fields are always both set or both absent.
#[derive(Clone, Serialize, Deserialize, Debug, Eq, PartialEq)]
struct Node {
    bitv: RankBitVector,
    left_idx: u32,
    right_idx: u32,
    low: u16,
    high: u16,
}

/// A static wavelet tree over bytes with all nodes stored in one preorder
/// array.
#[derive(Clone, Default, Serialize, Deserialize, Debug, Eq, PartialEq)]
pub struct FlatWaveletTree {
    nodes: Vec<Node>,
    n: usize,
    alphabet_low: u16,
    alphabet_high: u16,
}

/// Appends the node for `data` over `[low, high]` and returns its slot.
///
/// The parent is pushed before either child is built, which fixes its slot
/// and keeps every subtree contiguous; the child slots are patched in once
/// the recursive calls return.
fn build_rec(nodes: &mut Vec<Node>, data: &[u8], low: u16, high: u16) -> u32 {
    if low == high || data.is_empty() {
        nodes.push(Node {
            bitv: RankBitVector::with_zeros(data.len()),
            left_idx: NO_CHILD,
            right_idx: NO_CHILD,
            low,
            high,
        });
        return (nodes.len() - 1) as u32;
    }

    let mid = interval_mid(low, high);
    let (bits, left, right) = stable_partition_by_mid(data, mid);

    let slot = nodes.len() as u32;
    nodes.push(Node {
        bitv: RankBitVector::new(&bits),
        left_idx: NO_CHILD,
        right_idx: NO_CHILD,
        low,
        high,
    });

    let left_idx = build_rec(nodes, &left, low, mid);
    let right_idx = build_rec(nodes, &right, mid + 1, high);
    nodes[slot as usize].left_idx = left_idx;
    nodes[slot as usize].right_idx = right_idx;

    slot
}

impl FlatWaveletTree {
    /// Builds the flattened wavelet tree of `data` over the closed alphabet
    /// `[alphabet_low, alphabet_high]`. Every symbol of `data` must lie in
    /// the alphabet interval.
    ///
    /// An empty `data` or an inverted alphabet yields an empty tree, a valid
    /// index for which every query returns zero.
    ///
    /// # Examples
    /// ```
    /// use rwt::{FlatWaveletTree, RankUnsigned};
    ///
    /// let data = vec![1u8, 0, 1, 0, 2, 4, 5, 3];
    /// let wt = FlatWaveletTree::new(&data, 0, 5);
    ///
    /// assert_eq!(wt.len(), 8);
    /// assert_eq!(wt.rank(1, 4), 2);
    /// ```
    pub fn new(data: &[u8], alphabet_low: u16, alphabet_high: u16) -> Self {
        if data.is_empty() || alphabet_low > alphabet_high {
            return Self {
                nodes: Vec::new(),
                n: 0,
                alphabet_low,
                alphabet_high,
            };
        }

        debug_assert!(data
            .iter()
            .all(|&s| alphabet_low <= s as u16 && s as u16 <= alphabet_high));

        let mut nodes = Vec::new();
        build_rec(&mut nodes, data, alphabet_low, alphabet_high);
        nodes.shrink_to_fit();

        Self {
            nodes,
            n: data.len(),
            alphabet_low,
            alphabet_high,
        }
    }

    /// Returns the length of the indexed sequence.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Checks if the indexed sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the number of levels of the tree.
    pub fn n_levels(&self) -> usize {
        n_levels(self.alphabet_low, self.alphabet_high)
    }

    /// Returns the closed alphabet interval the tree is complete over.
    pub fn alphabet(&self) -> (u16, u16) {
        (self.alphabet_low, self.alphabet_high)
    }

    /// Returns the number of node slots in the backing array.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    fn prefetch_children(&self, node: &Node) {
        prefetch_read_NTA(&self.nodes, node.left_idx as usize);
        prefetch_read_NTA(&self.nodes, node.right_idx as usize);
    }

    fn range_count_rec(&self, slot: u32, l: usize, r: usize, a: u16, b: u16) -> usize {
        if slot == NO_CHILD || l >= r {
            return 0;
        }
        let node = &self.nodes[slot as usize];
        if b < node.low || a > node.high {
            return 0;
        }
        if a <= node.low && node.high <= b {
            return r - l;
        }

        let l_ones = node.bitv.rank1(l);
        let r_ones = node.bitv.rank1(r);
        self.range_count_rec(node.left_idx, l - l_ones, r - r_ones, a, b)
            + self.range_count_rec(node.right_idx, l_ones, r_ones, a, b)
    }
}

impl BuildUnsigned for FlatWaveletTree {
    fn build(data: &[u8], alphabet_low: u16, alphabet_high: u16) -> Self {
        FlatWaveletTree::new(data, alphabet_low, alphabet_high)
    }
}

impl RankUnsigned for FlatWaveletTree {
    /// Returns the number of occurrences of `symbol` in the sequence up to
    /// position `pos` excluded.
    ///
    /// # Examples
    /// ```
    /// use rwt::{FlatWaveletTree, RankUnsigned};
    ///
    /// let wt = FlatWaveletTree::new(&[2, 2, 2, 3, 3, 4, 4, 4], 0, 4);
    ///
    /// assert_eq!(wt.rank(2, 8), 3);
    /// assert_eq!(wt.rank(3, 5), 2);
    /// ```
    #[inline]
    fn rank(&self, symbol: u8, pos: usize) -> usize {
        let symbol = symbol as u16;
        if self.nodes.is_empty()
            || symbol < self.alphabet_low
            || symbol > self.alphabet_high
            || pos == 0
        {
            return 0;
        }

        let mut slot = 0usize;
        let mut pos = pos;
        loop {
            let node = &self.nodes[slot];
            if node.left_idx == NO_CHILD {
                return pos;
            }
            self.prefetch_children(node);

            if symbol <= interval_mid(node.low, node.high) {
                pos = node.bitv.rank0(pos);
                slot = node.left_idx as usize;
            } else {
                pos = node.bitv.rank1(pos);
                slot = node.right_idx as usize;
            }
        }
    }
}

impl KthUnsigned for FlatWaveletTree {
    /// Returns the `k`-th smallest symbol (0-indexed) in `data[l..r)`.
    ///
    /// # Panics
    /// Panics on an empty tree or when `l > r`, `r > len`, or `k >= r - l`.
    ///
    /// # Examples
    /// ```
    /// use rwt::{FlatWaveletTree, KthUnsigned};
    ///
    /// let wt = FlatWaveletTree::new(&[5, 5, 5, 4, 4, 3, 3, 2, 1, 1, 0], 0, 5);
    ///
    /// assert_eq!(wt.kth(0, 11, 10), 5);
    /// ```
    fn kth(&self, l: usize, r: usize, k: usize) -> u8 {
        assert!(!self.nodes.is_empty(), "kth on an empty tree");
        assert!(
            l <= r && r <= self.n,
            "kth range [{l}, {r}) out of bounds for length {}",
            self.n
        );
        assert!(
            k < r - l,
            "kth order statistic {k} outside a range of length {}",
            r - l
        );

        let (mut slot, mut l, mut r, mut k) = (0usize, l, r, k);
        loop {
            let node = &self.nodes[slot];
            if node.left_idx == NO_CHILD {
                return node.low as u8;
            }
            self.prefetch_children(node);

            let l_ones = node.bitv.rank1(l);
            let r_ones = node.bitv.rank1(r);
            let ones = r_ones - l_ones;
            let zeros = (r - l) - ones;

            if k < zeros {
                l -= l_ones;
                r -= r_ones;
                slot = node.left_idx as usize;
            } else {
                l = l_ones;
                r = r_ones;
                k -= zeros;
                slot = node.right_idx as usize;
            }
        }
    }
}

impl RangeCountUnsigned for FlatWaveletTree {
    /// Returns the number of positions in `[l..r)` holding a symbol in
    /// `[a, b]`.
    ///
    /// # Examples
    /// ```
    /// use rwt::{FlatWaveletTree, RangeCountUnsigned};
    ///
    /// let wt = FlatWaveletTree::new(&[9, 9, 9, 9, 9], 0, 9);
    ///
    /// assert_eq!(wt.range_count(0, 5, 0, 8), 0);
    /// assert_eq!(wt.range_count(0, 5, 9, 9), 5);
    /// ```
    fn range_count(&self, l: usize, r: usize, a: u8, b: u8) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let (a, b) = (a as u16, b as u16);
        if l >= r || b < a || b < self.alphabet_low || a > self.alphabet_high {
            return 0;
        }

        self.range_count_rec(
            0,
            l,
            r.min(self.n),
            a.max(self.alphabet_low),
            b.min(self.alphabet_high),
        )
    }
}

impl SpaceUsage for FlatWaveletTree {
    /// Gives the space usage in bytes of the struct.
    fn space_usage_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self
                .nodes
                .iter()
                .map(|node| {
                    std::mem::size_of::<Node>() - std::mem::size_of::<RankBitVector>()
                        + node.bitv.space_usage_bytes()
                })
                .sum::<usize>()
    }
}
