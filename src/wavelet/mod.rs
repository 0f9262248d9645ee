//! This module implements a wavelet tree with pointer-linked nodes to support
//! rank, k-th order statistic, and range counting queries on a sequence of
//! bytes.
//!
//! Each node covers a closed alphabet interval `[low, high]` and stores one
//! routing bit per element of its subsequence: `0` sends the element to the
//! left child (symbols `<= mid`), `1` to the right child. Children are owned
//! directly by their parent, so dropping the handle tears the whole tree down
//! in one unit.

use serde::{Deserialize, Serialize};

use crate::bitvector::RankBitVector;
use crate::utils::{interval_mid, n_levels, stable_partition_by_mid};
use crate::{BuildUnsigned, KthUnsigned, RangeCountUnsigned, RankUnsigned, SpaceUsage};

#[derive(Clone, Serialize, Deserialize, Debug, Eq, PartialEq)]
struct Children {
    left: Node,
    right: Node,
}

/// A node covering the alphabet interval `[low, high]`.
///
/// `children` is `None` when the interval narrowed to one symbol or when no
/// element of the sequence falls in the interval; both cases stop descent.
#[derive(Clone, Serialize, Deserialize, Debug, Eq, PartialEq)]
struct Node {
    bitv: RankBitVector,
    low: u16,
    high: u16,
    children: Option<Box<Children>>,
}

impl Node {
    fn build(data: &[u8], low: u16, high: u16) -> Self {
        if low == high || data.is_empty() {
            return Self {
                bitv: RankBitVector::with_zeros(data.len()),
                low,
                high,
                children: None,
            };
        }

        let mid = interval_mid(low, high);
        let (bits, left, right) = stable_partition_by_mid(data, mid);
        let bitv = RankBitVector::new(&bits);

        // The partition buffers live exactly as long as the recursive calls
        // that consume them.
        let children = Children {
            left: Node::build(&left, low, mid),
            right: Node::build(&right, mid + 1, high),
        };

        Self {
            bitv,
            low,
            high,
            children: Some(Box::new(children)),
        }
    }

    fn range_count(&self, l: usize, r: usize, a: u16, b: u16) -> usize {
        if l >= r || b < self.low || a > self.high {
            return 0;
        }
        // Once the whole interval sits inside [a, b], every element counts;
        // this pruning keeps the walk at O(log sigma) instead of O(sigma).
        if a <= self.low && self.high <= b {
            return r - l;
        }

        let Some(children) = self.children.as_deref() else {
            return 0;
        };

        let l_ones = self.bitv.rank1(l);
        let r_ones = self.bitv.rank1(r);
        children.left.range_count(l - l_ones, r - r_ones, a, b)
            + children.right.range_count(l_ones, r_ones, a, b)
    }

    fn space_usage_bytes(&self) -> usize {
        let mut bytes = std::mem::size_of::<Self>() - std::mem::size_of::<RankBitVector>()
            + self.bitv.space_usage_bytes();
        if let Some(children) = self.children.as_deref() {
            bytes += children.left.space_usage_bytes() + children.right.space_usage_bytes();
        }
        bytes
    }
}

/// A static wavelet tree over bytes with pointer-linked node storage.
///
/// Built once over a sequence and an alphabet interval, then queried any
/// number of times without mutation, so shared references may be used from
/// any number of threads.
#[derive(Clone, Default, Serialize, Deserialize, Debug, Eq, PartialEq)]
pub struct WaveletTree {
    root: Option<Box<Node>>,
    n: usize,
    alphabet_low: u16,
    alphabet_high: u16,
}

impl WaveletTree {
    /// Builds the wavelet tree of `data` over the closed alphabet
    /// `[alphabet_low, alphabet_high]`. Every symbol of `data` must lie in
    /// the alphabet interval.
    ///
    /// An empty `data` or an inverted alphabet yields an empty tree, a valid
    /// index for which every query returns zero.
    ///
    /// # Examples
    /// ```
    /// use rwt::{RankUnsigned, WaveletTree};
    ///
    /// let data = vec![1u8, 0, 1, 0, 2, 4, 5, 3];
    /// let wt = WaveletTree::new(&data, 0, 5);
    ///
    /// assert_eq!(wt.len(), 8);
    /// assert_eq!(wt.rank(1, 4), 2);
    /// ```
    pub fn new(data: &[u8], alphabet_low: u16, alphabet_high: u16) -> Self {
        if data.is_empty() || alphabet_low > alphabet_high {
            return Self {
                root: None,
                n: 0,
                alphabet_low,
                alphabet_high,
            };
        }

        debug_assert!(data
            .iter()
            .all(|&s| alphabet_low <= s as u16 && s as u16 <= alphabet_high));

        Self {
            root: Some(Box::new(Node::build(data, alphabet_low, alphabet_high))),
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
}

impl BuildUnsigned for WaveletTree {
    fn build(data: &[u8], alphabet_low: u16, alphabet_high: u16) -> Self {
        WaveletTree::new(data, alphabet_low, alphabet_high)
    }
}

impl RankUnsigned for WaveletTree {
    /// Returns the number of occurrences of `symbol` in the sequence up to
    /// position `pos` excluded.
    ///
    /// # Examples
    /// ```
    /// use rwt::{RankUnsigned, WaveletTree};
    ///
    /// let wt = WaveletTree::new(&[2, 2, 2, 3, 3, 4, 4, 4], 0, 4);
    ///
    /// assert_eq!(wt.rank(2, 8), 3);
    /// assert_eq!(wt.rank(3, 5), 2);
    /// assert_eq!(wt.rank(9, 8), 0);
    /// ```
    #[inline]
    fn rank(&self, symbol: u8, pos: usize) -> usize {
        let symbol = symbol as u16;
        let Some(root) = self.root.as_deref() else {
            return 0;
        };
        if symbol < self.alphabet_low || symbol > self.alphabet_high || pos == 0 {
            return 0;
        }

        let mut node = root;
        let mut pos = pos;
        while let Some(children) = node.children.as_deref() {
            if symbol <= interval_mid(node.low, node.high) {
                pos = node.bitv.rank0(pos);
                node = &children.left;
            } else {
                pos = node.bitv.rank1(pos);
                node = &children.right;
            }
        }

        // Every element routed down to this node equals its interval, so the
        // carried position already is the count.
        pos
    }
}

impl KthUnsigned for WaveletTree {
    /// Returns the `k`-th smallest symbol (0-indexed) in `data[l..r)`.
    ///
    /// # Panics
    /// Panics on an empty tree or when `l > r`, `r > len`, or `k >= r - l`.
    ///
    /// # Examples
    /// ```
    /// use rwt::{KthUnsigned, WaveletTree};
    ///
    /// let wt = WaveletTree::new(&[5, 5, 5, 4, 4, 3, 3, 2, 1, 1, 0], 0, 5);
    ///
    /// assert_eq!(wt.kth(0, 11, 0), 0);
    /// assert_eq!(wt.kth(0, 11, 5), 3);
    /// ```
    fn kth(&self, l: usize, r: usize, k: usize) -> u8 {
        let root = self.root.as_deref().expect("kth on an empty tree");
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

        let (mut node, mut l, mut r, mut k) = (root, l, r, k);
        while let Some(children) = node.children.as_deref() {
            let l_ones = node.bitv.rank1(l);
            let r_ones = node.bitv.rank1(r);
            let ones = r_ones - l_ones;
            let zeros = (r - l) - ones;

            if k < zeros {
                l -= l_ones;
                r -= r_ones;
                node = &children.left;
            } else {
                l = l_ones;
                r = r_ones;
                k -= zeros;
                node = &children.right;
            }
        }

        node.low as u8
    }
}

impl RangeCountUnsigned for WaveletTree {
    /// Returns the number of positions in `[l..r)` holding a symbol in
    /// `[a, b]`.
    ///
    /// # Examples
    /// ```
    /// use rwt::{RangeCountUnsigned, WaveletTree};
    ///
    /// let wt = WaveletTree::new(&[1, 2, 3, 4, 5, 6, 7, 8, 9], 0, 9);
    ///
    /// assert_eq!(wt.range_count(0, 9, 3, 6), 4);
    /// assert_eq!(wt.range_count(3, 6, 0, 10), 3);
    /// ```
    fn range_count(&self, l: usize, r: usize, a: u8, b: u8) -> usize {
        let Some(root) = self.root.as_deref() else {
            return 0;
        };
        let (a, b) = (a as u16, b as u16);
        if l >= r || b < a || b < self.alphabet_low || a > self.alphabet_high {
            return 0;
        }

        root.range_count(
            l,
            r.min(self.n),
            a.max(self.alphabet_low),
            b.min(self.alphabet_high),
        )
    }
}

impl SpaceUsage for WaveletTree {
    /// Gives the space usage in bytes of the struct.
    fn space_usage_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self
                .root
                .as_deref()
                .map_or(0, |root| root.space_usage_bytes())
    }
}

#[cfg(test)]
mod tests;
