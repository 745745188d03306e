//! Lazy enumeration of document orderings.
//!
//! Orderings are produced as index vectors in lexicographic order, starting
//! with the identity. Tie-breaking in the aligner relies on this order, so
//! it must stay stable for a given input length.

/// Iterator over permutations of `0..n` in lexicographic order.
///
/// A prefix of the ordering can be pinned, which restricts the iterator to
/// the contiguous block of the full order that starts with that prefix. The
/// parallel search uses this to shard the space by leading document.
#[derive(Debug, Clone)]
pub struct Permutations {
    indices: Vec<usize>,
    fixed: usize,
    done: bool,
}

impl Permutations {
    /// All permutations of `0..n`.
    ///
    /// For `n == 0` this yields exactly one empty ordering.
    pub fn new(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
            fixed: 0,
            done: false,
        }
    }

    /// Permutations of `0..n` whose first element is `first`.
    ///
    /// Yields nothing if `first >= n`.
    pub fn starting_with(n: usize, first: usize) -> Self {
        if first >= n {
            return Self {
                indices: Vec::new(),
                fixed: 0,
                done: true,
            };
        }

        let mut indices = Vec::with_capacity(n);
        indices.push(first);
        indices.extend((0..n).filter(|&i| i != first));

        Self {
            indices,
            fixed: 1,
            done: false,
        }
    }

    /// Advance the unpinned tail to the next lexicographic arrangement.
    ///
    /// Returns false once the tail is in descending order.
    fn advance(&mut self) -> bool {
        let tail = &mut self.indices[self.fixed..];
        if tail.len() < 2 {
            return false;
        }

        let Some(pivot) = (0..tail.len() - 1).rev().find(|&i| tail[i] < tail[i + 1]) else {
            return false;
        };

        let successor = (pivot + 1..tail.len())
            .rev()
            .find(|&j| tail[j] > tail[pivot])
            .unwrap_or(pivot + 1);

        tail.swap(pivot, successor);
        tail[pivot + 1..].reverse();
        true
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = self.indices.clone();
        if !self.advance() {
            self.done = true;
        }
        Some(current)
    }
}

/// Number of orderings of `n` documents, or `None` if it overflows `u64`.
pub fn permutation_count(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}
