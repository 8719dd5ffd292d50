//! Transposition table: one entry per index, depth-preferred replacement.

use std::mem::size_of;

use crate::Move;

/// Default table budget in MiB.
pub const TRANS_MEM_DEFAULT: usize = 16;

/// Alpha-beta score type of a stored node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    None,
    /// The full minimax score of the node.
    Exact,
    /// A lower bound from a node that failed high (score >= beta).
    Lower,
    /// An upper bound from a node that failed low (score <= alpha).
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub hash: u64,
    pub mv: Move,
    pub score: i16,
    pub depth: i8,
    pub bound: Bound,
}

impl Entry {
    const EMPTY: Entry = Entry {
        hash: 0,
        mv: Move::NULL,
        score: 0,
        depth: 0,
        bound: Bound::None,
    };
}

pub struct TransTable {
    entries: Box<[Entry]>,
}

impl TransTable {
    /// Returns a `Self` occupying up to the number of MiB specified.
    pub fn with_memory(mib: usize) -> Self {
        Self::with_capacity(mib * 1024 * 1024 / size_of::<Entry>())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: vec![Entry::EMPTY; capacity.max(1)].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    /// Returns the stored entry iff the full hash matches and its draft is
    /// at least `min_depth`.
    pub fn probe(&self, hash: u64, min_depth: i32) -> Option<Entry> {
        let entry = &self.entries[self.index(hash)];
        (entry.hash == hash && entry.bound != Bound::None && entry.depth as i32 >= min_depth)
            .then_some(*entry)
    }

    /// Write the slot if it is empty, holds the same position, or the new
    /// draft is at least as deep as the stored one.
    pub fn store(&mut self, hash: u64, mv: Move, score: i32, depth: i32, bound: Bound) {
        let index = self.index(hash);
        let entry = &mut self.entries[index];

        if entry.bound == Bound::None || entry.hash == hash || depth >= entry.depth as i32 {
            *entry = Entry {
                hash,
                mv,
                score: score.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
                depth: depth.clamp(i8::MIN as i32, i8::MAX as i32) as i8,
                bound,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MoveFlag, Sq};

    fn mv(from: Sq, to: Sq) -> Move {
        Move::new(from, to, MoveFlag::Quiet)
    }

    #[test]
    fn test_probe_miss_and_hit() {
        let mut tt = TransTable::with_capacity(1000);
        assert!(tt.probe(0xa09b67a, 0).is_none());

        tt.store(0xa09b67a, mv(Sq::E2, Sq::E4), 37, 5, Bound::Exact);
        let entry = tt.probe(0xa09b67a, 5).unwrap();
        assert_eq!(entry.mv, mv(Sq::E2, Sq::E4));
        assert_eq!(entry.score, 37);
        assert_eq!(entry.bound, Bound::Exact);

        // insufficient draft
        assert!(tt.probe(0xa09b67a, 6).is_none());
        // hash mismatch mapping to the same slot
        assert!(tt.probe(0xa09b67a + 1000, 0).is_none());
    }

    #[test]
    fn test_depth_preferred_replacement() {
        let mut tt = TransTable::with_capacity(1000);
        // two colliding keys
        let (h1, h2) = (7u64, 7u64 + 1000);

        tt.store(h1, mv(Sq::E2, Sq::E4), 1, 6, Bound::Exact);
        // shallower colliding store loses
        tt.store(h2, mv(Sq::D2, Sq::D4), 2, 3, Bound::Exact);
        assert_eq!(tt.probe(h1, 0).unwrap().score, 1);
        assert!(tt.probe(h2, 0).is_none());

        // an equal-depth colliding store wins
        tt.store(h2, mv(Sq::D2, Sq::D4), 2, 6, Bound::Exact);
        assert_eq!(tt.probe(h2, 0).unwrap().score, 2);
        assert!(tt.probe(h1, 0).is_none());

        // same position always updates
        tt.store(h2, mv(Sq::G1, Sq::F3), 3, 1, Bound::Lower);
        let entry = tt.probe(h2, 0).unwrap();
        assert_eq!(entry.score, 3);
        assert_eq!(entry.depth, 1);
        assert_eq!(entry.bound, Bound::Lower);
    }
}
