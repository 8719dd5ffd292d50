//! Triangular principal variation table.

use crate::{Move, MAX_PLY};

#[derive(Clone)]
struct PvLine {
    moves: [Move; MAX_PLY],
    len: usize,
}

impl PvLine {
    const fn new() -> Self {
        Self { moves: [Move::NULL; MAX_PLY], len: 0 }
    }
}

/// One candidate line per ply; a move that raises alpha prepends itself to
/// the child's line.
pub struct PvTable {
    lines: Vec<PvLine>,
}

impl PvTable {
    pub fn new() -> Self {
        Self { lines: vec![PvLine::new(); MAX_PLY + 1] }
    }

    /// Forget all lines.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.len = 0;
        }
    }

    /// Truncate the line at `ply`, done on entering a node.
    #[inline]
    pub fn clear_ply(&mut self, ply: usize) {
        self.lines[ply].len = 0;
    }

    /// Prepend `m` at `ply`, adopting the continuation collected one ply
    /// deeper.
    pub fn update(&mut self, ply: usize, m: Move) {
        let (head, tail) = self.lines.split_at_mut(ply + 1);
        let line = &mut head[ply];
        let child = &tail[0];

        line.moves[0] = m;
        line.moves[1..=child.len].copy_from_slice(&child.moves[..child.len]);
        line.len = child.len + 1;
    }

    /// The best root move collected so far, or the null move if none.
    pub fn best_move(&self) -> Move {
        if self.lines[0].len > 0 {
            self.lines[0].moves[0]
        } else {
            Move::NULL
        }
    }

    pub fn line(&self, ply: usize) -> &[Move] {
        &self.lines[ply].moves[..self.lines[ply].len]
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
    fn test_pv_collection() {
        let mut pv = PvTable::new();

        // backing out of a three-ply line
        pv.update(2, mv(Sq::B8, Sq::C6));
        pv.update(1, mv(Sq::G1, Sq::F3));
        pv.update(0, mv(Sq::E2, Sq::E4));

        assert_eq!(pv.best_move(), mv(Sq::E2, Sq::E4));
        assert_eq!(
            pv.line(0),
            &[mv(Sq::E2, Sq::E4), mv(Sq::G1, Sq::F3), mv(Sq::B8, Sq::C6)]
        );

        pv.reset();
        assert_eq!(pv.best_move(), Move::NULL);
        assert!(pv.line(0).is_empty());
    }

    #[test]
    fn test_child_line_replacement() {
        let mut pv = PvTable::new();
        pv.update(1, mv(Sq::G1, Sq::F3));
        pv.update(0, mv(Sq::E2, Sq::E4));

        // a new best at ply 0 with an empty child line
        pv.clear_ply(1);
        pv.update(0, mv(Sq::D2, Sq::D4));
        assert_eq!(pv.line(0), &[mv(Sq::D2, Sq::D4)]);
    }
}
