//! FEN serialisation and deserialisation.

use super::{Board, StateInfo, ALL_CASTLING_MASK, BLACK_OOO_MASK, BLACK_OO_MASK, WHITE_OOO_MASK, WHITE_OO_MASK};
use crate::{Color, InvalidFen, Piece, Sq};

const PIECE_CHARS: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];

/// Converts a position from algebraic notation.
fn alg_pos_to_sq(alg: &str) -> Option<Sq> {
    let arr = alg.as_bytes();
    if arr.len() != 2 {
        return None;
    }
    let file = arr[0].to_ascii_lowercase();
    let rank = arr[1];
    if (b'a'..=b'h').contains(&file) && (b'1'..=b'8').contains(&rank) {
        Some(Sq::file_rank(file - b'a', rank - b'1'))
    } else {
        None
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::from_fen(Self::START_POS_FEN).unwrap()
    }
}

impl Board {
    pub const START_POS_FEN: &'static str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Deserialize a position from a FEN string.
    ///
    /// ### Returns:
    /// * `Ok(Board)` on successful parse.
    /// * `Err(InvalidFen)` upon either parse error or illegal position.
    ///
    /// The full-move counter is accepted but not tracked; the board's ply
    /// count starts at zero.
    pub fn from_fen(fen: &str) -> Result<Self, InvalidFen> {
        if !fen.is_ascii() {
            return Err(InvalidFen("FEN must be ASCII"));
        }

        let mut split = fen.split_ascii_whitespace();
        let pieces = split.next().ok_or(InvalidFen("missing piece placement"))?;
        let color = split.next().ok_or(InvalidFen("missing side to move"))?;
        let castling = split.next().ok_or(InvalidFen("missing castling rights"))?;
        let en_passant = split.next().ok_or(InvalidFen("missing en passant square"))?;
        let half_move_clock = split.next().unwrap_or("0");
        let full_move = split.next().unwrap_or("1");

        let mut board = Board::empty();

        // piece placement runs from rank 8 down to rank 1
        let mut sq = 56i32;
        for c in pieces.chars() {
            if c == '/' {
                if sq % 8 != 0 {
                    return Err(InvalidFen("rank is not eight files wide"));
                }
                sq -= 16;
            } else if let Some(d) = c.to_digit(10) {
                sq += d as i32;
            } else {
                let pc = PIECE_CHARS
                    .iter()
                    .position(|&p| p == c)
                    .ok_or(InvalidFen("invalid piece letter"))?;
                if !(0..64).contains(&sq) {
                    return Err(InvalidFen("piece placement overflows the board"));
                }
                board.put_piece(Piece::from_index(pc as u8), Sq::new(sq as u8));
                sq += 1;
            }
            if sq > 64 || sq < -8 {
                return Err(InvalidFen("piece placement overflows the board"));
            }
        }

        board.stm = match color {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(InvalidFen("invalid side to move")),
        };

        let mut castle_mask = ALL_CASTLING_MASK;
        if castling != "-" {
            for c in castling.chars() {
                match c {
                    'K' => castle_mask &= !WHITE_OO_MASK,
                    'Q' => castle_mask &= !WHITE_OOO_MASK,
                    'k' => castle_mask &= !BLACK_OO_MASK,
                    'q' => castle_mask &= !BLACK_OOO_MASK,
                    _ => return Err(InvalidFen("invalid castling rights")),
                }
            }
        }

        let ep_square = match en_passant {
            "-" => None,
            alg => Some(alg_pos_to_sq(alg).ok_or(InvalidFen("invalid en passant square"))?),
        };

        let half_move_clock = half_move_clock
            .parse::<u16>()
            .map_err(|_| InvalidFen("invalid half-move clock"))?;
        full_move
            .parse::<u16>()
            .map_err(|_| InvalidFen("invalid full-move counter"))?;

        board.history[0] = StateInfo {
            hash: 0,
            captured: None,
            ep_square,
            castle_mask,
            half_move_clock,
        };
        board.hash = board.calc_hash();
        board.history[0].hash = board.hash;

        board.validate().map_err(InvalidFen)?;

        // the side that just moved must not still be in check
        let them = !board.stm;
        if board.attackers_to(board.king_sq(them), board.all(), board.stm) != 0 {
            return Err(InvalidFen("side not to move is in check"));
        }

        Ok(board)
    }

    /// Serialize the position to a FEN string. The full-move field is
    /// derived from the ply count, which starts at zero regardless of the
    /// parsed counter.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut blank_count = 0;
            for file in 0..8 {
                match self.piece_at(Sq::file_rank(file, rank)) {
                    Some(pc) => {
                        if blank_count > 0 {
                            fen.push_str(&blank_count.to_string());
                            blank_count = 0;
                        }
                        fen.push(PIECE_CHARS[pc.index()]);
                    }
                    None => blank_count += 1,
                }
            }
            if blank_count > 0 {
                fen.push_str(&blank_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.stm.is_white() { 'w' } else { 'b' });
        fen.push(' ');

        let castle_mask = self.state().castle_mask;
        let mut any = false;
        for (mask, c) in [
            (WHITE_OO_MASK, 'K'),
            (WHITE_OOO_MASK, 'Q'),
            (BLACK_OO_MASK, 'k'),
            (BLACK_OOO_MASK, 'q'),
        ] {
            if castle_mask & mask == 0 {
                fen.push(c);
                any = true;
            }
        }
        if !any {
            fen.push('-');
        }
        fen.push(' ');

        match self.state().ep_square {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.state().half_move_clock.to_string());
        fen.push(' ');
        fen.push_str(&(self.ply / 2 + 1).to_string());

        fen
    }
}
