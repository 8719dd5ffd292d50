//! UCI front-end. `go` runs the search synchronously and replies with
//! `bestmove`; the per-iteration `info` lines come from the search itself.

use std::io::Write;

use vampirc_uci::{
    CommunicationDirection, UciFen, UciMessage, UciMove, UciOptionConfig, UciPiece, UciSquare,
    UciTimeControl,
};

use crate::board::attacks;
use crate::{Board, Color, Move, MoveList, PieceType, Search, Sq};

/// Fallback budget when the GUI supplies no usable time control.
const DEFAULT_MOVE_TIME_MS: u32 = 1000;
/// Fraction of the remaining clock to spend on one move.
const CLOCK_FRACTION: u32 = 25;

pub fn uci() {
    attacks::init();

    // the position must be recalled across messages
    let mut position: Option<Board> = None;
    let mut hash_size_mb: usize = 16;

    let mut input = String::new();
    loop {
        input.clear();
        if std::io::stdin().read_line(&mut input).is_err() || input.is_empty() {
            return;
        }

        for message in vampirc_uci::parse_with_unknown(input.as_str()) {
            match message {
                UciMessage::Uci => uci_init(),
                UciMessage::IsReady => {
                    print!("{}\n", UciMessage::ReadyOk);
                }
                UciMessage::SetOption { name, value } => match name.as_str().trim() {
                    "Hash" => match value.and_then(|v| v.parse::<usize>().ok()) {
                        Some(v) => hash_size_mb = v.clamp(1, 2048),
                        None => eprintln!("invalid setoption Hash value"),
                    },
                    _ => eprintln!("unsupported option '{name}'"),
                },
                UciMessage::UciNewGame => position = None,
                UciMessage::Position { startpos, fen, moves } => {
                    position = uci_position(startpos, fen, moves);
                }
                UciMessage::Go { time_control, search_control: _ } => {
                    if let Some(board) = position.as_mut() {
                        let ms = allocate_ms(time_control, board.side_to_move());
                        let best = Search::with_memory(board, hash_size_mb).find_best_move(ms);

                        print!(
                            "{}\n",
                            UciMessage::BestMove {
                                best_move: to_uci_move(best),
                                ponder: None,
                            }
                        );
                        std::io::stdout().flush().expect("stdout flush error");
                    } else {
                        eprintln!("go before position");
                    }
                }
                UciMessage::Stop => (),
                UciMessage::Quit => return,
                UciMessage::PonderHit => (),
                UciMessage::Debug(_) => (),
                UciMessage::Unknown(text, _) => {
                    eprintln!("unknown message '{}'", text.trim());
                }
                message => {
                    if message.direction() != CommunicationDirection::EngineToGui {
                        eprintln!("unhandled engine-bound UCI message");
                    }
                }
            }
        }
    }
}

fn uci_init() {
    print!(
        "{}\n",
        UciMessage::Id {
            name: Some("Cinder".to_owned()),
            author: None,
        }
    );
    print!(
        "{}\n",
        UciMessage::Option(UciOptionConfig::Spin {
            name: "Hash".to_owned(),
            default: Some(16),
            min: Some(1),
            max: Some(2048),
        })
    );
    print!("{}\n", UciMessage::UciOk);
}

fn uci_position(startpos: bool, fen: Option<UciFen>, moves: Vec<UciMove>) -> Option<Board> {
    let mut board = if startpos {
        Board::default()
    } else if let Some(fen) = fen {
        match Board::from_fen(fen.as_str()) {
            Ok(board) => board,
            Err(err) => {
                eprintln!("{err}");
                return None;
            }
        }
    } else {
        eprintln!("position without startpos or fen");
        return None;
    };

    for uci_move in &moves {
        match from_uci_move(&mut board, uci_move) {
            Some(m) => board.make_move(m),
            None => {
                eprintln!("illegal move '{uci_move}'");
                return None;
            }
        }
    }

    Some(board)
}

fn allocate_ms(time_control: Option<UciTimeControl>, side: Color) -> u32 {
    match time_control {
        Some(UciTimeControl::MoveTime(duration)) => duration
            .to_std()
            .map_or(DEFAULT_MOVE_TIME_MS, |d| d.as_millis() as u32),
        Some(UciTimeControl::TimeLeft { white_time, black_time, .. }) => {
            let clock = match side {
                Color::White => white_time,
                Color::Black => black_time,
            };
            clock
                .and_then(|d| d.to_std().ok())
                .map_or(DEFAULT_MOVE_TIME_MS, |d| {
                    (d.as_millis() as u32 / CLOCK_FRACTION).max(50)
                })
        }
        Some(UciTimeControl::Infinite) | Some(UciTimeControl::Ponder) | None => {
            DEFAULT_MOVE_TIME_MS
        }
    }
}

/// Resolve a GUI move against the legal moves of the position.
fn from_uci_move(board: &mut Board, uci_move: &UciMove) -> Option<Move> {
    let from = Sq::file_rank(uci_move.from.file as u8 - b'a', uci_move.from.rank - 1);
    let to = Sq::file_rank(uci_move.to.file as u8 - b'a', uci_move.to.rank - 1);

    let mut moves = MoveList::new();
    board.gen_legal(&mut moves);

    let found = moves.iter().find(|m| {
        m.from() == from
            && m.to() == to
            && match uci_move.promotion {
                Some(piece) => m.is_promotion() && m.promo_piece() == from_uci_piece(piece),
                None => !m.is_promotion(),
            }
    });
    found
}

fn to_uci_move(m: Move) -> UciMove {
    UciMove {
        from: UciSquare {
            file: (m.from().file() + b'a') as char,
            rank: m.from().rank() + 1,
        },
        to: UciSquare {
            file: (m.to().file() + b'a') as char,
            rank: m.to().rank() + 1,
        },
        promotion: m.is_promotion().then(|| to_uci_piece(m.promo_piece())),
    }
}

fn to_uci_piece(ty: PieceType) -> UciPiece {
    match ty {
        PieceType::Pawn => UciPiece::Pawn,
        PieceType::Knight => UciPiece::Knight,
        PieceType::Bishop => UciPiece::Bishop,
        PieceType::Rook => UciPiece::Rook,
        PieceType::Queen => UciPiece::Queen,
        PieceType::King => UciPiece::King,
    }
}

fn from_uci_piece(piece: UciPiece) -> PieceType {
    match piece {
        UciPiece::Pawn => PieceType::Pawn,
        UciPiece::Knight => PieceType::Knight,
        UciPiece::Bishop => PieceType::Bishop,
        UciPiece::Rook => PieceType::Rook,
        UciPiece::Queen => PieceType::Queen,
        UciPiece::King => PieceType::King,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_with_moves() {
        let board = uci_position(
            true,
            None,
            vec![
                UciMove::from_to(
                    UciSquare { file: 'e', rank: 2 },
                    UciSquare { file: 'e', rank: 4 },
                ),
                UciMove::from_to(
                    UciSquare { file: 'e', rank: 7 },
                    UciSquare { file: 'e', rank: 5 },
                ),
            ],
        )
        .unwrap();

        assert!(board
            .to_fen()
            .starts_with("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w"));
    }

    #[test]
    fn test_rejects_illegal_move() {
        let board = uci_position(
            true,
            None,
            vec![UciMove::from_to(
                UciSquare { file: 'e', rank: 2 },
                UciSquare { file: 'e', rank: 5 },
            )],
        );
        assert!(board.is_none());
    }

    #[test]
    fn test_promotion_round_trip() {
        let mut board = Board::from_fen("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let uci_move = UciMove {
            from: UciSquare { file: 'e', rank: 7 },
            to: UciSquare { file: 'e', rank: 8 },
            promotion: Some(UciPiece::Queen),
        };

        let m = from_uci_move(&mut board, &uci_move).unwrap();
        assert!(m.is_promotion());
        assert_eq!(m.promo_piece(), PieceType::Queen);
        assert_eq!(to_uci_move(m), uci_move);
    }
}
