//! Static evaluation.
//!
//! Scores are centipawns from White's point of view: positive favors
//! White. Terms: material, a center-bonus piece-square table for pawns
//! and minor pieces, a piece-count mobility proxy, a check penalty, and
//! king safety (enemy pressure near the king, pawn shield).

use crate::board::{Board, Color, Piece, Square};

/// Mate score magnitude used by the search.
pub const MATE_SCORE: i32 = 1_000_000;

const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;
const KING_VALUE: i32 = 20000;

const CHECK_PENALTY: i32 = 50;
const PAWN_SHIELD_BONUS: i32 = 10;

/// Center bonus for pawns, knights, and bishops. The table is symmetric
/// around the board's middle, so the vertical mirror applied for Black
/// keeps the bonus color-fair.
#[rustfmt::skip]
const CENTER_BONUS: [[i32; 8]; 8] = [
    [0, 0,  0,  0,  0,  0, 0, 0],
    [0, 5,  5,  5,  5,  5, 5, 0],
    [0, 5, 10, 10, 10, 10, 5, 0],
    [0, 5, 10, 20, 20, 10, 5, 0],
    [0, 5, 10, 20, 20, 10, 5, 0],
    [0, 5, 10, 10, 10, 10, 5, 0],
    [0, 5,  5,  5,  5,  5, 5, 0],
    [0, 0,  0,  0,  0,  0, 0, 0],
];

/// Simple material value of a piece.
#[must_use]
pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => KING_VALUE,
    }
}

/// Pressure a piece exerts on a nearby enemy king, before distance
/// scaling.
fn king_pressure(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 5,
        Piece::Knight => 10,
        Piece::Bishop => 15,
        Piece::Rook => 20,
        Piece::Queen => 30,
        Piece::King => 0,
    }
}

fn center_bonus(piece: Piece, square: Square, color: Color) -> i32 {
    match piece {
        Piece::Pawn | Piece::Knight | Piece::Bishop => {
            let row = match color {
                Color::White => square.0,
                Color::Black => 7 - square.0,
            };
            CENTER_BONUS[row][square.1]
        }
        _ => 0,
    }
}

fn chebyshev_distance(a: Square, b: Square) -> usize {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1))
}

/// King safety for one color: enemy pressure within Chebyshev distance 3
/// scaled down by distance, plus a bonus per friendly pawn in the 3x3
/// neighborhood of the king.
fn king_safety(board: &Board, color: Color) -> i32 {
    let Some(king_sq) = board.find_king(color) else {
        return 0;
    };

    let mut safety = 0;
    for row in 0..8 {
        for col in 0..8 {
            let sq = Square(row, col);
            let Some((piece_color, piece)) = board.piece_at(sq) else {
                continue;
            };
            let distance = chebyshev_distance(sq, king_sq);
            if piece_color != color {
                if (1..=3).contains(&distance) {
                    safety -= king_pressure(piece) / distance as i32;
                }
            } else if piece == Piece::Pawn && distance == 1 {
                safety += PAWN_SHIELD_BONUS;
            }
        }
    }
    safety
}

/// Static evaluation from White's perspective.
#[must_use]
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0;
    let mut white_pieces = 0;
    let mut black_pieces = 0;

    for row in 0..8 {
        for col in 0..8 {
            let sq = Square(row, col);
            let Some((color, piece)) = board.piece_at(sq) else {
                continue;
            };
            let term = piece_value(piece) + center_bonus(piece, sq, color);
            match color {
                Color::White => {
                    score += term;
                    white_pieces += 1;
                }
                Color::Black => {
                    score -= term;
                    black_pieces += 1;
                }
            }
        }
    }

    // Mobility proxy: piece-count difference. A deliberately cheap
    // surrogate for true mobility.
    score += (white_pieces - black_pieces) * 10;

    if board.is_king_in_check(Color::White) {
        score -= CHECK_PENALTY;
    }
    if board.is_king_in_check(Color::Black) {
        score += CHECK_PENALTY;
    }

    score += king_safety(board, Color::White);
    score -= king_safety(board, Color::Black);

    score
}
