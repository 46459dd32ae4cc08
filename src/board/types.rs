//! Core value types: pieces, colors, squares, castling rights, and moves.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SquareError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Dense index 0..6, used by the Zobrist and history tables.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Piece::Pawn => 0,
            Piece::Knight => 1,
            Piece::Bishop => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::King => 5,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Dense index 0..2, used by the Zobrist and history tables.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// The back rank for this color (0 for White, 7 for Black).
    #[must_use]
    pub fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// The rank a pawn of this color promotes on.
    #[must_use]
    pub fn promotion_rank(self) -> usize {
        self.opposite().back_rank()
    }
}

/// A board coordinate as (row, col): row 0 is White's back rank, col 0 is
/// the a-file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Square(pub usize, pub usize);

impl Square {
    #[must_use]
    pub fn is_on_board(self) -> bool {
        self.0 < 8 && self.1 < 8
    }

    /// Flat 0..64 index (row * 8 + col).
    #[must_use]
    pub fn index(self) -> usize {
        self.0 * 8 + self.1
    }

    /// Parse algebraic notation like "e2".
    pub fn parse(notation: &str) -> Result<Square, SquareError> {
        let bytes = notation.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareError::InvalidNotation {
                notation: notation.to_string(),
            });
        }
        let file = bytes[0].wrapping_sub(b'a') as usize;
        let rank = bytes[1].wrapping_sub(b'1') as usize;
        if file >= 8 || rank >= 8 {
            return Err(SquareError::InvalidNotation {
                notation: notation.to_string(),
            });
        }
        Ok(Square(rank, file))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.1 as u8) as char,
            (b'1' + self.0 as u8) as char
        )
    }
}

/// Castling availability as four flags packed into a byte.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CastlingRights(u8);

const WHITE_KINGSIDE: u8 = 0b0001;
const WHITE_QUEENSIDE: u8 = 0b0010;
const BLACK_KINGSIDE: u8 = 0b0100;
const BLACK_QUEENSIDE: u8 = 0b1000;

impl CastlingRights {
    #[must_use]
    pub fn all() -> Self {
        CastlingRights(WHITE_KINGSIDE | WHITE_QUEENSIDE | BLACK_KINGSIDE | BLACK_QUEENSIDE)
    }

    #[must_use]
    pub fn none() -> Self {
        CastlingRights(0)
    }

    fn bit(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => WHITE_KINGSIDE,
            (Color::White, false) => WHITE_QUEENSIDE,
            (Color::Black, true) => BLACK_KINGSIDE,
            (Color::Black, false) => BLACK_QUEENSIDE,
        }
    }

    #[must_use]
    pub fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit(color, kingside) != 0
    }

    pub fn clear(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::bit(color, kingside);
    }

    /// Remove both castling rights for a color (king moved).
    pub fn clear_color(&mut self, color: Color) {
        self.clear(color, true);
        self.clear(color, false);
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

/// A move from one square to another.
///
/// The `captured`, `is_castling`, and `rights_before` fields are undo
/// metadata: they start out empty and are filled in by
/// [`Board::make_move`](super::Board::make_move) so the move can later be
/// reversed by [`Board::undo_move`](super::Board::undo_move).
///
/// Move identity (equality) is defined by origin, destination, and
/// promotion piece only; the undo metadata does not participate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Promotion piece for a pawn reaching the last rank. When unset,
    /// promotion defaults to a queen.
    pub promotion: Option<Piece>,
    /// Captured piece and its color, recorded by `make_move`.
    pub captured: Option<(Color, Piece)>,
    /// Set by `make_move` when the move was a castle (king moved two files).
    pub is_castling: bool,
    /// Castling rights before the move, recorded by `make_move`.
    pub rights_before: Option<CastlingRights>,
}

impl Move {
    #[must_use]
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            captured: None,
            is_castling: false,
            rights_before: None,
        }
    }

    #[must_use]
    pub fn with_promotion(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            promotion: Some(piece),
            ..Move::new(from, to)
        }
    }

    /// Parse coordinate notation like "e2e4" or "a7a8q".
    pub fn parse(notation: &str) -> Result<Move, SquareError> {
        if !notation.is_ascii() || (notation.len() != 4 && notation.len() != 5) {
            return Err(SquareError::InvalidNotation {
                notation: notation.to_string(),
            });
        }
        let from = Square::parse(&notation[0..2])?;
        let to = Square::parse(&notation[2..4])?;
        let promotion = match notation.as_bytes().get(4) {
            None => None,
            Some(b'n') => Some(Piece::Knight),
            Some(b'b') => Some(Piece::Bishop),
            Some(b'r') => Some(Piece::Rook),
            Some(b'q') => Some(Piece::Queen),
            Some(_) => {
                return Err(SquareError::InvalidNotation {
                    notation: notation.to_string(),
                })
            }
        };
        Ok(Move {
            promotion,
            ..Move::new(from, to)
        })
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
