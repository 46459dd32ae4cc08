//! Legal move generation.
//!
//! Pseudo-legal moves are enumerated per piece, then filtered by applying
//! each candidate to a copy of the board: a candidate survives iff the
//! application succeeds, which includes the own-king-safety check inside
//! `make_move`. No pinned-piece analysis is needed.

use super::{Board, Color, Move, Piece, Square};

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const DIAGONAL_DIRECTIONS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const STRAIGHT_DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

impl Board {
    /// All fully legal moves for `color`. Output order is unspecified;
    /// consumers sort.
    #[must_use]
    pub fn generate_legal_moves(&self, color: Color) -> Vec<Move> {
        let pseudo = self.generate_pseudo_moves(color);
        let mut legal = Vec::with_capacity(pseudo.len());
        for m in pseudo {
            let mut probe = self.clone();
            let mut candidate = m;
            if probe.make_move(&mut candidate).is_ok() {
                legal.push(m);
            }
        }
        legal
    }

    /// Pseudo-legal moves for every piece of `color` (no king-safety
    /// filter; castling is already restricted to not pass through check).
    #[must_use]
    pub(crate) fn generate_pseudo_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for row in 0..8 {
            for col in 0..8 {
                if let Some((piece_color, piece)) = self.piece_at(Square(row, col)) {
                    if piece_color == color {
                        self.generate_piece_moves(Square(row, col), color, piece, &mut moves);
                    }
                }
            }
        }
        moves
    }

    /// Pseudo-legal moves for a single piece.
    pub(crate) fn generate_piece_moves(
        &self,
        from: Square,
        color: Color,
        piece: Piece,
        moves: &mut Vec<Move>,
    ) {
        match piece {
            Piece::Pawn => self.pawn_moves(from, color, moves),
            Piece::Knight => self.step_moves(from, color, &KNIGHT_DELTAS, moves),
            Piece::Bishop => self.sliding_moves(from, color, &DIAGONAL_DIRECTIONS, moves),
            Piece::Rook => self.sliding_moves(from, color, &STRAIGHT_DIRECTIONS, moves),
            Piece::Queen => {
                self.sliding_moves(from, color, &STRAIGHT_DIRECTIONS, moves);
                self.sliding_moves(from, color, &DIAGONAL_DIRECTIONS, moves);
            }
            Piece::King => {
                self.step_moves(from, color, &KING_DELTAS, moves);
                self.castling_moves(from, color, moves);
            }
        }
    }

    fn pawn_moves(&self, from: Square, color: Color, moves: &mut Vec<Move>) {
        let direction: isize = if color == Color::White { 1 } else { -1 };
        let start_row = match color {
            Color::White => 1,
            Color::Black => 6,
        };
        let row = from.0 as isize;
        let col = from.1 as isize;

        if self.is_empty(row + direction, col) {
            self.push_pawn_move(from, Square((row + direction) as usize, from.1), color, moves);

            if from.0 == start_row && self.is_empty(row + 2 * direction, col) {
                self.push_pawn_move(
                    from,
                    Square((row + 2 * direction) as usize, from.1),
                    color,
                    moves,
                );
            }
        }

        for dc in [-1, 1] {
            let (r, c) = (row + direction, col + dc);
            if !(0..8).contains(&r) || !(0..8).contains(&c) {
                continue;
            }
            let target = Square(r as usize, c as usize);
            if let Some((target_color, _)) = self.piece_at(target) {
                if target_color != color {
                    self.push_pawn_move(from, target, color, moves);
                }
            }
        }
    }

    /// Pawn moves to the last rank are marked as queen promotions;
    /// under-promotion is not searched.
    fn push_pawn_move(&self, from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
        if to.0 == color.promotion_rank() {
            moves.push(Move::with_promotion(from, to, Piece::Queen));
        } else {
            moves.push(Move::new(from, to));
        }
    }

    fn step_moves(
        &self,
        from: Square,
        color: Color,
        deltas: &[(isize, isize)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in deltas {
            let (r, c) = (from.0 as isize + dr, from.1 as isize + dc);
            if !(0..8).contains(&r) || !(0..8).contains(&c) {
                continue;
            }
            let target = Square(r as usize, c as usize);
            match self.piece_at(target) {
                None => moves.push(Move::new(from, target)),
                Some((target_color, _)) if target_color != color => {
                    moves.push(Move::new(from, target));
                }
                Some(_) => {}
            }
        }
    }

    fn sliding_moves(
        &self,
        from: Square,
        color: Color,
        directions: &[(isize, isize)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in directions {
            let mut r = from.0 as isize + dr;
            let mut c = from.1 as isize + dc;
            while (0..8).contains(&r) && (0..8).contains(&c) {
                let target = Square(r as usize, c as usize);
                match self.piece_at(target) {
                    None => moves.push(Move::new(from, target)),
                    Some((target_color, _)) => {
                        if target_color != color {
                            moves.push(Move::new(from, target));
                        }
                        break;
                    }
                }
                r += dr;
                c += dc;
            }
        }
    }

    /// Castling: king and rook on their home squares with the matching
    /// right intact, the squares between them empty, and the king's
    /// start, transit, and landing squares unattacked.
    fn castling_moves(&self, from: Square, color: Color, moves: &mut Vec<Move>) {
        let home = Square(color.back_rank(), 4);
        if from != home {
            return;
        }
        let row = home.0;
        let opponent = color.opposite();

        if self.is_king_in_check(color) {
            return;
        }

        // Kingside: f and g files empty, rook on h, e/f/g unattacked.
        if self.castling_rights().has(color, true)
            && self.is_empty(row as isize, 5)
            && self.is_empty(row as isize, 6)
            && self.piece_at(Square(row, 7)) == Some((color, Piece::Rook))
            && !self.is_square_attacked(Square(row, 5), opponent)
            && !self.is_square_attacked(Square(row, 6), opponent)
        {
            moves.push(Move::new(from, Square(row, 6)));
        }

        // Queenside: b, c, d files empty, rook on a, e/d/c unattacked.
        if self.castling_rights().has(color, false)
            && self.is_empty(row as isize, 1)
            && self.is_empty(row as isize, 2)
            && self.is_empty(row as isize, 3)
            && self.piece_at(Square(row, 0)) == Some((color, Piece::Rook))
            && !self.is_square_attacked(Square(row, 3), opponent)
            && !self.is_square_attacked(Square(row, 2), opponent)
        {
            moves.push(Move::new(from, Square(row, 2)));
        }
    }
}
