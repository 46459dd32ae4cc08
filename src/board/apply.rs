//! Move application and reversal.
//!
//! `make_move` validates coordinates and the origin, applies the move to a
//! scratch copy, and commits only if the mover's king is not left in
//! check; on any failure the board is untouched. The move's undo metadata
//! (captured piece, castling flag, prior castling rights) is filled in on
//! success so `undo_move` can restore the position exactly.

use super::{Board, Color, Move, MoveError, Piece, Square};

impl Board {
    /// Apply `mv`, enriching it with undo metadata on success.
    pub fn make_move(&mut self, mv: &mut Move) -> Result<(), MoveError> {
        for sq in [mv.from, mv.to] {
            if !sq.is_on_board() {
                return Err(MoveError::OutOfRange {
                    row: sq.0,
                    col: sq.1,
                });
            }
        }

        let (color, piece) = self.piece_at(mv.from).ok_or(MoveError::EmptyOrigin {
            row: mv.from.0,
            col: mv.from.1,
        })?;

        let rights_before = self.castling_rights();
        let is_castling =
            piece == Piece::King && mv.from.1.abs_diff(mv.to.1) == 2 && mv.from.0 == mv.to.0;
        let captured = self.piece_at(mv.to);

        let mut next = self.clone();
        next.place(mv.from, None);

        let landing = if piece == Piece::Pawn && mv.to.0 == color.promotion_rank() {
            (color, mv.promotion.unwrap_or(Piece::Queen))
        } else {
            (color, piece)
        };
        next.place(mv.to, Some(landing));

        if is_castling {
            // Short castling relocates the h-rook next to the king; long
            // castling the a-rook.
            let (rook_from, rook_to) = if mv.to.1 > mv.from.1 {
                (Square(mv.from.0, 7), Square(mv.from.0, mv.from.1 + 1))
            } else {
                (Square(mv.from.0, 0), Square(mv.from.0, mv.from.1 - 1))
            };
            let rook = next.piece_at(rook_from);
            next.place(rook_from, None);
            next.place(rook_to, rook);
        }

        next.update_castling_rights(color, piece, mv, captured);

        if next.is_king_in_check(color) {
            return Err(MoveError::LeavesKingInCheck);
        }

        *self = next;
        mv.captured = captured;
        mv.is_castling = is_castling;
        mv.rights_before = Some(rights_before);
        Ok(())
    }

    fn update_castling_rights(
        &mut self,
        color: Color,
        piece: Piece,
        mv: &Move,
        captured: Option<(Color, Piece)>,
    ) {
        let rights = self.castling_rights_mut();

        match piece {
            Piece::King => rights.clear_color(color),
            Piece::Rook => {
                if mv.from == Square(color.back_rank(), 0) {
                    rights.clear(color, false);
                } else if mv.from == Square(color.back_rank(), 7) {
                    rights.clear(color, true);
                }
            }
            _ => {}
        }

        // Capturing a rook on its home corner removes that side's right.
        if let Some((captured_color, Piece::Rook)) = captured {
            if mv.to == Square(captured_color.back_rank(), 0) {
                rights.clear(captured_color, false);
            } else if mv.to == Square(captured_color.back_rank(), 7) {
                rights.clear(captured_color, true);
            }
        }
    }

    /// Reverse a move previously applied by `make_move`.
    ///
    /// The move must carry the undo metadata `make_move` recorded;
    /// feeding a move that was never applied is a programmer error.
    pub fn undo_move(&mut self, mv: &Move) {
        let (color, piece_on_to) = self
            .piece_at(mv.to)
            .expect("undo_move: destination square is empty");

        let original = if mv.promotion.is_some() && mv.to.0 == color.promotion_rank() {
            (color, Piece::Pawn)
        } else {
            (color, piece_on_to)
        };

        self.place(mv.from, Some(original));
        self.place(mv.to, mv.captured);

        if mv.is_castling {
            let (rook_home, rook_moved) = if mv.to.1 > mv.from.1 {
                (Square(mv.from.0, 7), Square(mv.from.0, mv.from.1 + 1))
            } else {
                (Square(mv.from.0, 0), Square(mv.from.0, mv.from.1 - 1))
            };
            let rook = self.piece_at(rook_moved);
            self.place(rook_moved, None);
            self.place(rook_home, rook);
        }

        if let Some(rights) = mv.rights_before {
            self.set_castling_rights(rights);
        }
    }
}
