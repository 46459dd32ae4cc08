//! Unit tests for the board, move generation, and move application.

use super::*;

fn kings_at(white: Square, black: Square) -> BoardBuilder {
    BoardBuilder::new()
        .piece(white, Color::White, Piece::King)
        .piece(black, Color::Black, Piece::King)
}

mod accessors {
    use super::*;

    #[test]
    fn test_initial_position_layout() {
        let board = Board::new();
        assert_eq!(
            board.get_piece(0, 4).unwrap(),
            Some((Color::White, Piece::King))
        );
        assert_eq!(
            board.get_piece(7, 3).unwrap(),
            Some((Color::Black, Piece::Queen))
        );
        for col in 0..8 {
            assert_eq!(
                board.get_piece(1, col).unwrap(),
                Some((Color::White, Piece::Pawn))
            );
            assert_eq!(
                board.get_piece(6, col).unwrap(),
                Some((Color::Black, Piece::Pawn))
            );
        }
        for row in 2..6 {
            for col in 0..8 {
                assert_eq!(board.get_piece(row, col).unwrap(), None);
            }
        }
        assert_eq!(board.castling_rights(), CastlingRights::all());
    }

    #[test]
    fn test_get_piece_out_of_range() {
        let board = Board::new();
        assert_eq!(
            board.get_piece(8, 0),
            Err(MoveError::OutOfRange { row: 8, col: 0 })
        );
        assert_eq!(
            board.get_piece(0, 8),
            Err(MoveError::OutOfRange { row: 0, col: 8 })
        );
    }

    #[test]
    fn test_set_piece_overwrites() {
        let mut board = Board::new();
        board
            .set_piece(3, 3, Some((Color::Black, Piece::Knight)))
            .unwrap();
        assert_eq!(
            board.get_piece(3, 3).unwrap(),
            Some((Color::Black, Piece::Knight))
        );
        assert!(board.set_piece(9, 9, None).is_err());
    }

    #[test]
    fn test_is_empty_off_board_is_false() {
        let board = Board::new();
        assert!(board.is_empty(4, 4));
        assert!(!board.is_empty(0, 0));
        assert!(!board.is_empty(-1, 0));
        assert!(!board.is_empty(0, 8));
    }

    #[test]
    fn test_display_diagram() {
        let rendered = Board::new().to_string();
        assert!(rendered.contains("a b c d e f g h"));
        assert!(rendered.starts_with("8 | r n b q k b n r"));
        assert!(rendered.contains("1 | R N B Q K B N R"));
    }

    #[test]
    fn test_clone_is_independent() {
        let board = Board::new();
        let mut copy = board.clone();
        copy.set_piece(4, 4, Some((Color::White, Piece::Queen))).unwrap();
        assert_eq!(board.get_piece(4, 4).unwrap(), None);
        assert_ne!(board, copy);
    }
}

mod attacks {
    use super::*;

    #[test]
    fn test_pawn_attacks_diagonally_forward() {
        let board = kings_at(Square(0, 0), Square(7, 7))
            .piece(Square(3, 3), Color::White, Piece::Pawn)
            .build();
        assert!(board.is_square_attacked(Square(4, 2), Color::White));
        assert!(board.is_square_attacked(Square(4, 4), Color::White));
        assert!(!board.is_square_attacked(Square(4, 3), Color::White));
        assert!(!board.is_square_attacked(Square(2, 2), Color::White));
    }

    #[test]
    fn test_sliding_attack_blocked() {
        let board = kings_at(Square(0, 0), Square(7, 7))
            .piece(Square(4, 0), Color::Black, Piece::Rook)
            .piece(Square(4, 3), Color::White, Piece::Knight)
            .build();
        assert!(board.is_square_attacked(Square(4, 2), Color::Black));
        assert!(board.is_square_attacked(Square(4, 3), Color::Black));
        assert!(!board.is_square_attacked(Square(4, 5), Color::Black));
    }

    #[test]
    fn test_knight_attack_jumps_over_pieces() {
        let board = kings_at(Square(0, 0), Square(7, 7))
            .piece(Square(3, 3), Color::Black, Piece::Knight)
            .piece(Square(3, 4), Color::White, Piece::Pawn)
            .piece(Square(4, 3), Color::White, Piece::Pawn)
            .build();
        assert!(board.is_square_attacked(Square(5, 4), Color::Black));
        assert!(board.is_square_attacked(Square(1, 2), Color::Black));
    }

    #[test]
    fn test_check_detection() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(4, 4), Color::Black, Piece::Rook)
            .build();
        assert!(board.is_king_in_check(Color::White));
        assert!(!board.is_king_in_check(Color::Black));
    }
}

mod movegen {
    use super::*;

    fn moves_from(board: &Board, color: Color, from: Square) -> Vec<Move> {
        board
            .generate_legal_moves(color)
            .into_iter()
            .filter(|m| m.from == from)
            .collect()
    }

    #[test]
    fn test_initial_position_has_twenty_moves() {
        let board = Board::new();
        assert_eq!(board.generate_legal_moves(Color::White).len(), 20);
        assert_eq!(board.generate_legal_moves(Color::Black).len(), 20);
    }

    #[test]
    fn test_pawn_double_step_only_from_start_row() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(1, 0), Color::White, Piece::Pawn)
            .piece(Square(2, 7), Color::White, Piece::Pawn)
            .build();
        let a_pawn = moves_from(&board, Color::White, Square(1, 0));
        assert!(a_pawn.contains(&Move::parse("a2a3").unwrap()));
        assert!(a_pawn.contains(&Move::parse("a2a4").unwrap()));
        let h_pawn = moves_from(&board, Color::White, Square(2, 7));
        assert_eq!(h_pawn.len(), 1);
        assert!(h_pawn.contains(&Move::parse("h3h4").unwrap()));
    }

    #[test]
    fn test_pawn_double_step_blocked_by_intermediate() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(1, 0), Color::White, Piece::Pawn)
            .piece(Square(2, 0), Color::Black, Piece::Knight)
            .build();
        let a_pawn = moves_from(&board, Color::White, Square(1, 0));
        assert!(a_pawn.iter().all(|m| m.to != Square(3, 0)));
        assert!(a_pawn.iter().all(|m| m.to != Square(2, 0)));
    }

    #[test]
    fn test_pawn_captures_diagonally() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(3, 3), Color::White, Piece::Pawn)
            .piece(Square(4, 2), Color::Black, Piece::Rook)
            .piece(Square(4, 4), Color::White, Piece::Knight)
            .build();
        let pawn = moves_from(&board, Color::White, Square(3, 3));
        assert!(pawn.contains(&Move::parse("d4c5").unwrap()));
        assert!(pawn.contains(&Move::parse("d4d5").unwrap()));
        assert!(!pawn.contains(&Move::parse("d4e5").unwrap()));
    }

    #[test]
    fn test_promotion_is_flagged_queen() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(6, 0), Color::White, Piece::Pawn)
            .build();
        let pawn = moves_from(&board, Color::White, Square(6, 0));
        assert_eq!(pawn.len(), 1);
        assert_eq!(pawn[0].promotion, Some(Piece::Queen));
    }

    #[test]
    fn test_moves_resolving_check_only() {
        // White king on e1 checked by a rook on e8; only king steps off
        // the e-file (and a block/capture if available) survive.
        let board = kings_at(Square(0, 4), Square(7, 0))
            .piece(Square(7, 4), Color::Black, Piece::Rook)
            .piece(Square(0, 0), Color::White, Piece::Rook)
            .build();
        let moves = board.generate_legal_moves(Color::White);
        assert!(!moves.is_empty());
        for m in &moves {
            let mut probe = board.clone();
            let mut candidate = *m;
            probe.make_move(&mut candidate).unwrap();
            assert!(!probe.is_king_in_check(Color::White), "move {m} leaves check");
        }
    }

    #[test]
    fn test_castling_available_when_conditions_met() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(0, 7), Color::White, Piece::Rook)
            .piece(Square(0, 0), Color::White, Piece::Rook)
            .castling(CastlingRights::all())
            .build();
        let moves = board.generate_legal_moves(Color::White);
        assert!(moves.contains(&Move::parse("e1g1").unwrap()));
        assert!(moves.contains(&Move::parse("e1c1").unwrap()));
    }

    #[test]
    fn test_castling_blocked_by_piece_between() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(0, 7), Color::White, Piece::Rook)
            .piece(Square(0, 6), Color::White, Piece::Knight)
            .castling(CastlingRights::all())
            .build();
        let moves = board.generate_legal_moves(Color::White);
        assert!(!moves.contains(&Move::parse("e1g1").unwrap()));
    }

    #[test]
    fn test_castling_through_attacked_square_forbidden() {
        // Black rook on f8 covers f1: the king would castle through check.
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(0, 7), Color::White, Piece::Rook)
            .piece(Square(7, 5), Color::Black, Piece::Rook)
            .castling(CastlingRights::all())
            .build();
        let moves = board.generate_legal_moves(Color::White);
        assert!(!moves.contains(&Move::parse("e1g1").unwrap()));
    }

    #[test]
    fn test_castling_out_of_check_forbidden() {
        let board = kings_at(Square(0, 4), Square(7, 0))
            .piece(Square(0, 7), Color::White, Piece::Rook)
            .piece(Square(7, 4), Color::Black, Piece::Queen)
            .castling(CastlingRights::all())
            .build();
        assert!(board.is_king_in_check(Color::White));
        let moves = board.generate_legal_moves(Color::White);
        assert!(!moves.contains(&Move::parse("e1g1").unwrap()));
    }

    #[test]
    fn test_castling_requires_right() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(0, 7), Color::White, Piece::Rook)
            .build();
        let moves = board.generate_legal_moves(Color::White);
        assert!(!moves.contains(&Move::parse("e1g1").unwrap()));
    }

    #[test]
    fn test_generated_moves_all_apply_cleanly() {
        let board = Board::new();
        for m in board.generate_legal_moves(Color::White) {
            let mut probe = board.clone();
            let mut candidate = m;
            assert!(probe.make_move(&mut candidate).is_ok(), "{m} failed to apply");
        }
    }
}

mod apply {
    use super::*;

    #[test]
    fn test_make_move_basic() {
        let mut board = Board::new();
        let mut mv = Move::parse("e2e4").unwrap();
        board.make_move(&mut mv).unwrap();
        assert_eq!(board.get_piece(1, 4).unwrap(), None);
        assert_eq!(
            board.get_piece(3, 4).unwrap(),
            Some((Color::White, Piece::Pawn))
        );
        assert_eq!(mv.captured, None);
        assert_eq!(mv.rights_before, Some(CastlingRights::all()));
    }

    #[test]
    fn test_make_move_rejects_empty_origin() {
        let mut board = Board::new();
        let mut mv = Move::parse("e4e5").unwrap();
        assert_eq!(
            board.make_move(&mut mv),
            Err(MoveError::EmptyOrigin { row: 3, col: 4 })
        );
    }

    #[test]
    fn test_make_move_rejects_out_of_range() {
        let mut board = Board::new();
        let mut mv = Move::new(Square(0, 4), Square(0, 8));
        assert_eq!(
            board.make_move(&mut mv),
            Err(MoveError::OutOfRange { row: 0, col: 8 })
        );
    }

    #[test]
    fn test_make_move_rejects_self_check_and_leaves_board_unchanged() {
        // White king e1, white rook e2 pinned by black rook e8.
        let board = kings_at(Square(0, 4), Square(7, 0))
            .piece(Square(1, 4), Color::White, Piece::Rook)
            .piece(Square(7, 4), Color::Black, Piece::Rook)
            .build();
        let mut probe = board.clone();
        let mut mv = Move::parse("e2a2").unwrap();
        assert_eq!(probe.make_move(&mut mv), Err(MoveError::LeavesKingInCheck));
        assert_eq!(probe, board);
    }

    #[test]
    fn test_capture_is_recorded() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(3, 3), Color::White, Piece::Bishop)
            .piece(Square(5, 5), Color::Black, Piece::Knight)
            .build();
        let mut probe = board.clone();
        let mut mv = Move::parse("d4f6").unwrap();
        probe.make_move(&mut mv).unwrap();
        assert_eq!(mv.captured, Some((Color::Black, Piece::Knight)));
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(6, 0), Color::White, Piece::Pawn)
            .build();
        let mut probe = board.clone();
        let mut mv = Move::parse("a7a8").unwrap();
        probe.make_move(&mut mv).unwrap();
        assert_eq!(
            probe.get_piece(7, 0).unwrap(),
            Some((Color::White, Piece::Queen))
        );
    }

    #[test]
    fn test_promotion_explicit_piece() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(6, 0), Color::White, Piece::Pawn)
            .build();
        let mut probe = board.clone();
        let mut mv = Move::parse("a7a8n").unwrap();
        probe.make_move(&mut mv).unwrap();
        assert_eq!(
            probe.get_piece(7, 0).unwrap(),
            Some((Color::White, Piece::Knight))
        );
    }

    #[test]
    fn test_castling_moves_rook() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(0, 7), Color::White, Piece::Rook)
            .castling(CastlingRights::all())
            .build();
        let mut probe = board.clone();
        let mut mv = Move::parse("e1g1").unwrap();
        probe.make_move(&mut mv).unwrap();
        assert!(mv.is_castling);
        assert_eq!(
            probe.get_piece(0, 6).unwrap(),
            Some((Color::White, Piece::King))
        );
        assert_eq!(
            probe.get_piece(0, 5).unwrap(),
            Some((Color::White, Piece::Rook))
        );
        assert_eq!(probe.get_piece(0, 7).unwrap(), None);
        assert!(!probe.castling_rights().has(Color::White, true));
        assert!(!probe.castling_rights().has(Color::White, false));
    }

    #[test]
    fn test_rook_move_clears_one_right() {
        let mut board = Board::new();
        // Open the h-file pawn first so the rook can move.
        let mut pawn = Move::parse("h2h4").unwrap();
        board.make_move(&mut pawn).unwrap();
        let mut rook = Move::parse("h1h3").unwrap();
        board.make_move(&mut rook).unwrap();
        assert!(!board.castling_rights().has(Color::White, true));
        assert!(board.castling_rights().has(Color::White, false));
    }

    #[test]
    fn test_rook_capture_clears_victims_right() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(0, 0), Color::White, Piece::Rook)
            .piece(Square(7, 0), Color::Black, Piece::Rook)
            .castling(CastlingRights::all())
            .build();
        let mut probe = board.clone();
        let mut mv = Move::parse("a1a8").unwrap();
        probe.make_move(&mut mv).unwrap();
        assert!(!probe.castling_rights().has(Color::Black, false));
        assert!(probe.castling_rights().has(Color::Black, true));
    }

    #[test]
    fn test_undo_restores_position() {
        let board = Board::new();
        for m in board.generate_legal_moves(Color::White) {
            let mut probe = board.clone();
            let mut applied = m;
            probe.make_move(&mut applied).unwrap();
            probe.undo_move(&applied);
            assert_eq!(probe, board, "undo of {m} did not restore the position");
        }
    }

    #[test]
    fn test_undo_restores_capture() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(3, 3), Color::White, Piece::Bishop)
            .piece(Square(5, 5), Color::Black, Piece::Knight)
            .build();
        let mut probe = board.clone();
        let mut mv = Move::parse("d4f6").unwrap();
        probe.make_move(&mut mv).unwrap();
        probe.undo_move(&mv);
        assert_eq!(probe, board);
    }

    #[test]
    fn test_undo_restores_promotion_as_pawn() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(6, 0), Color::White, Piece::Pawn)
            .build();
        let mut probe = board.clone();
        let mut mv = Move::parse("a7a8").unwrap();
        probe.make_move(&mut mv).unwrap();
        probe.undo_move(&mv);
        assert_eq!(probe, board);
    }

    #[test]
    fn test_undo_restores_castling() {
        let board = kings_at(Square(0, 4), Square(7, 4))
            .piece(Square(0, 7), Color::White, Piece::Rook)
            .piece(Square(0, 0), Color::White, Piece::Rook)
            .castling(CastlingRights::all())
            .build();
        for notation in ["e1g1", "e1c1"] {
            let mut probe = board.clone();
            let mut mv = Move::parse(notation).unwrap();
            probe.make_move(&mut mv).unwrap();
            probe.undo_move(&mv);
            assert_eq!(probe, board, "undo of {notation} did not restore");
        }
    }
}

mod playouts {
    use super::*;
    use rand::prelude::*;

    /// Random playouts: every applied move must leave the mover's king
    /// safe, and undoing the whole line must restore the start position.
    #[test]
    fn test_random_playout_round_trip() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..20 {
            let start = Board::new();
            let mut board = start.clone();
            let mut line: Vec<Move> = Vec::new();
            let mut side = Color::White;

            for _ in 0..40 {
                let moves = board.generate_legal_moves(side);
                if moves.is_empty() {
                    break;
                }
                let mut mv = moves[rng.gen_range(0..moves.len())];
                board.make_move(&mut mv).unwrap();
                assert!(!board.is_king_in_check(side));
                line.push(mv);
                side = side.opposite();
            }

            for mv in line.iter().rev() {
                board.undo_move(mv);
            }
            assert_eq!(board, start);
        }
    }

    #[test]
    fn test_fingerprint_stable_under_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = Board::new();
        let key_before = start.zobrist_key(Color::White);

        let mut board = start.clone();
        let mut side = Color::White;
        let mut line = Vec::new();
        for _ in 0..12 {
            let moves = board.generate_legal_moves(side);
            if moves.is_empty() {
                break;
            }
            let mut mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(&mut mv).unwrap();
            line.push(mv);
            side = side.opposite();
        }
        for mv in line.iter().rev() {
            board.undo_move(mv);
        }
        assert_eq!(board.zobrist_key(Color::White), key_before);
    }

    #[test]
    fn test_fingerprint_distinguishes_side_to_move() {
        let board = Board::new();
        assert_ne!(
            board.zobrist_key(Color::White),
            board.zobrist_key(Color::Black)
        );
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Any random legal line applies cleanly, never exposes the
        /// mover's king, and undoes back to the starting position.
        #[test]
        fn random_lines_apply_and_undo(seed in any::<u64>(), length in 1usize..24) {
            let mut rng = StdRng::seed_from_u64(seed);
            let start = Board::new();
            let mut board = start.clone();
            let mut side = Color::White;
            let mut line = Vec::new();

            for _ in 0..length {
                let moves = board.generate_legal_moves(side);
                if moves.is_empty() {
                    break;
                }
                let mut mv = moves[rng.gen_range(0..moves.len())];
                prop_assert!(board.make_move(&mut mv).is_ok());
                prop_assert!(!board.is_king_in_check(side));
                line.push(mv);
                side = side.opposite();
            }

            for mv in line.iter().rev() {
                board.undo_move(mv);
            }
            prop_assert_eq!(board, start);
        }
    }
}
