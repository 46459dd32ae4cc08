//! Move ordering heuristics.
//!
//! Priorities are summed per move and the list is sorted descending:
//! MVV-LVA for captures, promotion and development bonuses, central pawn
//! pushes, killer-move matches, and the history counter. A transposition
//! hint, when present, goes first regardless.

use crate::board::{Board, Move, Piece};
use crate::eval::piece_value;

use super::{Engine, HistoryTable, KillerTable, MAX_DEPTH};

const HINT_BONUS: i32 = 10_000;
const KILLER_PRIMARY_BONUS: i32 = 1000;
const KILLER_SECONDARY_BONUS: i32 = 900;
const PROMOTION_BONUS: i32 = 900;
const DEVELOPMENT_BONUS: i32 = 20;
const CENTRAL_PUSH_BONUS: i32 = 20;

pub(super) fn sort_moves(
    moves: &mut [Move],
    board: &Board,
    depth: u32,
    hint: Option<Move>,
    engine: &Engine,
) {
    let killers = engine.killers.lock();
    let history = engine.history.lock();

    let mut scored: Vec<(i32, Move)> = moves
        .iter()
        .map(|m| (priority(board, m, depth, hint, &killers, &history), *m))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    for (slot, (_, m)) in moves.iter_mut().zip(scored) {
        *slot = m;
    }
}

fn priority(
    board: &Board,
    m: &Move,
    depth: u32,
    hint: Option<Move>,
    killers: &KillerTable,
    history: &HistoryTable,
) -> i32 {
    let mut score = 0;
    let mover = board.piece_at(m.from);

    // MVV-LVA: prefer valuable victims taken by cheap attackers.
    if let Some((_, victim)) = board.piece_at(m.to) {
        let attacker = mover.map_or(0, |(_, piece)| piece_value(piece));
        score += piece_value(victim) - attacker / 10;
    }

    if m.promotion.is_some() {
        score += PROMOTION_BONUS;
    }

    if let Some((color, piece)) = mover {
        if matches!(piece, Piece::Knight | Piece::Bishop) {
            score += DEVELOPMENT_BONUS;
        }
        if piece == Piece::Pawn && (m.to.1 == 3 || m.to.1 == 4) && board.piece_at(m.to).is_none() {
            score += CENTRAL_PUSH_BONUS;
        }
        score += history.score(color, piece, m.to) / 100;
    }

    if (depth as usize) < MAX_DEPTH {
        if killers.primary(depth as usize) == Some(*m) {
            score += KILLER_PRIMARY_BONUS;
        } else if killers.secondary(depth as usize) == Some(*m) {
            score += KILLER_SECONDARY_BONUS;
        }
    }

    if hint == Some(*m) {
        score += HINT_BONUS;
    }

    score
}
