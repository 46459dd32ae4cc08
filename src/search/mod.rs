//! Alpha-beta search with transposition, killer, and history tables.
//!
//! White is the maximizing side. `Engine::find_best_move` searches the
//! requested depth with a quiescence extension at the horizon and a
//! wall-clock deadline polled at every node entry; past the deadline a
//! node returns its static evaluation and the tree unwinds normally, so
//! results above a truncated subtree may be partial.
//!
//! The engine value owns the three tables shared between searches. Each
//! sits behind its own mutex so a search running on a background thread
//! stays memory-safe against readers; the search itself is
//! single-threaded.

mod ordering;

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move, Piece, Square};
use crate::eval::{evaluate, MATE_SCORE};
use crate::timer::Deadline;
use crate::tt::{TranspositionTable, TtSnapshot};

/// Plies of killer-table coverage.
pub const MAX_DEPTH: usize = 64;

/// Default transposition table size in MB.
pub const DEFAULT_TT_MB: usize = 16;

const QUIESCENCE_DEPTH: u32 = 4;
const INFINITY: i32 = i32::MAX;

/// Statistics for one `find_best_move` call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    /// Nodes entered, counting both interior expansions and leaves.
    pub nodes_evaluated: u64,
    /// Wall-clock duration of the search.
    pub search_time: Duration,
}

/// Two killer slots per depth: quiet moves that caused a cutoff at that
/// depth, tried early at sibling nodes.
#[derive(Clone, Serialize, Deserialize)]
pub struct KillerTable {
    slots: Vec<[Option<Move>; 2]>,
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: vec![[None; 2]; MAX_DEPTH],
        }
    }

    #[must_use]
    pub fn primary(&self, depth: usize) -> Option<Move> {
        self.slots.get(depth).and_then(|row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, depth: usize) -> Option<Move> {
        self.slots.get(depth).and_then(|row| row[1])
    }

    pub fn update(&mut self, depth: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(depth) else {
            return;
        };
        if row[0] != Some(mv) {
            row[1] = row[0];
            row[0] = Some(mv);
        }
    }

    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = [None; 2];
        }
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Per (piece, destination) counters boosted on cutoffs, used as a soft
/// move-ordering prior. Rows are indexed `piece + 6 * color`.
#[derive(Clone)]
pub struct HistoryTable {
    counters: [[i32; 64]; 12],
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            counters: [[0; 64]; 12],
        }
    }

    fn row(color: Color, piece: Piece) -> usize {
        piece.index() + 6 * color.index()
    }

    #[must_use]
    pub fn score(&self, color: Color, piece: Piece, to: Square) -> i32 {
        self.counters[Self::row(color, piece)][to.index()]
    }

    pub fn bump(&mut self, color: Color, piece: Piece, to: Square, depth: u32) {
        let counter = &mut self.counters[Self::row(color, piece)][to.index()];
        *counter = counter.saturating_add((depth * depth) as i32);
    }

    pub fn reset(&mut self) {
        self.counters = [[0; 64]; 12];
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted engine state: transposition entries and killers.
///
/// The history table decays in usefulness too quickly to be worth
/// carrying across sessions and is not included.
#[derive(Serialize, Deserialize)]
struct PersistedTables {
    tt: TtSnapshot,
    killers: KillerTable,
}

/// Search state living for one game: the transposition table, killer
/// table, and history table, plus the root-selection seed.
///
/// The engine is owned by the controller and passed into searches
/// explicitly; resetting the game resets the tables.
pub struct Engine {
    tt: Mutex<TranspositionTable>,
    killers: Mutex<KillerTable>,
    history: Mutex<HistoryTable>,
    root_seed: Option<u64>,
}

impl Engine {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        Engine {
            tt: Mutex::new(TranspositionTable::new(tt_mb)),
            killers: Mutex::new(KillerTable::new()),
            history: Mutex::new(HistoryTable::new()),
            root_seed: None,
        }
    }

    /// Fix the root-selection RNG seed. Tests use this to make scenarios
    /// deterministic; unset, each search seeds from entropy.
    pub fn set_root_seed(&mut self, seed: Option<u64>) {
        self.root_seed = seed;
    }

    /// Clear all tables (game reset).
    pub fn reset(&self) {
        self.tt.lock().clear();
        self.killers.lock().reset();
        self.history.lock().reset();
    }

    /// Serialize the transposition and killer tables. The format is
    /// implementation-defined but round-trips byte-for-byte.
    pub fn save_tables(&self) -> serde_json::Result<Vec<u8>> {
        let persisted = PersistedTables {
            tt: self.tt.lock().to_snapshot(),
            killers: self.killers.lock().clone(),
        };
        serde_json::to_vec(&persisted)
    }

    /// Restore tables previously produced by [`save_tables`](Self::save_tables).
    pub fn load_tables(&self, bytes: &[u8]) -> serde_json::Result<()> {
        let persisted: PersistedTables = serde_json::from_slice(bytes)?;
        *self.tt.lock() = TranspositionTable::from_snapshot(persisted.tt);
        *self.killers.lock() = persisted.killers;
        Ok(())
    }

    /// Search `board` for the best move for `side` at `depth`.
    ///
    /// Returns the chosen move (or `None` when there is no legal move or
    /// the deadline expired before the root scored one) together with the
    /// search statistics. The caller's board is never mutated; the search
    /// works on copies.
    #[must_use]
    pub fn find_best_move(
        &self,
        board: &Board,
        depth: u32,
        side: Color,
        deadline: Deadline,
    ) -> (Option<Move>, SearchStats) {
        let start = Instant::now();
        let mut ctx = SearchContext {
            engine: self,
            deadline,
            nodes: 0,
        };

        let maximizing = side == Color::White;
        let outcome = ctx.minimax(board, depth, -INFINITY, INFINITY, maximizing, 0);

        let stats = SearchStats {
            nodes_evaluated: ctx.nodes,
            search_time: start.elapsed(),
        };
        (self.select_root_move(outcome.best_moves), stats)
    }

    /// Pick among the moves tied for the best root score: stable-sort by
    /// the opening heuristic (central destinations first), then draw one
    /// of the top three at random.
    fn select_root_move(&self, mut candidates: Vec<Move>) -> Option<Move> {
        const CENTRAL_DESTINATIONS: [Square; 4] =
            [Square(3, 3), Square(3, 4), Square(4, 3), Square(4, 4)];

        if candidates.is_empty() {
            return None;
        }
        candidates.sort_by_key(|m| usize::from(!CENTRAL_DESTINATIONS.contains(&m.to)));

        let top = candidates.len().min(3);
        let seed = self
            .root_seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        Some(candidates[rng.gen_range(0..top)])
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(DEFAULT_TT_MB)
    }
}

struct NodeOutcome {
    score: i32,
    best_moves: Vec<Move>,
}

struct SearchContext<'a> {
    engine: &'a Engine,
    deadline: Deadline,
    nodes: u64,
}

impl SearchContext<'_> {
    #[allow(clippy::too_many_lines)]
    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ply: u32,
    ) -> NodeOutcome {
        self.nodes += 1;

        // Sole cancellation point: past the deadline every node returns
        // its static evaluation and the tree unwinds.
        if self.deadline.expired() {
            return NodeOutcome {
                score: evaluate(board),
                best_moves: Vec::new(),
            };
        }

        let side = if maximizing { Color::White } else { Color::Black };
        let key = board.zobrist_key(side);

        let mut hint: Option<Move> = None;
        {
            let tt = self.engine.tt.lock();
            if let Some(entry) = tt.probe(key) {
                if entry.depth() >= depth {
                    return NodeOutcome {
                        score: entry.score(),
                        best_moves: entry.best_moves().to_vec(),
                    };
                }
                // Too shallow for a cutoff; still a good first try.
                hint = entry.best_moves().first().copied();
            }
        }

        if depth == 0 {
            return NodeOutcome {
                score: self.quiescence(board, alpha, beta, maximizing, QUIESCENCE_DEPTH),
                best_moves: Vec::new(),
            };
        }

        let mut moves = board.generate_legal_moves(side);
        if moves.is_empty() {
            let score = if board.is_king_in_check(side) {
                // Mated: the side to move loses. Subtracting the ply makes
                // nearer mates score larger, so the winner prefers the
                // shortest line.
                let mate = MATE_SCORE - ply as i32;
                if maximizing {
                    -mate
                } else {
                    mate
                }
            } else {
                evaluate(board)
            };
            return NodeOutcome {
                score,
                best_moves: Vec::new(),
            };
        }

        ordering::sort_moves(&mut moves, board, depth, hint, self.engine);

        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_moves: Vec<Move> = Vec::new();

        for m in &moves {
            let mut child = board.clone();
            let mut applied = *m;
            // A failing candidate was actually illegal; the legality
            // filter already makes this unreachable, so just skip it.
            if child.make_move(&mut applied).is_err() {
                continue;
            }

            let result = self.minimax(&child, depth - 1, alpha, beta, !maximizing, ply + 1);

            if maximizing {
                if result.score > best_score {
                    best_score = result.score;
                    best_moves.clear();
                    best_moves.push(*m);
                } else if result.score == best_score {
                    best_moves.push(*m);
                }
                alpha = alpha.max(best_score);
            } else {
                if result.score < best_score {
                    best_score = result.score;
                    best_moves.clear();
                    best_moves.push(*m);
                } else if result.score == best_score {
                    best_moves.push(*m);
                }
                beta = beta.min(best_score);
            }

            if alpha >= beta {
                self.record_cutoff(board, *m, depth);
                break;
            }
        }

        self.engine
            .tt
            .lock()
            .store(key, depth, best_score, best_moves.clone());

        NodeOutcome {
            score: best_score,
            best_moves,
        }
    }

    fn record_cutoff(&mut self, board: &Board, m: Move, depth: u32) {
        if (depth as usize) < MAX_DEPTH {
            self.engine.killers.lock().update(depth as usize, m);
        }
        if let Some((color, piece)) = board.piece_at(m.from) {
            self.engine.history.lock().bump(color, piece, m.to, depth);
        }
    }

    /// Quiescence: extend the horizon through noisy moves (captures,
    /// checks, promotions) so the leaf evaluation lands on a quiet
    /// position.
    fn quiescence(
        &mut self,
        board: &Board,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        remaining: u32,
    ) -> i32 {
        self.nodes += 1;

        if self.deadline.expired() || remaining == 0 {
            return evaluate(board);
        }

        let stand_pat = evaluate(board);
        if maximizing {
            if stand_pat >= beta {
                return beta;
            }
            alpha = alpha.max(stand_pat);
        } else {
            if stand_pat <= alpha {
                return alpha;
            }
            beta = beta.min(stand_pat);
        }

        let side = if maximizing { Color::White } else { Color::Black };
        let mut moves = board.generate_legal_moves(side);
        ordering::sort_moves(&mut moves, board, remaining, None, self.engine);

        for m in &moves {
            let is_capture = board.piece_at(m.to).is_some();
            let is_promotion = m.promotion.is_some();

            let mut child = board.clone();
            let mut applied = *m;
            if child.make_move(&mut applied).is_err() {
                continue;
            }
            let gives_check = child.is_king_in_check(Color::White)
                || child.is_king_in_check(Color::Black);
            if !is_capture && !is_promotion && !gives_check {
                continue;
            }

            let score = self.quiescence(&child, alpha, beta, !maximizing, remaining - 1);
            if maximizing {
                if score >= beta {
                    return beta;
                }
                alpha = alpha.max(score);
            } else {
                if score <= alpha {
                    return alpha;
                }
                beta = beta.min(score);
            }
        }

        if maximizing {
            alpha
        } else {
            beta
        }
    }
}
