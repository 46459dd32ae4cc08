//! Game controller implementation.
//!
//! Owns the current board, the move history, the repetition counter, and
//! the search engine. Side to move is derived from move-count parity;
//! White starts. After every applied move the controller classifies the
//! position for the side to move next: checkmate, stalemate, or draw by
//! threefold repetition.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};

use crate::board::{Board, Color, Move, MoveError};
use crate::search::{Engine, SearchStats};
use crate::timer::Deadline;

pub const DEFAULT_AI_DEPTH: u32 = 4;
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10);

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    ThreefoldRepetition,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner: Color::White } => write!(f, "checkmate, White wins"),
            GameOutcome::Checkmate { winner: Color::Black } => write!(f, "checkmate, Black wins"),
            GameOutcome::Stalemate => write!(f, "stalemate"),
            GameOutcome::ThreefoldRepetition => write!(f, "draw by threefold repetition"),
        }
    }
}

/// Error type for controller-level move handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The game already ended.
    GameOver,
    /// The move is not legal for the side to move.
    IllegalMove { mv: Move },
    /// Move application failed.
    Move(MoveError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::GameOver => write!(f, "The game is over"),
            GameError::IllegalMove { mv } => write!(f, "Illegal move '{mv}'"),
            GameError::Move(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<MoveError> for GameError {
    fn from(err: MoveError) -> Self {
        GameError::Move(err)
    }
}

/// Glue between an external move source (UI, console, protocol adapter)
/// and the engine core.
pub struct GameController {
    board: Board,
    engine: Engine,
    /// Position the running game started from (undo replays from here).
    initial_board: Board,
    initial_side: Color,
    move_count: u32,
    history: Vec<Move>,
    repetitions: HashMap<u64, u32>,
    outcome: Option<GameOutcome>,
    ai_color: Color,
    ai_depth: u32,
    time_limit: Duration,
    last_stats: Option<SearchStats>,
}

impl GameController {
    #[must_use]
    pub fn new() -> Self {
        let board = Board::new();
        let mut repetitions = HashMap::new();
        repetitions.insert(board.zobrist_key(Color::White), 1);
        GameController {
            initial_board: board.clone(),
            initial_side: Color::White,
            board,
            engine: Engine::default(),
            move_count: 0,
            history: Vec::new(),
            repetitions,
            outcome: None,
            ai_color: Color::Black,
            ai_depth: DEFAULT_AI_DEPTH,
            time_limit: DEFAULT_TIME_LIMIT,
            last_stats: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move, derived from move-count parity; White starts.
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        if self.move_count % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[must_use]
    pub fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }

    #[must_use]
    pub fn ai_color(&self) -> Color {
        self.ai_color
    }

    pub fn set_ai_color(&mut self, color: Color) {
        self.ai_color = color;
    }

    /// Switch the engine to the other color (the "play the other side"
    /// toggle of the console surface).
    pub fn switch_ai_color(&mut self) {
        self.ai_color = self.ai_color.opposite();
    }

    /// True when the configured engine color is to move and the game is
    /// still running. Drivers call [`play_ai_move`](Self::play_ai_move)
    /// when this holds after an external move.
    #[must_use]
    pub fn is_ai_turn(&self) -> bool {
        self.outcome.is_none() && self.side_to_move() == self.ai_color
    }

    pub fn set_ai_depth(&mut self, depth: u32) {
        self.ai_depth = depth.max(1);
    }

    pub fn set_time_limit(&mut self, limit: Duration) {
        self.time_limit = limit;
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Replace the game state with an arbitrary position. History and the
    /// repetition map restart from this position.
    pub fn set_position(&mut self, board: Board, side_to_move: Color) {
        self.initial_board = board;
        self.initial_side = side_to_move;
        self.restart();
    }

    /// How often the current position has occurred in this game.
    #[must_use]
    pub fn repetition_count(&self) -> u32 {
        let key = self.board.zobrist_key(self.side_to_move());
        self.repetitions.get(&key).copied().unwrap_or(0)
    }

    /// Accept an external move for the side to move.
    pub fn play_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        let side = self.side_to_move();
        // Match by origin and destination: an external promotion arrives
        // with the piece unset (or an explicit choice), while the
        // generator flags queen promotions.
        let is_legal = self
            .board
            .generate_legal_moves(side)
            .iter()
            .any(|legal| legal.from == mv.from && legal.to == mv.to);
        if !is_legal {
            return Err(GameError::IllegalMove { mv });
        }

        let mut applied = mv;
        self.board.make_move(&mut applied)?;
        self.finish_move(side, applied);
        Ok(())
    }

    /// Ask the engine for a move for the side to move and apply it.
    ///
    /// Returns the applied move, or `None` when the position turned out
    /// to be terminal.
    pub fn play_ai_move(&mut self) -> Result<Option<Move>, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        let side = self.side_to_move();
        let deadline = Deadline::after(self.time_limit);

        let (best, stats) = self
            .engine
            .find_best_move(&self.board, self.ai_depth, side, deadline);
        debug!(
            "search for {side:?}: {} nodes in {:?}",
            stats.nodes_evaluated, stats.search_time
        );
        self.last_stats = Some(stats);

        let chosen = match best {
            Some(mv) => mv,
            None => {
                let legal = self.board.generate_legal_moves(side);
                match legal.first() {
                    None => {
                        // Terminal position: classify and stop.
                        let outcome = if self.board.is_king_in_check(side) {
                            GameOutcome::Checkmate {
                                winner: side.opposite(),
                            }
                        } else {
                            GameOutcome::Stalemate
                        };
                        info!("game over: {outcome}");
                        self.outcome = Some(outcome);
                        return Ok(None);
                    }
                    Some(&fallback) => {
                        warn!("search returned no move before the deadline; playing the first legal move");
                        fallback
                    }
                }
            }
        };

        let mut applied = chosen;
        self.board.make_move(&mut applied)?;
        self.finish_move(side, applied);
        Ok(Some(applied))
    }

    /// Book-keeping after a successful application: history, side
    /// counter, repetition map, terminal detection for the next mover.
    fn finish_move(&mut self, mover: Color, applied: Move) {
        info!("{mover:?} played {applied}");
        self.history.push(applied);
        self.move_count += 1;

        let next = self.side_to_move();
        let key = self.board.zobrist_key(next);
        let occurrences = {
            let counter = self.repetitions.entry(key).or_insert(0);
            *counter += 1;
            *counter
        };

        let legal = self.board.generate_legal_moves(next);
        let outcome = if legal.is_empty() {
            if self.board.is_king_in_check(next) {
                Some(GameOutcome::Checkmate { winner: mover })
            } else {
                Some(GameOutcome::Stalemate)
            }
        } else if occurrences >= 3 {
            Some(GameOutcome::ThreefoldRepetition)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            info!("game over: {outcome}");
            self.outcome = Some(outcome);
        }
    }

    /// Take back the last applied move by replaying the rest of the game
    /// from the initial position. Returns the undone move, or `None` when
    /// there is nothing to undo.
    pub fn undo_last_move(&mut self) -> Option<Move> {
        let undone = self.history.pop()?;
        let line: Vec<Move> = self.history.clone();

        self.restart();
        for mv in line {
            let side = self.side_to_move();
            let mut replayed = Move {
                captured: None,
                is_castling: false,
                rights_before: None,
                ..mv
            };
            match self.board.make_move(&mut replayed) {
                Ok(()) => self.finish_move(side, replayed),
                Err(err) => {
                    // History only ever holds applied moves.
                    debug_assert!(false, "replay of {mv} failed: {err}");
                }
            }
        }
        info!("took back {undone}");
        Some(undone)
    }

    /// Start a fresh standard game: initial board, empty history and
    /// repetition map, engine tables cleared.
    pub fn reset(&mut self) {
        self.initial_board = Board::new();
        self.initial_side = Color::White;
        self.restart();
        self.engine.reset();
        self.last_stats = None;
        info!("game reset");
    }

    /// Rewind to the game's starting position, keeping engine tables.
    fn restart(&mut self) {
        self.board = self.initial_board.clone();
        self.move_count = match self.initial_side {
            Color::White => 0,
            Color::Black => 1,
        };
        self.history.clear();
        self.outcome = None;
        self.repetitions.clear();
        self.repetitions
            .insert(self.board.zobrist_key(self.initial_side), 1);
    }

    /// Serialize the engine's persistent tables.
    pub fn save_engine_tables(&self) -> serde_json::Result<Vec<u8>> {
        self.engine.save_tables()
    }

    /// Restore engine tables from a prior snapshot.
    pub fn load_engine_tables(&self, bytes: &[u8]) -> serde_json::Result<()> {
        debug!("restoring engine tables ({} bytes)", bytes.len());
        self.engine.load_tables(bytes)
    }
}

impl Default for GameController {
    fn default() -> Self {
        GameController::new()
    }
}
