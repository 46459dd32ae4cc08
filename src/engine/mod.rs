//! Game controller gluing the board, move generation, and search.

mod controller;

pub use controller::{GameController, GameError, GameOutcome};
