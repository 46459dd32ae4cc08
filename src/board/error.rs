//! Error types for board operations.

use std::fmt;

/// Error type for move application failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// A move coordinate lies outside the 8x8 board.
    OutOfRange { row: usize, col: usize },
    /// The origin square holds no piece.
    EmptyOrigin { row: usize, col: usize },
    /// The move would leave the mover's own king attacked.
    /// The board is unchanged when this is returned.
    LeavesKingInCheck,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfRange { row, col } => {
                write!(f, "Coordinate ({row}, {col}) outside the board")
            }
            MoveError::EmptyOrigin { row, col } => {
                write!(f, "No piece on origin square ({row}, {col})")
            }
            MoveError::LeavesKingInCheck => {
                write!(f, "Move would leave own king in check")
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Error type for square/move notation parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Not a valid algebraic coordinate.
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = MoveError::OutOfRange { row: 9, col: 3 };
        assert!(err.to_string().contains('9'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_empty_origin_message() {
        let err = MoveError::EmptyOrigin { row: 4, col: 4 };
        assert!(err.to_string().contains("origin"));
    }

    #[test]
    fn test_invalid_notation_message() {
        let err = SquareError::InvalidNotation {
            notation: "z9".to_string(),
        };
        assert!(err.to_string().contains("z9"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(MoveError::LeavesKingInCheck, MoveError::LeavesKingInCheck);
        assert_ne!(
            MoveError::OutOfRange { row: 0, col: 8 },
            MoveError::OutOfRange { row: 8, col: 0 }
        );
    }
}
