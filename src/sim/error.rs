//! Engine error types
//!
//! Every variant here is a logic defect, not a gameplay condition.
//! Out-of-phase requests are no-ops and never produce an error.

use thiserror::Error;

use super::state::PieceId;

/// Registry write rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("cell ({col}, {row}) is out of bounds")]
    OutOfBounds { col: i32, row: i32 },
    #[error("cell ({col}, {row}) is already occupied by piece {existing}")]
    Occupied { col: i32, row: i32, existing: PieceId },
}

/// Failure of a lifecycle step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("contact signal names piece {0}, which is not attached")]
    UnknownPiece(PieceId),
    #[error("no free cell left on the board")]
    NoFreeCell,
    #[error("invalid board config: {0}")]
    InvalidConfig(String),
}
