//! The move engine capability contract.
//!
//! This module provides the [`MoveEngine`] trait which the interaction
//! controller depends on. The controller is rule-agnostic: legality, turn
//! ownership, and move selection for the automated side are all delegated to
//! the active engine.

mod standard;

pub use standard::{StandardEngine, DEFAULT_SEED};

use crate::BoardSnapshot;
use chess_core::{CellId, Color};
use std::fmt;
use thiserror::Error;

/// How a game ended when the side to move has no legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The side to move is in check.
    Checkmate { winner: Color },
    /// The side to move is not in check.
    Stalemate,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameOutcome::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Errors an engine reports to its caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The destination was not legal for the origin in the engine's current state.
    #[error("illegal move {origin}-{destination}")]
    IllegalMove {
        origin: CellId,
        destination: CellId,
    },

    /// The side to move has no legal move; the game is over.
    #[error("{side} has no legal move ({outcome})")]
    NoLegalMove { side: Color, outcome: GameOutcome },
}

/// A move the engine picked and played for the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoReply {
    pub origin: CellId,
    pub destination: CellId,
    pub snapshot: BoardSnapshot,
}

/// What the interaction controller needs from a rules engine.
///
/// # Example
///
/// ```
/// use chess_engine::{MoveEngine, StandardEngine};
///
/// let mut engine = StandardEngine::new().with_seed(7);
/// let e2 = "E2".parse().unwrap();
/// let e4 = "E4".parse().unwrap();
/// assert!(engine.current_snapshot().is_legal(e2, e4));
///
/// let after = engine.apply_move(e2, e4).unwrap();
/// assert!(after.piece_at(e4).is_some());
///
/// let reply = engine.auto_reply().unwrap();
/// assert!(reply.snapshot.piece_at(reply.destination).is_some());
/// ```
pub trait MoveEngine {
    /// Returns a fresh snapshot of the engine's state.
    fn current_snapshot(&self) -> BoardSnapshot;

    /// Plays `origin` to `destination` for the side to move.
    ///
    /// Fails with [`EngineError::IllegalMove`] if `destination` is not among
    /// the legal destinations of `origin` in the state prior to the call.
    fn apply_move(
        &mut self,
        origin: CellId,
        destination: CellId,
    ) -> Result<BoardSnapshot, EngineError>;

    /// Picks and plays a move for the side to move.
    ///
    /// Fails with [`EngineError::NoLegalMove`] on checkmate or stalemate.
    fn auto_reply(&mut self) -> Result<AutoReply, EngineError>;
}

impl<E: MoveEngine + ?Sized> MoveEngine for Box<E> {
    fn current_snapshot(&self) -> BoardSnapshot {
        (**self).current_snapshot()
    }

    fn apply_move(
        &mut self,
        origin: CellId,
        destination: CellId,
    ) -> Result<BoardSnapshot, EngineError> {
        (**self).apply_move(origin, destination)
    }

    fn auto_reply(&mut self) -> Result<AutoReply, EngineError> {
        (**self).auto_reply()
    }
}
