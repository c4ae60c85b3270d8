//! Move engine for the interactive board.
//!
//! This crate provides:
//! - [`MoveEngine`] - the capability contract the interaction controller depends on
//! - [`BoardSnapshot`] - immutable piece placement plus legal destinations
//! - [`StandardEngine`] - standard chess rules with an automated opponent
//! - [`Position`] and legal move generation over a mailbox board
//!
//! # Example
//!
//! ```
//! use chess_engine::{AiLevel, MoveEngine, StandardEngine};
//!
//! let engine = StandardEngine::new().with_level(AiLevel::Random);
//! let snapshot = engine.current_snapshot();
//! println!("{} pieces can move", snapshot.legal_moves().len());
//! ```

pub mod ai;
pub mod movegen;
mod position;
pub mod rules;
mod snapshot;

pub use ai::{AiLevel, AiLevelError};
pub use movegen::{generate_moves, is_king_attacked, make_move, perft, Move, MoveKind};
pub use position::{CastlingRights, Position};
pub use rules::{AutoReply, EngineError, GameOutcome, MoveEngine, StandardEngine, DEFAULT_SEED};
pub use snapshot::BoardSnapshot;
