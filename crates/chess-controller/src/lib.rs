//! Game interaction controller.
//!
//! The controller sits between a [`Renderer`](chess_board::Renderer) and a
//! [`MoveEngine`](chess_engine::MoveEngine). It owns the selection state and
//! the current board snapshot, turns cell activations into highlight changes
//! and moves, and schedules the engine's reply after a fixed delay.
//!
//! The decision logic is a pure function, [`transition`], from the current
//! [`Selection`], the movable pieces, and the activated cell to the next
//! selection plus a list of [`Effect`]s. [`Controller`] applies those effects
//! to the engine, the renderer, and the [`ReplyScheduler`].
//!
//! Everything runs on one logical event queue: the host delivers cell
//! activations and fired reply timers one at a time, so no locking is
//! involved.

mod controller;
mod error;
mod scheduler;
mod selection;

pub use controller::{Controller, ControllerConfig, GamePhase, ReplyOutcome, DEFAULT_REPLY_DELAY};
pub use error::ControllerError;
pub use scheduler::{ManualScheduler, ReplyScheduler, ReplyTicket};
pub use selection::{transition, Effect, LegalMoves, Selection, Transition};
