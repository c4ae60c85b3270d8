//! Controller errors.

use chess_core::CellId;
use chess_engine::EngineError;
use thiserror::Error;

/// Errors surfaced by the controller.
///
/// Neither variant is recoverable in place: both mean the controller's view
/// of the game and the engine's authoritative state have drifted apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// The engine rejected a move the cached snapshot listed as legal.
    #[error("engine rejected {origin}-{destination}, which the current snapshot lists as legal")]
    Desync { origin: CellId, destination: CellId },

    /// The engine failed in a way its contract does not allow for this call.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
