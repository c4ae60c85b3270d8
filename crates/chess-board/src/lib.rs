//! Board renderer adapters.
//!
//! A renderer builds an 8x8 grid of addressable cells once, then only ever
//! receives two kinds of writes per cell: the displayed glyph and the
//! highlight flag. It never decides what should be shown; the interaction
//! controller is the source of truth. Activating a cell (click, tap, typed
//! label) reports the cell's [`CellId`] through the registered callback.
//!
//! Two adapters are provided:
//! - [`TextBoard`] - a terminal grid with rank and file labels
//! - [`RecordingRenderer`] - keeps visual state and a log of [`RenderOp`]s,
//!   for tests and for hosts that replay draw calls elsewhere

mod glyph;
mod recording;
mod text;

pub use glyph::glyph;
pub use recording::{RecordingRenderer, RenderOp};
pub use text::{TextBoard, TextStyle};

use chess_core::{CellId, PieceCode};

/// Callback invoked with the id of an activated cell.
pub type ActivationCallback = Box<dyn FnMut(CellId)>;

/// The visual surface the interaction controller drives.
pub trait Renderer {
    /// Builds the cell grid and its labels. Called once per session.
    fn build_grid(&mut self);

    /// Shows `piece` on `cell`, or clears the cell when `None`.
    fn set_glyph(&mut self, cell: CellId, piece: Option<PieceCode>);

    /// Turns the move-option highlight of `cell` on or off.
    fn set_highlighted(&mut self, cell: CellId, highlighted: bool);

    /// Registers the single callback cell activations are reported to.
    fn on_cell_activated(&mut self, callback: ActivationCallback);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn build_grid(&mut self) {
        (**self).build_grid()
    }

    fn set_glyph(&mut self, cell: CellId, piece: Option<PieceCode>) {
        (**self).set_glyph(cell, piece)
    }

    fn set_highlighted(&mut self, cell: CellId, highlighted: bool) {
        (**self).set_highlighted(cell, highlighted)
    }

    fn on_cell_activated(&mut self, callback: ActivationCallback) {
        (**self).on_cell_activated(callback)
    }
}
