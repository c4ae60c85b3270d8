//! Renderer that records what it was told to draw.

use crate::{glyph, ActivationCallback, Renderer};
use chess_core::{CellId, PieceCode};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One draw call, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOp {
    BuildGrid,
    Glyph {
        cell: CellId,
        piece: Option<PieceCode>,
        symbol: Option<char>,
    },
    Highlight {
        cell: CellId,
        on: bool,
    },
}

/// Keeps the last written state of every cell plus a drainable op log.
#[derive(Default)]
pub struct RecordingRenderer {
    built: bool,
    glyphs: BTreeMap<CellId, PieceCode>,
    highlighted: BTreeSet<CellId>,
    ops: Vec<RenderOp>,
    callback: Option<ActivationCallback>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn piece_at(&self, cell: CellId) -> Option<PieceCode> {
        self.glyphs.get(&cell).copied()
    }

    /// All displayed pieces.
    pub fn pieces(&self) -> &BTreeMap<CellId, PieceCode> {
        &self.glyphs
    }

    pub fn highlighted(&self) -> &BTreeSet<CellId> {
        &self.highlighted
    }

    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Takes the ops recorded since the last drain.
    pub fn drain_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }

    /// Simulates activating a cell of the grid.
    ///
    /// Returns false if the grid is not built or no callback is registered.
    pub fn activate(&mut self, cell: CellId) -> bool {
        if !self.built {
            return false;
        }
        match self.callback.as_mut() {
            Some(callback) => {
                callback(cell);
                true
            }
            None => false,
        }
    }
}

impl Renderer for RecordingRenderer {
    fn build_grid(&mut self) {
        self.built = true;
        self.ops.push(RenderOp::BuildGrid);
    }

    fn set_glyph(&mut self, cell: CellId, piece: Option<PieceCode>) {
        match piece {
            Some(code) => self.glyphs.insert(cell, code),
            None => self.glyphs.remove(&cell),
        };
        self.ops.push(RenderOp::Glyph {
            cell,
            piece,
            symbol: piece.map(glyph),
        });
    }

    fn set_highlighted(&mut self, cell: CellId, highlighted: bool) {
        if highlighted {
            self.highlighted.insert(cell);
        } else {
            self.highlighted.remove(&cell);
        }
        self.ops.push(RenderOp::Highlight {
            cell,
            on: highlighted,
        });
    }

    fn on_cell_activated(&mut self, callback: ActivationCallback) {
        self.callback = Some(callback);
    }
}
