//! Selection state machine.

use chess_core::CellId;
use std::collections::{BTreeMap, BTreeSet};

/// Legal destinations per movable origin.
pub type LegalMoves = BTreeMap<CellId, BTreeSet<CellId>>;

/// The player's current choice of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    /// A movable piece on `origin` is waiting for a destination.
    Selected(CellId),
}

impl Selection {
    pub fn origin(self) -> Option<CellId> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(origin) => Some(origin),
        }
    }
}

/// Side effect requested by a transition, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Highlight { cell: CellId, on: bool },
    /// Play `origin` to `destination` on the engine and repaint.
    CommitMove { origin: CellId, destination: CellId },
    /// Arm the delayed automated reply.
    ScheduleReply,
}

/// Result of feeding one activation to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Selection,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(selection: Selection) -> Self {
        Transition {
            next: selection,
            effects: Vec::new(),
        }
    }

    /// Returns true if the activation changed nothing.
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Computes the next selection and effects for an activation of `target`.
///
/// The move-completion check runs strictly before the reselection check: a
/// target that is both a destination of the current selection and itself a
/// movable piece completes the move. Reselecting clears every highlight of
/// the previous selection before highlighting the new one. Anything else
/// leaves selection and highlights as they are.
pub fn transition(selection: Selection, movable: &LegalMoves, target: CellId) -> Transition {
    if let Selection::Selected(origin) = selection {
        if let Some(destinations) = movable.get(&origin) {
            if destinations.contains(&target) {
                let mut effects = clear(destinations);
                effects.push(Effect::CommitMove {
                    origin,
                    destination: target,
                });
                effects.push(Effect::ScheduleReply);
                return Transition {
                    next: Selection::Unselected,
                    effects,
                };
            }
        }
    }

    if let Some(destinations) = movable.get(&target) {
        let mut effects = selection
            .origin()
            .and_then(|prev| movable.get(&prev))
            .map(clear)
            .unwrap_or_default();
        effects.extend(destinations.iter().map(|&cell| Effect::Highlight { cell, on: true }));
        return Transition {
            next: Selection::Selected(target),
            effects,
        };
    }

    Transition::unchanged(selection)
}

fn clear(cells: &BTreeSet<CellId>) -> Vec<Effect> {
    cells
        .iter()
        .map(|&cell| Effect::Highlight { cell, on: false })
        .collect()
}
