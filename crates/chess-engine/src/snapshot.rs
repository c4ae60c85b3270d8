//! Immutable point-in-time views of the board.

use crate::movegen::generate_moves;
use crate::Position;
use chess_core::{CellId, Color, PieceCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Piece placement plus the legal destinations of every movable piece.
///
/// Snapshots are produced fresh after every engine mutation and are never
/// edited afterwards. Every key of the legal move map holds a piece of the
/// side to move, and has at least one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pieces: BTreeMap<CellId, PieceCode>,
    legal_moves: BTreeMap<CellId, BTreeSet<CellId>>,
    turn: Color,
}

impl BoardSnapshot {
    /// Builds a snapshot from raw parts.
    ///
    /// Origins with no destinations are dropped so that "is this piece
    /// movable" is answered by key membership alone.
    pub fn new(
        pieces: BTreeMap<CellId, PieceCode>,
        mut legal_moves: BTreeMap<CellId, BTreeSet<CellId>>,
        turn: Color,
    ) -> Self {
        legal_moves.retain(|_, to| !to.is_empty());
        BoardSnapshot {
            pieces,
            legal_moves,
            turn,
        }
    }

    /// Captures a position and its legal moves.
    pub fn from_position(position: &Position) -> Self {
        let pieces = position.pieces().collect();
        let mut legal_moves: BTreeMap<CellId, BTreeSet<CellId>> = BTreeMap::new();
        for m in generate_moves(position) {
            legal_moves.entry(m.from).or_default().insert(m.to);
        }
        BoardSnapshot::new(pieces, legal_moves, position.side_to_move)
    }

    pub fn pieces(&self) -> &BTreeMap<CellId, PieceCode> {
        &self.pieces
    }

    pub fn legal_moves(&self) -> &BTreeMap<CellId, BTreeSet<CellId>> {
        &self.legal_moves
    }

    /// The side whose pieces the legal move map describes.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn piece_at(&self, cell: CellId) -> Option<PieceCode> {
        self.pieces.get(&cell).copied()
    }

    /// Returns the legal destinations of the piece on `origin`.
    pub fn destinations(&self, origin: CellId) -> Option<&BTreeSet<CellId>> {
        self.legal_moves.get(&origin)
    }

    pub fn is_movable(&self, cell: CellId) -> bool {
        self.legal_moves.contains_key(&cell)
    }

    pub fn is_legal(&self, origin: CellId, destination: CellId) -> bool {
        self.destinations(origin)
            .is_some_and(|to| to.contains(&destination))
    }

    /// Returns true if the side to move has no legal move at all.
    pub fn is_stuck(&self) -> bool {
        self.legal_moves.is_empty()
    }

    /// Cells whose displayed piece differs between `self` and `next`.
    pub fn changed_cells<'a>(
        &'a self,
        next: &'a BoardSnapshot,
    ) -> impl Iterator<Item = CellId> + 'a {
        CellId::all().filter(move |cell| self.piece_at(*cell) != next.piece_at(*cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;

    fn cell(s: &str) -> CellId {
        s.parse().unwrap()
    }

    #[test]
    fn startpos_snapshot() {
        let snap = BoardSnapshot::from_position(&Position::startpos());
        assert_eq!(snap.turn(), Color::White);
        assert_eq!(snap.pieces().len(), 32);
        // Eight pawns and two knights can move.
        assert_eq!(snap.legal_moves().len(), 10);
        assert!(snap.is_legal(cell("E2"), cell("E4")));
        assert!(!snap.is_legal(cell("E2"), cell("E5")));
        assert!(!snap.is_movable(cell("E1")));
        assert_eq!(
            snap.piece_at(cell("G8")),
            Some(PieceCode::new(Piece::Knight, Color::Black))
        );
    }

    #[test]
    fn every_movable_cell_holds_a_piece_of_the_side_to_move() {
        let snap = BoardSnapshot::from_position(&Position::startpos());
        for origin in snap.legal_moves().keys() {
            assert_eq!(snap.piece_at(*origin).map(|p| p.color), Some(snap.turn()));
        }
    }

    #[test]
    fn empty_destination_sets_are_dropped() {
        let mut legal = BTreeMap::new();
        legal.insert(cell("A2"), BTreeSet::new());
        let snap = BoardSnapshot::new(BTreeMap::new(), legal, Color::White);
        assert!(snap.is_stuck());
        assert!(!snap.is_movable(cell("A2")));
    }

    #[test]
    fn changed_cells_after_a_move() {
        let before = BoardSnapshot::from_position(&Position::startpos());
        let after = BoardSnapshot::from_position(
            &Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap(),
        );
        let changed: Vec<_> = before.changed_cells(&after).collect();
        assert_eq!(changed, vec![cell("E2"), cell("E4")]);
    }

    #[test]
    fn serializes_with_cell_labels() {
        let snap = BoardSnapshot::from_position(&Position::startpos());
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["pieces"]["E1"], "K");
        assert_eq!(json["legal_moves"]["E2"], serde_json::json!(["E3", "E4"]));
        assert_eq!(json["turn"], "white");
    }
}
