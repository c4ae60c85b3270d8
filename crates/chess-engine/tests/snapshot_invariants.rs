//! Invariants that must hold for every snapshot an engine can reach.

use chess_engine::{AiLevel, EngineError, MoveEngine, StandardEngine};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Plays random games and checks every snapshot along the way.
    #[test]
    fn legal_move_origins_hold_pieces_of_the_side_to_move(seed in any::<u64>(), plies in 1usize..40) {
        let mut engine = StandardEngine::new().with_seed(seed).with_level(AiLevel::Random);
        let mut snapshot = engine.current_snapshot();

        for _ in 0..plies {
            for (origin, destinations) in snapshot.legal_moves() {
                let piece = snapshot.piece_at(*origin);
                prop_assert!(piece.is_some(), "legal moves from empty cell {}", origin);
                prop_assert_eq!(piece.map(|p| p.color), Some(snapshot.turn()));
                prop_assert!(!destinations.is_empty());
                prop_assert!(!destinations.contains(origin));
            }

            match engine.auto_reply() {
                Ok(reply) => {
                    prop_assert!(snapshot.is_legal(reply.origin, reply.destination));
                    snapshot = reply.snapshot;
                }
                Err(EngineError::NoLegalMove { .. }) => {
                    prop_assert!(snapshot.is_stuck());
                    break;
                }
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            }
        }
    }

    /// A move is accepted exactly when the snapshot lists it.
    #[test]
    fn apply_move_agrees_with_snapshot(from in 0u8..64, to in 0u8..64) {
        let mut engine = StandardEngine::new();
        let origin = chess_core::CellId::from_index(from).unwrap();
        let destination = chess_core::CellId::from_index(to).unwrap();
        let listed = engine.current_snapshot().is_legal(origin, destination);
        let result = engine.apply_move(origin, destination);
        prop_assert_eq!(listed, result.is_ok());
        if let Err(e) = result {
            let is_illegal = matches!(e, EngineError::IllegalMove { .. });
            prop_assert!(is_illegal);
        }
    }
}
