//! Standard chess rules engine.

use super::{AutoReply, EngineError, GameOutcome, MoveEngine};
use crate::ai::{choose_move, AiLevel};
use crate::movegen::{generate_moves, is_king_attacked, make_move, Move};
use crate::{BoardSnapshot, Position};
use chess_core::{CellId, FenError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Seed used when the host does not supply one.
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Standard chess (FIDE movement rules) with an automated opponent.
///
/// Supports castling, en passant, and promotion. Promotion always yields a
/// queen because moves are addressed by origin and destination only.
#[derive(Debug, Clone)]
pub struct StandardEngine {
    position: Position,
    level: AiLevel,
    rng: StdRng,
}

impl StandardEngine {
    /// Creates an engine at the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates an engine from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Position::from_fen(fen).map(Self::from_position)
    }

    /// Creates an engine at `position`.
    ///
    /// Move selection is seeded with [`DEFAULT_SEED`] until
    /// [`with_seed`](Self::with_seed) is called.
    pub fn from_position(position: Position) -> Self {
        StandardEngine {
            position,
            level: AiLevel::default(),
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Sets the strength of automated replies.
    pub fn with_level(mut self, level: AiLevel) -> Self {
        self.level = level;
        self
    }

    /// Seeds move selection so automated replies are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn level(&self) -> AiLevel {
        self.level
    }

    /// Returns how the game ended, if the side to move has no legal move.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !generate_moves(&self.position).is_empty() {
            return None;
        }
        let side = self.position.side_to_move;
        Some(if is_king_attacked(&self.position, side) {
            GameOutcome::Checkmate {
                winner: side.opposite(),
            }
        } else {
            GameOutcome::Stalemate
        })
    }

    fn play(&mut self, m: Move) -> BoardSnapshot {
        self.position = make_move(&self.position, m);
        BoardSnapshot::from_position(&self.position)
    }
}

impl Default for StandardEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveEngine for StandardEngine {
    fn current_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_position(&self.position)
    }

    fn apply_move(
        &mut self,
        origin: CellId,
        destination: CellId,
    ) -> Result<BoardSnapshot, EngineError> {
        let m = generate_moves(&self.position)
            .into_iter()
            .find(|m| m.from == origin && m.to == destination)
            .ok_or(EngineError::IllegalMove {
                origin,
                destination,
            })?;
        debug!(%origin, %destination, kind = ?m.kind, "applying move");
        Ok(self.play(m))
    }

    fn auto_reply(&mut self) -> Result<AutoReply, EngineError> {
        let side = self.position.side_to_move;
        let Some(m) = choose_move(&self.position, self.level, &mut self.rng) else {
            let outcome = self.outcome().unwrap_or(GameOutcome::Stalemate);
            info!(%side, %outcome, "no legal move for automated side");
            return Err(EngineError::NoLegalMove { side, outcome });
        };
        info!(%side, level = %self.level, mv = %m, "automated reply");
        let snapshot = self.play(m);
        Ok(AutoReply {
            origin: m.from,
            destination: m.to,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Color, Piece, PieceCode};

    fn cell(s: &str) -> CellId {
        s.parse().unwrap()
    }

    #[test]
    fn initial_snapshot() {
        let engine = StandardEngine::new();
        let snap = engine.current_snapshot();
        assert_eq!(snap.turn(), Color::White);
        assert_eq!(
            snap.destinations(cell("E2")).unwrap().iter().collect::<Vec<_>>(),
            [&cell("E3"), &cell("E4")]
        );
    }

    #[test]
    fn apply_legal_move() {
        let mut engine = StandardEngine::new();
        let snap = engine.apply_move(cell("E2"), cell("E4")).unwrap();
        assert_eq!(snap.piece_at(cell("E2")), None);
        assert_eq!(
            snap.piece_at(cell("E4")),
            Some(PieceCode::new(Piece::Pawn, Color::White))
        );
        assert_eq!(snap.turn(), Color::Black);
        assert_eq!(engine.position().en_passant, Some(cell("E3")));
    }

    #[test]
    fn reject_illegal_move() {
        let mut engine = StandardEngine::new();
        let err = engine.apply_move(cell("E2"), cell("E5")).unwrap_err();
        assert_eq!(
            err,
            EngineError::IllegalMove {
                origin: cell("E2"),
                destination: cell("E5"),
            }
        );
        // State is untouched.
        assert_eq!(engine.current_snapshot().turn(), Color::White);
    }

    #[test]
    fn auto_reply_plays_for_side_to_move() {
        let mut engine = StandardEngine::new().with_seed(42).with_level(AiLevel::Random);
        engine.apply_move(cell("E2"), cell("E4")).unwrap();
        let reply = engine.auto_reply().unwrap();
        assert_eq!(
            reply.snapshot.piece_at(reply.destination).map(|p| p.color),
            Some(Color::Black)
        );
        assert_eq!(reply.snapshot.piece_at(reply.origin), None);
        assert_eq!(reply.snapshot.turn(), Color::White);
    }

    #[test]
    fn seeded_replies_are_reproducible() {
        let play = |seed| {
            let mut engine = StandardEngine::new().with_seed(seed).with_level(AiLevel::Random);
            engine.apply_move(cell("D2"), cell("D4")).unwrap();
            let reply = engine.auto_reply().unwrap();
            (reply.origin, reply.destination)
        };
        assert_eq!(play(11), play(11));
    }

    #[test]
    fn auto_reply_reports_checkmate() {
        let mut engine = StandardEngine::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        let err = engine.auto_reply().unwrap_err();
        assert_eq!(
            err,
            EngineError::NoLegalMove {
                side: Color::White,
                outcome: GameOutcome::Checkmate {
                    winner: Color::Black
                },
            }
        );
    }

    #[test]
    fn auto_reply_reports_stalemate() {
        let mut engine = StandardEngine::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(engine.outcome(), Some(GameOutcome::Stalemate));
        assert!(matches!(
            engine.auto_reply(),
            Err(EngineError::NoLegalMove {
                side: Color::Black,
                outcome: GameOutcome::Stalemate
            })
        ));
    }
}
