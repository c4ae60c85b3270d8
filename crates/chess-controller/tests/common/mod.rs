#![allow(dead_code)]

use chess_board::RecordingRenderer;
use chess_controller::{Controller, ControllerConfig, ManualScheduler};
use chess_core::{CellId, Color, PieceCode};
use chess_engine::{
    AiLevel, AutoReply, BoardSnapshot, EngineError, GameOutcome, MoveEngine, StandardEngine,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

pub type TestController<E> = Controller<E, RecordingRenderer, ManualScheduler>;

pub fn cell(label: &str) -> CellId {
    label.parse().unwrap()
}

pub fn cells(labels: &[&str]) -> BTreeSet<CellId> {
    labels.iter().map(|l| cell(l)).collect()
}

pub fn start<E: MoveEngine>(engine: E) -> TestController<E> {
    start_with(engine, ControllerConfig::default())
}

pub fn start_with<E: MoveEngine>(engine: E, config: ControllerConfig) -> TestController<E> {
    Controller::new(engine, RecordingRenderer::new(), ManualScheduler::new(), config)
}

/// A standard game whose automated replies can be dictated in advance.
///
/// Scripted replies are played through the real rules; once the script runs
/// out, replies come from the wrapped engine.
pub struct Scripted {
    pub inner: StandardEngine,
    pub replies: VecDeque<Result<(CellId, CellId), EngineError>>,
    /// The next `apply_move` is rejected as illegal, whatever its arguments.
    pub reject_next_move: bool,
    pub auto_reply_calls: usize,
}

impl Scripted {
    pub fn new() -> Self {
        Scripted {
            inner: StandardEngine::new().with_seed(5).with_level(AiLevel::Random),
            replies: VecDeque::new(),
            reject_next_move: false,
            auto_reply_calls: 0,
        }
    }

    pub fn from_fen(fen: &str) -> Self {
        Scripted {
            inner: StandardEngine::from_fen(fen).unwrap().with_seed(5),
            ..Scripted::new()
        }
    }

    pub fn reply(mut self, origin: &str, destination: &str) -> Self {
        self.replies.push_back(Ok((cell(origin), cell(destination))));
        self
    }

    pub fn no_legal_move(mut self, side: Color) -> Self {
        self.replies.push_back(Err(EngineError::NoLegalMove {
            side,
            outcome: GameOutcome::Stalemate,
        }));
        self
    }
}

impl MoveEngine for Scripted {
    fn current_snapshot(&self) -> BoardSnapshot {
        self.inner.current_snapshot()
    }

    fn apply_move(
        &mut self,
        origin: CellId,
        destination: CellId,
    ) -> Result<BoardSnapshot, EngineError> {
        if std::mem::take(&mut self.reject_next_move) {
            return Err(EngineError::IllegalMove {
                origin,
                destination,
            });
        }
        self.inner.apply_move(origin, destination)
    }

    fn auto_reply(&mut self) -> Result<AutoReply, EngineError> {
        self.auto_reply_calls += 1;
        match self.replies.pop_front() {
            Some(Ok((origin, destination))) => {
                let snapshot = self.inner.apply_move(origin, destination)?;
                Ok(AutoReply {
                    origin,
                    destination,
                    snapshot,
                })
            }
            Some(Err(e)) => Err(e),
            None => self.inner.auto_reply(),
        }
    }
}

/// An engine serving one hand-built snapshot.
///
/// Moves relocate the piece and hand the turn over with no legal moves left;
/// automated replies always report a stalemate.
pub struct Fixed {
    pub snapshot: BoardSnapshot,
    pub applied: Vec<(CellId, CellId)>,
}

impl Fixed {
    pub fn new(pieces: &[(&str, char)], legal: &[(&str, &[&str])], turn: Color) -> Self {
        let pieces: BTreeMap<CellId, PieceCode> = pieces
            .iter()
            .map(|(at, fen)| (cell(at), PieceCode::try_from(*fen).unwrap()))
            .collect();
        let legal = legal
            .iter()
            .map(|(from, to)| (cell(from), cells(to)))
            .collect();
        Fixed {
            snapshot: BoardSnapshot::new(pieces, legal, turn),
            applied: Vec::new(),
        }
    }
}

impl MoveEngine for Fixed {
    fn current_snapshot(&self) -> BoardSnapshot {
        self.snapshot.clone()
    }

    fn apply_move(
        &mut self,
        origin: CellId,
        destination: CellId,
    ) -> Result<BoardSnapshot, EngineError> {
        if !self.snapshot.is_legal(origin, destination) {
            return Err(EngineError::IllegalMove {
                origin,
                destination,
            });
        }
        let mut pieces = self.snapshot.pieces().clone();
        if let Some(piece) = pieces.remove(&origin) {
            pieces.insert(destination, piece);
        }
        self.snapshot = BoardSnapshot::new(
            pieces,
            BTreeMap::new(),
            self.snapshot.turn().opposite(),
        );
        self.applied.push((origin, destination));
        Ok(self.snapshot.clone())
    }

    fn auto_reply(&mut self) -> Result<AutoReply, EngineError> {
        Err(EngineError::NoLegalMove {
            side: self.snapshot.turn(),
            outcome: GameOutcome::Stalemate,
        })
    }
}
