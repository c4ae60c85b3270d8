//! WebAssembly mount point for the interaction controller.
//!
//! The page owns the visual grid and the timers; this crate owns the game.
//! Every call returns a [`Frame`]: the draw calls to replay on the grid and
//! the timer requests to honour with `setTimeout`/`clearTimeout`.
//!
//! # Usage
//!
//! ```javascript
//! import init, { Session } from 'chess-wasm';
//!
//! await init();
//!
//! const session = new Session("white", "minimax:2", 3000, BigInt(Date.now()));
//! const timers = new Map();
//!
//! function apply(frame) {
//!   for (const op of frame.ops) draw(op);
//!   for (const t of frame.timers) {
//!     if (t.kind === "schedule") {
//!       timers.set(t.ticket, setTimeout(() => apply(session.replyDue(t.ticket)), t.delay_ms));
//!     } else {
//!       clearTimeout(timers.get(t.ticket));
//!     }
//!   }
//! }
//!
//! apply(session.frame());
//! cell.onclick = () => apply(session.click("E2"));
//! ```

use chess_board::{RecordingRenderer, RenderOp, Renderer};
use chess_controller::{
    Controller, ControllerConfig, ControllerError, GamePhase, ReplyScheduler, ReplyTicket,
};
use chess_core::{CellId, CellParseError, Color, ColorParseError, FenError};
use chess_engine::{AiLevel, AiLevelError, MoveEngine, StandardEngine};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Errors reported to the page. Each converts into a `JsError`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid side: {0}")]
    Side(#[from] ColorParseError),

    #[error("invalid level: {0}")]
    Level(#[from] AiLevelError),

    #[error("invalid cell: {0}")]
    Cell(#[from] CellParseError),

    #[error("invalid FEN: {0}")]
    Fen(#[from] FenError),

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// A timer change the page must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerRequest {
    Schedule { ticket: u64, delay_ms: u64 },
    Cancel { ticket: u64 },
}

/// Collects timer requests until the page picks them up.
#[derive(Debug, Default)]
pub struct PageTimers {
    requests: Vec<TimerRequest>,
}

impl ReplyScheduler for PageTimers {
    fn schedule(&mut self, ticket: ReplyTicket, delay: Duration) {
        self.requests.push(TimerRequest::Schedule {
            ticket: ticket.id(),
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        });
    }

    fn cancel(&mut self, ticket: ReplyTicket) {
        self.requests.push(TimerRequest::Cancel { ticket: ticket.id() });
    }
}

/// Everything the page needs to catch up after one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub ops: Vec<RenderOp>,
    pub timers: Vec<TimerRequest>,
    pub selected: Option<CellId>,
    pub turn: Color,
    /// Set once the automated side had no legal move.
    pub game_over: Option<String>,
}

/// A controller wired to the recording grid and the page timers.
pub struct Game<E> {
    controller: Controller<E, RecordingRenderer, PageTimers>,
    activations: Rc<RefCell<VecDeque<CellId>>>,
}

impl<E: MoveEngine> Game<E> {
    pub fn new(engine: E, config: ControllerConfig) -> Self {
        let activations = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&activations);
        let mut renderer = RecordingRenderer::new();
        renderer.on_cell_activated(Box::new(move |cell| sink.borrow_mut().push_back(cell)));

        Game {
            controller: Controller::new(engine, renderer, PageTimers::default(), config),
            activations,
        }
    }

    /// Activates `cell` on the grid and processes the resulting events.
    ///
    /// On a desync the remaining activations are dropped; the draw calls
    /// made before the failure stay queued for the next frame.
    pub fn activate(&mut self, cell: CellId) -> Result<Frame, ControllerError> {
        self.controller.renderer_mut().activate(cell);
        loop {
            let next = self.activations.borrow_mut().pop_front();
            let Some(cell) = next else { break };
            if let Err(e) = self.controller.on_cell_activated(cell) {
                self.activations.borrow_mut().clear();
                return Err(e);
            }
        }
        Ok(self.take_frame())
    }

    /// Delivers a fired timer.
    pub fn fire(&mut self, ticket: u64) -> Result<Frame, ControllerError> {
        self.controller.on_reply_due(ReplyTicket::new(ticket))?;
        Ok(self.take_frame())
    }

    pub fn restart(&mut self, engine: E) -> Frame {
        self.controller.restart(engine);
        self.take_frame()
    }

    /// Drains pending draw calls and timer requests.
    pub fn take_frame(&mut self) -> Frame {
        let ops = self.controller.renderer_mut().drain_ops();
        let timers = std::mem::take(&mut self.controller.scheduler_mut().requests);
        Frame {
            ops,
            timers,
            selected: self.controller.selection().origin(),
            turn: self.controller.snapshot().turn(),
            game_over: match self.controller.phase() {
                GamePhase::Playing => None,
                GamePhase::Finished { outcome, .. } => Some(outcome.to_string()),
            },
        }
    }

    pub fn engine(&self) -> &E {
        self.controller.engine()
    }
}

/// One game bound to one page grid.
#[wasm_bindgen]
pub struct Session {
    game: Game<StandardEngine>,
    level: AiLevel,
    seed: u64,
}

impl Session {
    pub fn create(
        human: &str,
        level: &str,
        delay_ms: u32,
        seed: u64,
    ) -> Result<Session, SessionError> {
        let human: Color = human.parse()?;
        let level: AiLevel = level.parse()?;
        let config = ControllerConfig {
            reply_delay: Duration::from_millis(u64::from(delay_ms)),
            human,
        };
        let engine = StandardEngine::new().with_level(level).with_seed(seed);
        Ok(Session {
            game: Game::new(engine, config),
            level,
            seed,
        })
    }

    /// Activates the cell labelled `label` (`"E2"`).
    pub fn activate(&mut self, label: &str) -> Result<Frame, SessionError> {
        let cell: CellId = label.parse()?;
        Ok(self.game.activate(cell)?)
    }

    pub fn fire(&mut self, ticket: u64) -> Result<Frame, SessionError> {
        Ok(self.game.fire(ticket)?)
    }

    /// Starts over from `fen`, or from the standard position.
    pub fn start_over(&mut self, fen: Option<&str>) -> Result<Frame, SessionError> {
        self.seed = self.seed.wrapping_add(1);
        let engine = match fen {
            Some(fen) => StandardEngine::from_fen(fen)?,
            None => StandardEngine::new(),
        };
        Ok(self
            .game
            .restart(engine.with_level(self.level).with_seed(self.seed)))
    }

    pub fn take_frame(&mut self) -> Frame {
        self.game.take_frame()
    }
}

fn to_js(frame: &Frame) -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(frame)?)
}

#[wasm_bindgen]
impl Session {
    /// Creates a session.
    ///
    /// `human` is `"white"` or `"black"`; `level` is `"random"`, `"greedy"`,
    /// `"minimax"` or `"minimax:N"`.
    #[wasm_bindgen(constructor)]
    pub fn new(human: &str, level: &str, delay_ms: u32, seed: u64) -> Result<Session, JsError> {
        Ok(Session::create(human, level, delay_ms, seed)?)
    }

    /// Returns the draw calls and timers accumulated so far; call once after
    /// construction to paint the initial board.
    pub fn frame(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.take_frame())
    }

    /// Reports a click on the cell labelled `label` (`"E2"`).
    ///
    /// If this throws, call [`Session::frame`] to pick up the draw calls made
    /// before the failure.
    pub fn click(&mut self, label: &str) -> Result<JsValue, JsError> {
        to_js(&self.activate(label)?)
    }

    /// Reports that the timer for `ticket` fired.
    #[wasm_bindgen(js_name = replyDue)]
    pub fn reply_due(&mut self, ticket: u64) -> Result<JsValue, JsError> {
        to_js(&self.fire(ticket)?)
    }

    /// Starts a new game, cancelling any pending reply.
    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self, fen: Option<String>) -> Result<JsValue, JsError> {
        to_js(&self.start_over(fen.as_deref())?)
    }

    /// The current position as FEN.
    #[wasm_bindgen(js_name = toFen)]
    pub fn to_fen(&self) -> String {
        self.game.engine().position().to_fen()
    }
}
