//! The interaction controller and its effect application.

use crate::error::ControllerError;
use crate::scheduler::{ReplyScheduler, ReplyTicket};
use crate::selection::{transition, Effect, LegalMoves, Selection};
use chess_board::Renderer;
use chess_core::{CellId, Color};
use chess_engine::{BoardSnapshot, EngineError, GameOutcome, MoveEngine};
use std::time::Duration;
use tracing::{debug, error, info};

/// Delay between a human move and the automated reply.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_secs(3);

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub reply_delay: Duration,
    /// The side whose moves come from cell activations.
    pub human: Color,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            reply_delay: DEFAULT_REPLY_DELAY,
            human: Color::White,
        }
    }
}

/// Whether the session still dispatches automated replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// `side` had no legal move when its reply came due.
    Finished { side: Color, outcome: GameOutcome },
}

/// What happened when a reply timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Played { origin: CellId, destination: CellId },
    GameOver(GameOutcome),
    /// The ticket was cancelled or superseded; nothing changed.
    Stale,
}

/// Owns one game session: the engine, the visual surface, the reply timer,
/// the current snapshot, and the selection.
///
/// The host forwards every cell activation to [`Controller::on_cell_activated`]
/// and every fired timer to [`Controller::on_reply_due`], one event at a time.
pub struct Controller<E, R, S> {
    engine: E,
    renderer: R,
    scheduler: S,
    config: ControllerConfig,
    snapshot: BoardSnapshot,
    selection: Selection,
    phase: GamePhase,
    pending: Option<ReplyTicket>,
    last_ticket: ReplyTicket,
}

impl<E, R, S> Controller<E, R, S>
where
    E: MoveEngine,
    R: Renderer,
    S: ReplyScheduler,
{
    /// Starts a session: builds the grid and paints the engine's initial
    /// position.
    ///
    /// If the automated side is to move first, its reply is scheduled right
    /// away.
    pub fn new(engine: E, mut renderer: R, scheduler: S, config: ControllerConfig) -> Self {
        let snapshot = engine.current_snapshot();
        renderer.build_grid();
        for (&cell, &piece) in snapshot.pieces() {
            renderer.set_glyph(cell, Some(piece));
        }
        info!(human = %config.human, turn = %snapshot.turn(), "session started");

        let mut controller = Controller {
            engine,
            renderer,
            scheduler,
            config,
            snapshot,
            selection: Selection::Unselected,
            phase: GamePhase::Playing,
            pending: None,
            last_ticket: ReplyTicket::new(0),
        };
        controller.schedule_opening_reply();
        controller
    }

    /// Handles a click on `target`.
    ///
    /// Clicks only select or move while it is the human's turn and the game
    /// is still running; otherwise they are no-ops. An engine rejection of a
    /// move the snapshot listed as legal resets the selection and is returned
    /// as [`ControllerError::Desync`].
    pub fn on_cell_activated(&mut self, target: CellId) -> Result<(), ControllerError> {
        let idle = LegalMoves::new();
        let movable = if self.accepts_input() {
            self.snapshot.legal_moves()
        } else {
            &idle
        };

        let step = transition(self.selection, movable, target);
        if step.is_noop() {
            debug!(%target, selection = ?self.selection, "click ignored");
            return Ok(());
        }
        debug!(%target, from = ?self.selection, to = ?step.next, "selection changed");
        self.selection = step.next;

        for effect in step.effects {
            match effect {
                Effect::Highlight { cell, on } => self.renderer.set_highlighted(cell, on),
                Effect::CommitMove {
                    origin,
                    destination,
                } => self.commit(origin, destination)?,
                Effect::ScheduleReply => self.schedule_reply(),
            }
        }
        Ok(())
    }

    /// Handles a fired reply timer.
    pub fn on_reply_due(&mut self, ticket: ReplyTicket) -> Result<ReplyOutcome, ControllerError> {
        if self.pending != Some(ticket) {
            debug!(%ticket, pending = ?self.pending, "stale reply timer");
            return Ok(ReplyOutcome::Stale);
        }
        self.pending = None;

        match self.engine.auto_reply() {
            Ok(reply) => {
                self.clear_selection();
                repaint(&mut self.renderer, &self.snapshot, &reply.snapshot);
                self.snapshot = reply.snapshot;
                info!(origin = %reply.origin, destination = %reply.destination, "reply played");
                Ok(ReplyOutcome::Played {
                    origin: reply.origin,
                    destination: reply.destination,
                })
            }
            Err(EngineError::NoLegalMove { side, outcome }) => {
                self.phase = GamePhase::Finished { side, outcome };
                info!(%side, %outcome, "game over");
                Ok(ReplyOutcome::GameOver(outcome))
            }
            Err(e) => {
                error!(error = %e, "automated reply failed");
                Err(e.into())
            }
        }
    }

    /// Replaces the game with `engine`, returning the previous one.
    ///
    /// Any pending reply is cancelled before the board is touched, selection
    /// and highlights are cleared, and only cells that differ from the
    /// previous game are repainted.
    pub fn restart(&mut self, engine: E) -> E {
        if let Some(ticket) = self.pending.take() {
            debug!(%ticket, "cancelling pending reply");
            self.scheduler.cancel(ticket);
        }
        self.clear_selection();

        let next = engine.current_snapshot();
        repaint(&mut self.renderer, &self.snapshot, &next);
        self.snapshot = next;
        self.phase = GamePhase::Playing;
        let previous = std::mem::replace(&mut self.engine, engine);
        info!(turn = %self.snapshot.turn(), "new game");

        self.schedule_opening_reply();
        previous
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The reply currently waiting on its timer.
    pub fn pending_reply(&self) -> Option<ReplyTicket> {
        self.pending
    }

    /// Returns true while clicks can select and move pieces.
    pub fn accepts_input(&self) -> bool {
        self.phase == GamePhase::Playing && self.snapshot.turn() == self.config.human
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Host access to the surface, for routing raw input into it. Drawing
    /// through this handle bypasses the controller's bookkeeping.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn commit(&mut self, origin: CellId, destination: CellId) -> Result<(), ControllerError> {
        match self.engine.apply_move(origin, destination) {
            Ok(next) => {
                repaint(&mut self.renderer, &self.snapshot, &next);
                self.snapshot = next;
                info!(%origin, %destination, "move played");
                Ok(())
            }
            Err(EngineError::IllegalMove { .. }) => {
                self.selection = Selection::Unselected;
                error!(%origin, %destination, "engine rejected a move the snapshot allows");
                Err(ControllerError::Desync {
                    origin,
                    destination,
                })
            }
            Err(e) => {
                self.selection = Selection::Unselected;
                error!(error = %e, "move failed");
                Err(e.into())
            }
        }
    }

    fn schedule_reply(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if let Some(previous) = self.pending.take() {
            self.scheduler.cancel(previous);
        }
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.pending = Some(ticket);
        self.scheduler.schedule(ticket, self.config.reply_delay);
        debug!(%ticket, delay = ?self.config.reply_delay, "reply scheduled");
    }

    fn schedule_opening_reply(&mut self) {
        if self.snapshot.turn() != self.config.human {
            self.schedule_reply();
        }
    }

    fn clear_selection(&mut self) {
        if let Some(origin) = self.selection.origin() {
            if let Some(destinations) = self.snapshot.destinations(origin) {
                for &cell in destinations {
                    self.renderer.set_highlighted(cell, false);
                }
            }
        }
        self.selection = Selection::Unselected;
    }
}

fn repaint<R: Renderer>(renderer: &mut R, prev: &BoardSnapshot, next: &BoardSnapshot) {
    for cell in prev.changed_cells(next) {
        renderer.set_glyph(cell, next.piece_at(cell));
    }
}
