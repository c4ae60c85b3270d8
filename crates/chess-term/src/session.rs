//! The terminal game session and its event queue.

use crate::config::Config;
use crate::scheduler::TokioScheduler;
use anyhow::{Context, Result};
use chess_board::{Renderer, TextBoard, TextStyle};
use chess_controller::{Controller, ReplyOutcome, ReplyTicket};
use chess_core::CellId;
use chess_engine::StandardEngine;
use std::io::{BufRead, Write};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Everything the session reacts to, delivered one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A line typed by the player.
    Input(String),
    /// The board reported an activated cell.
    CellActivated(CellId),
    ReplyDue(ReplyTicket),
    NewGame,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

const HELP: &str = "Type a cell (e2) to select a piece, then a highlighted cell to move. \
`new` starts over, `quit` exits.";

pub struct Session<W> {
    controller: Controller<StandardEngine, TextBoard, TokioScheduler>,
    events: UnboundedReceiver<Event>,
    sender: UnboundedSender<Event>,
    config: Config,
    games: u64,
    out: W,
}

impl<W: Write> Session<W> {
    /// Sets up the board and the first game. Must run inside a tokio runtime.
    pub fn new(config: Config, out: W) -> Result<Self> {
        let (sender, events) = mpsc::unbounded_channel();

        let style = if config.ansi {
            TextStyle::Ansi
        } else {
            TextStyle::Plain
        };
        let mut board = TextBoard::new(style).oriented(config.human);
        let activations = sender.clone();
        board.on_cell_activated(Box::new(move |cell| {
            let _ = activations.send(Event::CellActivated(cell));
        }));

        let controller = Controller::new(
            config.engine(0)?,
            board,
            TokioScheduler::new(sender.clone()),
            config.controller_config(),
        );

        Ok(Session {
            controller,
            events,
            sender,
            config,
            games: 0,
            out,
        })
    }

    /// A handle for posting events from other tasks.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Processes events until `quit` or until every sender is gone.
    pub async fn run(mut self) -> Result<W> {
        writeln!(self.out, "{}", HELP)?;
        self.draw()?;
        while self.step().await? == Flow::Continue {}
        Ok(self.out)
    }

    /// Waits for the next event and handles it.
    pub async fn step(&mut self) -> Result<Flow> {
        match self.events.recv().await {
            Some(event) => self.handle(event),
            None => Ok(Flow::Quit),
        }
    }

    pub fn handle(&mut self, event: Event) -> Result<Flow> {
        debug!(?event, "event");
        match event {
            Event::Input(line) => return self.input(line.trim()),
            Event::CellActivated(cell) => {
                let before = (self.controller.selection(), self.controller.pending_reply());
                self.controller
                    .on_cell_activated(cell)
                    .context("board and engine disagree")?;
                let after = (self.controller.selection(), self.controller.pending_reply());
                if after != before {
                    self.draw()?;
                }
            }
            Event::ReplyDue(ticket) => match self.controller.on_reply_due(ticket)? {
                ReplyOutcome::Played {
                    origin,
                    destination,
                } => {
                    writeln!(self.out, "Reply: {}-{}", origin, destination)?;
                    self.draw()?;
                }
                ReplyOutcome::GameOver(outcome) => {
                    writeln!(self.out, "Game over: {}. Type `new` to play again.", outcome)?;
                }
                ReplyOutcome::Stale => {}
            },
            Event::NewGame => {
                self.games += 1;
                let engine = self.config.engine(self.games)?;
                self.controller.restart(engine);
                writeln!(self.out, "New game.")?;
                self.draw()?;
            }
            Event::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn input(&mut self, line: &str) -> Result<Flow> {
        match line {
            "" => self.draw()?,
            "quit" | "q" | "exit" => return Ok(Flow::Quit),
            "new" | "n" => {
                let _ = self.sender.send(Event::NewGame);
            }
            "help" | "?" => writeln!(self.out, "{}", HELP)?,
            label => {
                if !self.controller.renderer_mut().click(label) {
                    warn!(label, "unrecognised input");
                    writeln!(self.out, "Unknown cell or command: {}", label)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn draw(&mut self) -> Result<()> {
        write!(self.out, "{}", self.controller.renderer().render())?;
        let turn = self.controller.snapshot().turn();
        if self.controller.accepts_input() {
            writeln!(self.out, "{} to move.", turn)?;
        } else if self.controller.pending_reply().is_some() {
            writeln!(self.out, "{} is thinking...", turn)?;
        }
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn controller(&self) -> &Controller<StandardEngine, TextBoard, TokioScheduler> {
        &self.controller
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }
}

/// Forwards lines from `reader` to the session, then asks it to quit.
///
/// Blocks; run it on a dedicated thread.
pub fn forward_lines<R: BufRead>(reader: R, events: UnboundedSender<Event>) -> Result<()> {
    for line in reader.lines() {
        if events.send(Event::Input(line?)).is_err() {
            return Ok(());
        }
    }
    let _ = events.send(Event::Quit);
    Ok(())
}
