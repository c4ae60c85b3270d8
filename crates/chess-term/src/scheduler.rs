//! Reply timers on the tokio runtime.

use crate::session::Event;
use chess_controller::{ReplyScheduler, ReplyTicket};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

/// Each scheduled reply is a sleeping task that posts [`Event::ReplyDue`]
/// to the session queue. Cancelling aborts the task.
pub struct TokioScheduler {
    events: UnboundedSender<Event>,
    timers: HashMap<ReplyTicket, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(events: UnboundedSender<Event>) -> Self {
        TokioScheduler {
            events,
            timers: HashMap::new(),
        }
    }

    /// Number of timers that have not fired or been cancelled.
    #[cfg(test)]
    pub fn armed(&self) -> usize {
        self.timers.values().filter(|h| !h.is_finished()).count()
    }
}

impl ReplyScheduler for TokioScheduler {
    fn schedule(&mut self, ticket: ReplyTicket, delay: Duration) {
        self.timers.retain(|_, handle| !handle.is_finished());
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The session is gone if the queue is closed.
            let _ = events.send(Event::ReplyDue(ticket));
        });
        self.timers.insert(ticket, handle);
    }

    fn cancel(&mut self, ticket: ReplyTicket) {
        if let Some(handle) = self.timers.remove(&ticket) {
            debug!(%ticket, "aborting reply timer");
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}
