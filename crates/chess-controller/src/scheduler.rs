//! Delayed reply scheduling.

use std::fmt;
use std::time::Duration;

/// Identifies one scheduled automated reply.
///
/// Tickets are handed out in increasing order by the controller. A fired
/// ticket that no longer matches the controller's pending one is stale and
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyTicket(u64);

impl ReplyTicket {
    pub const fn new(id: u64) -> Self {
        ReplyTicket(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        ReplyTicket(self.0 + 1)
    }
}

impl fmt::Display for ReplyTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arms and disarms reply timers on behalf of the controller.
///
/// When a timer fires, the host must deliver its ticket back to
/// [`Controller::on_reply_due`](crate::Controller::on_reply_due) on the same
/// event queue as cell activations.
pub trait ReplyScheduler {
    fn schedule(&mut self, ticket: ReplyTicket, delay: Duration);

    /// Disarms a timer. Cancelling a ticket that already fired is a no-op.
    fn cancel(&mut self, ticket: ReplyTicket);
}

impl<S: ReplyScheduler + ?Sized> ReplyScheduler for Box<S> {
    fn schedule(&mut self, ticket: ReplyTicket, delay: Duration) {
        (**self).schedule(ticket, delay)
    }

    fn cancel(&mut self, ticket: ReplyTicket) {
        (**self).cancel(ticket)
    }
}

/// A scheduler driven by an explicit clock.
///
/// Time only moves when [`ManualScheduler::advance`] is called, which makes
/// it suitable for tests and for hosts whose timers live outside Rust.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    timers: Vec<(Duration, ReplyTicket)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Armed tickets, earliest due first.
    pub fn pending(&self) -> Vec<ReplyTicket> {
        let mut timers = self.timers.clone();
        timers.sort();
        timers.into_iter().map(|(_, ticket)| ticket).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// Time until the earliest armed timer fires.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers
            .iter()
            .map(|(due, _)| due.saturating_sub(self.now))
            .min()
    }

    /// Moves the clock forward and returns the tickets that fired, in due order.
    pub fn advance(&mut self, by: Duration) -> Vec<ReplyTicket> {
        self.now += by;
        let now = self.now;
        let (mut fired, armed): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(due, _)| *due <= now);
        self.timers = armed;
        fired.sort();
        fired.into_iter().map(|(_, ticket)| ticket).collect()
    }
}

impl ReplyScheduler for ManualScheduler {
    fn schedule(&mut self, ticket: ReplyTicket, delay: Duration) {
        self.timers.push((self.now + delay, ticket));
    }

    fn cancel(&mut self, ticket: ReplyTicket) {
        self.timers.retain(|(_, t)| *t != ticket);
    }
}
