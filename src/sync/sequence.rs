//! Load-state tracking with last-request-wins staleness discard.

use std::fmt;

/// Lifecycle of one list scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadError,
}

/// Sequence number handed out when a load is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tracks the most recently issued load for a scope. Only the response to
/// that load may settle the state; anything older is stale.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    issued: u64,
    state: LoadState,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new load, superseding any in flight.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.state = LoadState::Loading;
        Ticket(self.issued)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Record a response. Returns `false`, leaving the state untouched, when
    /// the ticket has been superseded.
    pub fn settle(&mut self, ticket: Ticket, succeeded: bool) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = if succeeded {
            LoadState::Loaded
        } else {
            LoadState::LoadError
        };
        true
    }

    pub fn state(&self) -> LoadState {
        self.state
    }
}
