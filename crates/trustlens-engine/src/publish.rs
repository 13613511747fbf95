//! Last-request-wins publication.
//!
//! Every rebuild takes a [`Ticket`] before it starts. A finished result is
//! accepted only if its ticket is newer than the last accepted one, so a slow
//! rebuild can never overwrite the output of a later request.

/// Generation number handed out when a rebuild is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Holds the currently published value
#[derive(Debug, Clone)]
pub struct Publisher<T> {
    issued: u64,
    accepted: u64,
    current: Option<T>,
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            accepted: 0,
            current: None,
        }
    }
}

impl<T> Publisher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next generation
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Publish `value` if `ticket` is newer than the last accepted ticket.
    ///
    /// Returns false and drops `value` for a stale ticket.
    pub fn publish(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.0 <= self.accepted {
            tracing::debug!(
                generation = ticket.0,
                accepted = self.accepted,
                "dropped stale result"
            );
            return false;
        }
        self.accepted = ticket.0;
        self.current = Some(value);
        true
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Generation of the published value, 0 if nothing was published
    pub fn accepted(&self) -> u64 {
        self.accepted
    }
}
