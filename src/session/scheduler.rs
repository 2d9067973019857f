//! Cancellable boot timers keyed by container id
//!
//! Each `request_start` issues a [`BootTicket`]. At most one ticket is live
//! per container: stopping cancels it and restarting replaces it, so a timer
//! that fires late carries a stale ticket and is ignored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One scheduled `Starting -> Running` completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootTicket {
    pub container_id: String,
    pub seq: u64,
    pub due: DateTime<Utc>,
}

#[derive(Debug, Default, Clone)]
pub struct BootScheduler {
    pending: HashMap<String, BootTicket>,
    next_seq: u64,
}

impl BootScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for `id`, replacing any earlier one
    pub fn schedule(&mut self, id: &str, due: DateTime<Utc>) -> BootTicket {
        self.next_seq += 1;
        let ticket = BootTicket {
            container_id: id.to_string(),
            seq: self.next_seq,
            due,
        };
        self.pending.insert(id.to_string(), ticket.clone());
        ticket
    }

    /// Drop the live ticket for `id`
    pub fn cancel(&mut self, id: &str) -> Option<BootTicket> {
        self.pending.remove(id)
    }

    pub fn pending(&self, id: &str) -> Option<&BootTicket> {
        self.pending.get(id)
    }

    /// Consume `ticket` if it is still the live one for its container
    pub fn redeem(&mut self, ticket: &BootTicket) -> bool {
        match self.pending.get(&ticket.container_id) {
            Some(live) if live.seq == ticket.seq => {
                self.pending.remove(&ticket.container_id);
                true
            }
            _ => false,
        }
    }

    /// Remove and return every ticket due at or before `now`, oldest first
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<BootTicket> {
        let mut due: Vec<BootTicket> = self
            .pending
            .values()
            .filter(|t| t.due <= now)
            .cloned()
            .collect();
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.seq.cmp(&b.seq)));
        for ticket in &due {
            self.pending.remove(&ticket.container_id);
        }
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
