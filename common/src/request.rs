//! In-flight request tracking
//!
//! Each Transform / Analyze screen instance owns a [`RequestGate`]. A gate
//! hands out at most one live [`RequestTicket`] at a time; a completion is
//! only applied when its ticket is still the live one. Screen ids come from a
//! counter owned by the application state, so tickets from a torn-down
//! screen never match a later instance.

use crate::error::{Error, Result};

/// Identifies one request from one screen instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    screen: u64,
    seq: u64,
}

impl RequestTicket {
    pub fn screen(&self) -> u64 {
        self.screen
    }
}

#[derive(Debug, Clone)]
pub struct RequestGate {
    screen: u64,
    next_seq: u64,
    in_flight: Option<u64>,
}

impl RequestGate {
    pub fn new(screen: u64) -> Self {
        Self {
            screen,
            next_seq: 0,
            in_flight: None,
        }
    }

    pub fn screen(&self) -> u64 {
        self.screen
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Issues a ticket, or `Error::Busy` while another request is in flight.
    pub fn begin(&mut self) -> Result<RequestTicket> {
        if self.in_flight.is_some() {
            return Err(Error::Busy);
        }
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        Ok(RequestTicket {
            screen: self.screen,
            seq: self.next_seq,
        })
    }

    /// Settles a request. Returns `false` for stale tickets, whose results
    /// must be dropped.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        if ticket.screen != self.screen || self.in_flight != Some(ticket.seq) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Issues a ticket that replaces any in-flight one; only the latest
    /// request can settle.
    pub fn supersede(&mut self) -> RequestTicket {
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        RequestTicket {
            screen: self.screen,
            seq: self.next_seq,
        }
    }

    /// Marks the in-flight request (if any) stale and frees the gate.
    pub fn invalidate(&mut self) {
        self.in_flight = None;
    }
}
