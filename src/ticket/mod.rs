//! Session ticket bookkeeping.
//!
//! The ticket book is UI state, not engine state: an append-only list of
//! legs the user has staged across interactions. The engine never reads
//! it, and nothing here survives the process (no persistence).

use tracing::info;

use crate::types::{Opportunity, TicketLeg};

/// Append-only collection of staged ticket legs.
#[derive(Debug, Default)]
pub struct TicketBook {
    legs: Vec<TicketLeg>,
}

impl TicketBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an opportunity onto the ticket. Returns the new leg.
    pub fn stage(&mut self, opportunity: &Opportunity) -> TicketLeg {
        let leg = TicketLeg::from_opportunity(opportunity);
        info!(leg = %leg, total = self.legs.len() + 1, "Leg staged");
        self.legs.push(leg.clone());
        leg
    }

    /// All staged legs, oldest first.
    pub fn legs(&self) -> &[TicketLeg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
