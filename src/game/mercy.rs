//! Mercy (pity) ledger
//!
//! Tracks how often a near-completion number has been force-offered so the
//! low-ball bias never repeats a number on consecutive rounds and never
//! offers it more than twice per level.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::MERCY_MAX_OFFERS;

/// Force-offer history for one number
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MercyEntry {
    pub times_offered: u32,
    /// Ball count at the moment of the last force-offer
    pub last_offered_at_balls: Option<u32>,
}

/// Per-level force-offer history, keyed by card number.
/// Created empty at level start; reset only on level (re)init.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MercyLedger {
    entries: HashMap<u16, MercyEntry>,
}

impl MercyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, value: u16) -> MercyEntry {
        self.entries.get(&value).copied().unwrap_or_default()
    }

    /// How many of the owed offers are still outstanding for `value`
    pub fn offers_still_owed(&self, value: u16) -> u32 {
        MERCY_MAX_OFFERS.saturating_sub(self.entry(value).times_offered)
    }

    /// Whether `value` may be force-offered at `balls_remaining`.
    /// Blocked once fully offered, and always on the round immediately
    /// after a force-offer (the previous round had one more ball).
    pub fn eligible(&self, value: u16, balls_remaining: u32) -> bool {
        let entry = self.entry(value);
        entry.times_offered < MERCY_MAX_OFFERS
            && entry.last_offered_at_balls != Some(balls_remaining + 1)
    }

    /// Record a successful force-offer at `balls_remaining`
    pub fn record_offer(&mut self, value: u16, balls_remaining: u32) {
        let entry = self.entries.entry(value).or_default();
        entry.times_offered += 1;
        entry.last_offered_at_balls = Some(balls_remaining);
    }
}
