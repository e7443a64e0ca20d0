//! Deterministic game logic
//!
//! All round-outcome decisions live here. This module must be pure and
//! deterministic:
//! - Seeded RNG only, injected through the session state
//! - Phase timers advance by host-driven fixed ticks
//! - No rendering, audio, or platform dependencies

pub mod actions;
pub mod bonus;
pub mod card;
pub mod mercy;
pub mod outcome;
pub mod state;

pub use bonus::{PRIZE_SLICES, draw_prize};
pub use card::{Card, Cell, WinRule, column_range, column_span};
pub use mercy::{MercyEntry, MercyLedger};
pub use outcome::{golden_columns, match_count_weights, offer_lanes};
pub use state::{GameState, Phase, PowerupFlags, PurchaseKind, Snapshot, TurnOutcome};
