//! Bingo Drop - round-outcome engine for a ball-drop bingo game
//!
//! Core modules:
//! - `game`: Deterministic game logic (card, lane offers, state machine, economy)
//! - `physics`: Lane-to-bin routing contract and a reference router
//! - `settings`: Player feedback preferences
//! - `highscores`: Best-run leaderboard

pub mod game;
pub mod highscores;
pub mod physics;
pub mod settings;

pub use game::{
    Card, Cell, GameState, MercyLedger, Phase, PurchaseKind, Snapshot, TurnOutcome, WinRule,
};
pub use highscores::HighScores;
pub use physics::{LaneRouter, PegBoardRouter};
pub use settings::{HapticsLevel, Settings, SoundLevel};

/// Game configuration constants
pub mod consts {
    /// Number of lanes / card columns / landing bins
    pub const LANE_COUNT: usize = 5;
    /// Cells per card
    pub const CARD_CELLS: usize = 25;

    /// Balls granted at the start of every level
    pub const BALLS_PER_LEVEL: u32 = 50;
    /// Coins a fresh session starts with
    pub const STARTING_COINS: u64 = 40_000;
    /// Coins paid for marking a number
    pub const HIT_REWARD: u64 = 5;
    /// Level-clear reward is this plus the level index
    pub const WIN_REWARD_BASE: u64 = 100;

    /// Difficulty interpolation stops scaling past this level
    pub const MAX_SCALING_LEVEL: u32 = 500;
    /// Match-count weights at level 1: P(1), P(2), P(3)
    pub const MATCH_WEIGHTS_EASY: [f64; 3] = [0.34, 0.33, 0.33];
    /// Match-count weights at level 500 and above
    pub const MATCH_WEIGHTS_HARD: [f64; 3] = [0.95, 0.04, 0.01];

    /// Mercy overrides only fire at or below this many remaining balls
    pub const MERCY_BALL_THRESHOLD: u32 = 10;
    /// A near-miss number is force-offered at most this many times
    pub const MERCY_MAX_OFFERS: u32 = 2;
    /// Boost applied to the mercy trigger probability
    pub const MERCY_BOOST: f64 = 1.5;

    /// Attempt cap for filler rejection sampling
    pub const FILLER_ATTEMPT_CAP: u32 = 50;

    /// Fixed timestep for phase timers (60 Hz host tick)
    pub const TICK_HZ: u32 = 60;
    /// Reveal animation window before drops become legal (2.2 s)
    pub const REVEAL_TICKS: u32 = 132;
    /// Ticks in Resolving before a missing landing callback force-resolves (10 s)
    pub const RESOLVE_TIMEOUT_TICKS: u32 = 600;

    /// A bonus wheel visit happens every this many levels
    pub const BONUS_LEVEL_INTERVAL: u32 = 25;

    /// Catalog prices. The shop quotes the actual cost per purchase;
    /// these are the defaults it starts from.
    pub const COST_EXTRA_BALLS: u64 = 500;
    pub const COST_CONTINUE: u64 = 1_000;
    pub const COST_FIREBALL: u64 = 250;
    pub const COST_MAGIC: u64 = 500;
    /// Balls granted by the two ball purchases
    pub const EXTRA_BALLS: u32 = 5;
    pub const CONTINUE_BALLS: u32 = 10;
}

/// Linear interpolation between `start` and `end` at `t` in [0, 1]
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}
