//! Session state and core engine types
//!
//! One `GameState` is one long-lived session: coins, balls, card and level
//! persist across many rounds. It is an explicit context object, never a
//! global, so tests and concurrent instances stay isolated.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::card::{Card, Cell, WinRule};
use super::mercy::MercyLedger;
use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Lane values not yet computed; spin and purchases legal
    Offer,
    /// Lane values being exposed; input locked until the reveal timer runs out
    Revealing,
    /// Player may drop exactly one ball
    Drop,
    /// Ball in flight; waiting on the landing callback
    Resolving,
    /// Level ended in a win or a loss
    RoundOver,
    /// Lucky-wheel visit between levels
    Bonus,
}

/// Paid effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseKind {
    /// +5 balls, clears a loss
    ExtraBalls,
    /// +10 balls, clears a loss
    Continue,
    /// Arms the next drop's special trajectory
    Fireball,
    /// Arms the next spin's forced-number override
    Magic,
}

impl PurchaseKind {
    /// Catalog default price; the shop passes the actual cost to
    /// `request_purchase`
    pub fn cost(self) -> u64 {
        match self {
            PurchaseKind::ExtraBalls => COST_EXTRA_BALLS,
            PurchaseKind::Continue => COST_CONTINUE,
            PurchaseKind::Fireball => COST_FIREBALL,
            PurchaseKind::Magic => COST_MAGIC,
        }
    }
}

/// One ball in flight. Held in a single `Option` slot: taking it on the
/// first landing callback makes duplicates no-ops, and a round reset
/// clears it so a stale callback cannot reach a newer round.
#[derive(Debug, Clone, Copy)]
pub struct PendingDrop {
    pub lane: usize,
    pub special: bool,
}

/// Synchronous result of resolving a landed ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub hit: bool,
    pub coins_earned: u64,
    pub did_win: bool,
    pub did_lose: bool,
}

/// Armed power-up flags, as exposed to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PowerupFlags {
    pub special: bool,
    pub forced: bool,
}

/// Read-only projection consumed by render layers every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub coins: u64,
    pub balls_remaining: u32,
    pub level: u32,
    pub combo: u32,
    pub card: Vec<Cell>,
    pub lane_values: [u16; 5],
    pub phase: Phase,
    pub has_won: bool,
    pub powerup_flags: PowerupFlags,
    pub bonus_reward: Option<u64>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub(super) rng: Pcg32,
    pub level: u32,
    pub coins: u64,
    pub balls_remaining: u32,
    /// Consecutive hits this level
    pub combo: u32,
    pub card: Card,
    pub win_rule: WinRule,
    /// Whether cards for this session carry the pre-marked center cell
    pub free_slot: bool,
    /// 0 = no active value / show letter
    pub lane_values: [u16; 5],
    pub phase: Phase,
    pub has_won: bool,
    pub(super) fireball_armed: bool,
    pub(super) magic_armed: bool,
    pub(super) mercy: MercyLedger,
    /// Drawn but not yet collected wheel prize
    pub bonus_reward: Option<u64>,
    pub(super) pending_drop: Option<PendingDrop>,
    /// Countdown while Revealing
    pub(super) reveal_ticks: u32,
    /// Count-up while Resolving, for the stuck-callback fallback
    pub(super) resolving_ticks: u32,
}

impl GameState {
    /// New session in the default Line mode with a free slot
    pub fn new(seed: u64) -> Self {
        Self::with_rule(seed, WinRule::Line, true)
    }

    /// New session with an explicit win rule and free-slot policy
    pub fn with_rule(seed: u64, win_rule: WinRule, free_slot: bool) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let card = Card::new(1, free_slot, &mut rng);
        log::info!("new session (seed {seed}, rule {win_rule:?})");
        Self {
            seed,
            rng,
            level: 1,
            coins: STARTING_COINS,
            balls_remaining: BALLS_PER_LEVEL,
            combo: 0,
            card,
            win_rule,
            free_slot,
            lane_values: [0; LANE_COUNT],
            phase: Phase::Offer,
            has_won: false,
            fireball_armed: false,
            magic_armed: false,
            mercy: MercyLedger::new(),
            bonus_reward: None,
            pending_drop: None,
            reveal_ticks: 0,
            resolving_ticks: 0,
        }
    }

    /// Fresh card and round state for the current level. Coins persist;
    /// balls, mercy history, combo, flags and any in-flight ball reset.
    pub(super) fn reset_round_state(&mut self) {
        self.card = Card::new(self.level, self.free_slot, &mut self.rng);
        self.balls_remaining = BALLS_PER_LEVEL;
        self.combo = 0;
        self.lane_values = [0; LANE_COUNT];
        self.has_won = false;
        self.fireball_armed = false;
        self.magic_armed = false;
        self.mercy = MercyLedger::new();
        self.bonus_reward = None;
        // Invalidates any outstanding landing callback and stale timers
        self.pending_drop = None;
        self.reveal_ticks = 0;
        self.resolving_ticks = 0;
    }

    pub fn powerup_flags(&self) -> PowerupFlags {
        PowerupFlags {
            special: self.fireball_armed,
            forced: self.magic_armed,
        }
    }

    /// Read-only projection for render layers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            coins: self.coins,
            balls_remaining: self.balls_remaining,
            level: self.level,
            combo: self.combo,
            card: self.card.cells().to_vec(),
            lane_values: self.lane_values,
            phase: self.phase,
            has_won: self.has_won,
            powerup_flags: self.powerup_flags(),
            bonus_reward: self.bonus_reward,
        }
    }
}
