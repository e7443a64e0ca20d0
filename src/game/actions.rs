//! Round state machine
//!
//! Action handlers driving `Offer -> Revealing -> Drop -> Resolving` and the
//! end-of-round branches. Every handler is phase-guarded: an out-of-order
//! request (double-tap, UI race) is a harmless rejection, never a panic.
//! The host advances phase timers by calling `tick()` at a fixed rate.

use super::bonus;
use super::outcome;
use super::state::{GameState, PendingDrop, Phase, PurchaseKind, TurnOutcome};
use crate::consts::*;

impl GameState {
    /// Compute lane values and start the reveal window. Legal only in
    /// `Offer`. A forced number is honored only while the magic power-up
    /// is armed; arming is consumed here.
    pub fn request_spin(&mut self, forced: Option<u16>) -> bool {
        if self.phase != Phase::Offer {
            log::debug!("spin rejected in {:?}", self.phase);
            return false;
        }

        let forced = match forced {
            Some(n) if self.magic_armed => {
                // A number the card cannot score is a wasted spin, not a
                // guaranteed hit. Leave the arming for a corrected retry.
                let scorable = self
                    .card
                    .cells()
                    .iter()
                    .any(|c| c.value == Some(n) && !c.marked);
                if scorable {
                    self.magic_armed = false;
                    Some(n)
                } else {
                    log::debug!("forced number {n} not open on the card, ignored");
                    None
                }
            }
            Some(n) => {
                log::debug!("forced number {n} ignored: magic not armed");
                None
            }
            None => None,
        };

        self.lane_values = outcome::offer_lanes(
            &self.card,
            self.level,
            self.balls_remaining,
            &mut self.mercy,
            forced,
            &mut self.rng,
        );
        self.phase = Phase::Revealing;
        self.reveal_ticks = REVEAL_TICKS;
        true
    }

    /// Advance phase timers by one fixed step.
    ///
    /// Counts the reveal window down into `Drop`, and counts time spent in
    /// `Resolving` up; a landing callback that never arrives force-resolves
    /// after the timeout as if the ball fell straight into its lane. Timer
    /// fields belong to the current round, so any reset invalidates them.
    pub fn tick(&mut self) -> Option<TurnOutcome> {
        match self.phase {
            Phase::Revealing => {
                self.reveal_ticks = self.reveal_ticks.saturating_sub(1);
                if self.reveal_ticks == 0 {
                    self.phase = Phase::Drop;
                }
                None
            }
            Phase::Resolving => {
                self.resolving_ticks += 1;
                if self.resolving_ticks < RESOLVE_TIMEOUT_TICKS {
                    return None;
                }
                let pending = self.pending_drop.take()?;
                log::warn!(
                    "no landing callback after {RESOLVE_TIMEOUT_TICKS} ticks, \
                     force-resolving lane {}",
                    pending.lane
                );
                Some(self.resolve(self.lane_values[pending.lane]))
            }
            _ => None,
        }
    }

    /// Drop a ball into `lane`. Legal only in `Drop` with balls left.
    /// The ball is consumed on the attempt, not on a hit.
    pub fn request_drop(&mut self, lane: usize) -> bool {
        if self.phase != Phase::Drop || lane >= LANE_COUNT {
            log::debug!("drop in lane {lane} rejected in {:?}", self.phase);
            return false;
        }
        if self.balls_remaining == 0 {
            return false;
        }

        self.balls_remaining -= 1;
        self.pending_drop = Some(PendingDrop {
            lane,
            special: self.fireball_armed,
        });
        self.phase = Phase::Resolving;
        self.resolving_ticks = 0;
        true
    }

    /// The lane the in-flight ball was dropped into, with its special flag.
    /// This is what the host hands to the physics simulation.
    pub fn pending_drop(&self) -> Option<(usize, bool)> {
        self.pending_drop.as_ref().map(|p| (p.lane, p.special))
    }

    /// Landing callback from the physics simulation: the ball settled in
    /// `bin`. The bin is authoritative even when bounces carried the ball
    /// away from the chosen lane. A callback with no ball in flight
    /// (duplicate contact, stale round) is a no-op.
    pub fn report_landing(&mut self, bin: usize, is_special: bool) -> Option<TurnOutcome> {
        if self.phase != Phase::Resolving || bin >= LANE_COUNT {
            log::debug!("landing in bin {bin} rejected in {:?}", self.phase);
            return None;
        }
        let pending = self.pending_drop.take()?;
        if is_special != pending.special {
            log::debug!(
                "landing special flag {is_special} disagrees with drop {}",
                pending.special
            );
        }
        Some(self.resolve(self.lane_values[bin]))
    }

    /// Score a landed number against the card and pick the next phase
    fn resolve(&mut self, value: u16) -> TurnOutcome {
        // Power-ups are spent whether or not they helped
        self.fireball_armed = false;
        self.magic_armed = false;
        self.resolving_ticks = 0;
        // All lanes back to letters
        self.lane_values = [0; LANE_COUNT];

        let hit = self.card.mark_if_present(value);
        let mut coins_earned = 0;
        if hit {
            self.combo += 1;
            coins_earned = HIT_REWARD;
            self.coins += coins_earned;
        } else {
            self.combo = 0;
        }

        let did_win = hit && self.card.check_win(self.win_rule);
        let did_lose = !did_win && self.balls_remaining == 0;

        if did_win {
            self.has_won = true;
            self.coins += WIN_REWARD_BASE + self.level as u64;
            self.phase = Phase::RoundOver;
            log::info!("level {} cleared, combo {}", self.level, self.combo);
        } else if did_lose {
            self.phase = Phase::RoundOver;
            log::info!("level {} lost, out of balls", self.level);
        } else {
            self.phase = Phase::Offer;
        }

        TurnOutcome {
            hit,
            coins_earned,
            did_win,
            did_lose,
        }
    }

    /// Atomic purchase at the caller-supplied price: funds are checked
    /// before anything mutates, and a rejection changes no state at all.
    pub fn request_purchase(&mut self, kind: PurchaseKind, cost: u64) -> bool {
        if self.coins < cost {
            log::debug!("purchase {kind:?} rejected: {} < {cost}", self.coins);
            return false;
        }
        self.coins -= cost;

        match kind {
            PurchaseKind::ExtraBalls => {
                self.balls_remaining += EXTRA_BALLS;
                self.clear_loss();
            }
            PurchaseKind::Continue => {
                self.balls_remaining += CONTINUE_BALLS;
                self.clear_loss();
            }
            PurchaseKind::Fireball => self.fireball_armed = true,
            PurchaseKind::Magic => self.magic_armed = true,
        }
        log::info!("purchased {kind:?} for {cost} coins");
        true
    }

    /// A ball purchase after a loss puts the round back into play
    fn clear_loss(&mut self) {
        if self.phase == Phase::RoundOver && !self.has_won {
            self.phase = Phase::Offer;
        }
    }

    /// Move to the next level after a win. Every 25th level routes through
    /// the bonus wheel before offers resume.
    pub fn advance_level(&mut self) -> bool {
        if self.phase != Phase::RoundOver || !self.has_won {
            log::debug!("level advance rejected in {:?}", self.phase);
            return false;
        }
        self.level += 1;
        self.reset_round_state();
        self.phase = if self.level.is_multiple_of(BONUS_LEVEL_INTERVAL) {
            Phase::Bonus
        } else {
            Phase::Offer
        };
        log::info!("advanced to level {} ({:?})", self.level, self.phase);
        true
    }

    /// Retry the current level with a fresh card
    pub fn restart_level(&mut self) -> bool {
        if self.phase != Phase::RoundOver {
            log::debug!("restart rejected in {:?}", self.phase);
            return false;
        }
        self.reset_round_state();
        self.phase = Phase::Offer;
        true
    }

    /// Draw the wheel prize. One draw per bonus visit.
    pub fn spin_bonus(&mut self) -> Option<u64> {
        if self.phase != Phase::Bonus || self.bonus_reward.is_some() {
            return None;
        }
        let reward = bonus::draw_prize(&mut self.rng);
        self.bonus_reward = Some(reward);
        Some(reward)
    }

    /// Credit the drawn prize and resume offers
    pub fn collect_bonus(&mut self) -> bool {
        if self.phase != Phase::Bonus {
            return false;
        }
        let Some(reward) = self.bonus_reward.take() else {
            return false;
        };
        self.coins += reward;
        self.phase = Phase::Offer;
        log::info!("bonus wheel paid {reward} coins");
        true
    }

    /// Debug escape hatch: mark the whole card and end the level as a win,
    /// cancelling any in-flight ball and pending timers. Pays nothing.
    pub fn debug_force_win(&mut self) {
        self.pending_drop = None;
        self.reveal_ticks = 0;
        self.resolving_ticks = 0;
        self.lane_values = [0; LANE_COUNT];
        self.card.mark_all();
        self.has_won = true;
        self.phase = Phase::RoundOver;
        log::warn!("debug force-win on level {}", self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::card::{Card, WinRule};

    fn classic_columns() -> [[u16; 5]; 5] {
        [
            [1, 2, 3, 4, 5],
            [16, 17, 18, 19, 20],
            [31, 32, 33, 34, 35],
            [46, 47, 48, 49, 50],
            [61, 62, 63, 64, 65],
        ]
    }

    /// Drive a fresh spin all the way to the Drop phase
    fn spin_to_drop(state: &mut GameState) {
        assert!(state.request_spin(None));
        assert_eq!(state.phase, Phase::Revealing);
        for _ in 0..REVEAL_TICKS {
            state.tick();
        }
        assert_eq!(state.phase, Phase::Drop);
    }

    #[test]
    fn test_full_round_cycle_decrements_one_ball() {
        let mut state = GameState::new(42);
        let before = state.balls_remaining;

        spin_to_drop(&mut state);
        assert!(state.request_drop(2));
        assert_eq!(state.phase, Phase::Resolving);
        assert_eq!(state.balls_remaining, before - 1);

        let outcome = state.report_landing(2, false);
        assert!(outcome.is_some());
        assert_eq!(state.balls_remaining, before - 1);
        assert!(matches!(state.phase, Phase::Offer | Phase::RoundOver));
    }

    #[test]
    fn test_illegal_transitions_are_noops() {
        let mut state = GameState::new(1);

        // Nothing but spin is legal in Offer
        assert!(!state.request_drop(0));
        assert!(state.report_landing(0, false).is_none());
        assert!(!state.advance_level());
        assert!(!state.restart_level());
        assert!(state.spin_bonus().is_none());
        assert!(!state.collect_bonus());
        assert_eq!(state.balls_remaining, BALLS_PER_LEVEL);

        // Spin is not legal twice
        assert!(state.request_spin(None));
        assert!(!state.request_spin(None));

        // No drops during the reveal window
        assert!(!state.request_drop(0));
    }

    #[test]
    fn test_duplicate_landing_ignored() {
        let mut state = GameState::new(7);
        spin_to_drop(&mut state);
        assert!(state.request_drop(1));
        assert!(state.report_landing(1, false).is_some());
        // Second contact event for the same ball: no-op
        assert!(state.report_landing(1, false).is_none());
    }

    #[test]
    fn test_golden_hit_scenario() {
        let mut state = GameState::with_rule(50, WinRule::AnyN(5), false);
        state.card = Card::from_columns(
            [
                [1, 2, 3, 4, 5],
                [16, 17, 18, 19, 20],
                [31, 32, 41, 34, 35],
                [46, 47, 48, 49, 50],
                [61, 62, 63, 64, 65],
            ],
            false,
        );
        state.level = 50;
        state.balls_remaining = 50;
        state.phase = Phase::Drop;
        // Golden numbers 3, 41, 61 in columns 0, 2, 4; exhausted-style
        // markers elsewhere
        state.lane_values = [3, 0, 41, 0, 61];
        let coins_before = state.coins;

        assert!(state.request_drop(2));
        let outcome = state.report_landing(2, false).expect("landing accepted");
        assert_eq!(
            outcome,
            TurnOutcome {
                hit: true,
                coins_earned: 5,
                did_win: false,
                did_lose: false,
            }
        );
        assert_eq!(state.balls_remaining, 49);
        assert_eq!(state.coins, coins_before + 5);
        assert_eq!(state.phase, Phase::Offer);
        assert_eq!(state.lane_values, [0; 5]);
    }

    #[test]
    fn test_last_ball_miss_is_a_loss() {
        let mut state = GameState::with_rule(3, WinRule::Line, false);
        state.card = Card::from_columns(classic_columns(), false);
        state.balls_remaining = 1;
        state.phase = Phase::Drop;
        // 99 is on no card column
        state.lane_values = [99; 5];

        assert!(state.request_drop(0));
        let outcome = state.report_landing(0, false).expect("landing accepted");
        assert!(!outcome.hit);
        assert!(outcome.did_lose);
        assert!(!outcome.did_win);
        assert_eq!(state.phase, Phase::RoundOver);
        assert!(!state.has_won);
    }

    #[test]
    fn test_win_pays_level_reward() {
        let mut state = GameState::with_rule(3, WinRule::Line, false);
        state.card = Card::from_columns(classic_columns(), false);
        state.level = 7;
        for v in [2, 17, 32, 47] {
            state.card.mark_if_present(v);
        }
        state.phase = Phase::Drop;
        state.lane_values = [0, 0, 0, 0, 62];
        let coins_before = state.coins;

        assert!(state.request_drop(4));
        let outcome = state.report_landing(4, false).expect("landing accepted");
        assert!(outcome.did_win);
        assert_eq!(state.phase, Phase::RoundOver);
        assert!(state.has_won);
        assert_eq!(state.coins, coins_before + HIT_REWARD + WIN_REWARD_BASE + 7);
    }

    #[test]
    fn test_resolve_timeout_fallback() {
        let mut state = GameState::new(9);
        spin_to_drop(&mut state);
        let expected = state.lane_values[3];
        let will_hit = state
            .card
            .cells()
            .iter()
            .any(|c| c.value == Some(expected) && !c.marked);
        assert!(state.request_drop(3));

        let mut outcome = None;
        for _ in 0..RESOLVE_TIMEOUT_TICKS {
            outcome = state.tick();
            if outcome.is_some() {
                break;
            }
        }
        let outcome = outcome.expect("timeout resolved the round");
        // Fallback scores the chosen lane's value
        assert_eq!(outcome.hit, will_hit);
        assert!(matches!(state.phase, Phase::Offer | Phase::RoundOver));
        // The late callback is stale now
        assert!(state.report_landing(3, false).is_none());
    }

    #[test]
    fn test_purchase_insufficient_funds() {
        let mut state = GameState::new(4);
        state.coins = 10;
        let snapshot = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(!state.request_purchase(PurchaseKind::ExtraBalls, COST_EXTRA_BALLS));
        assert_eq!(serde_json::to_string(&state.snapshot()).unwrap(), snapshot);
    }

    #[test]
    fn test_purchase_charges_the_quoted_price() {
        let mut state = GameState::new(13);
        state.coins = 300;
        // The shop's quote wins over the catalog default
        assert!(state.request_purchase(PurchaseKind::Magic, 200));
        assert_eq!(state.coins, 100);
        assert!(state.powerup_flags().forced);
        // A quote above the balance is rejected, even below catalog price
        assert!(!state.request_purchase(PurchaseKind::Fireball, 150));
        assert_eq!(state.coins, 100);
        assert!(!state.powerup_flags().special);
    }

    #[test]
    fn test_ball_purchase_clears_loss() {
        let mut state = GameState::with_rule(5, WinRule::Line, false);
        state.card = Card::from_columns(classic_columns(), false);
        state.balls_remaining = 1;
        state.phase = Phase::Drop;
        state.lane_values = [99; 5];
        assert!(state.request_drop(0));
        state.report_landing(0, false).unwrap();
        assert_eq!(state.phase, Phase::RoundOver);

        let coins_before = state.coins;
        assert!(state.request_purchase(PurchaseKind::ExtraBalls, COST_EXTRA_BALLS));
        assert_eq!(state.coins, coins_before - COST_EXTRA_BALLS);
        assert_eq!(state.balls_remaining, EXTRA_BALLS);
        assert_eq!(state.phase, Phase::Offer);
    }

    #[test]
    fn test_fireball_arms_and_clears() {
        let mut state = GameState::new(6);
        assert!(state.request_purchase(PurchaseKind::Fireball, COST_FIREBALL));
        assert!(state.powerup_flags().special);

        spin_to_drop(&mut state);
        assert!(state.request_drop(2));
        assert_eq!(state.pending_drop(), Some((2, true)));
        state.report_landing(2, true).unwrap();
        // Consumed exactly once
        assert!(!state.powerup_flags().special);
    }

    #[test]
    fn test_magic_spin_fills_all_lanes() {
        let mut state = GameState::new(8);
        let target = state
            .card
            .cells()
            .iter()
            .find_map(|c| c.value)
            .expect("card has numbers");

        // Without the purchase the forced number is ignored
        assert!(state.request_spin(Some(target)));
        assert_ne!(state.lane_values, [target; 5]);
        state.debug_force_win();
        state.advance_level();

        assert!(state.request_purchase(PurchaseKind::Magic, COST_MAGIC));
        assert!(state.powerup_flags().forced);
        let target = state
            .card
            .cells()
            .iter()
            .find_map(|c| c.value)
            .expect("card has numbers");
        assert!(state.request_spin(Some(target)));
        assert_eq!(state.lane_values, [target; 5]);
        // Arming consumed by the spin
        assert!(!state.powerup_flags().forced);
    }

    #[test]
    fn test_unused_magic_is_spent_at_resolve() {
        let mut state = GameState::new(14);
        assert!(state.request_purchase(PurchaseKind::Magic, COST_MAGIC));
        assert!(state.powerup_flags().forced);

        // Spin without naming a number: the arming rides along unused
        spin_to_drop(&mut state);
        assert!(state.powerup_flags().forced);
        assert!(state.request_drop(1));
        state.report_landing(1, false).unwrap();
        // Spent whether or not it helped
        assert!(!state.powerup_flags().forced);
    }

    #[test]
    fn test_forced_number_must_be_open_on_the_card() {
        // Off the card entirely
        let mut state = GameState::with_rule(15, WinRule::Line, false);
        state.card = Card::from_columns(classic_columns(), false);
        assert!(state.request_purchase(PurchaseKind::Magic, COST_MAGIC));
        assert!(state.request_spin(Some(99)));
        assert_ne!(state.lane_values, [99; 5]);
        // Kept for a corrected pick next round
        assert!(state.powerup_flags().forced);

        // On the card but already marked
        let mut state = GameState::with_rule(15, WinRule::Line, false);
        state.card = Card::from_columns(classic_columns(), false);
        state.card.mark_if_present(33);
        assert!(state.request_purchase(PurchaseKind::Magic, COST_MAGIC));
        assert!(state.request_spin(Some(33)));
        assert_ne!(state.lane_values, [33; 5]);
        assert!(state.powerup_flags().forced);
    }

    #[test]
    fn test_debug_force_win_pays_nothing() {
        let mut state = GameState::new(16);
        let coins = state.coins;
        state.debug_force_win();
        assert!(state.has_won);
        assert_eq!(state.phase, Phase::RoundOver);
        assert_eq!(state.coins, coins);
    }

    #[test]
    fn test_level_25_routes_through_bonus() {
        let mut state = GameState::new(10);
        state.level = 24;
        state.debug_force_win();
        assert!(state.advance_level());
        assert_eq!(state.level, 25);
        assert_eq!(state.phase, Phase::Bonus);

        // No offers until the wheel resolves
        assert!(!state.request_spin(None));
        assert!(!state.collect_bonus());

        let coins_before = state.coins;
        let reward = state.spin_bonus().expect("one draw per visit");
        assert_eq!(state.bonus_reward, Some(reward));
        // Only one draw
        assert!(state.spin_bonus().is_none());
        assert!(state.collect_bonus());
        assert_eq!(state.coins, coins_before + reward);
        assert_eq!(state.phase, Phase::Offer);
        assert!(state.request_spin(None));
    }

    #[test]
    fn test_restart_resets_round_but_keeps_coins() {
        let mut state = GameState::new(11);
        state.coins = 500;
        state.debug_force_win();
        let level = state.level;
        let coins = state.coins;
        assert!(state.restart_level());
        assert_eq!(state.level, level);
        assert_eq!(state.coins, coins);
        assert_eq!(state.balls_remaining, BALLS_PER_LEVEL);
        assert_eq!(state.phase, Phase::Offer);
        assert!(state.card.cells().iter().any(|c| !c.marked));
    }

    #[test]
    fn test_reset_invalidates_stale_timers() {
        let mut state = GameState::new(12);
        assert!(state.request_spin(None));
        assert_eq!(state.phase, Phase::Revealing);
        // Round is torn down mid-reveal
        state.debug_force_win();
        assert!(state.restart_level());
        // The old reveal timer cannot fire a stale transition
        for _ in 0..(REVEAL_TICKS * 2) {
            assert!(state.tick().is_none());
        }
        assert_eq!(state.phase, Phase::Offer);
    }

    #[test]
    fn test_determinism_same_seed_same_script() {
        let run = |seed: u64| {
            let mut state = GameState::new(seed);
            for _ in 0..20 {
                if state.phase == Phase::RoundOver {
                    if state.has_won {
                        state.advance_level();
                    } else {
                        state.restart_level();
                    }
                    continue;
                }
                state.request_spin(None);
                while state.phase == Phase::Revealing {
                    state.tick();
                }
                state.request_drop(2);
                state.report_landing(2, false);
            }
            serde_json::to_string(&state.snapshot()).unwrap()
        };
        assert_eq!(run(777), run(777));
    }
}
