//! Lane-to-bin routing contract
//!
//! The continuous simulation is an external collaborator: it receives a
//! lane index at drop time and must report exactly one landing bin per
//! ball, exactly once (deduplicating repeat contact events is its job).
//! The engine treats the reported bin as authoritative; bounces may
//! legitimately carry a ball into a neighboring bin, and that variance is
//! layered on top of the lane-value assignment by design.
//!
//! `PegBoardRouter` is the reference collaborator used by the demo binary
//! and the tests: a seeded drift model instead of a full rigid-body world.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::LANE_COUNT;

/// Routes one dropped ball to a landing bin
pub trait LaneRouter {
    /// Simulate the drop and return the single landing bin in [0, 5).
    /// `special` is the fireball trajectory: no collisions, near-straight
    /// fall.
    fn route(&mut self, lane: usize, special: bool) -> usize;
}

/// Probability a normal ball drifts one bin to either side
const DRIFT_CHANCE: f64 = 0.15;

/// Seeded drift model of the peg field. Special balls fall straight;
/// normal balls keep their lane 70% of the time and drift one bin left or
/// right 15% each, clamped at the walls.
#[derive(Debug, Clone)]
pub struct PegBoardRouter {
    rng: Pcg32,
}

impl PegBoardRouter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl LaneRouter for PegBoardRouter {
    fn route(&mut self, lane: usize, special: bool) -> usize {
        let lane = lane.min(LANE_COUNT - 1);
        if special {
            return lane;
        }
        let roll = self.rng.random::<f64>();
        let bin = if roll < DRIFT_CHANCE {
            lane.saturating_sub(1)
        } else if roll < 2.0 * DRIFT_CHANCE {
            lane + 1
        } else {
            lane
        };
        bin.min(LANE_COUNT - 1)
    }
}
