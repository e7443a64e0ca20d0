//! Lucky-wheel bonus draw
//!
//! Visited between levels on every 25th level. One weighted draw over the
//! wheel's ten prize slices; the big slices exist but stay rare, keeping
//! the wheel's expected value near the cost of a Continue.

use rand::Rng;

/// Prize slices as laid out on the wheel, clockwise
pub const PRIZE_SLICES: [u64; 10] = [5, 50, 100, 250, 500, 1_000, 2_500, 5_000, 7_500, 10_000];

/// Per-slice weights out of 100
const PRIZE_WEIGHTS: [u32; 10] = [22, 20, 18, 14, 10, 7, 4, 3, 1, 1];

/// Draw one wheel prize
pub fn draw_prize<R: Rng>(rng: &mut R) -> u64 {
    let roll = rng.random_range(0..100u32);
    let mut cumulative = 0;
    for (prize, weight) in PRIZE_SLICES.iter().zip(PRIZE_WEIGHTS) {
        cumulative += weight;
        if roll < cumulative {
            return *prize;
        }
    }
    PRIZE_SLICES[0]
}

/// Wheel position of a prize, for pointing the UI at the winning slice
pub fn slice_index(prize: u64) -> Option<usize> {
    PRIZE_SLICES.iter().position(|&p| p == prize)
}
