//! Lane-offer generation
//!
//! Decides the five numbers the lanes offer each round: a level-weighted
//! count of "golden" columns gets numbers still needed on the card, the
//! rest get fillers guaranteed absent from their column, and a mercy
//! override may force a near-completion number while balls run low.
//!
//! Everything draws from one injected RNG stream, so a seeded `Pcg32`
//! reproduces a round exactly.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::card::{Card, column_range};
use super::mercy::MercyLedger;
use crate::consts::*;
use crate::lerp;

/// Column pairs allowed to both be golden in one round.
/// Adjacent pairs are excluded to force spatial spread.
const NON_ADJACENT_PAIRS: [[usize; 2]; 6] = [[0, 2], [0, 3], [0, 4], [1, 3], [1, 4], [2, 4]];

/// The only eligible golden triple
const GOLDEN_TRIPLE: [usize; 3] = [0, 2, 4];

/// P(1 match), P(2), P(3) for a level, interpolated linearly from the
/// easy endpoints at level 1 to the hard endpoints at level 500.
pub fn match_count_weights(level: u32) -> [f64; 3] {
    let effective = level.clamp(1, MAX_SCALING_LEVEL);
    let t = (effective - 1) as f64 / (MAX_SCALING_LEVEL - 1) as f64;
    std::array::from_fn(|i| lerp(MATCH_WEIGHTS_EASY[i], MATCH_WEIGHTS_HARD[i], t))
}

fn draw_match_count<R: Rng>(level: u32, rng: &mut R) -> usize {
    let [p1, p2, _] = match_count_weights(level);
    let roll = rng.random::<f64>();
    if roll < p1 {
        1
    } else if roll < p1 + p2 {
        2
    } else {
        3
    }
}

/// Pick which columns receive a needed number this round.
///
/// `k` degrades to the number of columns that still have content; a 3-match
/// needs the {0,2,4} triple and a 2-match one of the non-adjacent pairs,
/// each falling back a step when the card cannot support them.
pub fn golden_columns<R: Rng>(
    mut k: usize,
    needed_by_column: &[Vec<u16>; 5],
    rng: &mut R,
) -> Vec<usize> {
    let available: Vec<usize> = (0..LANE_COUNT)
        .filter(|&c| !needed_by_column[c].is_empty())
        .collect();
    k = k.min(available.len());

    if k == 3 {
        if GOLDEN_TRIPLE.iter().all(|&c| !needed_by_column[c].is_empty()) {
            return GOLDEN_TRIPLE.to_vec();
        }
        k = 2;
    }
    if k == 2 {
        let valid_pairs: Vec<&[usize; 2]> = NON_ADJACENT_PAIRS
            .iter()
            .filter(|p| p.iter().all(|&c| !needed_by_column[c].is_empty()))
            .collect();
        if let Some(pair) = valid_pairs.choose(rng) {
            return pair.to_vec();
        }
        k = 1;
    }
    if k == 1 {
        if let Some(&col) = available.choose(rng) {
            return vec![col];
        }
    }
    Vec::new()
}

/// Rejection-sample an in-range value absent from the card's column.
/// After the attempt cap the last candidate is accepted; a rare filler
/// that collides with the card is harmless, a hung round is not.
fn filler<R: Rng>(card: &Card, column: usize, level: u32, rng: &mut R) -> u16 {
    let (lo, hi) = column_range(column, level);
    let mut candidate = lo;
    for _ in 0..FILLER_ATTEMPT_CAP {
        candidate = rng.random_range(lo..=hi);
        if !card.column_contains(column, candidate) {
            break;
        }
    }
    candidate
}

/// Scan for a mercy force-placement: a near-miss number whose column still
/// has content, whose ledger entry is eligible, passing an escalating
/// probability roll. Returns (column, value) and records the offer.
fn mercy_override<R: Rng>(
    card: &Card,
    needed_by_column: &[Vec<u16>; 5],
    balls_remaining: u32,
    ledger: &mut MercyLedger,
    rng: &mut R,
) -> Option<(usize, u16)> {
    if balls_remaining == 0 || balls_remaining > MERCY_BALL_THRESHOLD {
        return None;
    }

    let candidates: Vec<u16> = card
        .near_miss_numbers()
        .into_iter()
        .filter(|&v| {
            ledger.eligible(v, balls_remaining)
                && card
                    .column_of(v)
                    .is_some_and(|c| !needed_by_column[c as usize].is_empty())
        })
        .collect();

    let &target = candidates.choose(rng)?;
    let owed = ledger.offers_still_owed(target);
    let chance = (MERCY_BOOST * owed as f64 / balls_remaining as f64).min(1.0);
    if rng.random::<f64>() >= chance {
        return None;
    }

    let column = card.column_of(target)? as usize;
    ledger.record_offer(target, balls_remaining);
    log::debug!("mercy force-offer {target} in column {column} ({balls_remaining} balls left)");
    Some((column, target))
}

/// Compute the five lane values for a round. 0 is the "no active value"
/// marker, offered by columns with nothing left to need.
///
/// A forced number (magic power-up) fills every lane and bypasses the
/// weighted/golden/mercy paths entirely.
pub fn offer_lanes<R: Rng>(
    card: &Card,
    level: u32,
    balls_remaining: u32,
    ledger: &mut MercyLedger,
    forced: Option<u16>,
    rng: &mut R,
) -> [u16; 5] {
    if let Some(value) = forced {
        return [value; LANE_COUNT];
    }

    let needed = card.needed_by_column();
    let mercy = mercy_override(card, &needed, balls_remaining, ledger, rng);
    let k = draw_match_count(level, rng);
    let golden = golden_columns(k, &needed, rng);

    std::array::from_fn(|c| {
        if let Some((mercy_col, mercy_val)) = mercy {
            if c == mercy_col {
                return mercy_val;
            }
        }
        if golden.contains(&c) {
            // Uniform over the column's needed numbers
            *needed[c].choose(rng).unwrap_or(&0)
        } else if needed[c].is_empty() {
            0
        } else {
            filler(card, c, level, rng)
        }
    })
}
