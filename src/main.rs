//! Terminal autoplayer demo
//!
//! Runs the engine against the reference peg-board router with a naive
//! drop policy and prints per-level results.
//!
//! Usage: bingo-drop [seed] [levels] [--json] [--stats]

use bingo_drop::HighScores;
use bingo_drop::consts::*;
use bingo_drop::game::{GameState, Phase};
use bingo_drop::physics::{LaneRouter, PegBoardRouter};
use bingo_drop::settings::Settings;

/// Pick the lane whose offered value is still needed on the card,
/// falling back to the center lane.
fn pick_lane(state: &GameState) -> usize {
    let needed = state.card.needed_by_column();
    (0..LANE_COUNT)
        .find(|&c| needed[c].contains(&state.lane_values[c]))
        .unwrap_or(LANE_COUNT / 2)
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut seed = 20_260_826;
    let mut target_levels = 3u32;
    let mut dump_json = false;
    let mut settings = Settings::default();
    let mut positional = 0;
    for arg in &mut args {
        if arg == "--json" {
            dump_json = true;
        } else if arg == "--stats" {
            settings.show_stats = true;
        } else if let Ok(n) = arg.parse::<u64>() {
            match positional {
                0 => seed = n,
                _ => target_levels = n as u32,
            }
            positional += 1;
        } else {
            eprintln!("usage: bingo-drop [seed] [levels] [--json] [--stats]");
            std::process::exit(2);
        }
    }

    let mut state = GameState::new(seed);
    let mut router = PegBoardRouter::new(seed.wrapping_add(1));
    let mut scores = HighScores::new();
    let coins_start = state.coins;
    let mut levels_cleared = 0;
    let mut drops = 0u32;

    println!("bingo-drop demo (seed {seed}, target {target_levels} levels)");

    while levels_cleared < target_levels {
        match state.phase {
            Phase::Offer => {
                state.request_spin(None);
            }
            Phase::Revealing => {
                while state.phase == Phase::Revealing {
                    state.tick();
                }
            }
            Phase::Drop => {
                let lane = pick_lane(&state);
                if state.request_drop(lane) {
                    drops += 1;
                }
            }
            Phase::Resolving => {
                let Some((lane, special)) = state.pending_drop() else {
                    break;
                };
                let bin = router.route(lane, special);
                if let Some(outcome) = state.report_landing(bin, special) {
                    if settings.show_stats {
                        println!(
                            "  lane {lane} -> bin {bin}: {} (combo {})",
                            if outcome.hit { "hit" } else { "miss" },
                            state.combo
                        );
                    }
                }
            }
            Phase::RoundOver => {
                if state.has_won {
                    levels_cleared += 1;
                    println!(
                        "level {:>3} cleared with {:>2} balls left, {} coins",
                        state.level, state.balls_remaining, state.coins
                    );
                    state.advance_level();
                } else {
                    println!(
                        "level {:>3} lost after {drops} total drops, retrying",
                        state.level
                    );
                    state.restart_level();
                }
            }
            Phase::Bonus => {
                if let Some(reward) = state.spin_bonus() {
                    println!("bonus wheel: {reward} coins");
                }
                state.collect_bonus();
            }
        }
    }

    let earned = state.coins.saturating_sub(coins_start);
    scores.add_score(state.level, earned, 0);
    println!(
        "done: reached level {}, earned {earned} coins over {drops} drops",
        state.level
    );
    if let Some(best) = scores.top() {
        println!(
            "best run: level {} / {} coins",
            best.level_reached, best.coins_earned
        );
    }

    if dump_json {
        match serde_json::to_string_pretty(&state.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("snapshot serialization failed: {err}"),
        }
    }
}
