//! Best-run leaderboard
//!
//! Tracks the top 10 session results, ranked by level reached, then coins
//! earned. Storage is the host's concern; the engine only keeps the table.

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single best-run entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Highest level reached in the run
    pub level_reached: u32,
    /// Coins earned over the run
    pub coins_earned: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

impl HighScoreEntry {
    fn beats(&self, other: &HighScoreEntry) -> bool {
        (self.level_reached, self.coins_earned) > (other.level_reached, other.coins_earned)
    }
}

/// Best-run leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, level_reached: u32, coins_earned: u64) -> bool {
        if level_reached <= 1 && coins_earned == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        let candidate = HighScoreEntry {
            level_reached,
            coins_earned,
            timestamp: 0,
        };
        self.entries.last().map(|e| candidate.beats(e)).unwrap_or(true)
    }

    /// Add a run to the leaderboard if it qualifies.
    /// Returns the rank achieved (1-indexed) or None.
    pub fn add_score(
        &mut self,
        level_reached: u32,
        coins_earned: u64,
        timestamp: u64,
    ) -> Option<usize> {
        if !self.qualifies(level_reached, coins_earned) {
            return None;
        }

        let entry = HighScoreEntry {
            level_reached,
            coins_earned,
            timestamp,
        };

        // Insertion point, sorted descending
        let pos = self.entries.iter().position(|e| entry.beats(e));
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best run so far (if any)
    pub fn top(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }
}
