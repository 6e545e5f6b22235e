//! High score leaderboard
//!
//! Top 10 name + score entries, sorted descending, stored as one JSON blob.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "depth_raider_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded board shown before anyone has played: 10000 down to 1000
    pub fn with_defaults() -> Self {
        let entries = (1..=MAX_HIGH_SCORES as u64)
            .rev()
            .map(|i| HighScoreEntry {
                name: "ACE".to_string(),
                score: i * 1000,
            })
            .collect();
        Self { entries }
    }

    /// Whether a score would make the board
    pub fn is_new_score(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.is_new_score(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score keeping the board sorted and capped.
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from storage, falling back to the seeded board
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<HighScores>(store, Self::STORAGE_KEY) {
            Ok(Some(mut scores)) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::with_defaults()
            }
            Err(err) => {
                log::warn!("Discarding unreadable high scores: {err}");
                Self::with_defaults()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), GameError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn scores(board: &HighScores) -> Vec<u64> {
        board.entries.iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_insert_keeps_order_and_cap() {
        let mut board = HighScores::with_defaults();
        assert_eq!(board.add_score("NEW", 9500), Some(2));
        assert_eq!(
            scores(&board),
            vec![10000, 9500, 9000, 8000, 7000, 6000, 5000, 4000, 3000, 2000]
        );
        assert_eq!(board.entries[1].name, "NEW");
    }

    #[test]
    fn test_low_score_rejected_on_full_board() {
        let mut board = HighScores::with_defaults();
        assert!(!board.is_new_score(999));
        assert!(!board.is_new_score(1000));
        assert_eq!(board.add_score("LOW", 999), None);
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert!(board.is_new_score(1001));
    }

    #[test]
    fn test_zero_never_qualifies() {
        assert!(!HighScores::new().is_new_score(0));
        assert_eq!(HighScores::new().potential_rank(50), Some(1));
    }

    #[test]
    fn test_load_save_through_store() {
        let mut store = MemoryStore::new();
        assert_eq!(HighScores::load(&store), HighScores::with_defaults());

        let mut board = HighScores::new();
        board.add_score("ZED", 42);
        board.save(&mut store).unwrap();
        assert_eq!(HighScores::load(&store), board);

        store.set(HighScores::STORAGE_KEY, "garbage").unwrap();
        assert_eq!(HighScores::load(&store), HighScores::with_defaults());
    }

    proptest! {
        #[test]
        fn prop_board_stays_sorted_and_capped(inserts in prop::collection::vec(1u64..50_000, 0..40)) {
            let mut board = HighScores::new();
            for score in inserts {
                board.add_score("P", score);
            }
            prop_assert!(board.entries.len() <= MAX_HIGH_SCORES);
            prop_assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
