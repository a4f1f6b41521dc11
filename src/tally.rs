//! Win/loss record across tug matches
//!
//! Persisted to LocalStorage, updated when a match reaches game over.

use serde::{Deserialize, Serialize};

use crate::sim::state::Winner;

/// Lifetime counts for the tug game
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Tally {
    pub player_wins: u32,
    pub ai_wins: u32,
    pub rounds_played: u32,
}

impl Tally {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tug_of_rps_tally";

    pub fn new() -> Self {
        Self::default()
    }

    /// Count one resolved round
    pub fn record_round(&mut self) {
        self.rounds_played += 1;
    }

    /// Count a finished match
    pub fn record_match(&mut self, winner: Winner) {
        match winner {
            Winner::Player => self.player_wins += 1,
            Winner::Ai => self.ai_wins += 1,
        }
    }

    pub fn matches_played(&self) -> u32 {
        self.player_wins + self.ai_wins
    }

    /// Player win rate over finished matches, if any were played
    pub fn win_rate(&self) -> Option<f32> {
        let total = self.matches_played();
        if total == 0 {
            None
        } else {
            Some(self.player_wins as f32 / total as f32)
        }
    }

    /// Load the tally from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(tally) = serde_json::from_str::<Tally>(&json) {
                    log::info!(
                        "Loaded tally: {} - {} over {} rounds",
                        tally.player_wins,
                        tally.ai_wins,
                        tally.rounds_played
                    );
                    return tally;
                }
            }
        }

        log::info!("No saved tally, starting fresh");
        Self::new()
    }

    /// Save the tally to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tally saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_win_rate() {
        let mut tally = Tally::new();
        assert_eq!(tally.win_rate(), None);

        tally.record_round();
        tally.record_round();
        tally.record_match(Winner::Player);
        tally.record_match(Winner::Ai);
        tally.record_match(Winner::Player);

        assert_eq!(tally.rounds_played, 2);
        assert_eq!(tally.matches_played(), 3);
        assert!((tally.win_rate().unwrap() - 2.0 / 3.0).abs() < 1e-6);
    }
}
