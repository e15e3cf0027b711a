//! Game constants (§6), gathered into one configuration value so a host can
//! legally widen `max_players` (up to 6) without touching engine code.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub min_players: u32,
    pub max_players: u32,
    pub initial_hand_size: usize,
    pub max_hand_size: usize,
    pub num_decks: u32,
    pub cards_per_deck: u32,
    pub opening_requirement: u32,
    pub min_meld_size: usize,
    pub max_set_size: usize,
    pub turn_timeout_secs: u64,
    pub room_code_length: usize,
    pub reconnect_timeout_secs: u64,
}

impl GameConfig {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    pub fn reconnect_timeout(&self) -> Duration {
        Duration::from_secs(self.reconnect_timeout_secs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 4,
            initial_hand_size: 14,
            max_hand_size: 15,
            num_decks: 2,
            cards_per_deck: 54,
            opening_requirement: 51,
            min_meld_size: 3,
            max_set_size: 4,
            turn_timeout_secs: 60,
            room_code_length: 6,
            reconnect_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = GameConfig::default();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 4);
        assert_eq!(config.initial_hand_size, 14);
        assert_eq!(config.max_hand_size, 15);
        assert_eq!(config.opening_requirement, 51);
    }

    #[test]
    fn max_players_can_be_widened_up_to_six() {
        let config = GameConfig {
            max_players: 6,
            ..GameConfig::default()
        };
        assert_eq!(config.max_players, 6);
    }
}
