//! Room lifecycle (§4.6 SUPPLEMENTED, interface-only): the roster a table
//! accumulates before a game exists. This is a plain value type, not a
//! running actor; a host owns whatever socket loop drives `CreateRoom` /
//! `JoinRoom` / `LeaveRoom` / `StartGame` and calls into this type
//! synchronously.

use crate::config::GameConfig;
use crate::error::{Result, RulesError};
use crate::state::GameState;

#[derive(Debug, Clone)]
pub struct RoomRoster {
    pub code: String,
    pub config: GameConfig,
    seats: Vec<String>,
}

impl RoomRoster {
    pub fn new(code: String, config: GameConfig) -> Self {
        Self { code, config, seats: Vec::new() }
    }

    pub fn players(&self) -> &[String] {
        &self.seats
    }

    pub fn join(&mut self, player_id: String) -> Result<()> {
        if self.seats.iter().any(|p| *p == player_id) {
            return Ok(());
        }
        if self.seats.len() as u32 >= self.config.max_players {
            return Err(RulesError::InvalidGameState { detail: "room is full".into() });
        }
        self.seats.push(player_id);
        Ok(())
    }

    pub fn leave(&mut self, player_id: &str) {
        self.seats.retain(|p| p != player_id);
    }

    /// Deals a new [`GameState`] for the current roster, provided it meets
    /// the configured player-count range.
    pub fn start_game(&self) -> Result<GameState> {
        let count = self.seats.len() as u32;
        if count < self.config.min_players || count > self.config.max_players {
            return Err(RulesError::InvalidGameState {
                detail: format!(
                    "cannot start with {} players, need {}..={}",
                    count, self.config.min_players, self.config.max_players
                ),
            });
        }
        GameState::deal(self.seats.clone(), self.config)
    }
}
