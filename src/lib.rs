pub mod action;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod joker;
pub mod meld;
pub mod partition;
pub mod room;
pub mod state;

pub use action::{GameAction, GameEvent};
pub use config::GameConfig;
pub use error::{ErrorCode, Result, RulesError, Severity};
pub use room::RoomRoster;
pub use state::{GameState, HandSummary, Phase, PlayerFacingView};
