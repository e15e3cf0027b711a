//! The inbound/outbound contract (§6). These are plain `serde`-derived
//! types; a transport collaborator (a websocket service outside this
//! crate) owns the actual wire codec and socket loop.

use crate::card::CardId;
use crate::error::{ErrorCode, RulesError};
use crate::state::{HandSummary, Phase, PlayerFacingView};
use serde::{Deserialize, Serialize};

/// A validated, per-turn request from the acting player. Room lifecycle
/// actions (`CreateRoom`/`JoinRoom`/`LeaveRoom`/`StartGame`) are handled by
/// [`crate::room::RoomRoster`] rather than flowing through here, since they
/// precede there being a `GameState` to act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum GameAction {
    DrawFromDeck,
    DrawFromDiscard,
    TakeFinishingCard,
    LayMelds { melds: Vec<Vec<CardId>> },
    AddToMeld {
        card_id: CardId,
        meld_owner: String,
        meld_index: usize,
    },
    SkipMeld,
    Discard { card_id: CardId },
    ReorderHand { order: Vec<CardId> },
}

/// A response the transport would broadcast or return to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum GameEvent {
    RoomCreated { room_code: String },
    RoomJoined { room_code: String, player_id: String },
    RoomUpdated { players: Vec<String> },
    GameStarted { current_player_id: String },
    GameStateUpdate { view: PlayerFacingView },
    TurnChanged { current_player_id: String, phase: Phase },
    GameOver { winner_id: String, summary: HandSummary },
    Error {
        code: ErrorCode,
        message: String,
        details: Option<String>,
    },
}

impl From<&RulesError> for GameEvent {
    fn from(err: &RulesError) -> Self {
        GameEvent::Error {
            code: err.code(),
            message: err.to_string(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_error_converts_to_error_event() {
        let err = RulesError::NotYourTurn { actor: "alice".into() };
        let event: GameEvent = (&err).into();
        match event {
            GameEvent::Error { code, .. } => assert_eq!(code, ErrorCode::NotYourTurn),
            _ => panic!("expected Error event"),
        }
    }
}
