//! Error taxonomy (§6, §7). Every fallible engine entry point returns
//! `Result<T, RulesError>`; nothing in this crate panics on caller-reachable
//! input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The stable wire code carried by an `Error{code, message}` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    NotYourTurn,
    WrongPhase,
    EmptyDeck,
    EmptyDiscard,
    HandFull,
    NoFinishingCard,
    AlreadyOpened,
    CardNotInHand,
    DuplicateCards,
    MeldNotFound,
    InvalidMeld,
    InvalidAddition,
    InsufficientPoints,
    CardsRemaining,
    NotOpened,
    InvalidHandSize,
    InvalidDrawPile,
    InvalidPhase,
    PlayerNotFound,
    InvalidGameState,
    FinishingCardLocked,
}

/// §7's four-tier severity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("it is not {actor}'s turn")]
    NotYourTurn { actor: String },

    #[error("action requires phase {expected:?}, state is in {actual:?}")]
    WrongPhase { expected: &'static str, actual: &'static str },

    #[error("the draw pile is empty")]
    EmptyDeck,

    #[error("the discard pile is empty")]
    EmptyDiscard,

    #[error("hand already holds the maximum of {max} cards")]
    HandFull { max: usize },

    #[error("no finishing card is available to claim")]
    NoFinishingCard,

    #[error("player has already opened")]
    AlreadyOpened,

    #[error("card is not in the acting player's hand")]
    CardNotInHand,

    #[error("the same card identity was used more than once")]
    DuplicateCards,

    #[error("no meld exists at the given index")]
    MeldNotFound,

    #[error("cards do not form a valid Set or Run")]
    InvalidMeld,

    #[error("card cannot be added to that meld in that position")]
    InvalidAddition,

    #[error("opening lay scored {scored}, which is below the required {required}")]
    InsufficientPoints { scored: u32, required: u32 },

    #[error("cards remain in hand; cannot declare a win")]
    CardsRemaining,

    #[error("player has not opened and cannot add to another player's meld")]
    NotOpened,

    #[error("a hand size outside 0..={max} was observed")]
    InvalidHandSize { max: usize },

    #[error("the draw pile size is invalid")]
    InvalidDrawPile,

    #[error("phase literal is not one of Draw/Meld/Discard/GameOver")]
    InvalidPhase,

    #[error("no player with id {id} exists in this room")]
    PlayerNotFound { id: String },

    #[error("game state failed an integrity check: {detail}")]
    InvalidGameState { detail: String },

    #[error("the finishing card just claimed this turn cannot be discarded")]
    FinishingCardLocked,
}

impl RulesError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RulesError::NotYourTurn { .. } => ErrorCode::NotYourTurn,
            RulesError::WrongPhase { .. } => ErrorCode::WrongPhase,
            RulesError::EmptyDeck => ErrorCode::EmptyDeck,
            RulesError::EmptyDiscard => ErrorCode::EmptyDiscard,
            RulesError::HandFull { .. } => ErrorCode::HandFull,
            RulesError::NoFinishingCard => ErrorCode::NoFinishingCard,
            RulesError::AlreadyOpened => ErrorCode::AlreadyOpened,
            RulesError::CardNotInHand => ErrorCode::CardNotInHand,
            RulesError::DuplicateCards => ErrorCode::DuplicateCards,
            RulesError::MeldNotFound => ErrorCode::MeldNotFound,
            RulesError::InvalidMeld => ErrorCode::InvalidMeld,
            RulesError::InvalidAddition => ErrorCode::InvalidAddition,
            RulesError::InsufficientPoints { .. } => ErrorCode::InsufficientPoints,
            RulesError::CardsRemaining => ErrorCode::CardsRemaining,
            RulesError::NotOpened => ErrorCode::NotOpened,
            RulesError::InvalidHandSize { .. } => ErrorCode::InvalidHandSize,
            RulesError::InvalidDrawPile => ErrorCode::InvalidDrawPile,
            RulesError::InvalidPhase => ErrorCode::InvalidPhase,
            RulesError::PlayerNotFound { .. } => ErrorCode::PlayerNotFound,
            RulesError::InvalidGameState { .. } => ErrorCode::InvalidGameState,
            RulesError::FinishingCardLocked => ErrorCode::FinishingCardLocked,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.code() {
            ErrorCode::NotYourTurn
            | ErrorCode::WrongPhase
            | ErrorCode::CardNotInHand
            | ErrorCode::InvalidMeld
            | ErrorCode::InsufficientPoints => Severity::Warning,

            ErrorCode::EmptyDeck | ErrorCode::NoFinishingCard => Severity::Info,

            ErrorCode::InvalidHandSize
            | ErrorCode::InvalidDrawPile
            | ErrorCode::InvalidPhase
            | ErrorCode::PlayerNotFound
            | ErrorCode::InvalidGameState => Severity::Critical,

            ErrorCode::EmptyDiscard
            | ErrorCode::HandFull
            | ErrorCode::AlreadyOpened
            | ErrorCode::DuplicateCards
            | ErrorCode::MeldNotFound
            | ErrorCode::InvalidAddition
            | ErrorCode::CardsRemaining
            | ErrorCode::NotOpened
            | ErrorCode::FinishingCardLocked => Severity::Error,
        }
    }
}

pub type Result<T> = core::result::Result<T, RulesError>;
