use serde::{Deserialize, Serialize};
use std::fmt;

/// A suit, including the two joker "suits" used to disambiguate the two
/// physical joker cards carried in each 54-card deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Heart,
    Diamond,
    Spade,
    Club,
    JokerRed,
    JokerBlack,
}

impl Suit {
    pub fn is_joker(&self) -> bool {
        matches!(self, Suit::JokerRed | Suit::JokerBlack)
    }

    pub const REGULAR: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Spade, Suit::Club];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suit::Heart => write!(f, "♥"),
            Suit::Diamond => write!(f, "♦"),
            Suit::Spade => write!(f, "♠"),
            Suit::Club => write!(f, "♣"),
            Suit::JokerRed => write!(f, "🃏R"),
            Suit::JokerBlack => write!(f, "🃏B"),
        }
    }
}

/// The rank of a regular card, stored in its low (Ace = 1) form. Runs
/// reinterpret an Ace as high (14) contextually; the stored rank never
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

impl Rank {
    /// Low-ace ordinal, 1..=13.
    pub fn ordinal(&self) -> i32 {
        *self as i32
    }

    /// Point value when left unmelded in a hand, or when resolved as a
    /// joker's implied rank (§3): Ace = 10, 2-10 = face, J/Q/K = 10.
    pub fn points(&self) -> u32 {
        match self {
            Rank::Ace => 10,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other.ordinal() as u32,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ace => write!(f, "A"),
            Rank::Jack => write!(f, "J"),
            Rank::Queen => write!(f, "Q"),
            Rank::King => write!(f, "K"),
            other => write!(f, "{}", other.ordinal()),
        }
    }
}

/// Converts a virtual rank value used while resolving a run (1..=14, where
/// 14 means "ace interpreted high") into its point value.
pub fn points_for_virtual_rank(value: i32) -> u32 {
    match value {
        1 | 14 => 10,
        2..=10 => value as u32,
        11..=13 => 10,
        _ => 0,
    }
}

/// A stable identity for a single physical card within a deal. Two decks
/// of 54 cards yield identities `0..108`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable card value. `rank` is `None` for jokers, which carry no
/// rank of their own (§3). `face_up` is a presentation hint only and never
/// participates in validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Option<Rank>,
    pub face_up: bool,
}

impl Card {
    pub fn regular(id: CardId, suit: Suit, rank: Rank) -> Self {
        debug_assert!(!suit.is_joker());
        Self {
            id,
            suit,
            rank: Some(rank),
            face_up: false,
        }
    }

    pub fn joker(id: CardId, suit: Suit) -> Self {
        debug_assert!(suit.is_joker());
        Self {
            id,
            suit,
            rank: None,
            face_up: false,
        }
    }

    pub fn is_joker(&self) -> bool {
        self.rank.is_none()
    }

    /// Point value in isolation: a joker outside a meld carries no resolved
    /// context and is worth 0 (§3); its in-meld value is derived via
    /// [`crate::joker`].
    pub fn points(&self) -> u32 {
        match self.rank {
            Some(rank) => rank.points(),
            None => 0,
        }
    }

    pub fn with_face_up(mut self, face_up: bool) -> Self {
        self.face_up = face_up;
        self
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Some(rank) => write!(f, "{}{}", rank, self.suit),
            None => write!(f, "{}", self.suit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_is_worth_ten_not_one() {
        let ace = Card::regular(CardId(0), Suit::Heart, Rank::Ace);
        assert_eq!(ace.points(), 10);
    }

    #[test]
    fn face_cards_are_worth_ten() {
        for rank in [Rank::Jack, Rank::Queen, Rank::King] {
            let card = Card::regular(CardId(0), Suit::Spade, rank);
            assert_eq!(card.points(), 10);
        }
    }

    #[test]
    fn numeric_cards_are_worth_face_value() {
        let seven = Card::regular(CardId(0), Suit::Club, Rank::Seven);
        assert_eq!(seven.points(), 7);
    }

    #[test]
    fn isolated_joker_is_worth_nothing() {
        let joker = Card::joker(CardId(0), Suit::JokerRed);
        assert!(joker.is_joker());
        assert_eq!(joker.points(), 0);
    }

    #[test]
    fn virtual_rank_points_match_ace_high_and_low() {
        assert_eq!(points_for_virtual_rank(1), 10);
        assert_eq!(points_for_virtual_rank(14), 10);
        assert_eq!(points_for_virtual_rank(6), 6);
        assert_eq!(points_for_virtual_rank(12), 10);
    }
}
