use crate::card::{ALL_RANKS, Card, CardId, Suit};
use rand::rng;
use rand::seq::SliceRandom;

/// The 108-card draw pile: two 54-card decks (52 regular cards plus one red
/// and one black joker each), per §6 `NumDecks`/`CardsPerDeck`.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

pub const CARDS_PER_DECK: u32 = 54;

impl Deck {
    /// Builds a freshly assembled, unshuffled deck of `num_decks` physical
    /// decks (108 cards for the standard two-deck configuration).
    pub fn new(num_decks: u32) -> Self {
        let mut cards = Vec::with_capacity((CARDS_PER_DECK * num_decks) as usize);
        let mut next_id = 0u32;

        for _ in 0..num_decks {
            for suit in Suit::REGULAR {
                for rank in ALL_RANKS {
                    cards.push(Card::regular(CardId(next_id), suit, rank));
                    next_id += 1;
                }
            }
            cards.push(Card::joker(CardId(next_id), Suit::JokerRed));
            next_id += 1;
            cards.push(Card::joker(CardId(next_id), Suit::JokerBlack));
            next_id += 1;
        }

        Self { cards }
    }

    #[tracing::instrument(skip(self))]
    pub fn shuffle(&mut self) {
        let mut rng = rng();
        self.cards.shuffle(&mut rng);
        tracing::debug!(cards = self.cards.len(), "deck shuffled");
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[cfg(test)]
    pub(crate) fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Replaces the deck's contents outright; used when reshuffling the
    /// discard pile into an exhausted draw pile (§9 open question c).
    #[tracing::instrument(skip(self, cards), fields(cards = cards.len()))]
    pub fn refill_shuffled(&mut self, mut cards: Vec<Card>) {
        let mut rng = rng();
        cards.shuffle(&mut rng);
        let count = cards.len();
        self.cards = cards;
        tracing::debug!(count, "draw pile refilled from discard");
    }
}
