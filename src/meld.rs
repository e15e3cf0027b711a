//! The Meld Classifier (§4.1, §4.2): pure predicates deciding whether an
//! ordered sequence of cards is a legal Set or Run.

use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldType {
    Set,
    Run,
}

pub const MIN_MELD_SIZE: usize = 3;
pub const MAX_SET_SIZE: usize = 4;
pub const MAX_RUN_SIZE: usize = 13;

/// §4.1: 3-4 cards of one rank, pairwise distinct suits among regulars, at
/// most one joker filling a missing suit.
pub fn is_valid_set(cards: &[Card]) -> bool {
    if cards.len() < MIN_MELD_SIZE || cards.len() > MAX_SET_SIZE {
        return false;
    }

    let regulars: Vec<&Card> = cards.iter().filter(|c| !c.is_joker()).collect();
    let jokers = cards.len() - regulars.len();
    if jokers > 1 || regulars.is_empty() {
        return false;
    }

    let rank = regulars[0].rank.expect("filtered to regular cards");
    if regulars.iter().any(|c| c.rank != Some(rank)) {
        return false;
    }

    let mut seen_suits = HashSet::with_capacity(regulars.len());
    regulars.iter().all(|c| seen_suits.insert(c.suit))
}

/// §4.2: for a valid run, the per-position implied numeric rank (1..=14,
/// where 14 means an Ace interpreted high). `None` if `cards` is not a
/// valid run. Position is semantic (order encodes joker placement), so this
/// function is NOT invariant under permutation of `cards` (P4).
pub fn run_implied_values(cards: &[Card]) -> Option<Vec<i32>> {
    let n = cards.len();
    if n < MIN_MELD_SIZE || n > MAX_RUN_SIZE {
        return None;
    }

    // R4: no two jokers adjacent.
    if cards.windows(2).any(|w| w[0].is_joker() && w[1].is_joker()) {
        return None;
    }

    let regulars: Vec<(usize, Card)> = cards
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_joker())
        .map(|(i, c)| (i, *c))
        .collect();

    if regulars.is_empty() {
        return None; // R2
    }

    let suit = regulars[0].1.suit;
    if regulars.iter().any(|(_, c)| c.suit != suit) {
        return None; // R3
    }

    // R5/R6: try both directions and both Ace interpretations; the first
    // combination consistent across every consecutive regular pair wins.
    // Committing to one (direction, ace_mode) pair for the whole run is
    // exactly what rules out K-A-2 wrap-around.
    for direction in [1i32, -1i32] {
        for ace_value in [1i32, 14i32] {
            let value_of = |rank_ordinal: i32| -> i32 {
                if rank_ordinal == 1 { ace_value } else { rank_ordinal }
            };

            let consistent = regulars.windows(2).all(|w| {
                let (i0, c0) = w[0];
                let (i1, c1) = w[1];
                let v0 = value_of(c0.rank.unwrap().ordinal());
                let v1 = value_of(c1.rank.unwrap().ordinal());
                let gap = (i1 - i0) as i32;
                v1 - v0 == direction * gap
            });
            if !consistent {
                continue;
            }

            let (i0, c0) = regulars[0];
            let v0 = value_of(c0.rank.unwrap().ordinal());
            let start = v0 - direction * (i0 as i32);

            let values: Vec<i32> = (0..n as i32).map(|pos| start + direction * pos).collect();

            // R7: every implied value (joker or regular) stays in 1..=14.
            if values.iter().any(|&v| !(1..=14).contains(&v)) {
                continue;
            }

            return Some(values);
        }
    }

    None
}

pub fn is_valid_run(cards: &[Card]) -> bool {
    run_implied_values(cards).is_some()
}

pub fn meld_type(cards: &[Card]) -> Option<MeldType> {
    if is_valid_set(cards) {
        Some(MeldType::Set)
    } else if is_valid_run(cards) {
        Some(MeldType::Run)
    } else {
        None
    }
}

/// Sum of regular point values plus resolved joker values (§4.3, §4.5
/// "Score of a meld"). `None` if `cards` is not a valid meld.
pub fn meld_score(cards: &[Card]) -> Option<u32> {
    meld_type(cards)?;
    let mut total = 0u32;
    for (i, card) in cards.iter().enumerate() {
        total += if card.is_joker() {
            crate::joker::resolve_joker_value(cards, i)?
        } else {
            card.points()
        };
    }
    Some(total)
}
