//! The Joker Value Resolver (§4.3): the point value a joker represents
//! inside a specific meld, and whether a regular card is eligible to
//! replace it there.

use crate::card::{Card, points_for_virtual_rank};
use crate::meld;

/// The value `meld[position]` (which must be a joker) represents, given the
/// rest of `meld`. `None` if `meld` is not a valid Set/Run or `position`
/// does not hold a joker.
pub fn resolve_joker_value(meld_cards: &[Card], position: usize) -> Option<u32> {
    let joker = meld_cards.get(position)?;
    if !joker.is_joker() {
        return None;
    }

    if meld::is_valid_set(meld_cards) {
        let common_rank = meld_cards.iter().find_map(|c| c.rank)?;
        return Some(common_rank.points());
    }

    let implied = meld::run_implied_values(meld_cards)?;
    Some(points_for_virtual_rank(implied[position]))
}

/// Whether `replacement` could stand in for the joker at `position` in
/// `meld`, i.e. the meld remains valid with the substitution and the
/// replacement matches what the joker represents (§4.3 "Replacement
/// eligibility"). This never mutates `meld`; it is an offline query only.
pub fn can_replace_joker(meld_cards: &[Card], position: usize, replacement: &Card) -> bool {
    let Some(joker) = meld_cards.get(position) else {
        return false;
    };
    if !joker.is_joker() || replacement.is_joker() {
        return false;
    }

    if meld::is_valid_set(meld_cards) {
        let Some(common_rank) = meld_cards.iter().find_map(|c| c.rank) else {
            return false;
        };
        if replacement.rank != Some(common_rank) {
            return false;
        }
        let suit_taken = meld_cards
            .iter()
            .enumerate()
            .any(|(i, c)| i != position && !c.is_joker() && c.suit == replacement.suit);
        if suit_taken {
            return false;
        }
        let mut substituted = meld_cards.to_vec();
        substituted[position] = *replacement;
        return meld::is_valid_set(&substituted);
    }

    let Some(implied) = meld::run_implied_values(meld_cards) else {
        return false;
    };
    let Some(run_suit) = meld_cards.iter().find_map(|c| (!c.is_joker()).then_some(c.suit)) else {
        return false;
    };
    if replacement.suit != run_suit {
        return false;
    }
    let Some(replacement_rank) = replacement.rank else {
        return false;
    };
    let expected = implied[position];
    let rank_matches_expected = replacement_rank.ordinal() == expected
        || (replacement_rank.ordinal() == 1 && (expected == 1 || expected == 14));
    if !rank_matches_expected {
        return false;
    }

    let mut substituted = meld_cards.to_vec();
    substituted[position] = *replacement;
    meld::is_valid_run(&substituted)
}
