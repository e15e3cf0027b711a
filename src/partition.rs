//! The Meld Partitioner (§4.4): splits an ordered card selection into
//! disjoint maximal melds (authoritative, DP over prefixes), and a
//! best-combination search used only as an offline hint-finder.

use crate::card::Card;
use crate::meld::{self, MAX_RUN_SIZE, MIN_MELD_SIZE};
use std::collections::HashMap;

/// Result of [`partition_best`]: a set of disjoint contiguous sub-sequences
/// of the input, each a valid Set or Run, maximising cards covered first
/// and meld count second.
#[derive(Debug, Clone)]
pub struct Partition {
    pub melds: Vec<Vec<Card>>,
    pub cards_used: usize,
    pub meld_count: usize,
}

#[derive(Clone)]
struct Entry {
    cards_used: usize,
    meld_count: usize,
    melds: Vec<Vec<Card>>,
}

/// Authoritative partitioner. `n` is bounded by a hand's max size (15), so
/// the O(n^2) prefix DP is cheap; this must never be replaced by a
/// recursive subset search (§9), which would be combinatorial in `n`.
pub fn partition_best(cards: &[Card]) -> Partition {
    let n = cards.len();
    let mut best: Vec<Entry> = Vec::with_capacity(n + 1);
    best.push(Entry {
        cards_used: 0,
        meld_count: 0,
        melds: Vec::new(),
    });

    for i in 1..=n {
        let mut candidate = best[i - 1].clone();

        let lower = i.saturating_sub(MAX_RUN_SIZE);
        let upper = i.saturating_sub(MIN_MELD_SIZE);
        for j in lower..=upper {
            let window = &cards[j..i];
            if meld::meld_type(window).is_none() {
                continue;
            }
            let mut extended = best[j].clone();
            extended.cards_used += window.len();
            extended.meld_count += 1;
            extended.melds.push(window.to_vec());

            if (extended.cards_used, extended.meld_count)
                > (candidate.cards_used, candidate.meld_count)
            {
                candidate = extended;
            }
        }

        best.push(candidate);
    }

    let result = best.pop().expect("best always has n+1 entries");
    Partition {
        melds: result.melds,
        cards_used: result.cards_used,
        meld_count: result.meld_count,
    }
}

/// A bitmask over a hand's positions (`0..16`), used to detect overlap
/// between candidate melds cheaply.
pub type HandMask = u16;

#[derive(Debug, Clone)]
struct MeldCandidate {
    cards: Vec<Card>,
    mask: HandMask,
}

fn mask_of(indices: &[usize]) -> HandMask {
    indices.iter().fold(0u16, |m, &i| m | (1u16 << i as u16))
}

/// Candidate Sets built from contiguous windows of same-rank groups, plus
/// joker-enhanced 2-regular + 1-joker combinations, mirroring how trio
/// candidates are grown group-by-group rather than via full subset search.
fn find_set_candidates(hand: &[Card]) -> Vec<MeldCandidate> {
    let mut candidates = Vec::new();

    let joker_indices: Vec<usize> = hand
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_joker())
        .map(|(i, _)| i)
        .collect();

    let mut by_rank: HashMap<crate::card::Rank, Vec<usize>> = HashMap::new();
    for (i, card) in hand.iter().enumerate() {
        if let Some(rank) = card.rank {
            by_rank.entry(rank).or_default().push(i);
        }
    }

    for indices in by_rank.values() {
        let n = indices.len();
        for start in 0..n {
            for end in (start + 3)..=n.min(start + 4) {
                let subset: Vec<usize> = indices[start..end].to_vec();
                let cards: Vec<Card> = subset.iter().map(|&i| hand[i]).collect();
                if meld::is_valid_set(&cards) {
                    candidates.push(MeldCandidate {
                        mask: mask_of(&subset),
                        cards,
                    });
                }
            }
        }

        if n >= 2 {
            for &joker_idx in &joker_indices {
                for i in 0..n {
                    for j in (i + 1)..n {
                        let subset = vec![indices[i], indices[j], joker_idx];
                        let cards: Vec<Card> = subset.iter().map(|&i| hand[i]).collect();
                        if meld::is_valid_set(&cards) {
                            candidates.push(MeldCandidate {
                                mask: mask_of(&subset),
                                cards,
                            });
                        }
                    }
                }
            }
        }
    }

    candidates
}

/// Candidate Runs built by walking each suit's cards in ascending rank
/// order and emitting every window of length >= 3, filling at most one gap
/// with a joker, analogous to escala-candidate generation.
fn find_run_candidates(hand: &[Card]) -> Vec<MeldCandidate> {
    let mut candidates = Vec::new();
    let joker_indices: Vec<usize> = hand
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_joker())
        .map(|(i, _)| i)
        .collect();

    for suit in crate::card::Suit::REGULAR {
        let mut suited: Vec<(i32, usize)> = hand
            .iter()
            .enumerate()
            .filter_map(|(i, c)| match c.rank {
                Some(rank) if c.suit == suit => Some((rank.ordinal(), i)),
                _ => None,
            })
            .collect();
        suited.sort_by_key(|(v, _)| *v);

        let n = suited.len();
        for start in 0..n {
            for end in (start + 1)..n {
                let span = &suited[start..=end];
                if span.len() < 2 {
                    continue;
                }
                let mut indices: Vec<usize> = span.iter().map(|(_, i)| *i).collect();
                let mut jokers_available: Vec<usize> = joker_indices.clone();

                // Insert at most one joker per gap of exactly 2 between
                // consecutive ranks in this span; bail if the span isn't
                // reachable with the jokers on hand.
                let mut ordered = vec![indices[0]];
                let mut feasible = true;
                for w in span.windows(2) {
                    let gap = w[1].0 - w[0].0;
                    if gap == 1 {
                        ordered.push(w[1].1);
                    } else if gap == 2 {
                        match jokers_available.pop() {
                            Some(j) => {
                                ordered.push(j);
                                ordered.push(w[1].1);
                            }
                            None => {
                                feasible = false;
                                break;
                            }
                        }
                    } else {
                        feasible = false;
                        break;
                    }
                }
                if !feasible || ordered.len() < MIN_MELD_SIZE {
                    continue;
                }
                indices = ordered;

                let cards: Vec<Card> = indices.iter().map(|&i| hand[i]).collect();
                if meld::is_valid_run(&cards) {
                    candidates.push(MeldCandidate {
                        mask: mask_of(&indices),
                        cards,
                    });
                }
            }
        }
    }

    candidates
}

/// Offline hint-finder (§4.4): greedily accepts the highest-scoring
/// non-overlapping Set/Run candidates out of `hand`. Not used for
/// authoritative validation — [`partition_best`] is.
pub fn find_best_combination(hand: &[Card]) -> Vec<Vec<Card>> {
    let mut candidates = find_set_candidates(hand);
    candidates.extend(find_run_candidates(hand));
    candidates.sort_by_key(|c| std::cmp::Reverse(meld::meld_score(&c.cards).unwrap_or(0)));

    let mut used_mask: HandMask = 0;
    let mut chosen = Vec::new();
    for candidate in candidates {
        if candidate.mask & used_mask == 0 {
            used_mask |= candidate.mask;
            chosen.push(candidate.cards);
        }
    }
    chosen
}
