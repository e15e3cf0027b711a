//! The Turn State Machine (§4.5): the authoritative per-room game state and
//! the single entry point, `apply_action`, through which every player
//! request is validated and applied.

use crate::action::{GameAction, GameEvent};
use crate::card::{Card, CardId};
use crate::config::GameConfig;
use crate::deck::Deck;
use crate::error::{Result, RulesError};
use crate::meld;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// §4.5's four phases. The type system alone rules out any phase literal
/// other than these four, so `ErrorCode::InvalidPhase` only ever fires from
/// a deserialized wire value, never from in-process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Draw,
    Meld,
    Discard,
    GameOver,
}

impl Phase {
    fn label(&self) -> &'static str {
        match self {
            Phase::Draw => "Draw",
            Phase::Meld => "Meld",
            Phase::Discard => "Discard",
            Phase::GameOver => "GameOver",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: String,
    pub display_name: String,
    pub hand: Vec<Card>,
    pub has_opened: bool,
    pub connected: bool,
    pub score: u32,
}

impl PlayerState {
    fn new(id: String) -> Self {
        Self {
            display_name: id.clone(),
            id,
            hand: Vec::new(),
            has_opened: false,
            connected: true,
            score: 0,
        }
    }
}

/// A meld laid on the table, tracked with the id of the player who laid it
/// so `AddToMeld` can enforce §4.5's "own meld, or any meld once opened"
/// rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaidMeld {
    pub owner: String,
    pub cards: Vec<Card>,
}

/// A player as seen by everyone else: hand contents are redacted to a
/// count, per the room's broadcast contract (Design Note 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: String,
    pub display_name: String,
    pub hand_size: usize,
    pub has_opened: bool,
    pub connected: bool,
    pub score: u32,
    pub deadwood: Option<u32>,
}

/// The broadcast payload for a given viewer: everyone's public state plus
/// the viewer's own hand in full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerFacingView {
    pub current_player_id: String,
    pub phase: Phase,
    pub turn_number: u32,
    pub draw_pile_size: usize,
    pub discard_top: Option<Card>,
    pub finishing_card_claimed: bool,
    pub players: Vec<PlayerView>,
    pub my_hand: Vec<Card>,
    pub melds: Vec<LaidMeld>,
}

/// End-of-game scoring (§3.1 SUPPLEMENTED): the winner plus each player's
/// unmelded deadwood.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandSummary {
    pub winner_id: String,
    pub deadwood: Vec<(String, u32)>,
}

/// The authoritative state of a single room's game. Owned and mutated
/// exclusively through [`GameState::apply_action`]; there is no other way
/// to change a hand, the draw pile, or whose turn it is.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    players: Vec<PlayerState>,
    current_turn: usize,
    phase: Phase,
    turn_number: u32,
    draw_pile: Deck,
    discard_pile: Vec<Card>,
    finishing_card: Option<Card>,
    finishing_card_claimed: bool,
    finishing_card_taken_this_turn: Option<CardId>,
    melds: Vec<LaidMeld>,
}

impl GameState {
    /// Deals a fresh game to `player_ids` in seat order. Builds and shuffles
    /// the draw pile, deals `initial_hand_size` cards to each seat, sets
    /// aside a dedicated finishing card (§9 open question b: drawn after
    /// every hand is dealt, never the live draw-pile top), then turns the
    /// discard pile's starter card face up.
    pub fn deal(player_ids: Vec<String>, config: GameConfig) -> Result<Self> {
        let count = player_ids.len() as u32;
        if count < config.min_players || count > config.max_players {
            return Err(RulesError::InvalidGameState {
                detail: format!(
                    "{} players is outside the configured {}..={} range",
                    count, config.min_players, config.max_players
                ),
            });
        }

        let mut draw_pile = Deck::new(config.num_decks);
        draw_pile.shuffle();

        let mut players: Vec<PlayerState> = player_ids.into_iter().map(PlayerState::new).collect();

        for _ in 0..config.initial_hand_size {
            for player in players.iter_mut() {
                let card = draw_pile.draw().ok_or(RulesError::EmptyDeck)?;
                player.hand.push(card);
            }
        }

        let finishing_card = draw_pile.draw();
        let discard_pile = draw_pile.draw().into_iter().collect();

        Ok(Self {
            config,
            players,
            current_turn: 0,
            phase: Phase::Draw,
            turn_number: 1,
            draw_pile,
            discard_pile,
            finishing_card,
            finishing_card_claimed: false,
            finishing_card_taken_this_turn: None,
            melds: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player_id(&self) -> &str {
        &self.players[self.current_turn].id
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Validates and applies one player action, returning the event that
    /// should be broadcast. `ReorderHand` bypasses turn ownership: it only
    /// touches the acting player's own hand order and has no effect on
    /// shared state, so any seated player may issue it at any time.
    #[tracing::instrument(skip(self, action), fields(turn = self.turn_number))]
    pub fn apply_action(&mut self, actor: &str, action: GameAction) -> Result<GameEvent> {
        self.check_integrity()?;

        if let GameAction::ReorderHand { order } = action {
            return self.reorder_hand(actor, order);
        }

        self.require_turn(actor)?;
        let result = match action {
            GameAction::DrawFromDeck => self.draw_from_deck(),
            GameAction::DrawFromDiscard => self.draw_from_discard(),
            GameAction::TakeFinishingCard => self.take_finishing_card(),
            GameAction::LayMelds { melds } => self.lay_melds(melds),
            GameAction::AddToMeld { card_id, meld_owner, meld_index } => {
                self.add_to_meld(card_id, &meld_owner, meld_index)
            }
            GameAction::SkipMeld => self.skip_meld(),
            GameAction::Discard { card_id } => self.discard(card_id),
            GameAction::ReorderHand { .. } => unreachable!("handled above"),
        };
        if let Err(err) = &result {
            tracing::warn!(actor, code = ?err.code(), "action rejected");
        } else {
            tracing::debug!(actor, phase = ?self.phase, "action applied");
        }
        result
    }

    /// Forces a deterministic move for a player who exceeded the turn clock
    /// (§9 open question a): draw if they hadn't yet, skip melding, then
    /// discard their lowest-point card (ties broken by hand position).
    #[tracing::instrument(skip(self), fields(turn = self.turn_number, phase = ?self.phase))]
    pub fn apply_forced_timeout(&mut self) -> Result<GameEvent> {
        self.check_integrity()?;
        tracing::warn!("turn clock expired, forcing a move");

        match self.phase {
            Phase::Draw => {
                self.draw_from_deck()?;
            }
            Phase::GameOver => {
                return Err(RulesError::WrongPhase {
                    expected: "Draw, Meld, or Discard",
                    actual: self.phase.label(),
                });
            }
            _ => {}
        }

        if matches!(self.phase, Phase::Meld) {
            self.skip_meld()?;
        }

        let idx = self.current_turn;
        let lowest = self.players[idx]
            .hand
            .iter()
            .enumerate()
            .min_by_key(|(i, c)| (c.points(), *i))
            .map(|(_, c)| c.id)
            .ok_or(RulesError::CardNotInHand)?;
        self.discard(lowest)
    }

    fn draw_from_deck(&mut self) -> Result<GameEvent> {
        self.require_phase(Phase::Draw)?;
        let max_hand = self.config.max_hand_size;
        if self.players[self.current_turn].hand.len() >= max_hand {
            return Err(RulesError::HandFull { max: max_hand });
        }
        if self.draw_pile.is_empty() {
            tracing::debug!("draw pile empty, reshuffling discard pile");
            self.reshuffle_discard_into_draw_pile()?;
        }
        let card = self.draw_pile.draw().ok_or(RulesError::EmptyDeck)?;
        self.finishing_card_taken_this_turn = None;
        self.players[self.current_turn].hand.push(card);
        self.phase = Phase::Meld;
        Ok(self.turn_changed_event())
    }

    fn draw_from_discard(&mut self) -> Result<GameEvent> {
        self.require_phase(Phase::Draw)?;
        let max_hand = self.config.max_hand_size;
        if self.players[self.current_turn].hand.len() >= max_hand {
            return Err(RulesError::HandFull { max: max_hand });
        }
        let card = self.discard_pile.pop().ok_or(RulesError::EmptyDiscard)?;
        self.finishing_card_taken_this_turn = None;
        self.players[self.current_turn].hand.push(card);
        self.phase = Phase::Meld;
        Ok(self.turn_changed_event())
    }

    /// §9 open question b: the finishing card sits in a dedicated slot
    /// separate from both piles. It may only be claimed in place of a
    /// normal draw, by a player who has not yet opened, while still holding
    /// exactly their dealt hand.
    #[tracing::instrument(skip(self))]
    fn take_finishing_card(&mut self) -> Result<GameEvent> {
        self.require_phase(Phase::Draw)?;
        if self.finishing_card_claimed || self.finishing_card.is_none() {
            return Err(RulesError::NoFinishingCard);
        }
        let idx = self.current_turn;
        if self.players[idx].has_opened {
            return Err(RulesError::AlreadyOpened);
        }
        if self.players[idx].hand.len() != self.config.initial_hand_size {
            return Err(RulesError::InvalidGameState {
                detail: "finishing card claimed outside the dealt hand size".into(),
            });
        }

        let card = self.finishing_card.take().expect("checked Some above");
        self.finishing_card_claimed = true;
        self.finishing_card_taken_this_turn = Some(card.id);
        self.players[idx].hand.push(card);
        self.phase = Phase::Meld;
        Ok(self.turn_changed_event())
    }

    /// §9 open question c: reshuffling is allowed, preserving the current
    /// discard top as the new pile's first future draw-from-discard target.
    /// With fewer than two discard cards there's nothing to shuffle into a
    /// fresh pile, so the draw fails outright.
    fn reshuffle_discard_into_draw_pile(&mut self) -> Result<()> {
        if self.discard_pile.len() < 2 {
            return Err(RulesError::EmptyDeck);
        }
        let top = self.discard_pile.pop().expect("length checked above");
        let rest = std::mem::take(&mut self.discard_pile);
        self.draw_pile.refill_shuffled(rest);
        self.discard_pile.push(top);
        Ok(())
    }

    #[tracing::instrument(skip(self, melds), fields(meld_count = melds.len()))]
    fn lay_melds(&mut self, melds: Vec<Vec<CardId>>) -> Result<GameEvent> {
        self.require_phase(Phase::Meld)?;
        if melds.is_empty() {
            return Err(RulesError::InvalidMeld);
        }

        let idx = self.current_turn;
        let mut used_ids = HashSet::new();
        let mut resolved: Vec<Vec<Card>> = Vec::with_capacity(melds.len());

        for meld_ids in &melds {
            let mut cards = Vec::with_capacity(meld_ids.len());
            for id in meld_ids {
                if !used_ids.insert(*id) {
                    return Err(RulesError::DuplicateCards);
                }
                let card = self.players[idx]
                    .hand
                    .iter()
                    .find(|c| c.id == *id)
                    .copied()
                    .ok_or(RulesError::CardNotInHand)?;
                cards.push(card);
            }
            if meld::meld_type(&cards).is_none() {
                return Err(RulesError::InvalidMeld);
            }
            resolved.push(cards);
        }

        let total_score: u32 = resolved.iter().map(|m| meld::meld_score(m).unwrap_or(0)).sum();
        if !self.players[idx].has_opened && total_score < self.config.opening_requirement {
            tracing::warn!(total_score, required = self.config.opening_requirement, "opening lay below threshold");
            return Err(RulesError::InsufficientPoints {
                scored: total_score,
                required: self.config.opening_requirement,
            });
        }

        let owner = self.players[idx].id.clone();
        for meld_cards in &resolved {
            self.players[idx]
                .hand
                .retain(|c| !meld_cards.iter().any(|m| m.id == c.id));
            self.melds.push(LaidMeld { owner: owner.clone(), cards: meld_cards.clone() });
        }
        self.players[idx].has_opened = true;

        if self.players[idx].hand.is_empty() {
            tracing::debug!(player = %owner, "hand emptied by lay, game over");
            self.phase = Phase::GameOver;
            return Ok(self.game_over_event());
        }
        Ok(self.turn_changed_event())
    }

    /// Tries the card as an extension at either end of the named meld; the
    /// meld keeps its owner regardless of who added to it.
    #[tracing::instrument(skip(self))]
    fn add_to_meld(&mut self, card_id: CardId, meld_owner: &str, meld_index: usize) -> Result<GameEvent> {
        self.require_phase(Phase::Meld)?;
        let idx = self.current_turn;

        let target = self.melds.get(meld_index).ok_or(RulesError::MeldNotFound)?;
        if target.owner != meld_owner {
            return Err(RulesError::MeldNotFound);
        }
        if target.owner != self.players[idx].id && !self.players[idx].has_opened {
            tracing::warn!(meld_owner, "addition to another player's meld rejected, not opened");
            return Err(RulesError::NotOpened);
        }

        let card = self.players[idx]
            .hand
            .iter()
            .find(|c| c.id == card_id)
            .copied()
            .ok_or(RulesError::CardNotInHand)?;

        let mut appended = target.cards.clone();
        appended.push(card);
        let mut prepended = vec![card];
        prepended.extend(target.cards.clone());

        let new_cards = if meld::meld_type(&appended).is_some() {
            appended
        } else if meld::meld_type(&prepended).is_some() {
            prepended
        } else {
            return Err(RulesError::InvalidAddition);
        };

        self.players[idx].hand.retain(|c| c.id != card_id);
        self.melds[meld_index].cards = new_cards;

        if self.players[idx].hand.is_empty() {
            self.phase = Phase::GameOver;
            return Ok(self.game_over_event());
        }
        Ok(self.turn_changed_event())
    }

    fn skip_meld(&mut self) -> Result<GameEvent> {
        self.require_phase(Phase::Meld)?;
        self.phase = Phase::Discard;
        Ok(self.turn_changed_event())
    }

    #[tracing::instrument(skip(self))]
    fn discard(&mut self, card_id: CardId) -> Result<GameEvent> {
        if !matches!(self.phase, Phase::Meld | Phase::Discard) {
            return Err(RulesError::WrongPhase { expected: "Meld or Discard", actual: self.phase.label() });
        }
        if self.finishing_card_taken_this_turn == Some(card_id) {
            tracing::warn!("attempted to discard the freshly-taken finishing card");
            return Err(RulesError::FinishingCardLocked);
        }

        let idx = self.current_turn;
        let pos = self.players[idx]
            .hand
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(RulesError::CardNotInHand)?;
        let card = self.players[idx].hand.remove(pos);
        self.discard_pile.push(card);
        self.finishing_card_taken_this_turn = None;

        if self.players[idx].hand.is_empty() && self.players[idx].has_opened {
            tracing::debug!(player = %self.players[idx].id, "hand emptied by discard, game over");
            self.phase = Phase::GameOver;
            return Ok(self.game_over_event());
        }

        self.current_turn = (self.current_turn + 1) % self.players.len();
        self.turn_number += 1;
        self.phase = Phase::Draw;
        Ok(self.turn_changed_event())
    }

    fn reorder_hand(&mut self, actor: &str, order: Vec<CardId>) -> Result<GameEvent> {
        let idx = self.player_index(actor)?;
        if order.len() != self.players[idx].hand.len() {
            return Err(RulesError::InvalidGameState {
                detail: "reorder list length does not match hand size".into(),
            });
        }

        let mut remaining = self.players[idx].hand.clone();
        let mut reordered = Vec::with_capacity(order.len());
        for id in &order {
            let pos = remaining.iter().position(|c| c.id == *id).ok_or(RulesError::CardNotInHand)?;
            reordered.push(remaining.remove(pos));
        }
        self.players[idx].hand = reordered;
        Ok(GameEvent::GameStateUpdate { view: self.view_for(actor) })
    }

    pub fn deadwood_for(&self, player_id: &str) -> Result<u32> {
        let idx = self.player_index(player_id)?;
        Ok(self.players[idx].hand.iter().map(|c| c.points()).sum())
    }

    pub fn hand_summary(&self, winner_id: String) -> HandSummary {
        HandSummary {
            deadwood: self
                .players
                .iter()
                .map(|p| (p.id.clone(), p.hand.iter().map(|c| c.points()).sum()))
                .collect(),
            winner_id,
        }
    }

    pub fn view_for(&self, player_id: &str) -> PlayerFacingView {
        let my_hand = self
            .players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| p.hand.clone())
            .unwrap_or_default();

        let players = self
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id.clone(),
                display_name: p.display_name.clone(),
                hand_size: p.hand.len(),
                has_opened: p.has_opened,
                connected: p.connected,
                score: p.score,
                deadwood: matches!(self.phase, Phase::GameOver)
                    .then(|| p.hand.iter().map(|c| c.points()).sum()),
            })
            .collect();

        PlayerFacingView {
            current_player_id: self.players[self.current_turn].id.clone(),
            phase: self.phase,
            turn_number: self.turn_number,
            draw_pile_size: self.draw_pile.remaining(),
            discard_top: self.discard_pile.last().copied(),
            finishing_card_claimed: self.finishing_card_claimed,
            players,
            my_hand,
            melds: self.melds.clone(),
        }
    }

    fn turn_changed_event(&self) -> GameEvent {
        GameEvent::TurnChanged {
            current_player_id: self.players[self.current_turn].id.clone(),
            phase: self.phase,
        }
    }

    fn game_over_event(&self) -> GameEvent {
        let winner_id = self.players[self.current_turn].id.clone();
        GameEvent::GameOver { summary: self.hand_summary(winner_id.clone()), winner_id }
    }

    fn player_index(&self, id: &str) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RulesError::PlayerNotFound { id: id.to_string() })
    }

    fn require_turn(&self, actor: &str) -> Result<()> {
        if self.players[self.current_turn].id != actor {
            return Err(RulesError::NotYourTurn { actor: actor.to_string() });
        }
        Ok(())
    }

    fn require_phase(&self, expected: Phase) -> Result<()> {
        if self.phase != expected {
            return Err(RulesError::WrongPhase { expected: expected.label(), actual: self.phase.label() });
        }
        Ok(())
    }

    /// I1-I4: turn pointer in range, every hand within the configured max,
    /// every card id unique, and the full deal conserved across hands,
    /// piles, melds, and the finishing card slot.
    fn check_integrity(&self) -> Result<()> {
        if self.current_turn >= self.players.len() {
            return Err(RulesError::InvalidGameState { detail: "current_turn out of range".into() });
        }
        let max_hand = self.config.max_hand_size;
        for player in &self.players {
            if player.hand.len() > max_hand {
                return Err(RulesError::InvalidHandSize { max: max_hand });
            }
        }
        self.check_card_uniqueness()?;
        self.check_conservation()?;
        Ok(())
    }

    fn check_card_uniqueness(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for player in &self.players {
            for card in &player.hand {
                if !seen.insert(card.id) {
                    return Err(RulesError::DuplicateCards);
                }
            }
        }
        for laid in &self.melds {
            for card in &laid.cards {
                if !seen.insert(card.id) {
                    return Err(RulesError::DuplicateCards);
                }
            }
        }
        for card in &self.discard_pile {
            if !seen.insert(card.id) {
                return Err(RulesError::DuplicateCards);
            }
        }
        for card in self.draw_pile.cards() {
            if !seen.insert(card.id) {
                return Err(RulesError::DuplicateCards);
            }
        }
        if let Some(card) = self.finishing_card {
            if !seen.insert(card.id) {
                return Err(RulesError::DuplicateCards);
            }
        }
        Ok(())
    }

    pub fn total_cards_accounted(&self) -> usize {
        let hands: usize = self.players.iter().map(|p| p.hand.len()).sum();
        let melds: usize = self.melds.iter().map(|m| m.cards.len()).sum();
        let finishing = usize::from(self.finishing_card.is_some());
        hands + melds + self.discard_pile.len() + self.draw_pile.remaining() + finishing
    }

    fn check_conservation(&self) -> Result<()> {
        let expected = (self.config.num_decks * self.config.cards_per_deck) as usize;
        let total = self.total_cards_accounted();
        if total != expected {
            return Err(RulesError::InvalidGameState {
                detail: format!("card conservation violated: {} cards accounted, expected {}", total, expected),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_player_game() -> GameState {
        GameState::deal(vec!["alice".into(), "bob".into()], GameConfig::default()).unwrap()
    }

    #[test]
    fn deal_conserves_every_card() {
        let game = two_player_game();
        assert_eq!(game.total_cards_accounted(), 108);
        assert_eq!(game.players[0].hand.len(), 14);
        assert_eq!(game.players[1].hand.len(), 14);
    }

    #[test]
    fn only_the_current_player_may_act() {
        let mut game = two_player_game();
        let err = game.apply_action("bob", GameAction::DrawFromDeck).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::NotYourTurn);
    }

    #[test]
    fn draw_then_skip_then_discard_advances_the_turn() {
        let mut game = two_player_game();
        game.apply_action("alice", GameAction::DrawFromDeck).unwrap();
        assert_eq!(game.phase, Phase::Meld);
        game.apply_action("alice", GameAction::SkipMeld).unwrap();
        assert_eq!(game.phase, Phase::Discard);

        let card_id = game.players[0].hand[0].id;
        game.apply_action("alice", GameAction::Discard { card_id }).unwrap();
        assert_eq!(game.current_player_id(), "bob");
        assert_eq!(game.phase, Phase::Draw);
    }

    #[test]
    fn opening_lay_below_threshold_is_rejected() {
        use crate::card::{Rank, Suit};

        let mut game = two_player_game();
        let low_meld_cards = vec![
            Card::regular(CardId(500), Suit::Heart, Rank::Two),
            Card::regular(CardId(501), Suit::Spade, Rank::Two),
            Card::regular(CardId(502), Suit::Club, Rank::Two),
        ];

        let removed = game.players[0].hand.len() - low_meld_cards.len();
        let mut draw_cards = game.draw_pile.cards().to_vec();
        draw_cards.extend((0..removed).map(|i| Card::joker(CardId(9000 + i as u32), Suit::JokerRed)));
        game.draw_pile = Deck::with_cards(draw_cards);
        game.players[0].hand = low_meld_cards.clone();
        game.phase = Phase::Meld;

        let low_meld: Vec<CardId> = low_meld_cards.iter().map(|c| c.id).collect();
        let err = game
            .apply_action("alice", GameAction::LayMelds { melds: vec![low_meld] })
            .unwrap_err();
        assert_eq!(err, RulesError::InsufficientPoints { scored: 6, required: 51 });
    }

    #[test]
    fn finishing_card_just_claimed_cannot_be_discarded_same_turn() {
        let mut game = two_player_game();
        game.finishing_card_claimed = false;
        game.finishing_card = Some(Card::regular(
            CardId(9999),
            crate::card::Suit::Heart,
            crate::card::Rank::Two,
        ));
        game.apply_action("alice", GameAction::TakeFinishingCard).unwrap();
        let claimed_id = game.finishing_card_taken_this_turn.unwrap();
        let err = game.apply_action("alice", GameAction::Discard { card_id: claimed_id }).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::FinishingCardLocked);
    }

    #[test]
    fn laying_out_the_entire_hand_ends_the_game() {
        use crate::card::{Rank, Suit};

        let mut game = two_player_game();
        let winning_hand = vec![
            Card::regular(CardId(500), Suit::Heart, Rank::King),
            Card::regular(CardId(501), Suit::Spade, Rank::King),
            Card::regular(CardId(502), Suit::Club, Rank::King),
            Card::regular(CardId(503), Suit::Heart, Rank::Seven),
            Card::regular(CardId(504), Suit::Heart, Rank::Eight),
            Card::regular(CardId(505), Suit::Heart, Rank::Nine),
        ];
        // Swap in a hand engineered to go out, keeping card-conservation
        // intact by moving the displaced count into the draw pile.
        let removed = game.players[0].hand.len() - winning_hand.len();
        let mut draw_cards = game.draw_pile.cards().to_vec();
        draw_cards.extend((0..removed).map(|i| Card::joker(CardId(9000 + i as u32), Suit::JokerRed)));
        game.draw_pile = Deck::with_cards(draw_cards);
        game.players[0].hand = winning_hand.clone();
        game.phase = Phase::Meld;

        let melds = vec![
            winning_hand[0..3].iter().map(|c| c.id).collect(),
            winning_hand[3..6].iter().map(|c| c.id).collect(),
        ];
        let event = game.apply_action("alice", GameAction::LayMelds { melds }).unwrap();
        assert!(matches!(event, GameEvent::GameOver { .. }));
        assert_eq!(game.phase, Phase::GameOver);
        assert!(game.players[0].hand.is_empty());
    }

    #[test]
    fn reorder_hand_does_not_require_current_turn() {
        let mut game = two_player_game();
        let order: Vec<CardId> = {
            let mut ids: Vec<CardId> = game.players[1].hand.iter().map(|c| c.id).collect();
            ids.reverse();
            ids
        };
        let event = game.apply_action("bob", GameAction::ReorderHand { order: order.clone() }).unwrap();
        assert!(matches!(event, GameEvent::GameStateUpdate { .. }));
        let new_order: Vec<CardId> = game.players[1].hand.iter().map(|c| c.id).collect();
        assert_eq!(new_order, order);
    }

    /// §8 scenario 7: a King trio (30) plus a 7-8-9 run (24) totals 54,
    /// clearing the 51-point opening threshold with cards left in hand.
    #[test]
    fn opening_lay_at_or_above_threshold_is_accepted_and_flips_has_opened() {
        use crate::card::{Rank, Suit};

        let mut game = two_player_game();
        let hand = vec![
            Card::regular(CardId(900), Suit::Heart, Rank::King),
            Card::regular(CardId(901), Suit::Spade, Rank::King),
            Card::regular(CardId(902), Suit::Club, Rank::King),
            Card::regular(CardId(903), Suit::Heart, Rank::Seven),
            Card::regular(CardId(904), Suit::Heart, Rank::Eight),
            Card::regular(CardId(905), Suit::Heart, Rank::Nine),
            Card::regular(CardId(906), Suit::Diamond, Rank::Three),
        ];

        let used = hand.len()
            + game.players[1].hand.len()
            + game.discard_pile.len()
            + usize::from(game.finishing_card.is_some());
        let filler = (0..108 - used).map(|i| Card::joker(CardId(22000 + i as u32), Suit::JokerRed));
        game.draw_pile = Deck::with_cards(filler.collect());
        game.players[0].hand = hand.clone();
        game.phase = Phase::Meld;

        let melds = vec![
            hand[0..3].iter().map(|c| c.id).collect(),
            hand[3..6].iter().map(|c| c.id).collect(),
        ];
        let event = game.apply_action("alice", GameAction::LayMelds { melds }).unwrap();
        assert!(matches!(event, GameEvent::TurnChanged { .. }));
        assert!(game.players[0].has_opened);
        assert_eq!(game.players[0].hand.len(), 1);
    }

    /// §8 scenario 9: before opening, a player may not extend someone
    /// else's meld even with a card that would legally fit it.
    #[test]
    fn adding_to_anothers_meld_before_opening_is_rejected() {
        use crate::card::{Rank, Suit};

        let mut game = two_player_game();
        let bobs_run = vec![
            Card::regular(CardId(600), Suit::Heart, Rank::Three),
            Card::regular(CardId(601), Suit::Heart, Rank::Four),
            Card::regular(CardId(602), Suit::Heart, Rank::Five),
        ];
        let extension = Card::regular(CardId(603), Suit::Heart, Rank::Six);

        game.melds = vec![LaidMeld { owner: "bob".into(), cards: bobs_run }];
        let used = 1
            + game.players[1].hand.len()
            + game.melds.iter().map(|m| m.cards.len()).sum::<usize>()
            + game.discard_pile.len()
            + usize::from(game.finishing_card.is_some());
        let filler = (0..108 - used).map(|i| Card::joker(CardId(23000 + i as u32), Suit::JokerRed));
        game.draw_pile = Deck::with_cards(filler.collect());
        game.players[0].hand = vec![extension];
        game.phase = Phase::Meld;

        let err = game
            .apply_action(
                "alice",
                GameAction::AddToMeld { card_id: extension.id, meld_owner: "bob".into(), meld_index: 0 },
            )
            .unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::NotOpened);
    }

    /// §8 scenario 10: discarding the last card after having opened ends
    /// the game via the Discard action, not just via LayMelds/AddToMeld.
    #[test]
    fn discarding_the_last_card_after_opening_ends_the_game() {
        use crate::card::{Rank, Suit};

        let mut game = two_player_game();
        let last_card = Card::regular(CardId(700), Suit::Diamond, Rank::Nine);

        let used = 1
            + game.players[1].hand.len()
            + game.discard_pile.len()
            + usize::from(game.finishing_card.is_some());
        let filler = (0..108 - used).map(|i| Card::joker(CardId(24000 + i as u32), Suit::JokerRed));
        game.draw_pile = Deck::with_cards(filler.collect());
        game.players[0].hand = vec![last_card];
        game.players[0].has_opened = true;
        game.phase = Phase::Discard;

        let event = game.apply_action("alice", GameAction::Discard { card_id: last_card.id }).unwrap();
        assert!(matches!(event, GameEvent::GameOver { .. }));
        assert_eq!(game.phase, Phase::GameOver);
    }

    #[test]
    fn deadwood_for_sums_unmelded_hand_points() {
        use crate::card::{Rank, Suit};

        let mut game = two_player_game();
        game.players[0].hand = vec![
            Card::regular(CardId(800), Suit::Heart, Rank::King),
            Card::regular(CardId(801), Suit::Spade, Rank::Seven),
        ];
        assert_eq!(game.deadwood_for("alice").unwrap(), 17);
    }

    #[test]
    fn deadwood_for_unknown_player_reports_player_not_found() {
        let game = two_player_game();
        let err = game.deadwood_for("carol").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::PlayerNotFound);
    }

    #[test]
    fn hand_summary_reports_every_players_deadwood() {
        use crate::card::{Rank, Suit};

        let mut game = two_player_game();
        game.players[0].hand = vec![Card::regular(CardId(802), Suit::Club, Rank::Five)];
        game.players[1].hand = vec![Card::regular(CardId(803), Suit::Club, Rank::Six)];

        let summary = game.hand_summary("alice".into());
        assert_eq!(summary.winner_id, "alice");
        assert_eq!(summary.deadwood, vec![("alice".to_string(), 5), ("bob".to_string(), 6)]);
    }

    #[test]
    fn forced_timeout_during_draw_phase_draws_then_discards_lowest_card() {
        let mut game = two_player_game();
        assert_eq!(game.phase, Phase::Draw);
        let hand_len_before = game.players[0].hand.len();

        let event = game.apply_forced_timeout().unwrap();
        assert!(matches!(event, GameEvent::TurnChanged { .. }));
        assert_eq!(game.current_player_id(), "bob");
        assert_eq!(game.players[0].hand.len(), hand_len_before);
    }

    #[test]
    fn forced_timeout_during_meld_phase_skips_and_discards_lowest_card() {
        let mut game = two_player_game();
        game.apply_action("alice", GameAction::DrawFromDeck).unwrap();
        assert_eq!(game.phase, Phase::Meld);
        let hand_len_before = game.players[0].hand.len();
        let lowest_points = game.players[0].hand.iter().map(|c| c.points()).min().unwrap();

        let event = game.apply_forced_timeout().unwrap();
        assert!(matches!(event, GameEvent::TurnChanged { .. }));
        assert_eq!(game.players[0].hand.len(), hand_len_before - 1);
        assert_eq!(game.current_player_id(), "bob");
        assert_eq!(game.discard_pile.last().unwrap().points(), lowest_points);
    }

    #[test]
    fn forced_timeout_after_game_over_is_rejected() {
        let mut game = two_player_game();
        game.phase = Phase::GameOver;
        let err = game.apply_forced_timeout().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::WrongPhase);
    }
}
