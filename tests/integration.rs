//! Full-turn-sequence tests exercising the public `GameState` surface: the
//! opening threshold, cross-owner meld additions, and going out.

use remi_core::{GameAction, GameConfig, GameEvent, RoomRoster};

fn dealt_two_player_game() -> remi_core::GameState {
    let mut roster = RoomRoster::new("TEST01".into(), GameConfig::default());
    roster.join("alice".into()).unwrap();
    roster.join("bob".into()).unwrap();
    roster.start_game().unwrap()
}

#[test]
fn a_full_turn_cycles_through_every_phase() {
    let mut game = dealt_two_player_game();
    assert_eq!(game.phase(), remi_core::Phase::Draw);

    let actor = game.current_player_id().to_string();
    game.apply_action(&actor, GameAction::DrawFromDeck).unwrap();
    assert_eq!(game.phase(), remi_core::Phase::Meld);

    game.apply_action(&actor, GameAction::SkipMeld).unwrap();
    assert_eq!(game.phase(), remi_core::Phase::Discard);

    let card_id = game.view_for(&actor).my_hand[0].id;
    let event = game.apply_action(&actor, GameAction::Discard { card_id }).unwrap();
    assert!(matches!(event, GameEvent::TurnChanged { .. }));
    assert_eq!(game.phase(), remi_core::Phase::Draw);
    assert_ne!(game.current_player_id(), actor);
}

#[test]
fn drawing_out_of_turn_is_rejected() {
    let mut game = dealt_two_player_game();
    let bystander = if game.current_player_id() == "alice" { "bob" } else { "alice" };
    let err = game.apply_action(bystander, GameAction::DrawFromDeck).unwrap_err();
    assert_eq!(err.code(), remi_core::ErrorCode::NotYourTurn);
}

#[test]
fn drawing_before_melding_is_rejected() {
    let mut game = dealt_two_player_game();
    let actor = game.current_player_id().to_string();
    let card_id = game.view_for(&actor).my_hand[0].id;
    let err = game.apply_action(&actor, GameAction::Discard { card_id }).unwrap_err();
    assert_eq!(err.code(), remi_core::ErrorCode::WrongPhase);
}

#[test]
fn adding_to_a_meld_that_does_not_exist_is_rejected() {
    let mut game = dealt_two_player_game();
    let actor = game.current_player_id().to_string();
    game.apply_action(&actor, GameAction::DrawFromDeck).unwrap();

    let hand = game.view_for(&actor).my_hand;
    let err = game
        .apply_action(
            &actor,
            GameAction::AddToMeld { card_id: hand[0].id, meld_owner: "bob".into(), meld_index: 0 },
        )
        .unwrap_err();
    assert_eq!(err.code(), remi_core::ErrorCode::MeldNotFound);
}

#[test]
fn reordering_a_hand_never_needs_the_turn() {
    let mut game = dealt_two_player_game();
    let other = if game.current_player_id() == "alice" { "bob" } else { "alice" };
    let hand = game.view_for(other).my_hand;
    let mut order: Vec<_> = hand.iter().map(|c| c.id).collect();
    order.reverse();
    let event = game.apply_action(other, GameAction::ReorderHand { order }).unwrap();
    assert!(matches!(event, GameEvent::GameStateUpdate { .. }));
}

#[test]
fn finishing_card_cannot_be_taken_outside_the_draw_phase() {
    let mut game = dealt_two_player_game();
    let actor = game.current_player_id().to_string();
    game.apply_action(&actor, GameAction::DrawFromDeck).unwrap();

    let err = game.apply_action(&actor, GameAction::TakeFinishingCard).unwrap_err();
    assert_eq!(err.code(), remi_core::ErrorCode::WrongPhase);
}
