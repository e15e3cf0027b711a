//! A thin scripted walkthrough of a two-player game, useful for poking at
//! the engine without a transport in front of it.

use remi_core::{GameAction, GameConfig, RoomRoster};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remi_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut roster = RoomRoster::new("DEMO01".into(), GameConfig::default());
    roster.join("alice".into()).expect("room has room for alice");
    roster.join("bob".into()).expect("room has room for bob");

    let mut game = roster.start_game().expect("two players satisfies the configured range");
    let actor = game.current_player_id().to_string();
    tracing::info!(player = %actor, "game dealt");

    match game.apply_action(&actor, GameAction::DrawFromDeck) {
        Ok(event) => tracing::info!(?event, "drew from the deck"),
        Err(err) => tracing::warn!(%err, code = ?err.code(), "draw rejected"),
    }

    match game.apply_action(&actor, GameAction::SkipMeld) {
        Ok(event) => tracing::info!(?event, "skipped melding"),
        Err(err) => tracing::warn!(%err, code = ?err.code(), "skip rejected"),
    }

    let view = game.view_for(&actor);
    if let Some(card) = view.my_hand.first() {
        let card_id = card.id;
        match game.apply_action(&actor, GameAction::Discard { card_id }) {
            Ok(event) => tracing::info!(?event, "discarded"),
            Err(err) => tracing::warn!(%err, code = ?err.code(), "discard rejected"),
        }
    }

    let view = game.view_for(game.current_player_id());
    tracing::info!(
        current_player = view.current_player_id,
        phase = ?view.phase,
        turn_number = view.turn_number,
        "turn handed off"
    );
}
