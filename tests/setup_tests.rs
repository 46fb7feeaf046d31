//! Game setup integration tests.
//!
//! Dealing from a seed, hand order, and the serialized shape of a fresh
//! state's public pieces.

use proptest::prelude::*;

use bomb_squad::{
    Engine, EngineConfig, GamePhase, GameValue, MissionCatalog, MissionId, PlayerId, WireColor,
};

fn engine() -> Engine {
    Engine::new(EngineConfig::strict(), MissionCatalog::standard())
}

/// Action results and log entries serialize with their wire tags.
#[test]
fn test_public_shapes_serialize() {
    let engine = engine();
    let state = engine.new_game(MissionId(1), 2, 3).unwrap();

    let entry = serde_json::to_value(&state.log[0]).unwrap();
    assert_eq!(entry["action"], "game_start");
    assert_eq!(entry["detail"], "mission:1:players:2");
    assert_eq!(entry["setup_only"], false);

    let equipment = serde_json::to_value(&state.board.equipment).unwrap();
    assert_eq!(equipment[0]["kind"], "label_neq");
    assert_eq!(equipment[0]["unlocked"], false);
}

/// Red and yellow markers are public and sit between blue values.
#[test]
fn test_markers_match_colored_tiles() {
    let engine = engine();
    let state = engine.new_game(MissionId(5), 4, 8).unwrap();

    let colored = state.tiles().filter(|t| t.color != WireColor::Blue).count();
    assert_eq!(state.board.markers.len(), colored);
    assert_eq!(colored, 3);
    for marker in &state.board.markers {
        assert!(marker.position.fract() > 0.0);
    }
}

proptest! {
    /// Every seed deals the whole deck, sorted, with unique ids, and hands
    /// differ in size by at most one.
    #[test]
    fn prop_deal_invariants(seed in any::<u64>(), players in 2usize..=5) {
        let engine = engine();
        let state = engine.new_game(MissionId(1), players, seed).unwrap();

        prop_assert_eq!(state.phase, GamePhase::Playing);
        prop_assert_eq!(state.player_count(), players);
        prop_assert_eq!(state.tiles().count(), 49);
        for value in GameValue::all_numbers() {
            prop_assert_eq!(state.tiles().filter(|t| t.value == value).count(), 4);
        }

        let mut ids: Vec<u16> = state.tiles().map(|t| t.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), 49);

        for player in &state.players {
            let sorted = player.hand.windows(2).all(|w| w[0].sort_value <= w[1].sort_value);
            prop_assert!(sorted);
        }
        let sizes: Vec<usize> = state.players.iter().map(|p| p.hand.len()).collect();
        let spread = sizes.iter().max().unwrap() - sizes.iter().min().unwrap();
        prop_assert!(spread <= 1);

        prop_assert!(state.players[0].is_captain);
        prop_assert_eq!(state.current_player, PlayerId::new(0));
    }

    /// The same seed deals the same game.
    #[test]
    fn prop_seed_is_reproducible(seed in any::<u64>()) {
        let engine = engine();
        let a = engine.new_game(MissionId(5), 3, seed).unwrap();
        let b = engine.new_game(MissionId(5), 3, seed).unwrap();

        prop_assert_eq!(&a.players, &b.players);
        prop_assert_eq!(a.campaign, b.campaign);
    }
}
