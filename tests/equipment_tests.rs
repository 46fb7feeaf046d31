//! Equipment integration tests.
//!
//! Unlocking from the validation track, the lock state machine, and the
//! effect of each card family when played through `Engine::apply`.

use bomb_squad::core::Relation;
use bomb_squad::{
    Action, ActionResult, Engine, EngineConfig, EngineError, EquipmentCard, EquipmentId,
    EquipmentKind, EquipmentPayload, ErrorCode, GameBuilder, GameResult, GameState, GameValue,
    InfoToken, MissionCatalog, MissionDef, MissionId, PlayerId, WireTile,
};

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);
const P2: PlayerId = PlayerId::new(2);
const CARD: EquipmentId = EquipmentId(1);

fn engine_with(config: EngineConfig) -> Engine {
    Engine::new(config, MissionCatalog::new().with_mission(MissionDef::new(1, "gear")))
}

fn blues(values: &[u8]) -> Vec<WireTile> {
    values.iter().map(|&v| WireTile::blue(v)).collect()
}

/// Table with one unlocked card of `kind` as equipment 1.
fn table(kind: EquipmentKind, hands: Vec<Vec<WireTile>>) -> (Engine, GameState) {
    let engine = engine_with(EngineConfig::strict());
    let mut state = GameBuilder::new(MissionId(1))
        .hands(hands)
        .equipment(EquipmentCard::new(CARD, kind, 12))
        .build(&engine, 17)
        .unwrap();
    state.board.equipment[0].unlocked = true;
    (engine, state)
}

fn play(
    engine: &Engine,
    state: &mut GameState,
    actor: PlayerId,
    payload: EquipmentPayload,
) -> Result<ActionResult, EngineError> {
    engine.apply(state, actor, &Action::UseEquipment { equipment: CARD, payload })
}

fn code(result: Result<ActionResult, EngineError>) -> ErrorCode {
    result.unwrap_err().code().unwrap()
}

/// Unlock value 5, threshold 2, each player holding one 5: the dual cut of
/// the pair unlocks the card.
#[test]
fn test_dual_cut_unlocks_equipment() {
    let engine = engine_with(EngineConfig::strict());
    let mut state = GameBuilder::new(MissionId(1))
        .hands(vec![blues(&[5, 7]), blues(&[5, 9])])
        .equipment(EquipmentCard::new(CARD, EquipmentKind::PostIt, 5))
        .build(&engine, 1)
        .unwrap();
    assert!(!state.board.equipment[0].unlocked);

    let cut = Action::DualCut { target: P1, tile_index: 0, guess: GameValue::Number(5) };
    engine.apply(&mut state, P0, &cut).unwrap();

    assert_eq!(state.board.validation_track[5], 2);
    assert!(state.board.equipment[0].unlocked);
    assert_eq!(state.log_details("equipment_unlocked").collect::<Vec<_>>(), vec!["1"]);
}

/// The card flips on the cut that brings the count to the threshold, not
/// before.
#[test]
fn test_unlock_flips_exactly_at_threshold() {
    let engine = engine_with(EngineConfig::strict().with_unlock_threshold(3));
    let mut state = GameBuilder::new(MissionId(1))
        .hands(vec![blues(&[5, 5, 9]), blues(&[5, 9])])
        .equipment(EquipmentCard::new(CARD, EquipmentKind::Rewinder, 5))
        .build(&engine, 1)
        .unwrap();

    let five = Action::DualCut { target: P1, tile_index: 0, guess: GameValue::Number(5) };
    engine.apply(&mut state, P0, &five).unwrap();
    assert_eq!(state.board.validation_track[5], 2);
    assert!(!state.board.equipment[0].unlocked);

    let nine = Action::DualCut { target: P0, tile_index: 2, guess: GameValue::Number(9) };
    engine.apply(&mut state, P1, &nine).unwrap();
    assert!(!state.board.equipment[0].unlocked);

    engine.apply(&mut state, P0, &Action::SoloCut { value: GameValue::Number(5) }).unwrap();
    assert_eq!(state.board.validation_track[5], 3);
    assert!(state.board.equipment[0].unlocked);
}

/// Locked, then usable once, then spent.
#[test]
fn test_lock_state_machine() {
    let (engine, mut state) = table(EquipmentKind::Rewinder, vec![blues(&[3, 8]), blues(&[5, 9])]);
    state.board.equipment[0].unlocked = false;
    state.board.detonator = 2;
    assert_eq!(code(play(&engine, &mut state, P0, EquipmentPayload::Rewinder)), ErrorCode::EquipmentLocked);

    state.board.equipment[0].unlocked = true;
    let result = play(&engine, &mut state, P0, EquipmentPayload::Rewinder).unwrap();
    assert!(matches!(result, ActionResult::EquipmentResult { kind: EquipmentKind::Rewinder, .. }));
    assert_eq!(state.board.detonator, 1);
    assert!(state.board.equipment[0].used);
    assert_eq!(state.current_player, P0);
    assert_eq!(state.log_details("use_equipment").collect::<Vec<_>>(), vec!["equipment:1"]);

    assert_eq!(
        code(play(&engine, &mut state, P0, EquipmentPayload::Rewinder)),
        ErrorCode::EquipmentAlreadyUsed
    );
    assert_eq!(
        code(engine.apply(
            &mut state,
            P0,
            &Action::UseEquipment { equipment: EquipmentId(9), payload: EquipmentPayload::Rewinder }
        )),
        ErrorCode::EquipmentNotFound
    );
}

/// A second lock keeps the card closed until its own value is cut enough.
#[test]
fn test_secondary_lock() {
    let engine = engine_with(EngineConfig::strict());
    let mut state = GameBuilder::new(MissionId(1))
        .hands(vec![blues(&[3, 6, 8]), blues(&[6, 9])])
        .equipment(EquipmentCard::new(CARD, EquipmentKind::GeneralRadar, 12).with_secondary(6, 2))
        .build(&engine, 1)
        .unwrap();
    state.board.equipment[0].unlocked = true;
    let radar = EquipmentPayload::GeneralRadar { value: GameValue::Number(9) };

    assert_eq!(code(play(&engine, &mut state, P0, radar.clone())), ErrorCode::EquipmentSecondaryLocked);

    let cut = Action::DualCut { target: P1, tile_index: 0, guess: GameValue::Number(6) };
    engine.apply(&mut state, P0, &cut).unwrap();

    assert!(state.board.equipment[0].secondary_cleared());
    let result = play(&engine, &mut state, P0, radar).unwrap();
    assert!(matches!(result, ActionResult::EquipmentResult { ref holders, .. } if holders == &vec![P1]));
}

/// The radar reports every seat holding the value, without revealing
/// positions.
#[test]
fn test_general_radar() {
    let (engine, mut state) = table(
        EquipmentKind::GeneralRadar,
        vec![blues(&[3, 8]), blues(&[4, 9]), blues(&[2, 4])],
    );

    let result = play(&engine, &mut state, P1, EquipmentPayload::GeneralRadar { value: GameValue::Number(4) })
        .unwrap();

    let ActionResult::EquipmentResult { holders, .. } = result else {
        panic!("unexpected result {result:?}");
    };
    assert_eq!(holders, vec![P1, P2]);
    assert_eq!(state.log_details("radar").collect::<Vec<_>>(), vec!["4:1,2"]);
    assert!(state.players.iter().all(|p| p.info_tokens.is_empty()));
}

/// Post-it and label tokens go on the actor's own hand.
#[test]
fn test_token_cards() {
    let (engine, mut state) = table(EquipmentKind::PostIt, vec![blues(&[3, 8]), blues(&[5, 9])]);
    play(&engine, &mut state, P0, EquipmentPayload::PostIt { index: 1 }).unwrap();
    assert_eq!(
        state.players[0].info_tokens,
        vec![InfoToken::Value { position: 1, value: GameValue::Number(8) }]
    );

    let (engine, mut state) = table(EquipmentKind::LabelNeq, vec![blues(&[3, 8]), blues(&[5, 9])]);
    play(&engine, &mut state, P1, EquipmentPayload::LabelNeq { index_a: 0, index_b: 1 }).unwrap();
    assert_eq!(
        state.players[1].info_tokens,
        vec![InfoToken::Relation { positions: (0, 1), relation: Relation::Neq }]
    );

    let (engine, mut state) = table(EquipmentKind::SingleWireLabel, vec![blues(&[3, 3, 8]), blues(&[5, 9])]);
    assert_eq!(
        code(play(&engine, &mut state, P0, EquipmentPayload::SingleWireLabel { index: 0 })),
        ErrorCode::InvalidEquipmentTarget
    );
    play(&engine, &mut state, P0, EquipmentPayload::SingleWireLabel { index: 2 }).unwrap();
    assert_eq!(state.players[0].info_tokens, vec![InfoToken::SingleWire { position: 2 }]);
}

/// The parity scanner marks a teammate's tile odd or even.
#[test]
fn test_parity_scanner() {
    let (engine, mut state) = table(EquipmentKind::ParityScanner, vec![blues(&[3, 8]), blues(&[5, 6])]);

    play(&engine, &mut state, P0, EquipmentPayload::ParityScanner { target: P1, tile_index: 1 }).unwrap();

    assert_eq!(state.players[1].info_tokens, vec![InfoToken::Parity { position: 1, even: true }]);
}

/// Walkie-talkies trade one tile each way and re-sort both hands. Anyone
/// may play them at any time.
#[test]
fn test_walkie_talkies_swap() {
    let (engine, mut state) = table(EquipmentKind::WalkieTalkies, vec![blues(&[2, 9]), blues(&[4, 6])]);

    let swap = EquipmentPayload::WalkieTalkies { target: P0, own_index: 1, target_index: 0 };
    play(&engine, &mut state, P1, swap).unwrap();

    let values = |p: usize| state.players[p].hand.iter().map(|t| t.value).collect::<Vec<_>>();
    assert_eq!(values(0), vec![GameValue::Number(6), GameValue::Number(9)]);
    assert_eq!(values(1), vec![GameValue::Number(2), GameValue::Number(4)]);
    assert_eq!(state.current_player, P0);
}

/// The grappling hook moves a teammate's tile into the actor's hand.
#[test]
fn test_grappling_hook() {
    let (engine, mut state) = table(EquipmentKind::GrapplingHook, vec![blues(&[2, 9]), blues(&[4, 6])]);

    play(&engine, &mut state, P0, EquipmentPayload::GrapplingHook { target: P1, tile_index: 0 }).unwrap();

    assert_eq!(state.players[0].hand.len(), 3);
    assert_eq!(state.players[0].hand[1].value, GameValue::Number(4));
    assert_eq!(state.players[1].hand.len(), 1);
}

/// A triple detector that finds the value resolves as a correct dual cut.
#[test]
fn test_triple_detector_hit() {
    let (engine, mut state) = table(
        EquipmentKind::TripleDetector,
        vec![blues(&[6, 9]), blues(&[2, 6, 8, 11])],
    );

    let payload = EquipmentPayload::TripleDetector {
        target: P1,
        tile_indices: [0, 1, 2],
        guess: GameValue::Number(6),
    };
    let result = play(&engine, &mut state, P0, payload).unwrap();

    let ActionResult::EquipmentResult { delegated: Some(inner), .. } = result else {
        panic!("detector did not delegate");
    };
    assert!(matches!(*inner, ActionResult::DualCutResult { success: true, .. }));
    assert!(state.players[1].hand[1].cut);
    assert!(state.players[0].hand[0].cut);
    assert_eq!(state.current_player, P1);
}

/// A super detector that misses costs a detonator step and reveals the
/// checked tile.
#[test]
fn test_super_detector_miss() {
    let (engine, mut state) = table(EquipmentKind::SuperDetector, vec![blues(&[6, 9]), blues(&[2, 8])]);

    play(&engine, &mut state, P0, EquipmentPayload::SuperDetector { target: P1, guess: GameValue::Number(6) })
        .unwrap();

    assert_eq!(state.board.detonator, 1);
    assert_eq!(
        state.players[1].info_tokens,
        vec![InfoToken::Value { position: 0, value: GameValue::Number(2) }]
    );
}

/// A super detector never lands on a tile that is already cut: with only
/// red left uncut it checks the red tile and explodes.
#[test]
fn test_super_detector_ignores_cut_tiles() {
    let (engine, mut state) = table(
        EquipmentKind::SuperDetector,
        vec![blues(&[3, 5]), vec![WireTile::blue(3), WireTile::red(8.5)]],
    );
    state.players[1].hand[0].cut = true;

    let result = play(&engine, &mut state, P0, EquipmentPayload::SuperDetector { target: P1, guess: GameValue::Number(3) })
        .unwrap();

    let ActionResult::EquipmentResult { delegated: Some(inner), .. } = result else {
        panic!("detector did not delegate");
    };
    assert!(matches!(*inner, ActionResult::DualCutResult { success: false, explosion: true, .. }));
    assert_eq!(state.result, Some(GameResult::LossRedWire));
    assert!(state.players[1].hand[1].cut);
    assert!(!state.players[0].hand[0].cut);
}

/// Three red candidates leave the triple detector nothing safe to check.
#[test]
fn test_triple_detector_all_red_explodes() {
    let (engine, mut state) = table(
        EquipmentKind::TripleDetector,
        vec![
            blues(&[5, 9]),
            vec![WireTile::red(2.5), WireTile::red(4.5), WireTile::red(6.5), WireTile::blue(9)],
        ],
    );

    let payload = EquipmentPayload::TripleDetector {
        target: P1,
        tile_indices: [0, 1, 2],
        guess: GameValue::Number(5),
    };
    play(&engine, &mut state, P0, payload).unwrap();

    assert_eq!(state.result, Some(GameResult::LossRedWire));
    assert!(state.players[1].hand[0].cut);
    assert_eq!(state.board.detonator, 0);
    assert!(state.players[0].hand.iter().all(|t| !t.cut));
}

/// The x/y ray cuts when either guess is right.
#[test]
fn test_xy_ray() {
    let (engine, mut state) = table(EquipmentKind::XyRay, vec![blues(&[6, 8]), blues(&[2, 8])]);

    let payload = EquipmentPayload::XyRay {
        target: P1,
        tile_index: 1,
        guesses: [GameValue::Number(6), GameValue::Number(8)],
    };
    play(&engine, &mut state, P0, payload).unwrap();

    assert_eq!(state.count_cut(GameValue::Number(8)), 2);
    assert_eq!(state.board.detonator, 0);
}

/// The coffee mug hands the turn to a chosen teammate.
#[test]
fn test_coffee_mug() {
    let (engine, mut state) = table(
        EquipmentKind::CoffeeMug,
        vec![blues(&[3, 8]), blues(&[5, 9]), blues(&[1, 2])],
    );

    play(&engine, &mut state, P0, EquipmentPayload::CoffeeMug { target: P2 }).unwrap();

    assert_eq!(state.current_player, P2);
    assert!(state.tiles().all(|t| !t.cut));
}

/// Fast pass cuts two own copies without holding every copy, then ends
/// the turn.
#[test]
fn test_fast_pass() {
    let (engine, mut state) = table(EquipmentKind::FastPass, vec![blues(&[4, 4, 9]), blues(&[4, 4, 9])]);

    play(&engine, &mut state, P0, EquipmentPayload::FastPass { value: GameValue::Number(4) }).unwrap();

    assert_eq!(state.players[0].count_uncut(GameValue::Number(4)), 0);
    assert_eq!(state.board.validation_track[4], 2);
    assert_eq!(state.current_player, P1);
}

/// The disintegrator cuts every copy of a random blue value and keeps the
/// turn with the actor.
#[test]
fn test_disintegrator() {
    let (engine, mut state) = table(
        EquipmentKind::Disintegrator,
        vec![vec![WireTile::blue(7), WireTile::red(8.5)], blues(&[7])],
    );

    play(&engine, &mut state, P0, EquipmentPayload::Disintegrator).unwrap();

    assert_eq!(state.count_cut(GameValue::Number(7)), 2);
    assert_eq!(state.log_details("disintegrator").collect::<Vec<_>>(), vec!["7"]);
    assert_eq!(state.current_player, P0);

    engine.apply(&mut state, P0, &Action::RevealReds).unwrap();
    assert_eq!(state.result, Some(GameResult::Win));
}

/// Emptying the current hand with the disintegrator passes the turn on.
#[test]
fn test_disintegrator_empties_actor_hand() {
    let (engine, mut state) = table(
        EquipmentKind::Disintegrator,
        vec![blues(&[7]), vec![WireTile::blue(7), WireTile::red(9.5)]],
    );

    play(&engine, &mut state, P0, EquipmentPayload::Disintegrator).unwrap();

    assert!(!state.players[0].has_uncut());
    assert!(state.result.is_none());
    assert_eq!(state.current_player, P1);
    assert!(engine.legal_actions(&state, P1).contains(&Action::RevealReds));

    engine.apply(&mut state, P1, &Action::RevealReds).unwrap();
    assert_eq!(state.result, Some(GameResult::Win));
}

/// Emergency drop restores every other spent card.
#[test]
fn test_emergency_drop() {
    let engine = engine_with(EngineConfig::strict());
    let mut state = GameBuilder::new(MissionId(1))
        .hands(vec![blues(&[3, 8]), blues(&[5, 9])])
        .equipment(EquipmentCard::new(EquipmentId(1), EquipmentKind::EmergencyDrop, 12))
        .equipment(EquipmentCard::new(EquipmentId(2), EquipmentKind::Rewinder, 12))
        .build(&engine, 1)
        .unwrap();
    for card in &mut state.board.equipment {
        card.unlocked = true;
    }

    assert_eq!(
        code(play(&engine, &mut state, P0, EquipmentPayload::EmergencyDrop)),
        ErrorCode::InvalidEquipmentTarget
    );

    state.board.equipment[1].used = true;
    play(&engine, &mut state, P0, EquipmentPayload::EmergencyDrop).unwrap();

    assert!(state.board.equipment[0].used);
    assert!(!state.board.equipment[1].used);
}

/// Emergency batteries recharge spent detectors.
#[test]
fn test_emergency_batteries() {
    let (engine, mut state) = table(EquipmentKind::EmergencyBatteries, vec![blues(&[3, 8]), blues(&[5, 9])]);
    let batteries = EquipmentPayload::EmergencyBatteries { players: vec![P1] };

    assert_eq!(
        code(play(&engine, &mut state, P0, batteries.clone())),
        ErrorCode::InvalidEquipmentTarget
    );

    state.players[1].ability_used = true;
    play(&engine, &mut state, P0, batteries).unwrap();
    assert!(!state.players[1].ability_used);
}

/// The stabilizer must open the active player's turn.
#[test]
fn test_stabilizer_timing() {
    let (engine, mut state) = table(EquipmentKind::Stabilizer, vec![blues(&[3, 8]), blues(&[5, 9])]);

    assert_eq!(code(play(&engine, &mut state, P1, EquipmentPayload::Stabilizer)), ErrorCode::WrongTiming);

    play(&engine, &mut state, P0, EquipmentPayload::Stabilizer).unwrap();
    assert!(state.stabilized());
}

/// A payload for another card kind is refused.
#[test]
fn test_payload_must_match_card() {
    let (engine, mut state) = table(EquipmentKind::Rewinder, vec![blues(&[3, 8]), blues(&[5, 9])]);

    assert_eq!(
        code(play(&engine, &mut state, P0, EquipmentPayload::Stabilizer)),
        ErrorCode::EquipmentPayloadMismatch
    );
}
