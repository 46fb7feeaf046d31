//! Legality of playing an equipment card.

use super::card::{EquipmentId, EquipmentKind, Timing};
use super::payload::EquipmentPayload;
use crate::core::error::{reject, ErrorCode};
use crate::core::{Action, EngineError, GameState, PlayerId, ValidationError};
use crate::engine::validate::{
    check_active, check_guess, check_no_pending, check_player, check_target, check_uncut_tile,
};
use crate::engine::Engine;

impl Engine {
    /// Check a card play in order: game state, mission hooks, card lock
    /// state, timing, then the payload itself.
    pub fn validate_use_equipment(
        &self,
        state: &GameState,
        actor: PlayerId,
        equipment: EquipmentId,
        payload: &EquipmentPayload,
    ) -> Result<(), EngineError> {
        check_active(state)?;
        check_player(state, actor)?;
        check_no_pending(state)?;

        let action = Action::UseEquipment { equipment, payload: payload.clone() };
        self.validate_hooks(state, actor, &action)?;

        let Some(card) = state.board.equipment(equipment) else {
            return reject(ErrorCode::EquipmentNotFound, format!("no equipment card {equipment}"))
                .map_err(Into::into);
        };
        let lock = if card.used {
            Some((ErrorCode::EquipmentAlreadyUsed, "has already been used"))
        } else if !card.unlocked {
            Some((ErrorCode::EquipmentLocked, "is still locked"))
        } else if !card.secondary_cleared() {
            Some((ErrorCode::EquipmentSecondaryLocked, "is still behind its second lock"))
        } else {
            None
        };
        if let Some((code, why)) = lock {
            return reject(code, format!("equipment {equipment} {why}")).map_err(Into::into);
        }
        if payload.kind() != card.kind {
            return reject(
                ErrorCode::EquipmentPayloadMismatch,
                format!("payload is for {:?}, card is {:?}", payload.kind(), card.kind),
            )
            .map_err(Into::into);
        }

        check_timing(state, actor, card.kind)?;
        check_payload(state, actor, equipment, payload)?;
        Ok(())
    }
}

fn check_timing(state: &GameState, actor: PlayerId, kind: EquipmentKind) -> Result<(), ValidationError> {
    let on_turn = actor == state.current_player;
    let ok = match kind.timing() {
        Timing::Anytime => true,
        Timing::InTurn => on_turn,
        Timing::StartOfTurn => on_turn && !state.stabilized(),
    };
    if !ok {
        return reject(ErrorCode::WrongTiming, format!("{kind:?} cannot be played now"));
    }
    Ok(())
}

fn invalid<T>(message: impl Into<String>) -> Result<T, ValidationError> {
    reject(ErrorCode::InvalidEquipmentTarget, message)
}

fn check_payload(
    state: &GameState,
    actor: PlayerId,
    equipment: EquipmentId,
    payload: &EquipmentPayload,
) -> Result<(), ValidationError> {
    let own = |index: usize| state.player(actor).and_then(|p| p.tile(index));

    match payload {
        EquipmentPayload::LabelNeq { index_a, index_b } | EquipmentPayload::LabelEq { index_a, index_b } => {
            check_uncut_tile(state, actor, *index_a)?;
            check_uncut_tile(state, actor, *index_b)?;
            if index_a.abs_diff(*index_b) != 1 {
                return invalid("labels go on two adjacent tiles");
            }
            let same = own(*index_a).map(|t| t.value) == own(*index_b).map(|t| t.value);
            let wants_same = matches!(payload, EquipmentPayload::LabelEq { .. });
            if same != wants_same {
                return invalid("the label would not be true");
            }
        }
        EquipmentPayload::WalkieTalkies { target, own_index, target_index } => {
            check_target(state, actor, *target)?;
            check_uncut_tile(state, actor, *own_index)?;
            check_uncut_tile(state, *target, *target_index)?;
        }
        EquipmentPayload::TripleDetector { target, tile_indices, guess } => {
            check_target(state, actor, *target)?;
            let [a, b, c] = *tile_indices;
            if a == b || b == c || a == c {
                return invalid("triple detector needs three different tiles");
            }
            for &i in tile_indices {
                check_uncut_tile(state, *target, i)?;
            }
            check_guess(state, actor, *guess)?;
        }
        EquipmentPayload::PostIt { index } | EquipmentPayload::SingleWireLabel { index } => {
            check_uncut_tile(state, actor, *index)?;
            let Some(tile) = own(*index).filter(|t| t.is_blue()) else {
                return invalid("only blue tiles can be labeled");
            };
            let single = matches!(payload, EquipmentPayload::SingleWireLabel { .. });
            let copies = state.player(actor).map_or(0, |p| p.count_uncut(tile.value));
            if single && copies != 1 {
                return invalid(format!("you hold {copies} uncut {}", tile.value));
            }
        }
        EquipmentPayload::SuperDetector { target, guess } => {
            check_target(state, actor, *target)?;
            if !state.player(*target).is_some_and(|p| p.has_uncut()) {
                return invalid(format!("{target} has nothing left to cut"));
            }
            check_guess(state, actor, *guess)?;
        }
        EquipmentPayload::Rewinder => {
            if state.board.detonator == 0 {
                return invalid("the detonator is already at zero");
            }
        }
        EquipmentPayload::EmergencyBatteries { players } => {
            if players.is_empty() || players.len() > 2 {
                return invalid("emergency batteries recharge one or two players");
            }
            for &p in players {
                check_player(state, p)?;
                if !state.player(p).is_some_and(|p| p.ability_used) {
                    return invalid(format!("{p} has not used their detector"));
                }
            }
        }
        EquipmentPayload::GeneralRadar { value } => {
            if value.number().is_none() {
                return invalid("the radar only scans blue values");
            }
        }
        EquipmentPayload::XyRay { target, tile_index, guesses } => {
            check_target(state, actor, *target)?;
            check_uncut_tile(state, *target, *tile_index)?;
            if guesses[0] == guesses[1] {
                return invalid("x/y ray needs two different values");
            }
            check_guess(state, actor, guesses[0])?;
            check_guess(state, actor, guesses[1])?;
        }
        EquipmentPayload::CoffeeMug { target } => {
            check_target(state, actor, *target)?;
            if !state.player(*target).is_some_and(|p| p.has_uncut()) {
                return invalid(format!("{target} has nothing left to cut"));
            }
        }
        EquipmentPayload::EmergencyDrop => {
            if !state.board.equipment.iter().any(|c| c.id != equipment && c.used) {
                return invalid("no used equipment to restore");
            }
        }
        EquipmentPayload::FastPass { value } => {
            let held = state.player(actor).map_or(0, |p| p.count_uncut(*value));
            if value.is_red() || held < 2 {
                return invalid(format!("fast pass needs two uncut {value} in hand"));
            }
        }
        EquipmentPayload::Disintegrator => {
            if !state.tiles().any(|t| !t.cut && t.is_blue()) {
                return invalid("no blue wires left");
            }
        }
        EquipmentPayload::GrapplingHook { target, tile_index }
        | EquipmentPayload::ParityScanner { target, tile_index } => {
            check_target(state, actor, *target)?;
            check_uncut_tile(state, *target, *tile_index)?;
        }
        EquipmentPayload::Stabilizer => {}
    }
    Ok(())
}
