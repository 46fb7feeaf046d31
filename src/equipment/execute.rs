//! Card effects.
//!
//! The card is marked used before its effect runs. Detector-style cards
//! pick one tile and resolve through the dual-cut path, so resolve hooks,
//! unlock refresh and turn hand-off behave exactly as for a plain cut.

use tracing::debug;

use super::card::{EquipmentId, EquipmentKind};
use super::payload::EquipmentPayload;
use crate::core::error::ErrorCode;
use crate::core::{
    ActionResult, EngineError, GameState, GameValue, InfoToken, PlayerId, Relation, TurnEffects,
    ValidationError,
};
use crate::engine::cut::{cut_tile, tile_at, uncut_positions};
use crate::engine::Engine;
use crate::hooks::{HookContext, ResolveEvent};

impl Engine {
    /// Apply a card play. Assumes [`Engine::validate_use_equipment`]
    /// accepted it.
    pub(crate) fn execute_use_equipment(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        equipment: EquipmentId,
        payload: &EquipmentPayload,
    ) -> Result<ActionResult, EngineError> {
        let Some(card) = state.board.equipment_mut(equipment) else {
            return Err(ValidationError::new(ErrorCode::EquipmentNotFound, format!("no equipment card {equipment}")).into());
        };
        card.used = true;
        let kind = card.kind;
        debug!(%actor, %equipment, ?kind, "equipment used");
        state.log(Some(actor), "use_equipment", format!("equipment:{equipment}"));

        let mut holders = Vec::new();
        let mut delegated = None;

        match payload {
            EquipmentPayload::TripleDetector { target, tile_indices, guess } => {
                let tile = detector_tile(state, *target, tile_indices, *guess);
                delegated = Some(self.dual_cut(state, actor, *target, tile, *guess, None)?);
            }
            EquipmentPayload::SuperDetector { target, guess } => {
                let every: Vec<usize> = (0..state.player(*target).map_or(0, |p| p.hand.len())).collect();
                let tile = detector_tile(state, *target, &every, *guess);
                delegated = Some(self.dual_cut(state, actor, *target, tile, *guess, None)?);
            }
            EquipmentPayload::XyRay { target, tile_index, guesses } => {
                let actual = tile_at(state, *target, *tile_index)?.value;
                let guess = guesses.iter().copied().find(|&g| g == actual).unwrap_or(guesses[0]);
                delegated = Some(self.dual_cut(state, actor, *target, *tile_index, guess, None)?);
            }

            EquipmentPayload::PostIt { index } => {
                let value = tile_at(state, actor, *index)?.value;
                add_token(state, actor, InfoToken::Value { position: *index, value });
            }
            EquipmentPayload::LabelNeq { index_a, index_b } => {
                let token = InfoToken::Relation { positions: (*index_a, *index_b), relation: Relation::Neq };
                add_token(state, actor, token);
            }
            EquipmentPayload::LabelEq { index_a, index_b } => {
                let token = InfoToken::Relation { positions: (*index_a, *index_b), relation: Relation::Eq };
                add_token(state, actor, token);
            }
            EquipmentPayload::SingleWireLabel { index } => {
                add_token(state, actor, InfoToken::SingleWire { position: *index });
            }
            EquipmentPayload::ParityScanner { target, tile_index } => {
                let tile = tile_at(state, *target, *tile_index)?;
                let token = match tile.value.number() {
                    Some(v) => InfoToken::Parity { position: *tile_index, even: v % 2 == 0 },
                    None => InfoToken::revealing(*tile_index, &tile),
                };
                add_token(state, *target, token);
            }

            EquipmentPayload::WalkieTalkies { target, own_index, target_index } => {
                swap_tiles(state, actor, *own_index, *target, *target_index);
            }
            EquipmentPayload::GrapplingHook { target, tile_index } => {
                let taken = state.player_mut(*target).and_then(|p| p.remove_tile(*tile_index));
                if let (Some(tile), Some(me)) = (taken, state.player_mut(actor)) {
                    me.insert_tile(tile);
                }
            }

            EquipmentPayload::Rewinder => {
                state.board.detonator = state.board.detonator.saturating_sub(1);
            }
            EquipmentPayload::EmergencyBatteries { players } => {
                for &p in players {
                    if let Some(player) = state.player_mut(p) {
                        player.ability_used = false;
                    }
                }
            }
            EquipmentPayload::EmergencyDrop => {
                for card in state.board.equipment.iter_mut().filter(|c| c.id != equipment) {
                    card.used = false;
                }
            }
            EquipmentPayload::GeneralRadar { value } => {
                holders = state
                    .players
                    .iter()
                    .filter(|p| p.holds_uncut(*value))
                    .map(|p| p.id)
                    .collect();
                let seats: Vec<String> = holders.iter().map(|p| p.0.to_string()).collect();
                state.log(Some(actor), "radar", format!("{value}:{}", seats.join(",")));
            }
            EquipmentPayload::Stabilizer => {
                state.turn_effects.get_or_insert_with(TurnEffects::default).stabilizer = true;
            }
            EquipmentPayload::CoffeeMug { target } => {
                self.advance_turn(state, actor, Some(*target))?;
            }

            EquipmentPayload::FastPass { value } => {
                for &i in uncut_positions(state, actor, |t| t.value == *value).iter().take(2) {
                    cut_tile(state, actor, i);
                }
                delegated = self.settle_equipment_cut(state, actor, *value, true)?;
            }
            EquipmentPayload::Disintegrator => {
                let mut values: Vec<GameValue> = Vec::new();
                for tile in state.tiles().filter(|t| !t.cut && t.is_blue()) {
                    if !values.contains(&tile.value) {
                        values.push(tile.value);
                    }
                }
                if !values.is_empty() {
                    let value = values[state.rng.pick_index(values.len())];
                    for player in &mut state.players {
                        for tile in player.hand.iter_mut().filter(|t| !t.cut && t.value == value) {
                            tile.cut = true;
                        }
                    }
                    state.log(Some(actor), "disintegrator", value.to_string());
                    delegated = self.settle_equipment_cut(state, actor, value, false)?;
                }
            }
        }

        // A card may empty the current hand without ending the turn.
        let current = state.current_player;
        let stranded = state.player(current).is_some_and(|p| !p.has_uncut());
        if stranded && !state.is_finished() && state.pending_forced_action.is_none() {
            self.advance_turn(state, current, None)?;
        }

        Ok(ActionResult::EquipmentResult {
            equipment,
            kind,
            holders,
            delegated: delegated.map(Box::new),
        })
    }

    /// Resolve hooks, unlock refresh and terminal checks after a card cut
    /// tiles. Returns `GameOver` if the game ended.
    fn settle_equipment_cut(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        value: GameValue,
        ends_turn: bool,
    ) -> Result<Option<ActionResult>, EngineError> {
        let event = ResolveEvent::EquipmentCut { actor, value };
        let resolved = self.dispatch(state.mission, HookContext::Resolve(&mut *state, &event))?;
        if let Some(result) = state.result {
            state.recompute_validation_track();
            self.announce(state, Some(actor), None);
            return Ok(Some(ActionResult::GameOver { result }));
        }

        self.after_cut(state, resolved.equipment_unlock_threshold);
        if self.check_detonator(state, Some(actor), None) || self.check_win(state, Some(actor)) {
            return Ok(state.result.map(|result| ActionResult::GameOver { result }));
        }
        if ends_turn {
            self.advance_turn(state, actor, None)?;
        }
        Ok(None)
    }
}

/// Tile a detector checks: a guessed-value match first, else the first
/// uncut non-red, else the first uncut tile (an explosion if it is red).
fn detector_tile(state: &GameState, target: PlayerId, candidates: &[usize], guess: GameValue) -> usize {
    let Some(player) = state.player(target) else {
        return candidates.first().copied().unwrap_or(0);
    };
    let uncut: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| player.tile(i).is_some_and(|t| !t.cut))
        .collect();
    uncut
        .iter()
        .copied()
        .find(|&i| player.hand[i].value == guess)
        .or_else(|| uncut.iter().copied().find(|&i| !player.hand[i].is_red()))
        .or_else(|| uncut.first().copied())
        .or_else(|| candidates.first().copied())
        .unwrap_or(0)
}

fn add_token(state: &mut GameState, player: PlayerId, token: InfoToken) {
    if let Some(p) = state.player_mut(player) {
        p.info_tokens.push(token);
    }
}

/// Exchange one tile each way. Both hands are re-sorted.
fn swap_tiles(state: &mut GameState, a: PlayerId, a_index: usize, b: PlayerId, b_index: usize) {
    let from_a = state.player_mut(a).and_then(|p| p.remove_tile(a_index));
    let from_b = state.player_mut(b).and_then(|p| p.remove_tile(b_index));
    for (owner, tile) in [(b, from_a), (a, from_b)] {
        if let (Some(tile), Some(player)) = (tile, state.player_mut(owner)) {
            player.insert_tile(tile);
        }
    }
}
