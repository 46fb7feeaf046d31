//! Cutting actions: dual cut, double detector, solo cut, reveal reds.
//!
//! ## Sequencing
//!
//! A correct cut runs in a fixed order:
//!
//! 1. cut the named tile (primary mutation)
//! 2. dispatch `resolve`; a hook may end the game here
//! 3. cut the actor's matching tile (secondary mutation)
//! 4. recompute the validation track and refresh equipment locks
//! 5. detonator check, win check, turn hand-off
//!
//! When step 2 ends the game the actor's tile stays uncut.

use smallvec::SmallVec;
use tracing::debug;

use super::Engine;
use crate::core::error::ErrorCode;
use crate::core::{
    ActionResult, DetectorOutcome, EngineError, GameResult, GameState, GameValue, InfoToken,
    PendingForcedAction, PlayerId, ValidationError, WireTile,
};
use crate::equipment::EquipmentId;
use crate::hooks::{HookContext, ResolveEvent};

impl Engine {
    pub(crate) fn dual_cut(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
        tile_index: usize,
        guess: GameValue,
        actor_hint: Option<usize>,
    ) -> Result<ActionResult, EngineError> {
        let tile = tile_at(state, target, tile_index)?;
        state.log(
            Some(actor),
            "dual_cut",
            format!("target:{}:tile:{tile_index}:guess:{guess}", target.0),
        );

        if tile.value == guess {
            return Ok(match self.land_cut(state, actor, target, tile_index, guess, actor_hint)? {
                Some(result) => ActionResult::GameOver { result },
                None => ActionResult::DualCutResult {
                    success: true,
                    explosion: false,
                    detonator_advanced: false,
                },
            });
        }

        if state.is_effectively_red(&tile) {
            self.explode(state, actor, target, tile_index);
            return Ok(ActionResult::DualCutResult {
                success: false,
                explosion: true,
                detonator_advanced: false,
            });
        }

        let advanced = miss(state, target, tile_index, &tile);
        if !self.check_detonator(state, Some(actor), Some(target)) {
            self.advance_turn(state, actor, None)?;
        }
        Ok(ActionResult::DualCutResult {
            success: false,
            explosion: false,
            detonator_advanced: advanced,
        })
    }

    pub(crate) fn double_detector(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
        tile_indices: [usize; 2],
        guess: GameValue,
        actor_hint: Option<usize>,
    ) -> Result<ActionResult, EngineError> {
        if let Some(player) = state.player_mut(actor) {
            player.ability_used = true;
        }
        let [a, b] = tile_indices;
        state.log(
            Some(actor),
            "double_detector",
            format!("target:{}:tiles:{a},{b}:guess:{guess}", target.0),
        );

        let event = ResolveEvent::DetectorDeclared { actor, target, tile_indices, guess };
        let declared = self.dispatch(state.mission, HookContext::Resolve(&mut *state, &event))?;
        if let Some(result) = state.result {
            self.announce(state, Some(actor), Some(target));
            return Ok(ActionResult::GameOver { result });
        }

        if let Some(mut pending) = declared.forced_action {
            if let PendingForcedAction::DetectorTileChoice { actor_tile_index, .. } = &mut pending {
                *actor_tile_index = actor_hint;
            }
            debug!(chooser = %pending.chooser(), "detector tile choice deferred");
            state.pending_forced_action = Some(pending.clone());
            return Ok(ActionResult::ForcedActionPending { pending });
        }

        self.resolve_detector(state, actor, target, &tile_indices, guess, actor_hint)
    }

    /// Check `guess` against the candidate tiles of `target`.
    ///
    /// Shared by the double detector (two candidates) and the deferred
    /// tile choice (one candidate).
    pub(crate) fn resolve_detector(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
        candidates: &[usize],
        guess: GameValue,
        actor_hint: Option<usize>,
    ) -> Result<ActionResult, EngineError> {
        let tiles = candidates
            .iter()
            .map(|&i| tile_at(state, target, i).map(|t| (i, t)))
            .collect::<Result<SmallVec<[(usize, WireTile); 2]>, _>>()?;
        let Some((first, _)) = tiles.first() else {
            return Err(ValidationError::new(ErrorCode::TileIndexOutOfRange, "no tiles designated").into());
        };

        let matching: SmallVec<[usize; 2]> = tiles
            .iter()
            .filter(|(_, t)| !t.cut && t.value == guess)
            .map(|(i, _)| *i)
            .collect();

        if let Some(&hit) = matching.first() {
            let outcome = if tiles.len() > 1 && matching.len() == tiles.len() {
                DetectorOutcome::BothMatch
            } else {
                DetectorOutcome::OneMatch
            };
            return Ok(match self.land_cut(state, actor, target, hit, guess, actor_hint)? {
                Some(result) => ActionResult::GameOver { result },
                None => ActionResult::DoubleDetectorResult {
                    outcome,
                    explosion: false,
                    detonator_advanced: false,
                },
            });
        }

        let safe = tiles.iter().find(|(_, t)| !state.is_effectively_red(t)).cloned();
        let Some((position, tile)) = safe else {
            self.explode(state, actor, target, *first);
            return Ok(ActionResult::DoubleDetectorResult {
                outcome: DetectorOutcome::NoMatch,
                explosion: true,
                detonator_advanced: false,
            });
        };

        let advanced = miss(state, target, position, &tile);
        if !self.check_detonator(state, Some(actor), Some(target)) {
            self.advance_turn(state, actor, None)?;
        }
        Ok(ActionResult::DoubleDetectorResult {
            outcome: DetectorOutcome::NoMatch,
            explosion: false,
            detonator_advanced: advanced,
        })
    }

    pub(crate) fn solo_cut(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        value: GameValue,
    ) -> Result<ActionResult, EngineError> {
        let positions = uncut_positions(state, actor, |t| t.value == value);
        let Some((&first, rest)) = positions.split_first() else {
            return Err(ValidationError::new(ErrorCode::SoloCutNotAllowed, format!("no uncut {value} in hand")).into());
        };
        state.log(Some(actor), "solo_cut", format!("value:{value}:count:{}", positions.len()));

        cut_tile(state, actor, first);
        let event = ResolveEvent::SoloCut { actor, value };
        let resolved = self.dispatch(state.mission, HookContext::Resolve(&mut *state, &event))?;
        if let Some(result) = state.result {
            state.recompute_validation_track();
            self.announce(state, Some(actor), None);
            return Ok(ActionResult::GameOver { result });
        }

        for &i in rest {
            cut_tile(state, actor, i);
        }
        self.after_cut(state, resolved.equipment_unlock_threshold);

        if self.check_detonator(state, Some(actor), None) {
            return Ok(ActionResult::GameOver { result: GameResult::LossDetonator });
        }
        if !self.check_win(state, Some(actor)) {
            self.advance_turn(state, actor, None)?;
        }
        Ok(ActionResult::SoloCutResult { value, cut: positions.len() })
    }

    pub(crate) fn reveal_reds(&self, state: &mut GameState, actor: PlayerId) -> Result<ActionResult, EngineError> {
        let positions = uncut_positions(state, actor, |_| true);
        for &i in &positions {
            cut_tile(state, actor, i);
        }
        state.log(Some(actor), "reveal_reds", format!("count:{}", positions.len()));

        let event = ResolveEvent::RevealReds { actor };
        let resolved = self.dispatch(state.mission, HookContext::Resolve(&mut *state, &event))?;
        if let Some(result) = state.result {
            state.recompute_validation_track();
            self.announce(state, Some(actor), None);
            return Ok(ActionResult::GameOver { result });
        }
        self.after_cut(state, resolved.equipment_unlock_threshold);

        if !self.check_win(state, Some(actor)) {
            self.advance_turn(state, actor, None)?;
        }
        Ok(ActionResult::RevealRedsResult { cut: positions.len() })
    }

    /// Steps 1-5 of a correct cut. Returns the result if the game ended
    /// in a loss on the way.
    pub(crate) fn land_cut(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        target: PlayerId,
        tile_index: usize,
        value: GameValue,
        actor_hint: Option<usize>,
    ) -> Result<Option<GameResult>, EngineError> {
        cut_tile(state, target, tile_index);

        let event = ResolveEvent::DualCut { actor, target, tile_index, value };
        let resolved = self.dispatch(state.mission, HookContext::Resolve(&mut *state, &event))?;
        if let Some(result) = state.result {
            state.recompute_validation_track();
            self.announce(state, Some(actor), Some(target));
            return Ok(Some(result));
        }

        let own = state.player(actor).and_then(|p| p.matching_tile(value, actor_hint));
        if let Some(i) = own {
            cut_tile(state, actor, i);
        }
        self.after_cut(state, resolved.equipment_unlock_threshold);

        if self.check_detonator(state, Some(actor), Some(target)) {
            return Ok(Some(GameResult::LossDetonator));
        }
        if !self.check_win(state, Some(actor)) {
            self.advance_turn(state, actor, None)?;
        }
        Ok(None)
    }

    /// Recompute the track and refresh every equipment lock.
    ///
    /// `threshold` is the resolve-hook override, if any.
    pub(crate) fn after_cut(&self, state: &mut GameState, threshold: Option<u8>) {
        state.recompute_validation_track();
        let threshold = threshold.unwrap_or(self.config.default_unlock_threshold);
        let track = state.board.validation_track;

        let unlocked: SmallVec<[EquipmentId; 4]> = state
            .board
            .equipment
            .iter_mut()
            .filter_map(|card| card.refresh(&track, threshold).then_some(card.id))
            .collect();
        for id in unlocked {
            debug!(equipment = %id, threshold, "equipment unlocked");
            state.log(None, "equipment_unlocked", id.to_string());
        }
    }

    /// Cut a red (or hidden-red) tile and lose.
    fn explode(&self, state: &mut GameState, actor: PlayerId, target: PlayerId, tile_index: usize) {
        cut_tile(state, target, tile_index);
        state.recompute_validation_track();
        state.log(Some(actor), "explosion", format!("target:{}:tile:{tile_index}", target.0));
        self.conclude(state, GameResult::LossRedWire, Some(actor), Some(target));
    }
}

pub(crate) fn tile_at(state: &GameState, player: PlayerId, index: usize) -> Result<WireTile, ValidationError> {
    state
        .player(player)
        .and_then(|p| p.tile(index))
        .cloned()
        .ok_or_else(|| ValidationError::new(ErrorCode::TileIndexOutOfRange, format!("no tile {index} for {player}")))
}

pub(crate) fn cut_tile(state: &mut GameState, player: PlayerId, index: usize) {
    if let Some(tile) = state.player_mut(player).and_then(|p| p.hand.get_mut(index)) {
        tile.cut = true;
    }
}

pub(crate) fn uncut_positions(
    state: &GameState,
    player: PlayerId,
    filter: impl Fn(&WireTile) -> bool,
) -> SmallVec<[usize; 4]> {
    state
        .player(player)
        .map(|p| {
            p.hand
                .iter()
                .enumerate()
                .filter(|(_, t)| !t.cut && filter(t))
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default()
}

/// Wrong guess on a safe tile: detonator step unless stabilized, and a
/// token with the true value. Returns whether the detonator moved.
fn miss(state: &mut GameState, target: PlayerId, position: usize, tile: &WireTile) -> bool {
    let advanced = !state.stabilized();
    if advanced {
        state.board.detonator = state.board.detonator.saturating_add(1);
    }
    if let Some(player) = state.player_mut(target) {
        player.info_tokens.push(InfoToken::revealing(position, tile));
    }
    advanced
}
