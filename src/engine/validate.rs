//! Legality checks.
//!
//! Built-in checks run first and return the first failure; mission
//! `validate` hooks run last and see only actions the base game allows.
//! Nothing here mutates the state.

use super::Engine;
use crate::core::error::{reject, ErrorCode};
use crate::core::{
    Action, EngineError, ForcedChoice, GamePhase, GameState, GameValue, PendingForcedAction,
    PlayerId, ValidationError,
};
use crate::hooks::{HookContext, ValidateContext};

impl Engine {
    /// Check `action` for `actor` without touching the state.
    pub fn validate_action(&self, state: &GameState, actor: PlayerId, action: &Action) -> Result<(), EngineError> {
        check_active(state)?;
        check_player(state, actor)?;

        match action {
            Action::ResolveForced { choice } => return Ok(check_forced(state, actor, *choice)?),
            Action::UseEquipment { equipment, payload } => {
                return self.validate_use_equipment(state, actor, *equipment, payload);
            }
            _ => {}
        }

        check_no_pending(state)?;
        if actor != state.current_player {
            return Err(ValidationError::new(
                ErrorCode::NotYourTurn,
                format!("it is {}'s turn", state.current_player),
            )
            .into());
        }

        match action {
            Action::DualCut { target, tile_index, guess } => {
                check_target(state, actor, *target)?;
                check_uncut_tile(state, *target, *tile_index)?;
                check_guess(state, actor, *guess)?;
            }
            Action::DoubleDetector { target, tile_indices, guess, .. } => {
                if state.player(actor).is_some_and(|p| p.ability_used) {
                    return Err(ValidationError::new(
                        ErrorCode::AbilityAlreadyUsed,
                        "double detector already used",
                    )
                    .into());
                }
                check_target(state, actor, *target)?;
                let [a, b] = *tile_indices;
                if a == b {
                    return Err(ValidationError::new(
                        ErrorCode::TileIndexOutOfRange,
                        "double detector needs two different tiles",
                    )
                    .into());
                }
                check_uncut_tile(state, *target, a)?;
                check_uncut_tile(state, *target, b)?;
                check_guess(state, actor, *guess)?;
            }
            Action::SoloCut { value } => {
                let held = state.player(actor).map_or(0, |p| p.count_uncut(*value));
                if value.is_red() || held == 0 || held != state.count_uncut(*value) {
                    return reject(
                        ErrorCode::SoloCutNotAllowed,
                        format!("{actor} does not hold every remaining {value}"),
                    )
                    .map_err(Into::into);
                }
            }
            Action::RevealReds => {
                let Some(player) = state.player(actor) else {
                    return Ok(());
                };
                let all_red = player.hand.iter().filter(|t| !t.cut).all(|t| state.is_effectively_red(t));
                if !player.has_uncut() || !all_red {
                    return reject(ErrorCode::RevealRedsNotAllowed, "remaining tiles are not all red")
                        .map_err(Into::into);
                }
            }
            Action::UseEquipment { .. } | Action::ResolveForced { .. } => {}
        }

        self.validate_hooks(state, actor, action)
    }

    /// Run `validate` hooks and turn a block into a rejection.
    pub(crate) fn validate_hooks(&self, state: &GameState, actor: PlayerId, action: &Action) -> Result<(), EngineError> {
        let ctx = HookContext::Validate(ValidateContext { state, actor, action });
        self.dispatch(state.mission, ctx)?.into_validation()?;
        Ok(())
    }
}

pub(crate) fn check_active(state: &GameState) -> Result<(), ValidationError> {
    if state.phase != GamePhase::Playing {
        return reject(ErrorCode::GameNotActive, "the game is not in progress");
    }
    Ok(())
}

pub(crate) fn check_no_pending(state: &GameState) -> Result<(), ValidationError> {
    match &state.pending_forced_action {
        Some(pending) => reject(
            ErrorCode::ForcedActionPending,
            format!("waiting for {} to resolve a forced action", pending.chooser()),
        ),
        None => Ok(()),
    }
}

pub(crate) fn check_player(state: &GameState, player: PlayerId) -> Result<(), ValidationError> {
    if state.player(player).is_none() {
        return reject(ErrorCode::TargetPlayerNotFound, format!("{player} is not seated"));
    }
    Ok(())
}

/// Target exists and is not the actor.
pub(crate) fn check_target(state: &GameState, actor: PlayerId, target: PlayerId) -> Result<(), ValidationError> {
    check_player(state, target)?;
    if target == actor {
        return reject(ErrorCode::CannotTargetSelf, "cannot target your own hand");
    }
    Ok(())
}

/// Tile exists and is still uncut.
pub(crate) fn check_uncut_tile(state: &GameState, player: PlayerId, index: usize) -> Result<(), ValidationError> {
    match state.player(player).and_then(|p| p.tile(index)) {
        None => reject(ErrorCode::TileIndexOutOfRange, format!("{player} has no tile {index}")),
        Some(tile) if tile.cut => reject(ErrorCode::TileAlreadyCut, format!("tile {index} is already cut")),
        Some(_) => Ok(()),
    }
}

/// The actor must hold an uncut tile of the named value. Red is never
/// named.
pub(crate) fn check_guess(state: &GameState, actor: PlayerId, guess: GameValue) -> Result<(), ValidationError> {
    let held = state.player(actor).is_some_and(|p| p.holds_uncut(guess));
    if guess.is_red() || !held {
        return reject(ErrorCode::GuessValueNotInHand, format!("{actor} holds no uncut {guess}"));
    }
    Ok(())
}

fn check_forced(state: &GameState, actor: PlayerId, choice: ForcedChoice) -> Result<(), ValidationError> {
    let Some(pending) = &state.pending_forced_action else {
        return reject(ErrorCode::NoForcedActionPending, "no forced action is pending");
    };
    if pending.chooser() != actor {
        return reject(
            ErrorCode::NotForcedActionChooser,
            format!("only {} may resolve this", pending.chooser()),
        );
    }

    let holds = |p: PlayerId| state.player(p).is_some_and(|p| p.has_uncut());
    let valid = match (pending, choice) {
        (PendingForcedAction::ChooseNextPlayer { .. }, ForcedChoice::NextPlayer { player }) => holds(player),
        (PendingForcedAction::DesignateCutter { designator }, ForcedChoice::Cutter { player }) => {
            player != *designator && holds(player)
        }
        (
            PendingForcedAction::DetectorTileChoice { tile_indices, .. },
            ForcedChoice::DetectorTile { tile_index },
        ) => tile_indices.contains(&tile_index) && check_uncut_tile(state, actor, tile_index).is_ok(),
        (PendingForcedAction::ConstraintRotate { options, .. }, ForcedChoice::Constraint { index }) => {
            index < *options
        }
        _ => false,
    };
    if !valid {
        return reject(ErrorCode::InvalidForcedChoice, format!("{choice:?} does not answer the pending decision"));
    }
    Ok(())
}
