//! Answering pending forced actions.

use tracing::debug;

use super::Engine;
use crate::core::{Action, ActionResult, EngineError, ForcedChoice, GameState, PendingForcedAction, PlayerId};

impl Engine {
    /// Answer the pending forced action as `actor`.
    pub fn resolve_forced_action(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        choice: ForcedChoice,
    ) -> Result<ActionResult, EngineError> {
        self.apply(state, actor, &Action::ResolveForced { choice })
    }

    /// Apply `choice` to the pending forced action. Assumes
    /// [`Engine::validate_action`] accepted it.
    pub(crate) fn answer_forced(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        choice: ForcedChoice,
    ) -> Result<ActionResult, EngineError> {
        let Some(pending) = state.pending_forced_action.take() else {
            return Ok(ActionResult::ForcedActionResolved { chooser: actor });
        };
        debug!(chooser = %actor, ?choice, "resolving forced action");

        match (pending, choice) {
            (PendingForcedAction::ChooseNextPlayer { .. }, ForcedChoice::NextPlayer { player })
            | (PendingForcedAction::DesignateCutter { .. }, ForcedChoice::Cutter { player }) => {
                state.current_player = player;
                state.log(Some(actor), "next_player", player.0.to_string());
            }
            (PendingForcedAction::ConstraintRotate { .. }, ForcedChoice::Constraint { index }) => {
                state.campaign_mut().active_constraint = Some(index);
                state.log(Some(actor), "constraint", index.to_string());
            }
            (
                PendingForcedAction::DetectorTileChoice {
                    actor: detector,
                    guess,
                    actor_tile_index,
                    ..
                },
                ForcedChoice::DetectorTile { tile_index },
            ) => {
                state.log(Some(actor), "detector_tile", tile_index.to_string());
                return self.resolve_detector(state, detector, actor, &[tile_index], guess, actor_tile_index);
            }
            (pending, _) => {
                // Validation rejects mismatched choices; keep the decision open.
                state.pending_forced_action = Some(pending);
            }
        }
        Ok(ActionResult::ForcedActionResolved { chooser: actor })
    }
}
