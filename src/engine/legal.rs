//! Legal action enumeration for bot players.
//!
//! Candidates are generated from the hands and filtered through
//! [`Engine::validate_action`], so mission rules apply exactly as they do
//! to human players. Equipment is offered only for payloads that need no
//! free-form choice beyond a target seat.

use super::Engine;
use crate::core::{Action, ForcedChoice, GameState, GameValue, PendingForcedAction, PlayerId};
use crate::equipment::EquipmentPayload;

impl Engine {
    /// Every action `player` could submit right now.
    #[must_use]
    pub fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        let candidates = match &state.pending_forced_action {
            Some(pending) if pending.chooser() == player => forced_candidates(state, pending),
            Some(_) => return Vec::new(),
            None => standard_candidates(state, player),
        };
        candidates
            .into_iter()
            .filter(|action| self.validate_action(state, player, action).is_ok())
            .collect()
    }
}

fn forced_candidates(state: &GameState, pending: &PendingForcedAction) -> Vec<Action> {
    let seats = PlayerId::all(state.player_count());
    let choices: Vec<ForcedChoice> = match pending {
        PendingForcedAction::ChooseNextPlayer { .. } => {
            seats.map(|player| ForcedChoice::NextPlayer { player }).collect()
        }
        PendingForcedAction::DesignateCutter { .. } => {
            seats.map(|player| ForcedChoice::Cutter { player }).collect()
        }
        PendingForcedAction::DetectorTileChoice { tile_indices, .. } => tile_indices
            .iter()
            .map(|&tile_index| ForcedChoice::DetectorTile { tile_index })
            .collect(),
        PendingForcedAction::ConstraintRotate { options, .. } => {
            (0..*options).map(|index| ForcedChoice::Constraint { index }).collect()
        }
    };
    choices.into_iter().map(|choice| Action::ResolveForced { choice }).collect()
}

fn standard_candidates(state: &GameState, player: PlayerId) -> Vec<Action> {
    let Some(me) = state.player(player) else {
        return Vec::new();
    };
    let mut guesses: Vec<GameValue> = Vec::new();
    for tile in me.hand.iter().filter(|t| !t.cut && !t.is_red()) {
        if !guesses.contains(&tile.value) {
            guesses.push(tile.value);
        }
    }

    let mut actions = Vec::new();

    for other in state.players.iter().filter(|p| p.id != player) {
        let uncut: Vec<usize> = (0..other.hand.len()).filter(|&i| !other.hand[i].cut).collect();
        for &tile_index in &uncut {
            for &guess in &guesses {
                actions.push(Action::DualCut { target: other.id, tile_index, guess });
            }
        }
        if !me.ability_used {
            for pair in uncut.windows(2) {
                for &guess in &guesses {
                    actions.push(Action::DoubleDetector {
                        target: other.id,
                        tile_indices: [pair[0], pair[1]],
                        guess,
                        actor_tile_index: None,
                    });
                }
            }
        }
    }

    actions.extend(guesses.iter().map(|&value| Action::SoloCut { value }));
    actions.push(Action::RevealReds);

    for card in state.board.equipment.iter().filter(|c| c.usable()) {
        let payloads: Vec<EquipmentPayload> = match EquipmentPayload::bare(card.kind) {
            Some(payload) => vec![payload],
            None => state
                .players
                .iter()
                .filter(|p| p.id != player)
                .filter_map(|p| EquipmentPayload::seat(card.kind, p.id))
                .collect(),
        };
        actions.extend(
            payloads
                .into_iter()
                .map(|payload| Action::UseEquipment { equipment: card.id, payload }),
        );
    }

    actions
}
