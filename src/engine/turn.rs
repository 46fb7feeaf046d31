//! Turn hand-off and terminal checks.

use tracing::{debug, info};

use super::Engine;
use crate::core::{EngineError, GameResult, GameState, PlayerId};
use crate::hooks::{EndTurnInfo, HookContext};

impl Engine {
    /// Freeze the game with `result`, log it, and report it.
    pub(crate) fn conclude(
        &self,
        state: &mut GameState,
        result: GameResult,
        actor: Option<PlayerId>,
        target: Option<PlayerId>,
    ) {
        state.finish(result);
        self.announce(state, actor, target);
    }

    /// Log and report a game that is already finished (by the engine or
    /// by a hook).
    pub(crate) fn announce(&self, state: &mut GameState, actor: Option<PlayerId>, target: Option<PlayerId>) {
        let Some(result) = state.result else {
            return;
        };
        state.log(actor, "game_over", result.as_str());
        info!(
            mission = %state.mission,
            result = result.as_str(),
            turn = state.turn_number,
            detonator = state.board.detonator,
            "mission ended"
        );
        self.report_end(state, actor, target);
    }

    /// Loss when the detonator reached its end. Returns true if the game
    /// ended here.
    pub(crate) fn check_detonator(
        &self,
        state: &mut GameState,
        actor: Option<PlayerId>,
        target: Option<PlayerId>,
    ) -> bool {
        if state.is_finished() || !state.board.detonator_exhausted() {
            return false;
        }
        self.conclude(state, GameResult::LossDetonator, actor, target);
        true
    }

    /// Win when every tile is cut. Returns true if the game ended here.
    pub(crate) fn check_win(&self, state: &mut GameState, actor: Option<PlayerId>) -> bool {
        if state.is_finished() || !state.all_cut() {
            return false;
        }
        self.conclude(state, GameResult::Win, actor, None);
        true
    }

    /// Hand the turn on.
    ///
    /// `requested` (coffee mug) wins over the clockwise scan when that
    /// player still holds an uncut tile. With nobody left holding one the
    /// mission is won.
    pub fn advance_turn(
        &self,
        state: &mut GameState,
        previous: PlayerId,
        requested: Option<PlayerId>,
    ) -> Result<(), EngineError> {
        if state.is_finished() {
            return Ok(());
        }
        state.turn_effects = None;

        let view: &GameState = state;
        let count = view.player_count();
        let next = requested.filter(|&p| holds_uncut(view, p)).or_else(|| {
            let mut seat = previous;
            (0..count).find_map(|_| {
                seat = seat.clockwise(count);
                holds_uncut(view, seat).then_some(seat)
            })
        });

        let Some(next) = next else {
            self.conclude(state, GameResult::Win, Some(previous), None);
            return Ok(());
        };

        state.current_player = next;
        state.turn_number += 1;
        debug!(mission = %state.mission, turn = state.turn_number, %previous, %next, "turn advanced");

        let info = EndTurnInfo { previous, next };
        let result = self.dispatch(state.mission, HookContext::EndTurn(&mut *state, info))?;

        if let Some(player) = result.next_player {
            if holds_uncut(state, player) {
                state.current_player = player;
            }
        }
        if let Some(pending) = result.forced_action {
            debug!(chooser = %pending.chooser(), "forced action opened");
            state.pending_forced_action = Some(pending);
        }

        self.check_detonator(state, Some(previous), None);
        Ok(())
    }
}

fn holds_uncut(state: &GameState, player: PlayerId) -> bool {
    state.player(player).is_some_and(|p| p.has_uncut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, TurnEffects, WireTile};
    use crate::engine::GameBuilder;
    use crate::missions::{MissionCatalog, MissionDef, MissionId};

    fn engine() -> Engine {
        Engine::new(EngineConfig::strict(), MissionCatalog::new().with_mission(MissionDef::new(1, "plain")))
    }

    fn game(engine: &Engine, hands: Vec<Vec<WireTile>>) -> GameState {
        GameBuilder::new(MissionId(1)).hands(hands).build(engine, 3).unwrap()
    }

    #[test]
    fn test_advance_skips_empty_hands() {
        let engine = engine();
        let mut state = game(
            &engine,
            vec![vec![WireTile::blue(1)], vec![WireTile::blue(2)], vec![WireTile::blue(3)]],
        );
        state.players[1].hand[0].cut = true;

        engine.advance_turn(&mut state, PlayerId::new(0), None).unwrap();
        assert_eq!(state.current_player, PlayerId::new(2));
        assert_eq!(state.turn_number, 2);
    }

    #[test]
    fn test_advance_clears_turn_effects() {
        let engine = engine();
        let mut state = game(&engine, vec![vec![WireTile::blue(1)], vec![WireTile::blue(2)]]);
        state.turn_effects = Some(TurnEffects { stabilizer: true });

        engine.advance_turn(&mut state, PlayerId::new(0), None).unwrap();
        assert!(state.turn_effects.is_none());
    }

    #[test]
    fn test_requested_player_wins_over_scan() {
        let engine = engine();
        let mut state = game(
            &engine,
            vec![vec![WireTile::blue(1)], vec![WireTile::blue(2)], vec![WireTile::blue(3)]],
        );
        engine.advance_turn(&mut state, PlayerId::new(0), Some(PlayerId::new(2))).unwrap();
        assert_eq!(state.current_player, PlayerId::new(2));
    }

    #[test]
    fn test_nobody_left_is_a_win() {
        let engine = engine();
        let mut state = game(&engine, vec![vec![WireTile::blue(1)], vec![WireTile::blue(1)]]);
        for player in &mut state.players {
            player.hand[0].cut = true;
        }
        engine.advance_turn(&mut state, PlayerId::new(0), None).unwrap();
        assert_eq!(state.result, Some(GameResult::Win));
        assert_eq!(state.log_details("game_over").collect::<Vec<_>>(), vec!["win"]);
    }
}
