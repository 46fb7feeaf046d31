//! Turn and action resolution engine.
//!
//! The engine owns the hook dispatcher and the mission catalog; game state
//! lives outside it and is passed in by `&mut` for every call, so one
//! engine serves any number of rooms.
//!
//! ## Flow
//!
//! ```text
//! apply(state, actor, action)
//!   -> validate_action    (built-in checks, then validate hooks)
//!   -> execute            (primary mutation, resolve hooks, secondary
//!                          mutation, unlock refresh, loss/win checks)
//!   -> advance_turn       (endTurn hooks, forced actions)
//! ```
//!
//! A rejected action leaves the state untouched. Terminal outcomes are not
//! errors: they set `state.result` and are reported through the telemetry
//! sink as [`TelemetryEvent::MissionEnded`].

pub(crate) mod cut;
mod forced;
mod legal;
mod setup;
mod turn;
pub(crate) mod validate;

use tracing::debug;

use crate::core::{Action, ActionResult, EngineConfig, EngineError, GameState, PlayerId, UnknownHookError};
use crate::hooks::{HookContext, HookDispatcher, HookRegistry, HookResult, TelemetryEvent};
use crate::missions::{builtin_registry, MissionCatalog, MissionDef, MissionId};

pub use setup::GameBuilder;

/// Rules engine for every mission in its catalog.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    dispatcher: HookDispatcher,
    catalog: MissionCatalog,
}

impl Engine {
    /// Engine with the built-in handlers.
    #[must_use]
    pub fn new(config: EngineConfig, catalog: MissionCatalog) -> Self {
        Self::with_registry(config, catalog, builtin_registry())
    }

    /// Engine with a caller-supplied registry.
    #[must_use]
    pub fn with_registry(config: EngineConfig, catalog: MissionCatalog, registry: HookRegistry) -> Self {
        let dispatcher = HookDispatcher::new(registry, config.strict_hooks);
        Self {
            config,
            dispatcher,
            catalog,
        }
    }

    /// Default config, standard catalog, built-in handlers.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(EngineConfig::default(), MissionCatalog::standard())
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &MissionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn dispatcher(&self) -> &HookDispatcher {
        &self.dispatcher
    }

    /// Mutable access for installing sinks or swapping handlers.
    pub fn dispatcher_mut(&mut self) -> &mut HookDispatcher {
        &mut self.dispatcher
    }

    #[must_use]
    pub fn mission(&self, id: MissionId) -> Option<&MissionDef> {
        self.catalog.get(id)
    }

    /// Dispatch hooks for the mission a state belongs to.
    ///
    /// A mission missing from the catalog has no rules.
    pub(crate) fn dispatch(&self, mission: MissionId, ctx: HookContext<'_>) -> Result<HookResult, UnknownHookError> {
        match self.catalog.get(mission) {
            Some(def) => self.dispatcher.dispatch_hooks(def, ctx),
            None => Ok(HookResult::none()),
        }
    }

    /// Validate and execute one action.
    pub fn apply(&self, state: &mut GameState, actor: PlayerId, action: &Action) -> Result<ActionResult, EngineError> {
        debug!(mission = %state.mission, turn = state.turn_number, %actor, action = action.name(), "applying action");
        self.validate_action(state, actor, action)?;
        self.execute(state, actor, action)
    }

    /// Execute an already validated action.
    fn execute(&self, state: &mut GameState, actor: PlayerId, action: &Action) -> Result<ActionResult, EngineError> {
        match action {
            Action::DualCut { target, tile_index, guess } => {
                self.dual_cut(state, actor, *target, *tile_index, *guess, None)
            }
            Action::DoubleDetector { target, tile_indices, guess, actor_tile_index } => {
                self.double_detector(state, actor, *target, *tile_indices, *guess, *actor_tile_index)
            }
            Action::SoloCut { value } => self.solo_cut(state, actor, *value),
            Action::RevealReds => self.reveal_reds(state, actor),
            Action::UseEquipment { equipment, payload } => {
                self.execute_use_equipment(state, actor, *equipment, payload)
            }
            Action::ResolveForced { choice } => self.answer_forced(state, actor, *choice),
        }
    }

    fn report_end(&self, state: &GameState, actor: Option<PlayerId>, target: Option<PlayerId>) {
        let Some(result) = state.result else {
            return;
        };
        self.dispatcher.report(|| TelemetryEvent::MissionEnded {
            mission: state.mission,
            result,
            turn: state.turn_number,
            detonator: state.board.detonator,
            actor,
            target,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_sync() {
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_unknown_mission_dispatches_nothing() {
        use crate::core::{BoardState, Player, WireTile};

        let engine = Engine::new(EngineConfig::strict(), MissionCatalog::new());
        let players = vec![
            Player::new(PlayerId::new(0), vec![WireTile::blue(1)]),
            Player::new(PlayerId::new(1), vec![WireTile::blue(1)]),
        ];
        let mut state = GameState::new(MissionId(99), players, BoardState::new(4), 0);
        let result = engine.dispatch(MissionId(99), HookContext::Setup(&mut state)).unwrap();
        assert!(result.is_empty());
    }
}
