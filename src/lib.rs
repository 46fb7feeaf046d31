//! # bomb-squad
//!
//! Engine for a cooperative wire-cutting game for 2-5 players.
//!
//! Players hold sorted hands of numbered wire tiles and cut them in pairs by
//! naming the value of a teammate's hidden tile. Wrong guesses advance a
//! shared detonator; cutting a red wire loses immediately. Missions change
//! the rules through declarative hook rules instead of special cases in the
//! turn engine.
//!
//! ## Design Principles
//!
//! 1. **Rules as data**: a mission is a setup recipe plus an ordered list of
//!    hook rules. Every rule kind has one handler, dispatched at four
//!    lifecycle points.
//!
//! 2. **Single writer**: the engine owns no game state. Each call borrows a
//!    `GameState` mutably, validates, and mutates it in place.
//!
//! 3. **No hidden globals**: handler registry, trace sink and telemetry sink
//!    belong to one `HookDispatcher` owned by one `Engine`.
//!
//! ## Modules
//!
//! - `core`: tiles, players, board, state, actions, RNG, configuration, errors
//! - `hooks`: hook points, handlers, registry, dispatcher, trace/telemetry
//! - `missions`: mission schema, built-in catalog, built-in rule handlers
//! - `engine`: game setup, validation, cut resolution, turn hand-off
//! - `equipment`: equipment cards, payloads, validation and effects
//!
//! ## Example
//!
//! ```
//! use bomb_squad::{Action, Engine, EngineConfig, GameBuilder, GameValue, MissionCatalog, MissionDef, MissionId, PlayerId, WireTile};
//!
//! let catalog = MissionCatalog::new().with_mission(MissionDef::new(1, "Practice"));
//! let engine = Engine::new(EngineConfig::strict(), catalog);
//!
//! let mut state = GameBuilder::new(MissionId(1))
//!     .player(vec![WireTile::blue(3), WireTile::blue(8)])
//!     .player(vec![WireTile::blue(3), WireTile::blue(8)])
//!     .build(&engine, 42)
//!     .unwrap();
//!
//! let cut = Action::DualCut { target: PlayerId::new(1), tile_index: 0, guess: GameValue::Number(3) };
//! engine.apply(&mut state, PlayerId::new(0), &cut).unwrap();
//!
//! assert_eq!(state.count_cut(GameValue::Number(3)), 2);
//! assert_eq!(state.current_player, PlayerId::new(1));
//! ```

pub mod core;
pub mod engine;
pub mod equipment;
pub mod hooks;
pub mod missions;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionResult, BoardState, CampaignState, DetectorOutcome, EngineConfig, EngineError,
    ErrorCode, ForcedChoice, GamePhase, GameResult, GameRng, GameState, GameValue, InfoToken,
    LogEntry, PendingForcedAction, Player, PlayerId, TileId, UnknownHookError, ValidationError,
    WireColor, WireTile,
};

pub use crate::engine::{Engine, GameBuilder};

pub use crate::equipment::{EquipmentCard, EquipmentId, EquipmentKind, EquipmentPayload};

pub use crate::hooks::{
    HookContext, HookDispatcher, HookHandler, HookPoint, HookRegistry, HookResult, ResolveEvent,
    TelemetryEvent, TraceEvent,
};

pub use crate::missions::{MissionCatalog, MissionDef, MissionHookRuleDef, MissionId};
