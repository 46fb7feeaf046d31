//! Mission hook system.
//!
//! Missions customize the shared turn engine through hook rules instead of
//! inline special cases. Each rule in a mission's `hook_rules` names a kind;
//! the registry maps the kind to a [`HookHandler`] with up to four optional
//! lifecycle methods, and the [`HookDispatcher`] runs them at one
//! [`HookPoint`] at a time.
//!
//! ## Example Usage
//!
//! ```
//! use bomb_squad::core::{BoardState, GameState, Player, PlayerId, WireTile};
//! use bomb_squad::hooks::{HookContext, HookDispatcher, HookHandler, HookRegistry, HookResult};
//! use bomb_squad::missions::{MissionDef, MissionHookRuleDef, MissionId};
//!
//! let mut registry = HookRegistry::new();
//! registry.register(
//!     "timer",
//!     HookHandler::new().on_setup(|rule, state| {
//!         if let MissionHookRuleDef::Timer { duration_seconds } = rule {
//!             state.campaign_mut().deadline_seconds = Some(*duration_seconds);
//!         }
//!         HookResult::none()
//!     }),
//! );
//! let dispatcher = HookDispatcher::new(registry, true);
//!
//! let mission = MissionDef::new(7, "Timed")
//!     .with_rule(MissionHookRuleDef::Timer { duration_seconds: 900 });
//! let players = vec![
//!     Player::new(PlayerId::new(0), vec![WireTile::blue(1)]),
//!     Player::new(PlayerId::new(1), vec![WireTile::blue(1)]),
//! ];
//! let mut state = GameState::new(MissionId(7), players, BoardState::new(4), 42);
//!
//! dispatcher.dispatch_hooks(&mission, HookContext::Setup(&mut state)).unwrap();
//! assert_eq!(state.campaign.unwrap().deadline_seconds, Some(900));
//! ```

mod dispatcher;
mod handler;
mod point;
mod result;

pub use dispatcher::{HookDispatcher, TelemetryEvent, TelemetrySink, TraceEvent, TraceSink};
pub use handler::{EndTurnFn, HookHandler, HookRegistry, ResolveFn, SetupFn, ValidateFn};
pub use point::{EndTurnInfo, HookContext, HookPoint, ResolveEvent, ValidateContext};
pub use result::HookResult;
