//! Hook handlers and the kind -> handler registry.
//!
//! A handler exposes up to four lifecycle closures. Leaving one out is the
//! normal way to say "this rule does nothing at that point"; there is no
//! need for empty stubs.

use rustc_hash::FxHashMap;

use super::point::{EndTurnInfo, HookPoint, ResolveEvent, ValidateContext};
use super::result::HookResult;
use crate::core::GameState;
use crate::missions::MissionHookRuleDef;

pub type SetupFn = dyn Fn(&MissionHookRuleDef, &mut GameState) -> HookResult + Send + Sync;
pub type ValidateFn = dyn Fn(&MissionHookRuleDef, &ValidateContext<'_>) -> HookResult + Send + Sync;
pub type ResolveFn =
    dyn Fn(&MissionHookRuleDef, &mut GameState, &ResolveEvent) -> HookResult + Send + Sync;
pub type EndTurnFn =
    dyn Fn(&MissionHookRuleDef, &mut GameState, &EndTurnInfo) -> HookResult + Send + Sync;

/// Lifecycle methods for one rule kind.
#[derive(Default)]
pub struct HookHandler {
    pub(crate) setup: Option<Box<SetupFn>>,
    pub(crate) validate: Option<Box<ValidateFn>>,
    pub(crate) resolve: Option<Box<ResolveFn>>,
    pub(crate) end_turn: Option<Box<EndTurnFn>>,
}

impl HookHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_setup(
        mut self,
        f: impl Fn(&MissionHookRuleDef, &mut GameState) -> HookResult + Send + Sync + 'static,
    ) -> Self {
        self.setup = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_validate(
        mut self,
        f: impl Fn(&MissionHookRuleDef, &ValidateContext<'_>) -> HookResult + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_resolve(
        mut self,
        f: impl Fn(&MissionHookRuleDef, &mut GameState, &ResolveEvent) -> HookResult
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.resolve = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_end_turn(
        mut self,
        f: impl Fn(&MissionHookRuleDef, &mut GameState, &EndTurnInfo) -> HookResult
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.end_turn = Some(Box::new(f));
        self
    }

    /// Does this handler have a method for `point`?
    #[must_use]
    pub fn implements(&self, point: HookPoint) -> bool {
        match point {
            HookPoint::Setup => self.setup.is_some(),
            HookPoint::Validate => self.validate.is_some(),
            HookPoint::Resolve => self.resolve.is_some(),
            HookPoint::EndTurn => self.end_turn.is_some(),
        }
    }
}

impl std::fmt::Debug for HookHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookHandler")
            .field("setup", &self.setup.is_some())
            .field("validate", &self.validate.is_some())
            .field("resolve", &self.resolve.is_some())
            .field("end_turn", &self.end_turn.is_some())
            .finish()
    }
}

/// Rule kind tag -> handler.
///
/// Populated once at startup; tests build their own.
#[derive(Debug, Default)]
pub struct HookRegistry {
    handlers: FxHashMap<String, HookHandler>,
}

impl HookRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning the one it replaced.
    pub fn register(&mut self, kind: impl Into<String>, handler: HookHandler) -> Option<HookHandler> {
        self.handlers.insert(kind.into(), handler)
    }

    pub fn unregister(&mut self, kind: &str) -> Option<HookHandler> {
        self.handlers.remove(kind)
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&HookHandler> {
        self.handlers.get(kind)
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_implements() {
        let handler = HookHandler::new()
            .on_setup(|_, _| HookResult::none())
            .on_end_turn(|_, _, _| HookResult::none());

        assert!(handler.implements(HookPoint::Setup));
        assert!(!handler.implements(HookPoint::Validate));
        assert!(!handler.implements(HookPoint::Resolve));
        assert!(handler.implements(HookPoint::EndTurn));
    }

    #[test]
    fn test_registry_register_replace() {
        let mut registry = HookRegistry::new();
        assert!(registry.register("timer", HookHandler::new()).is_none());
        assert!(registry.register("timer", HookHandler::new()).is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("timer"));

        registry.register("oxygen", HookHandler::new());
        assert_eq!(registry.kinds(), vec!["oxygen", "timer"]);

        assert!(registry.unregister("timer").is_some());
        assert!(!registry.contains("timer"));
    }
}
