//! Hook points and the context each one hands to handlers.

use serde::{Deserialize, Serialize};

use crate::core::{Action, GameState, GameValue, PlayerId};

/// Lifecycle point a rule can hook into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookPoint {
    /// One-time mission initialization.
    Setup,
    /// Read-only legality check before an action mutates anything.
    Validate,
    /// After an action's primary mutation.
    Resolve,
    /// After the turn index has advanced.
    EndTurn,
}

impl std::fmt::Display for HookPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HookPoint::Setup => "setup",
            HookPoint::Validate => "validate",
            HookPoint::Resolve => "resolve",
            HookPoint::EndTurn => "endTurn",
        })
    }
}

/// What just happened, as seen by `resolve` handlers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResolveEvent {
    /// A correct dual cut: the target tile is cut, the actor tile is not
    /// yet.
    DualCut {
        actor: PlayerId,
        target: PlayerId,
        tile_index: usize,
        value: GameValue,
    },

    /// The first tile of a solo cut is cut, the rest are not yet.
    SoloCut { actor: PlayerId, value: GameValue },

    /// An equipment card cut tiles of `value` outside a dual cut.
    EquipmentCut { actor: PlayerId, value: GameValue },

    /// A double detector was declared; nothing is cut yet.
    DetectorDeclared {
        actor: PlayerId,
        target: PlayerId,
        tile_indices: [usize; 2],
        guess: GameValue,
    },

    /// The actor's remaining red tiles are all cut.
    RevealReds { actor: PlayerId },
}

impl ResolveEvent {
    #[must_use]
    pub fn actor(&self) -> PlayerId {
        match self {
            ResolveEvent::DualCut { actor, .. }
            | ResolveEvent::SoloCut { actor, .. }
            | ResolveEvent::EquipmentCut { actor, .. }
            | ResolveEvent::DetectorDeclared { actor, .. }
            | ResolveEvent::RevealReds { actor } => *actor,
        }
    }

    /// Value of the tiles this event cut.
    #[must_use]
    pub fn cut_value(&self) -> Option<GameValue> {
        match self {
            ResolveEvent::DualCut { value, .. }
            | ResolveEvent::SoloCut { value, .. }
            | ResolveEvent::EquipmentCut { value, .. } => Some(*value),
            ResolveEvent::DetectorDeclared { .. } | ResolveEvent::RevealReds { .. } => None,
        }
    }
}

/// Read-only view handed to `validate` handlers.
#[derive(Clone, Copy, Debug)]
pub struct ValidateContext<'a> {
    pub state: &'a GameState,
    pub actor: PlayerId,
    pub action: &'a Action,
}

/// Turn hand-off seen by `endTurn` handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTurnInfo {
    /// Who just played.
    pub previous: PlayerId,
    /// Who plays next unless a handler overrides it.
    pub next: PlayerId,
}

/// Dispatch input for one hook point.
#[derive(Debug)]
pub enum HookContext<'a> {
    Setup(&'a mut GameState),
    Validate(ValidateContext<'a>),
    Resolve(&'a mut GameState, &'a ResolveEvent),
    EndTurn(&'a mut GameState, EndTurnInfo),
}

impl HookContext<'_> {
    #[must_use]
    pub fn point(&self) -> HookPoint {
        match self {
            HookContext::Setup(_) => HookPoint::Setup,
            HookContext::Validate(_) => HookPoint::Validate,
            HookContext::Resolve(..) => HookPoint::Resolve,
            HookContext::EndTurn(..) => HookPoint::EndTurn,
        }
    }
}
