//! Player actions, out-of-band forced decisions, and action results.
//!
//! All three are tagged unions; the serde tag string is the wire
//! discriminator the transport layer sees.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::state::GameResult;
use super::tile::GameValue;
use crate::equipment::{EquipmentId, EquipmentKind, EquipmentPayload};

/// A standard action, or the answer to a pending forced decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Name the value of one hidden tile in a teammate's hand.
    DualCut {
        target: PlayerId,
        tile_index: usize,
        guess: GameValue,
    },

    /// Character ability: name one value against two tiles of a teammate.
    DoubleDetector {
        target: PlayerId,
        tile_indices: [usize; 2],
        guess: GameValue,
        #[serde(default)]
        actor_tile_index: Option<usize>,
    },

    /// Cut every own copy of `value` when holding all remaining copies.
    SoloCut { value: GameValue },

    /// Reveal an all-red remaining hand.
    RevealReds,

    UseEquipment {
        equipment: EquipmentId,
        payload: EquipmentPayload,
    },

    ResolveForced { choice: ForcedChoice },
}

impl Action {
    /// The value this action tries to cut, if any.
    #[must_use]
    pub fn cut_value(&self) -> Option<GameValue> {
        match self {
            Action::DualCut { guess, .. } | Action::DoubleDetector { guess, .. } => Some(*guess),
            Action::SoloCut { value } => Some(*value),
            Action::UseEquipment { payload, .. } => payload.guess(),
            Action::RevealReds | Action::ResolveForced { .. } => None,
        }
    }

    /// Teammate targeted by this action, if any.
    #[must_use]
    pub fn target(&self) -> Option<PlayerId> {
        match self {
            Action::DualCut { target, .. } | Action::DoubleDetector { target, .. } => Some(*target),
            Action::UseEquipment { payload, .. } => payload.target(),
            _ => None,
        }
    }

    /// Short name used in log entries.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::DualCut { .. } => "dual_cut",
            Action::DoubleDetector { .. } => "double_detector",
            Action::SoloCut { .. } => "solo_cut",
            Action::RevealReds => "reveal_reds",
            Action::UseEquipment { .. } => "use_equipment",
            Action::ResolveForced { .. } => "resolve_forced",
        }
    }
}

/// Out-of-band decision that blocks normal play until answered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PendingForcedAction {
    /// The captain picks who plays next.
    ChooseNextPlayer { chooser: PlayerId },

    /// The player who just acted hands the turn to someone else.
    DesignateCutter { designator: PlayerId },

    /// The detector's target picks which of two tiles gets checked.
    DetectorTileChoice {
        chooser: PlayerId,
        actor: PlayerId,
        tile_indices: [usize; 2],
        guess: GameValue,
        actor_tile_index: Option<usize>,
    },

    /// The captain rotates the active constraint card.
    ConstraintRotate { chooser: PlayerId, options: usize },
}

impl PendingForcedAction {
    /// The only player allowed to answer.
    #[must_use]
    pub fn chooser(&self) -> PlayerId {
        match self {
            PendingForcedAction::ChooseNextPlayer { chooser }
            | PendingForcedAction::DetectorTileChoice { chooser, .. }
            | PendingForcedAction::ConstraintRotate { chooser, .. } => *chooser,
            PendingForcedAction::DesignateCutter { designator } => *designator,
        }
    }
}

/// Answer to a [`PendingForcedAction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ForcedChoice {
    NextPlayer { player: PlayerId },
    Cutter { player: PlayerId },
    DetectorTile { tile_index: usize },
    Constraint { index: usize },
}

/// Outcome of a double detector resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorOutcome {
    BothMatch,
    OneMatch,
    NoMatch,
}

/// What an executed action did, for the broadcast layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionResult {
    DualCutResult {
        success: bool,
        #[serde(default)]
        explosion: bool,
        #[serde(default)]
        detonator_advanced: bool,
    },

    DoubleDetectorResult {
        outcome: DetectorOutcome,
        #[serde(default)]
        explosion: bool,
        #[serde(default)]
        detonator_advanced: bool,
    },

    SoloCutResult { value: GameValue, cut: usize },

    RevealRedsResult { cut: usize },

    EquipmentResult {
        equipment: EquipmentId,
        kind: EquipmentKind,
        /// Holders reported by a radar sweep.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        holders: Vec<PlayerId>,
        /// Result of a delegated cut, for detector-style cards.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delegated: Option<Box<ActionResult>>,
    },

    /// A forced decision was opened instead of resolving immediately.
    ForcedActionPending { pending: PendingForcedAction },

    ForcedActionResolved { chooser: PlayerId },

    /// A mission rule ended the game part-way through resolution.
    GameOver { result: GameResult },
}
