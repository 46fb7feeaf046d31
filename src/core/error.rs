//! Error types.
//!
//! Two families:
//! - [`ValidationError`]: the `{code, message}` legality rejection. The
//!   action did not run and the state is untouched.
//! - [`UnknownHookError`]: a mission references a rule kind with no
//!   registered handler while the dispatcher is strict. This is a
//!   deployment fault, not a player mistake.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hooks::HookPoint;
use crate::missions::MissionId;

/// Machine-readable rejection code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissionRuleViolation,
    EquipmentNotFound,
    EquipmentLocked,
    EquipmentSecondaryLocked,
    EquipmentAlreadyUsed,
    EquipmentPayloadMismatch,
    TargetPlayerNotFound,
    CannotTargetSelf,
    TileIndexOutOfRange,
    TileAlreadyCut,
    ForcedActionPending,
    NoForcedActionPending,
    NotForcedActionChooser,
    InvalidForcedChoice,
    GuessValueNotInHand,
    NotYourTurn,
    GameNotActive,
    AbilityAlreadyUsed,
    SoloCutNotAllowed,
    RevealRedsNotAllowed,
    InvalidEquipmentTarget,
    WrongTiming,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Reuse the wire spelling.
        let s = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(s.trim_matches('"'))
    }
}

/// Legality rejection.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A mission rule kind has no registered handler (strict dispatch only).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no hook handler for rule kind {kind:?} (mission {mission}, point {point}, rule #{index})")]
pub struct UnknownHookError {
    pub kind: String,
    pub mission: MissionId,
    pub point: HookPoint,
    pub index: usize,
}

/// Anything an engine entry point can fail with.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    UnknownHook(#[from] UnknownHookError),

    #[error("mission {0} is not in the catalog")]
    UnknownMission(MissionId),
}

impl EngineError {
    /// The validation code, if this is a legality rejection.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            EngineError::Validation(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Shorthand for a validation failure.
pub(crate) fn reject<T>(code: ErrorCode, message: impl Into<String>) -> Result<T, ValidationError> {
    Err(ValidationError::new(code, message))
}
