//! Hook results and the merge rule.

use serde::Serialize;

use crate::core::error::{ErrorCode, ValidationError};
use crate::core::{PendingForcedAction, PlayerId};

/// Partial result returned by one handler, or the merged result of a
/// whole dispatch.
///
/// ## Merge rule
///
/// `validation_error` and `validation_code` keep the first value set (the
/// earliest blocking rule decides). Every other field takes the last value
/// set. Unset fields never overwrite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HookResult {
    pub validation_error: Option<String>,
    pub validation_code: Option<ErrorCode>,

    /// Cuts needed to unlock equipment, replacing the engine default.
    pub equipment_unlock_threshold: Option<u8>,

    /// Seat that plays next, replacing the clockwise choice.
    pub next_player: Option<PlayerId>,

    /// Decision to open before play continues.
    pub forced_action: Option<PendingForcedAction>,
}

impl HookResult {
    /// Empty result; the handler has nothing to say.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Reject the action under validation.
    pub fn reject(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            validation_error: Some(message.into()),
            validation_code: Some(code),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_next_player(mut self, player: PlayerId) -> Self {
        self.next_player = Some(player);
        self
    }

    #[must_use]
    pub fn with_unlock_threshold(mut self, threshold: u8) -> Self {
        self.equipment_unlock_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_forced_action(mut self, pending: PendingForcedAction) -> Self {
        self.forced_action = Some(pending);
        self
    }

    /// Fold a later partial result into this one.
    pub fn merge(&mut self, later: HookResult) {
        if self.validation_error.is_none() {
            self.validation_error = later.validation_error;
        }
        if self.validation_code.is_none() {
            self.validation_code = later.validation_code;
        }
        if later.equipment_unlock_threshold.is_some() {
            self.equipment_unlock_threshold = later.equipment_unlock_threshold;
        }
        if later.next_player.is_some() {
            self.next_player = later.next_player;
        }
        if later.forced_action.is_some() {
            self.forced_action = later.forced_action;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Turn a validate-point result into the `{code, message}` shape.
    pub fn into_validation(self) -> Result<(), ValidationError> {
        match (self.validation_code, self.validation_error) {
            (None, None) => Ok(()),
            (code, message) => Err(ValidationError::new(
                code.unwrap_or(ErrorCode::MissionRuleViolation),
                message.unwrap_or_else(|| "blocked by mission rule".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_validation_error_wins() {
        let mut acc = HookResult::none();
        acc.merge(HookResult::reject(ErrorCode::MissionRuleViolation, "first"));
        acc.merge(HookResult::reject(ErrorCode::TileAlreadyCut, "second"));

        assert_eq!(acc.validation_error.as_deref(), Some("first"));
        assert_eq!(acc.validation_code, Some(ErrorCode::MissionRuleViolation));
    }

    #[test]
    fn test_last_writer_wins_elsewhere() {
        let mut acc = HookResult::none();
        acc.merge(HookResult::none().with_next_player(PlayerId::new(1)).with_unlock_threshold(3));
        acc.merge(HookResult::none().with_next_player(PlayerId::new(2)));
        acc.merge(HookResult::none());

        assert_eq!(acc.next_player, Some(PlayerId::new(2)));
        assert_eq!(acc.equipment_unlock_threshold, Some(3));
    }

    #[test]
    fn test_into_validation() {
        assert!(HookResult::none().into_validation().is_ok());

        let err = HookResult::reject(ErrorCode::MissionRuleViolation, "not yet")
            .into_validation()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissionRuleViolation);
        assert_eq!(err.message, "not yet");
    }
}
