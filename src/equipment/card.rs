//! Equipment cards and their lock state machine.
//!
//! ```text
//! locked -> unlocked -> (secondary cleared) -> used
//! ```
//!
//! `unlocked` and `secondary.cleared` are recomputed from the validation
//! track after every cut and never go back to false. `used` is terminal
//! except for the two reset cards (emergency drop, emergency batteries).

use serde::{Deserialize, Serialize};

/// Equipment card identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EquipmentId(pub u8);

impl std::fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// When a card may be played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timing {
    /// Any player, any time.
    Anytime,
    /// Active player, during their turn.
    InTurn,
    /// Active player, before anything else happened this turn.
    StartOfTurn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    LabelNeq,
    WalkieTalkies,
    TripleDetector,
    PostIt,
    SuperDetector,
    Rewinder,
    EmergencyBatteries,
    GeneralRadar,
    Stabilizer,
    XyRay,
    CoffeeMug,
    LabelEq,
    SingleWireLabel,
    EmergencyDrop,
    FastPass,
    Disintegrator,
    GrapplingHook,
    ParityScanner,
}

impl EquipmentKind {
    pub const ALL: [EquipmentKind; 18] = [
        EquipmentKind::LabelNeq,
        EquipmentKind::WalkieTalkies,
        EquipmentKind::TripleDetector,
        EquipmentKind::PostIt,
        EquipmentKind::SuperDetector,
        EquipmentKind::Rewinder,
        EquipmentKind::EmergencyBatteries,
        EquipmentKind::GeneralRadar,
        EquipmentKind::Stabilizer,
        EquipmentKind::XyRay,
        EquipmentKind::CoffeeMug,
        EquipmentKind::LabelEq,
        EquipmentKind::SingleWireLabel,
        EquipmentKind::EmergencyDrop,
        EquipmentKind::FastPass,
        EquipmentKind::Disintegrator,
        EquipmentKind::GrapplingHook,
        EquipmentKind::ParityScanner,
    ];

    #[must_use]
    pub fn timing(self) -> Timing {
        match self {
            EquipmentKind::Stabilizer => Timing::StartOfTurn,
            EquipmentKind::TripleDetector
            | EquipmentKind::SuperDetector
            | EquipmentKind::XyRay
            | EquipmentKind::CoffeeMug
            | EquipmentKind::FastPass
            | EquipmentKind::Disintegrator
            | EquipmentKind::GrapplingHook
            | EquipmentKind::ParityScanner => Timing::InTurn,
            EquipmentKind::LabelNeq
            | EquipmentKind::LabelEq
            | EquipmentKind::WalkieTalkies
            | EquipmentKind::PostIt
            | EquipmentKind::Rewinder
            | EquipmentKind::EmergencyBatteries
            | EquipmentKind::GeneralRadar
            | EquipmentKind::SingleWireLabel
            | EquipmentKind::EmergencyDrop => Timing::Anytime,
        }
    }

    /// Cards that resolve through the dual-cut primitive.
    #[must_use]
    pub fn is_detector(self) -> bool {
        matches!(
            self,
            EquipmentKind::TripleDetector | EquipmentKind::SuperDetector | EquipmentKind::XyRay
        )
    }
}

/// Extra lock some missions add on top of the unlock value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryLock {
    pub value: u8,
    pub threshold: u8,
    pub cleared: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCard {
    pub id: EquipmentId,
    pub kind: EquipmentKind,
    pub unlock_value: u8,
    pub unlocked: bool,
    pub used: bool,
    #[serde(default)]
    pub secondary: Option<SecondaryLock>,
}

impl EquipmentCard {
    #[must_use]
    pub fn new(id: EquipmentId, kind: EquipmentKind, unlock_value: u8) -> Self {
        Self {
            id,
            kind,
            unlock_value,
            unlocked: false,
            used: false,
            secondary: None,
        }
    }

    /// Add a secondary lock (builder pattern).
    #[must_use]
    pub fn with_secondary(mut self, value: u8, threshold: u8) -> Self {
        self.secondary = Some(SecondaryLock { value, threshold, cleared: false });
        self
    }

    #[must_use]
    pub fn secondary_cleared(&self) -> bool {
        self.secondary.as_ref().map_or(true, |s| s.cleared)
    }

    /// Unlocked, secondary cleared, not yet used.
    #[must_use]
    pub fn usable(&self) -> bool {
        self.unlocked && self.secondary_cleared() && !self.used
    }

    /// Re-derive lock state from the validation track.
    ///
    /// Returns true when this call flipped `unlocked`.
    pub fn refresh(&mut self, track: &[u8; 13], threshold: u8) -> bool {
        let count = |v: u8| track.get(usize::from(v)).copied().unwrap_or(0);

        if let Some(secondary) = &mut self.secondary {
            secondary.cleared = secondary.cleared || count(secondary.value) >= secondary.threshold;
        }

        if !self.unlocked && count(self.unlock_value) >= threshold {
            self.unlocked = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_at_threshold() {
        let mut card = EquipmentCard::new(EquipmentId(5), EquipmentKind::PostIt, 5);
        let mut track = [0u8; 13];

        track[5] = 1;
        assert!(!card.refresh(&track, 2));
        assert!(!card.unlocked);

        track[5] = 2;
        assert!(card.refresh(&track, 2));
        assert!(card.unlocked);

        // Idempotent.
        assert!(!card.refresh(&track, 2));
        assert!(card.unlocked);
    }

    #[test]
    fn test_unlock_never_reverts() {
        let mut card = EquipmentCard::new(EquipmentId(3), EquipmentKind::Rewinder, 3);
        let mut track = [0u8; 13];
        track[3] = 2;
        card.refresh(&track, 2);

        track[3] = 0;
        card.refresh(&track, 2);
        assert!(card.unlocked);
    }

    #[test]
    fn test_secondary_lock() {
        let mut card =
            EquipmentCard::new(EquipmentId(2), EquipmentKind::Stabilizer, 2).with_secondary(9, 1);
        let mut track = [0u8; 13];
        track[2] = 2;
        card.refresh(&track, 2);
        assert!(card.unlocked);
        assert!(!card.usable());

        track[9] = 1;
        card.refresh(&track, 2);
        assert!(card.usable());
    }

    #[test]
    fn test_all_kinds_distinct() {
        let mut kinds = EquipmentKind::ALL.to_vec();
        kinds.dedup();
        assert_eq!(kinds.len(), 18);
        assert_eq!(EquipmentKind::Stabilizer.timing(), Timing::StartOfTurn);
        assert!(EquipmentKind::XyRay.is_detector());
    }
}
