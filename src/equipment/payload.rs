//! Per-kind arguments supplied when playing a card.

use serde::{Deserialize, Serialize};

use super::card::EquipmentKind;
use crate::core::{GameValue, PlayerId};

/// Card arguments. The tag must name the same kind as the card played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EquipmentPayload {
    /// Two adjacent own tiles with different values.
    LabelNeq { index_a: usize, index_b: usize },
    WalkieTalkies { target: PlayerId, own_index: usize, target_index: usize },
    TripleDetector { target: PlayerId, tile_indices: [usize; 3], guess: GameValue },
    /// Reveal one own blue tile.
    PostIt { index: usize },
    /// Name a value against a teammate's whole hand.
    SuperDetector { target: PlayerId, guess: GameValue },
    Rewinder,
    EmergencyBatteries { players: Vec<PlayerId> },
    GeneralRadar { value: GameValue },
    Stabilizer,
    /// One tile, two guesses.
    XyRay { target: PlayerId, tile_index: usize, guesses: [GameValue; 2] },
    /// Hand the turn to a teammate.
    CoffeeMug { target: PlayerId },
    /// Two adjacent own tiles with the same value.
    LabelEq { index_a: usize, index_b: usize },
    SingleWireLabel { index: usize },
    EmergencyDrop,
    /// Cut two own copies of a value.
    FastPass { value: GameValue },
    Disintegrator,
    /// Pull a teammate's tile into the actor's hand.
    GrapplingHook { target: PlayerId, tile_index: usize },
    ParityScanner { target: PlayerId, tile_index: usize },
}

impl EquipmentPayload {
    #[must_use]
    pub fn kind(&self) -> EquipmentKind {
        match self {
            EquipmentPayload::LabelNeq { .. } => EquipmentKind::LabelNeq,
            EquipmentPayload::WalkieTalkies { .. } => EquipmentKind::WalkieTalkies,
            EquipmentPayload::TripleDetector { .. } => EquipmentKind::TripleDetector,
            EquipmentPayload::PostIt { .. } => EquipmentKind::PostIt,
            EquipmentPayload::SuperDetector { .. } => EquipmentKind::SuperDetector,
            EquipmentPayload::Rewinder => EquipmentKind::Rewinder,
            EquipmentPayload::EmergencyBatteries { .. } => EquipmentKind::EmergencyBatteries,
            EquipmentPayload::GeneralRadar { .. } => EquipmentKind::GeneralRadar,
            EquipmentPayload::Stabilizer => EquipmentKind::Stabilizer,
            EquipmentPayload::XyRay { .. } => EquipmentKind::XyRay,
            EquipmentPayload::CoffeeMug { .. } => EquipmentKind::CoffeeMug,
            EquipmentPayload::LabelEq { .. } => EquipmentKind::LabelEq,
            EquipmentPayload::SingleWireLabel { .. } => EquipmentKind::SingleWireLabel,
            EquipmentPayload::EmergencyDrop => EquipmentKind::EmergencyDrop,
            EquipmentPayload::FastPass { .. } => EquipmentKind::FastPass,
            EquipmentPayload::Disintegrator => EquipmentKind::Disintegrator,
            EquipmentPayload::GrapplingHook { .. } => EquipmentKind::GrapplingHook,
            EquipmentPayload::ParityScanner { .. } => EquipmentKind::ParityScanner,
        }
    }

    /// Teammate named by the payload.
    #[must_use]
    pub fn target(&self) -> Option<PlayerId> {
        match self {
            EquipmentPayload::WalkieTalkies { target, .. }
            | EquipmentPayload::TripleDetector { target, .. }
            | EquipmentPayload::SuperDetector { target, .. }
            | EquipmentPayload::XyRay { target, .. }
            | EquipmentPayload::CoffeeMug { target }
            | EquipmentPayload::GrapplingHook { target, .. }
            | EquipmentPayload::ParityScanner { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Payload for kinds that take no arguments.
    #[must_use]
    pub fn bare(kind: EquipmentKind) -> Option<Self> {
        match kind {
            EquipmentKind::Rewinder => Some(EquipmentPayload::Rewinder),
            EquipmentKind::Stabilizer => Some(EquipmentPayload::Stabilizer),
            EquipmentKind::EmergencyDrop => Some(EquipmentPayload::EmergencyDrop),
            EquipmentKind::Disintegrator => Some(EquipmentPayload::Disintegrator),
            _ => None,
        }
    }

    /// Payload for kinds whose only argument is a teammate.
    #[must_use]
    pub fn seat(kind: EquipmentKind, target: PlayerId) -> Option<Self> {
        match kind {
            EquipmentKind::CoffeeMug => Some(EquipmentPayload::CoffeeMug { target }),
            _ => None,
        }
    }

    /// Value the payload tries to cut.
    #[must_use]
    pub fn guess(&self) -> Option<GameValue> {
        match self {
            EquipmentPayload::TripleDetector { guess, .. }
            | EquipmentPayload::SuperDetector { guess, .. } => Some(*guess),
            EquipmentPayload::XyRay { guesses, .. } => Some(guesses[0]),
            EquipmentPayload::FastPass { value } => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_tag_matches_kind() {
        let payload = EquipmentPayload::XyRay {
            target: PlayerId::new(1),
            tile_index: 0,
            guesses: [GameValue::Number(3), GameValue::Yellow],
        };
        let json = serde_json::to_value(&payload).unwrap();
        let kind = serde_json::to_value(payload.kind()).unwrap();
        assert_eq!(json["kind"], kind);
        assert_eq!(payload.target(), Some(PlayerId::new(1)));
        assert_eq!(payload.guess(), Some(GameValue::Number(3)));
    }

    #[test]
    fn test_unit_payload_json() {
        let payload: EquipmentPayload = serde_json::from_str(r#"{"kind":"stabilizer"}"#).unwrap();
        assert_eq!(payload, EquipmentPayload::Stabilizer);
        assert_eq!(payload.target(), None);
    }
}
