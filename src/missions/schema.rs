//! Mission rule schema.
//!
//! A mission is a setup recipe plus an ordered list of hook rules. The
//! order of `hook_rules` is the dispatch order and is never rearranged.

use serde::{Deserialize, Serialize};

use crate::equipment::{EquipmentId, EquipmentKind};

/// Mission number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissionId(pub u16);

impl std::fmt::Display for MissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One mission definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionDef {
    pub id: MissionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub setup: SetupSpec,
    #[serde(default)]
    pub hook_rules: Vec<MissionHookRuleDef>,
}

impl MissionDef {
    #[must_use]
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id: MissionId(id),
            name: name.into(),
            setup: SetupSpec::default(),
            hook_rules: Vec::new(),
        }
    }

    /// Append a hook rule (builder pattern).
    #[must_use]
    pub fn with_rule(mut self, rule: MissionHookRuleDef) -> Self {
        self.hook_rules.push(rule);
        self
    }

    /// Replace the setup recipe (builder pattern).
    #[must_use]
    pub fn with_setup(mut self, setup: SetupSpec) -> Self {
        self.setup = setup;
        self
    }
}

/// How hands and the board are built for a mission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupSpec {
    pub min_players: u8,
    pub max_players: u8,
    /// Blue values in play are `1..=highest_value`.
    pub highest_value: u8,
    pub copies_per_value: u8,
    pub red_wires: u8,
    pub yellow_wires: u8,
    /// Falls back to the engine default when unset.
    pub detonator_max: Option<u8>,
    pub equipment: Vec<EquipmentSpec>,
}

impl Default for SetupSpec {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 5,
            highest_value: 12,
            copies_per_value: 4,
            red_wires: 1,
            yellow_wires: 0,
            detonator_max: None,
            equipment: Vec::new(),
        }
    }
}

impl SetupSpec {
    #[must_use]
    pub fn with_wires(mut self, red: u8, yellow: u8) -> Self {
        self.red_wires = red;
        self.yellow_wires = yellow;
        self
    }

    #[must_use]
    pub fn with_equipment(mut self, kind: EquipmentKind, unlock_value: u8) -> Self {
        self.equipment.push(EquipmentSpec { kind, unlock_value });
        self
    }

    #[must_use]
    pub fn with_detonator_max(mut self, max: u8) -> Self {
        self.detonator_max = Some(max);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentSpec {
    pub kind: EquipmentKind,
    pub unlock_value: u8,
}

/// Turn hand-off style for [`MissionHookRuleDef::DynamicTurnOrder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrderMode {
    /// The captain picks the next player after every turn.
    CaptainChooses,
    /// Whoever just played designates the next cutter.
    ActiveDesignates,
}

fn default_threshold() -> u8 {
    2
}

/// Declarative mission rule. The `kind` tag selects the handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissionHookRuleDef {
    /// Advisory countdown.
    Timer { duration_seconds: u32 },

    DynamicTurnOrder { mode: TurnOrderMode },

    /// One blue value, drawn secretly at setup, explodes like red.
    BlueValueTreatedAsRed {
        #[serde(default)]
        candidates: Vec<u8>,
    },

    /// Equipment also needs `threshold` cuts of `secondary_value`.
    EquipmentDoubleLock {
        secondary_value: u8,
        #[serde(default = "default_threshold")]
        threshold: u8,
        /// Empty means every card.
        #[serde(default)]
        equipment: Vec<EquipmentId>,
    },

    /// Each value may only be cut once its predecessor is complete.
    SequencePriority { sequence: Vec<u8> },

    EquipmentUnlockThreshold { threshold: u8 },

    /// Turns consume oxygen; an empty tank costs a detonator step.
    Oxygen { initial: u32, per_turn: u32 },

    ReverseTurnOrder,

    CaptainEquipmentBan,

    /// Marked tiles cannot be targeted by detectors or dual cuts.
    XMarkedWires { per_player: u8 },

    /// Successfully cutting `value` still advances the detonator.
    CutValueAdvancesDetonator { value: u8 },

    /// The first cut of `trigger_value` discards an unused equipment card.
    EquipmentDiscard { trigger_value: u8 },

    TargetChoosesDetectorTile,

    /// The active constraint forbids naming one value; the captain rotates
    /// it at the end of every round.
    RotatingConstraint { forbidden_values: Vec<u8> },
}

impl MissionHookRuleDef {
    /// Registry key of this rule.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            MissionHookRuleDef::Timer { .. } => "timer",
            MissionHookRuleDef::DynamicTurnOrder { .. } => "dynamic_turn_order",
            MissionHookRuleDef::BlueValueTreatedAsRed { .. } => "blue_value_treated_as_red",
            MissionHookRuleDef::EquipmentDoubleLock { .. } => "equipment_double_lock",
            MissionHookRuleDef::SequencePriority { .. } => "sequence_priority",
            MissionHookRuleDef::EquipmentUnlockThreshold { .. } => "equipment_unlock_threshold",
            MissionHookRuleDef::Oxygen { .. } => "oxygen",
            MissionHookRuleDef::ReverseTurnOrder => "reverse_turn_order",
            MissionHookRuleDef::CaptainEquipmentBan => "captain_equipment_ban",
            MissionHookRuleDef::XMarkedWires { .. } => "x_marked_wires",
            MissionHookRuleDef::CutValueAdvancesDetonator { .. } => "cut_value_advances_detonator",
            MissionHookRuleDef::EquipmentDiscard { .. } => "equipment_discard",
            MissionHookRuleDef::TargetChoosesDetectorTile => "target_chooses_detector_tile",
            MissionHookRuleDef::RotatingConstraint { .. } => "rotating_constraint",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_matches_serde_tag() {
        let rules = vec![
            MissionHookRuleDef::Timer { duration_seconds: 600 },
            MissionHookRuleDef::ReverseTurnOrder,
            MissionHookRuleDef::SequencePriority { sequence: vec![1, 2, 3] },
            MissionHookRuleDef::DynamicTurnOrder { mode: TurnOrderMode::CaptainChooses },
        ];
        for rule in rules {
            let json = serde_json::to_value(&rule).unwrap();
            assert_eq!(json["kind"], rule.kind());
        }
    }

    #[test]
    fn test_mission_from_json_defaults() {
        let json = r#"{
            "id": 23,
            "hook_rules": [
                {"kind": "equipment_double_lock", "secondary_value": 9},
                {"kind": "blue_value_treated_as_red"}
            ]
        }"#;
        let mission: MissionDef = serde_json::from_str(json).unwrap();

        assert_eq!(mission.id, MissionId(23));
        assert_eq!(mission.setup, SetupSpec::default());
        assert_eq!(
            mission.hook_rules[0],
            MissionHookRuleDef::EquipmentDoubleLock {
                secondary_value: 9,
                threshold: 2,
                equipment: Vec::new(),
            }
        );
        assert_eq!(mission.hook_rules[1].kind(), "blue_value_treated_as_red");
    }
}
