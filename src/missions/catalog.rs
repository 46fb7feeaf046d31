//! Mission catalog.
//!
//! The standard catalog covers every built-in rule kind at least once.
//! Deployments may replace it with JSON loaded at startup.

use rustc_hash::FxHashMap;

use super::schema::{MissionDef, MissionHookRuleDef as Rule, MissionId, SetupSpec, TurnOrderMode};
use crate::equipment::EquipmentKind;

/// Mission id -> definition.
#[derive(Clone, Debug, Default)]
pub struct MissionCatalog {
    missions: FxHashMap<MissionId, MissionDef>,
}

impl MissionCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mission, returning the one it replaced.
    pub fn insert(&mut self, mission: MissionDef) -> Option<MissionDef> {
        self.missions.insert(mission.id, mission)
    }

    /// Add a mission (builder pattern).
    #[must_use]
    pub fn with_mission(mut self, mission: MissionDef) -> Self {
        self.insert(mission);
        self
    }

    #[must_use]
    pub fn get(&self, id: MissionId) -> Option<&MissionDef> {
        self.missions.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: MissionId) -> bool {
        self.missions.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.missions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// Missions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &MissionDef> {
        let mut missions: Vec<_> = self.missions.values().collect();
        missions.sort_by_key(|m| m.id);
        missions.into_iter()
    }

    /// Load a JSON array of mission definitions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let missions: Vec<MissionDef> = serde_json::from_str(json)?;
        Ok(missions.into_iter().fold(Self::new(), Self::with_mission))
    }

    /// Built-in missions.
    #[must_use]
    pub fn standard() -> Self {
        let basic = SetupSpec::default()
            .with_equipment(EquipmentKind::LabelNeq, 1)
            .with_equipment(EquipmentKind::Rewinder, 6)
            .with_equipment(EquipmentKind::GeneralRadar, 9);

        Self::new()
            .with_mission(MissionDef::new(1, "Training Day").with_setup(basic.clone()))
            .with_mission(
                MissionDef::new(2, "Countdown")
                    .with_setup(basic.clone())
                    .with_rule(Rule::Timer { duration_seconds: 900 }),
            )
            .with_mission(
                MissionDef::new(3, "Double Trouble")
                    .with_setup(
                        SetupSpec::default()
                            .with_equipment(EquipmentKind::SuperDetector, 3)
                            .with_equipment(EquipmentKind::Stabilizer, 8),
                    )
                    .with_rule(Rule::EquipmentDoubleLock {
                        secondary_value: 6,
                        threshold: 2,
                        equipment: Vec::new(),
                    }),
            )
            .with_mission(
                MissionDef::new(4, "Ladder")
                    .with_setup(basic.clone())
                    .with_rule(Rule::SequencePriority { sequence: vec![2, 7, 11] }),
            )
            .with_mission(
                MissionDef::new(5, "Sleeper Cell")
                    .with_setup(SetupSpec::default().with_wires(1, 2))
                    .with_rule(Rule::BlueValueTreatedAsRed { candidates: Vec::new() }),
            )
            .with_mission(
                MissionDef::new(6, "Hot Seat")
                    .with_setup(basic.clone())
                    .with_rule(Rule::DynamicTurnOrder { mode: TurnOrderMode::CaptainChooses }),
            )
            .with_mission(
                MissionDef::new(7, "Relay")
                    .with_setup(basic.clone())
                    .with_rule(Rule::DynamicTurnOrder { mode: TurnOrderMode::ActiveDesignates }),
            )
            .with_mission(
                MissionDef::new(8, "Thin Air")
                    .with_setup(SetupSpec::default().with_detonator_max(5))
                    .with_rule(Rule::Oxygen { initial: 6, per_turn: 1 }),
            )
            .with_mission(
                MissionDef::new(9, "Backwards")
                    .with_setup(
                        SetupSpec::default()
                            .with_equipment(EquipmentKind::CoffeeMug, 2)
                            .with_equipment(EquipmentKind::FastPass, 5),
                    )
                    .with_rule(Rule::ReverseTurnOrder)
                    .with_rule(Rule::EquipmentUnlockThreshold { threshold: 3 }),
            )
            .with_mission(
                MissionDef::new(10, "Lame Duck")
                    .with_setup(basic.clone())
                    .with_rule(Rule::CaptainEquipmentBan)
                    .with_rule(Rule::XMarkedWires { per_player: 1 }),
            )
            .with_mission(
                MissionDef::new(11, "Tripwire")
                    .with_setup(SetupSpec::default().with_detonator_max(6))
                    .with_rule(Rule::CutValueAdvancesDetonator { value: 12 }),
            )
            .with_mission(
                MissionDef::new(13, "Stage Fright")
                    .with_setup(basic.clone())
                    .with_rule(Rule::TargetChoosesDetectorTile),
            )
            .with_mission(
                MissionDef::new(14, "Rotation")
                    .with_setup(basic.clone())
                    .with_rule(Rule::RotatingConstraint { forbidden_values: vec![1, 6, 12] }),
            )
            .with_mission(
                MissionDef::new(23, "Fire Sale")
                    .with_setup(
                        basic
                            .with_equipment(EquipmentKind::Disintegrator, 4)
                            .with_equipment(EquipmentKind::WalkieTalkies, 7),
                    )
                    .with_rule(Rule::EquipmentDiscard { trigger_value: 3 }),
            )
    }
}
