//! Shared board: detonator dial, validation track, markers, equipment row.

use serde::{Deserialize, Serialize};

use super::tile::{GameValue, WireColor};
use crate::equipment::{EquipmentCard, EquipmentId};

/// Public marker showing where a red or yellow wire may sit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: WireColor,
    /// Same scale as `WireTile::sort_value`.
    pub position: f64,
}

/// Shared board state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    /// Detonator dial. Reaching `detonator_max` loses the mission.
    pub detonator: u8,
    pub detonator_max: u8,

    /// Cut tiles per blue value; index 0 is unused.
    pub validation_track: [u8; 13],

    /// Copies of each blue value in play.
    pub copies_per_value: u8,

    pub markers: Vec<Marker>,

    pub equipment: Vec<EquipmentCard>,
}

impl BoardState {
    #[must_use]
    pub fn new(detonator_max: u8) -> Self {
        Self {
            detonator: 0,
            detonator_max,
            validation_track: [0; 13],
            copies_per_value: 4,
            markers: Vec::new(),
            equipment: Vec::new(),
        }
    }

    /// Cut count for a blue value (0 for red/yellow).
    #[must_use]
    pub fn cut_count(&self, value: GameValue) -> u8 {
        value
            .number()
            .map_or(0, |v| self.validation_track[usize::from(v)])
    }

    /// Every copy of `value` has been cut.
    #[must_use]
    pub fn is_complete(&self, value: GameValue) -> bool {
        value.number().is_some() && self.cut_count(value) >= self.copies_per_value
    }

    #[must_use]
    pub fn detonator_exhausted(&self) -> bool {
        self.detonator >= self.detonator_max
    }

    /// Markers within `tolerance` of `position`.
    pub fn markers_near(&self, position: f64, tolerance: f64) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(move |m| (m.position - position).abs() <= tolerance)
    }

    #[must_use]
    pub fn equipment(&self, id: EquipmentId) -> Option<&EquipmentCard> {
        self.equipment.iter().find(|c| c.id == id)
    }

    pub fn equipment_mut(&mut self, id: EquipmentId) -> Option<&mut EquipmentCard> {
        self.equipment.iter_mut().find(|c| c.id == id)
    }
}
