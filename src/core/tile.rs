//! Wire tiles and the information tokens attached to hand positions.
//!
//! ## Sort values
//!
//! Every tile carries a single fractional `sort_value` that fixes its slot in
//! the owner's hand. Blue tiles sit on whole numbers; red tiles sit halfway
//! between two blue values (`7.5` is a red between blue 7 and blue 8) and
//! yellow tiles just above a blue value (`7.1`). Marker matching compares
//! against these numbers directly, so the value is never split into parts.

use serde::{Deserialize, Serialize};

/// Stable tile identifier, unique within one game.
///
/// Hand positions shift when tiles change owner; the id does not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u16);

/// Physical wire color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireColor {
    Blue,
    Red,
    Yellow,
}

/// The value a player has to name to cut a tile.
///
/// Serialized as a bare number for blue values and as `"RED"` / `"YELLOW"`
/// otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawGameValue", into = "RawGameValue")]
pub enum GameValue {
    /// Blue value, 1 through 12.
    Number(u8),
    Red,
    Yellow,
}

impl GameValue {
    /// Smallest blue value.
    pub const MIN: u8 = 1;
    /// Largest blue value.
    pub const MAX: u8 = 12;

    /// Blue value if this is a number.
    #[must_use]
    pub const fn number(self) -> Option<u8> {
        match self {
            GameValue::Number(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, GameValue::Red)
    }

    /// Iterate over every blue value.
    pub fn all_numbers() -> impl Iterator<Item = GameValue> {
        (Self::MIN..=Self::MAX).map(GameValue::Number)
    }
}

impl std::fmt::Display for GameValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameValue::Number(v) => write!(f, "{v}"),
            GameValue::Red => f.write_str("RED"),
            GameValue::Yellow => f.write_str("YELLOW"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawGameValue {
    Number(u8),
    Label(String),
}

impl TryFrom<RawGameValue> for GameValue {
    type Error = String;

    fn try_from(raw: RawGameValue) -> Result<Self, Self::Error> {
        match raw {
            RawGameValue::Number(v) if (GameValue::MIN..=GameValue::MAX).contains(&v) => {
                Ok(GameValue::Number(v))
            }
            RawGameValue::Number(v) => Err(format!("blue value {v} out of range 1-12")),
            RawGameValue::Label(s) => match s.as_str() {
                "RED" => Ok(GameValue::Red),
                "YELLOW" => Ok(GameValue::Yellow),
                other => Err(format!("unknown game value {other:?}")),
            },
        }
    }
}

impl From<GameValue> for RawGameValue {
    fn from(value: GameValue) -> Self {
        match value {
            GameValue::Number(v) => RawGameValue::Number(v),
            GameValue::Red => RawGameValue::Label("RED".to_string()),
            GameValue::Yellow => RawGameValue::Label("YELLOW".to_string()),
        }
    }
}

/// A single wire in a player's hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireTile {
    pub id: TileId,
    pub color: WireColor,
    pub value: GameValue,
    /// Hidden hand position, see the module docs.
    pub sort_value: f64,
    pub cut: bool,
    #[serde(default)]
    pub x_marked: bool,
    #[serde(default)]
    pub upside_down: bool,
}

impl WireTile {
    /// Blue tile with value `value`.
    ///
    /// Ids are assigned when the tile is dealt, so constructors leave it at 0.
    #[must_use]
    pub fn blue(value: u8) -> Self {
        Self::new(WireColor::Blue, GameValue::Number(value), f64::from(value))
    }

    /// Red tile slotted at `sort_value` (usually `n + 0.5`).
    #[must_use]
    pub fn red(sort_value: f64) -> Self {
        Self::new(WireColor::Red, GameValue::Red, sort_value)
    }

    /// Yellow tile slotted at `sort_value` (usually `n + 0.1`).
    #[must_use]
    pub fn yellow(sort_value: f64) -> Self {
        Self::new(WireColor::Yellow, GameValue::Yellow, sort_value)
    }

    fn new(color: WireColor, value: GameValue, sort_value: f64) -> Self {
        Self {
            id: TileId::default(),
            color,
            value,
            sort_value,
            cut: false,
            x_marked: false,
            upside_down: false,
        }
    }

    /// Set the tile id (builder pattern).
    #[must_use]
    pub fn with_id(mut self, id: TileId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn is_red(&self) -> bool {
        self.color == WireColor::Red
    }

    #[must_use]
    pub fn is_blue(&self) -> bool {
        self.color == WireColor::Blue
    }
}

/// Relation shown by a label token between two adjacent positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Eq,
    Neq,
}

/// Public partial knowledge attached to a hand position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfoToken {
    Value { position: usize, value: GameValue },
    Relation { positions: (usize, usize), relation: Relation },
    Parity { position: usize, even: bool },
    Yellow { position: usize },
    SingleWire { position: usize },
}

impl InfoToken {
    /// Token revealing the true value of a tile, as placed after a miss.
    #[must_use]
    pub fn revealing(position: usize, tile: &WireTile) -> Self {
        match tile.value {
            GameValue::Yellow => InfoToken::Yellow { position },
            value => InfoToken::Value { position, value },
        }
    }

    /// Rewrite every position through `map` (old index -> new index).
    pub(crate) fn remap(&mut self, map: impl Fn(usize) -> usize) {
        match self {
            InfoToken::Value { position, .. }
            | InfoToken::Parity { position, .. }
            | InfoToken::Yellow { position }
            | InfoToken::SingleWire { position } => *position = map(*position),
            InfoToken::Relation { positions, .. } => {
                *positions = (map(positions.0), map(positions.1));
            }
        }
    }

    /// Whether the token references `position`.
    #[must_use]
    pub fn touches(&self, position: usize) -> bool {
        match self {
            InfoToken::Value { position: p, .. }
            | InfoToken::Parity { position: p, .. }
            | InfoToken::Yellow { position: p }
            | InfoToken::SingleWire { position: p } => *p == position,
            InfoToken::Relation { positions, .. } => positions.0 == position || positions.1 == position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_value_json_shape() {
        assert_eq!(serde_json::to_string(&GameValue::Number(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&GameValue::Red).unwrap(), "\"RED\"");
        assert_eq!(serde_json::to_string(&GameValue::Yellow).unwrap(), "\"YELLOW\"");

        let parsed: GameValue = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, GameValue::Number(12));
        let parsed: GameValue = serde_json::from_str("\"YELLOW\"").unwrap();
        assert_eq!(parsed, GameValue::Yellow);
    }

    #[test]
    fn test_game_value_rejects_out_of_range() {
        assert!(serde_json::from_str::<GameValue>("0").is_err());
        assert!(serde_json::from_str::<GameValue>("13").is_err());
        assert!(serde_json::from_str::<GameValue>("\"GREEN\"").is_err());
    }

    #[test]
    fn test_tile_constructors() {
        let blue = WireTile::blue(7);
        assert!(blue.is_blue());
        assert_eq!(blue.sort_value, 7.0);

        let red = WireTile::red(7.5);
        assert!(red.is_red());
        assert_eq!(red.value, GameValue::Red);

        let yellow = WireTile::yellow(3.1);
        assert_eq!(yellow.value, GameValue::Yellow);
        assert!(!yellow.cut);
    }

    #[test]
    fn test_revealing_token() {
        let token = InfoToken::revealing(2, &WireTile::blue(9));
        assert_eq!(token, InfoToken::Value { position: 2, value: GameValue::Number(9) });

        let token = InfoToken::revealing(4, &WireTile::yellow(4.1));
        assert_eq!(token, InfoToken::Yellow { position: 4 });
    }

    #[test]
    fn test_token_remap() {
        let mut token = InfoToken::Relation { positions: (1, 2), relation: Relation::Neq };
        token.remap(|p| p + 1);
        assert_eq!(token, InfoToken::Relation { positions: (2, 3), relation: Relation::Neq });
        assert!(token.touches(3));
        assert!(!token.touches(1));
    }
}
