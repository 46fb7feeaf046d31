//! Player identification and per-player hand data.
//!
//! ## PlayerId
//!
//! Seat index, 0-based and clockwise. Missions support 2-5 seats.
//!
//! ## Player
//!
//! A hand of wire tiles kept in ascending `sort_value` order, plus the
//! public info tokens attached to hand positions.

use serde::{Deserialize, Serialize};

use super::tile::{GameValue, InfoToken, WireTile};

/// Seat identifier.
///
/// Player indices are 0-based: the first seat is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// Next seat clockwise.
    #[must_use]
    pub fn clockwise(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count) as u8)
    }

    /// Next seat counter-clockwise.
    #[must_use]
    pub fn counter_clockwise(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + player_count - 1) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Hand tiles, ascending by `sort_value`.
    pub hand: Vec<WireTile>,

    /// Public hints attached to hand positions.
    pub info_tokens: Vec<InfoToken>,

    pub is_captain: bool,

    /// Double detector character ability spent.
    pub ability_used: bool,
}

impl Player {
    /// Create a player holding `hand`. The hand is sorted on the way in.
    #[must_use]
    pub fn new(id: PlayerId, hand: Vec<WireTile>) -> Self {
        let mut player = Self {
            id,
            hand,
            info_tokens: Vec::new(),
            is_captain: false,
            ability_used: false,
        };
        player.sort_hand();
        player
    }

    /// Get a tile by hand position.
    #[must_use]
    pub fn tile(&self, index: usize) -> Option<&WireTile> {
        self.hand.get(index)
    }

    /// Does this player still hold any uncut tile?
    #[must_use]
    pub fn has_uncut(&self) -> bool {
        self.hand.iter().any(|t| !t.cut)
    }

    #[must_use]
    pub fn uncut_count(&self) -> usize {
        self.hand.iter().filter(|t| !t.cut).count()
    }

    /// Number of uncut tiles showing `value`.
    #[must_use]
    pub fn count_uncut(&self, value: GameValue) -> usize {
        self.hand.iter().filter(|t| !t.cut && t.value == value).count()
    }

    #[must_use]
    pub fn holds_uncut(&self, value: GameValue) -> bool {
        self.count_uncut(value) > 0
    }

    /// Position of the first uncut tile showing `value`.
    #[must_use]
    pub fn first_uncut_match(&self, value: GameValue) -> Option<usize> {
        self.hand.iter().position(|t| !t.cut && t.value == value)
    }

    /// Pick the actor tile to cut for `value`.
    ///
    /// An explicit position wins when it still names an uncut match;
    /// otherwise the first uncut match is used.
    #[must_use]
    pub fn matching_tile(&self, value: GameValue, preferred: Option<usize>) -> Option<usize> {
        preferred
            .filter(|&i| self.hand.get(i).is_some_and(|t| !t.cut && t.value == value))
            .or_else(|| self.first_uncut_match(value))
    }

    /// Re-sort the hand by `sort_value`, carrying info tokens along with
    /// the tiles they describe.
    pub fn sort_hand(&mut self) {
        let before: Vec<_> = self.hand.iter().map(|t| t.id).collect();
        self.hand
            .sort_by(|a, b| a.sort_value.total_cmp(&b.sort_value).then(a.id.cmp(&b.id)));

        let after: Vec<_> = self.hand.iter().map(|t| t.id).collect();
        if before == after {
            return;
        }
        let map = |old: usize| {
            before
                .get(old)
                .and_then(|id| after.iter().position(|a| a == id))
                .unwrap_or(old)
        };
        for token in &mut self.info_tokens {
            token.remap(map);
        }
    }

    /// Take the tile at `index` out of the hand, dropping tokens that
    /// described it and shifting the rest.
    pub fn remove_tile(&mut self, index: usize) -> Option<WireTile> {
        if index >= self.hand.len() {
            return None;
        }
        let tile = self.hand.remove(index);
        self.info_tokens.retain(|t| !t.touches(index));
        for token in &mut self.info_tokens {
            token.remap(|p| if p > index { p - 1 } else { p });
        }
        Some(tile)
    }

    /// Insert a tile and restore sort order.
    pub fn insert_tile(&mut self, tile: WireTile) {
        self.hand.push(tile);
        self.sort_hand();
    }
}
