//! Game creation.
//!
//! Two entry points:
//! - [`Engine::new_game`] deals a mission's setup recipe from a seed
//! - [`GameBuilder`] takes explicit hands, for tests and scripted scenarios
//!
//! Both finish the same way: tile ids assigned, board built, `setup`
//! hooks dispatched, phase set to `Playing`.

use tracing::debug;

use super::Engine;
use crate::core::error::ErrorCode;
use crate::core::{
    BoardState, EngineError, GamePhase, GameRng, GameState, Marker, Player, PlayerId, TileId,
    ValidationError, WireTile,
};
use crate::equipment::{EquipmentCard, EquipmentId};
use crate::hooks::HookContext;
use crate::missions::{MissionId, SetupSpec};

/// Builder for a game with known hands.
#[derive(Clone, Debug)]
pub struct GameBuilder {
    mission: MissionId,
    hands: Vec<Vec<WireTile>>,
    equipment: Vec<EquipmentCard>,
    detonator: u8,
    detonator_max: Option<u8>,
    copies_per_value: Option<u8>,
    captain: PlayerId,
    first_player: Option<PlayerId>,
}

impl GameBuilder {
    #[must_use]
    pub fn new(mission: MissionId) -> Self {
        Self {
            mission,
            hands: Vec::new(),
            equipment: Vec::new(),
            detonator: 0,
            detonator_max: None,
            copies_per_value: None,
            captain: PlayerId::new(0),
            first_player: None,
        }
    }

    /// One hand per seat, seat 0 first.
    #[must_use]
    pub fn hands(mut self, hands: Vec<Vec<WireTile>>) -> Self {
        self.hands = hands;
        self
    }

    /// Add a seat holding `hand`.
    #[must_use]
    pub fn player(mut self, hand: Vec<WireTile>) -> Self {
        self.hands.push(hand);
        self
    }

    #[must_use]
    pub fn equipment(mut self, card: EquipmentCard) -> Self {
        self.equipment.push(card);
        self
    }

    /// Starting detonator position.
    #[must_use]
    pub fn detonator(mut self, position: u8) -> Self {
        self.detonator = position;
        self
    }

    #[must_use]
    pub fn detonator_max(mut self, max: u8) -> Self {
        self.detonator_max = Some(max);
        self
    }

    #[must_use]
    pub fn copies_per_value(mut self, copies: u8) -> Self {
        self.copies_per_value = Some(copies);
        self
    }

    #[must_use]
    pub fn captain(mut self, captain: PlayerId) -> Self {
        self.captain = captain;
        self
    }

    /// Seat that plays first (defaults to the captain).
    #[must_use]
    pub fn first_player(mut self, player: PlayerId) -> Self {
        self.first_player = Some(player);
        self
    }

    /// Build the state and run mission setup.
    pub fn build(self, engine: &Engine, seed: u64) -> Result<GameState, EngineError> {
        self.build_with_rng(engine, GameRng::new(seed))
    }

    fn build_with_rng(self, engine: &Engine, rng: GameRng) -> Result<GameState, EngineError> {
        let mission = engine
            .mission(self.mission)
            .ok_or(EngineError::UnknownMission(self.mission))?;
        if self.hands.is_empty() || self.hands.len() > usize::from(u8::MAX) {
            return Err(ValidationError::new(
                ErrorCode::MissionRuleViolation,
                format!("cannot seat {} players", self.hands.len()),
            )
            .into());
        }
        let first = self.first_player.unwrap_or(self.captain);
        if let Some(seat) = [self.captain, first].into_iter().find(|p| p.index() >= self.hands.len()) {
            return Err(ValidationError::new(
                ErrorCode::TargetPlayerNotFound,
                format!("no seat {seat} among {} players", self.hands.len()),
            )
            .into());
        }

        let mut next_id = 1u16;
        let mut players = Vec::with_capacity(self.hands.len());
        for (seat, hand) in self.hands.into_iter().enumerate() {
            let mut tiles = Vec::with_capacity(hand.len());
            for tile in hand {
                tiles.push(tile.with_id(TileId(next_id)));
                next_id += 1;
            }
            let mut player = Player::new(PlayerId::new(seat as u8), tiles);
            player.is_captain = seat == self.captain.index();
            players.push(player);
        }

        let max = self
            .detonator_max
            .or(mission.setup.detonator_max)
            .unwrap_or(engine.config().default_detonator_max);
        let mut board = BoardState::new(max);
        board.detonator = self.detonator;
        board.copies_per_value = self.copies_per_value.unwrap_or(mission.setup.copies_per_value);
        board.equipment = self.equipment;
        board.markers = players
            .iter()
            .flat_map(|p| p.hand.iter())
            .filter(|t| !t.is_blue())
            .map(|t| Marker { color: t.color, position: t.sort_value })
            .collect();
        board.markers.sort_by(|a, b| a.position.total_cmp(&b.position));

        let mut state = GameState::new(mission.id, players, board, 0);
        state.rng = rng;
        state.current_player = first;
        engine.start(&mut state)?;
        Ok(state)
    }
}

impl Engine {
    /// Deal a fresh game of `mission` for `player_count` seats.
    pub fn new_game(&self, mission: MissionId, player_count: usize, seed: u64) -> Result<GameState, EngineError> {
        let def = self.mission(mission).ok_or(EngineError::UnknownMission(mission))?;
        let setup = &def.setup;
        let seats = usize::from(setup.min_players)..=usize::from(setup.max_players);
        if !seats.contains(&player_count) {
            return Err(ValidationError::new(
                ErrorCode::MissionRuleViolation,
                format!("mission {mission} needs {}-{} players", seats.start(), seats.end()),
            )
            .into());
        }

        let mut rng = GameRng::new(seed);
        let mut deck = build_deck(setup, &mut rng);
        rng.shuffle(&mut deck);

        let mut hands = vec![Vec::new(); player_count];
        for (i, tile) in deck.into_iter().enumerate() {
            hands[i % player_count].push(tile);
        }

        let builder = setup.equipment.iter().enumerate().fold(
            GameBuilder::new(mission).hands(hands),
            |builder, (i, spec)| {
                builder.equipment(EquipmentCard::new(EquipmentId(i as u8 + 1), spec.kind, spec.unlock_value))
            },
        );
        builder.build_with_rng(self, rng)
    }

    /// Run mission setup on a freshly built state and open play.
    fn start(&self, state: &mut GameState) -> Result<(), EngineError> {
        state.log(
            None,
            "game_start",
            format!("mission:{}:players:{}", state.mission, state.player_count()),
        );
        self.dispatch(state.mission, HookContext::Setup(&mut *state))?;
        self.after_cut(state, None);
        state.phase = GamePhase::Playing;
        debug!(mission = %state.mission, players = state.player_count(), "game started");
        Ok(())
    }
}

/// Every tile a setup recipe puts in play, unshuffled.
///
/// Reds sit at `v + 0.5` and yellows at `v + 0.1` for distinct random
/// `v` below the highest value.
fn build_deck(setup: &SetupSpec, rng: &mut GameRng) -> Vec<WireTile> {
    let mut deck: Vec<WireTile> = (1..=setup.highest_value)
        .flat_map(|v| (0..setup.copies_per_value).map(move |_| WireTile::blue(v)))
        .collect();

    let mut slots: Vec<u8> = (1..setup.highest_value).collect();
    rng.shuffle(&mut slots);
    deck.extend(
        slots
            .iter()
            .take(usize::from(setup.red_wires))
            .map(|&v| WireTile::red(f64::from(v) + 0.5)),
    );

    rng.shuffle(&mut slots);
    deck.extend(
        slots
            .iter()
            .take(usize::from(setup.yellow_wires))
            .map(|&v| WireTile::yellow(f64::from(v) + 0.1)),
    );
    deck
}
