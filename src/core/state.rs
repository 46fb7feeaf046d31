//! Game state: the single root aggregate of one room.
//!
//! ## Secrets
//!
//! Hidden information lives in two places only: uncut tile fields and log
//! entries flagged `setup_only`. A view filter can redact from those alone.
//!
//! ## Lifecycle
//!
//! `Setup` while the mission schema is being resolved into hands, `Playing`
//! while actions mutate it in place, `Finished` once `result` is set.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::PendingForcedAction;
use super::board::BoardState;
use super::player::{Player, PlayerId};
use super::rng::GameRng;
use super::tile::{GameValue, WireTile};
use crate::missions::MissionId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Setup,
    Playing,
    Finished,
}

/// Terminal outcome of a mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    LossRedWire,
    LossDetonator,
}

impl GameResult {
    #[must_use]
    pub fn is_loss(self) -> bool {
        !matches!(self, GameResult::Win)
    }

    /// Wire spelling, also used in log details.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::Win => "win",
            GameResult::LossRedWire => "loss_red_wire",
            GameResult::LossDetonator => "loss_detonator",
        }
    }
}

/// Effects that last until the end of the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEffects {
    /// A wrong guess does not advance the detonator. Red still explodes.
    pub stabilizer: bool,
}

/// Mission-derived facts that outlive a single turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignState {
    /// Advisory deadline; enforced by an outside clock.
    pub deadline_seconds: Option<u32>,

    /// Blue value that behaves as red. Secret.
    pub blue_as_red: Option<u8>,

    pub oxygen: Option<u32>,

    /// Index of the active constraint card.
    pub active_constraint: Option<usize>,

    /// An equipment card has been discarded by a mission rule.
    pub equipment_discarded: bool,
}

/// One line of the game log.
///
/// `detail` uses a small `:`-delimited grammar (`blue_as_red:7`,
/// `m23:equipment_discard:3`) that rules and replays parse back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub player_id: Option<PlayerId>,
    pub action: String,
    pub detail: String,
    /// Logical clock; strictly increasing within a game.
    pub timestamp: u64,
    /// Hidden setup fact, stripped by view filters.
    #[serde(default)]
    pub setup_only: bool,
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    pub mission: MissionId,
    pub players: Vec<Player>,
    pub board: BoardState,
    pub campaign: Option<CampaignState>,

    /// Persistent so lookahead copies share history.
    pub log: Vector<LogEntry>,

    pub phase: GamePhase,
    pub result: Option<GameResult>,

    /// Seat whose turn it is.
    pub current_player: PlayerId,

    /// Starts at 1.
    pub turn_number: u32,

    pub pending_forced_action: Option<PendingForcedAction>,

    /// `None` at the start of every turn.
    pub turn_effects: Option<TurnEffects>,

    pub rng: GameRng,

    clock: u64,
}

impl GameState {
    /// Create an empty state for `players`, ready for dealing.
    #[must_use]
    pub fn new(mission: MissionId, players: Vec<Player>, board: BoardState, seed: u64) -> Self {
        assert!(!players.is_empty(), "Must have at least 1 player");
        assert!(players.len() <= 255, "At most 255 players supported");

        Self {
            mission,
            players,
            board,
            campaign: None,
            log: Vector::new(),
            phase: GamePhase::Setup,
            result: None,
            current_player: PlayerId::new(0),
            turn_number: 1,
            pending_forced_action: None,
            turn_effects: None,
            rng: GameRng::new(seed),
            clock: 0,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    /// Seat of the captain (first flagged seat, else seat 0).
    #[must_use]
    pub fn captain(&self) -> PlayerId {
        self.players
            .iter()
            .find(|p| p.is_captain)
            .map_or(PlayerId::new(0), |p| p.id)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Campaign extension, created on first use.
    pub fn campaign_mut(&mut self) -> &mut CampaignState {
        self.campaign.get_or_insert_with(CampaignState::default)
    }

    #[must_use]
    pub fn stabilized(&self) -> bool {
        self.turn_effects.as_ref().is_some_and(|e| e.stabilizer)
    }

    /// Red, or a blue carrying the mission's hidden red value.
    #[must_use]
    pub fn is_effectively_red(&self, tile: &WireTile) -> bool {
        tile.is_red() || self.is_hidden_red(tile)
    }

    #[must_use]
    pub fn is_hidden_red(&self, tile: &WireTile) -> bool {
        let hidden = self.campaign.as_ref().and_then(|c| c.blue_as_red);
        hidden.is_some() && tile.value.number() == hidden
    }

    /// Cut tiles showing `value`, counted from the hands.
    #[must_use]
    pub fn count_cut(&self, value: GameValue) -> usize {
        self.tiles().filter(|t| t.cut && t.value == value).count()
    }

    /// Uncut tiles showing `value` across every hand.
    #[must_use]
    pub fn count_uncut(&self, value: GameValue) -> usize {
        self.tiles().filter(|t| !t.cut && t.value == value).count()
    }

    /// Every tile in every hand has been cut.
    #[must_use]
    pub fn all_cut(&self) -> bool {
        self.tiles().all(|t| t.cut)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &WireTile> {
        self.players.iter().flat_map(|p| p.hand.iter())
    }

    /// Rebuild the validation track from the cut tiles in play.
    pub fn recompute_validation_track(&mut self) {
        let mut track = [0u8; 13];
        for tile in self.players.iter().flat_map(|p| p.hand.iter()) {
            if let (true, Some(v)) = (tile.cut, tile.value.number()) {
                track[usize::from(v)] += 1;
            }
        }
        self.board.validation_track = track;
    }

    /// Append a public log entry.
    pub fn log(&mut self, player: Option<PlayerId>, action: &str, detail: impl Into<String>) {
        self.push_log(player, action, detail.into(), false);
    }

    /// Append a hidden setup fact.
    pub fn log_setup_only(&mut self, action: &str, detail: impl Into<String>) {
        self.push_log(None, action, detail.into(), true);
    }

    fn push_log(&mut self, player: Option<PlayerId>, action: &str, detail: String, setup_only: bool) {
        self.clock += 1;
        self.log.push_back(LogEntry {
            turn: self.turn_number,
            player_id: player,
            action: action.to_string(),
            detail,
            timestamp: self.clock,
            setup_only,
        });
    }

    /// Log details recorded under `action`, oldest first.
    pub fn log_details<'a>(&'a self, action: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.log
            .iter()
            .filter(move |e| e.action == action)
            .map(|e| e.detail.as_str())
    }

    /// Freeze the game with `result`. The first result sticks.
    pub fn finish(&mut self, result: GameResult) {
        if self.result.is_none() {
            self.result = Some(result);
        }
        self.phase = GamePhase::Finished;
    }

    /// Clone for lookahead. Forks the RNG so the copy draws its own stream.
    #[must_use]
    pub fn clone_state(&mut self) -> Self {
        let mut copy = self.clone();
        copy.rng = self.rng.fork();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(hands: Vec<Vec<WireTile>>) -> GameState {
        let players = hands
            .into_iter()
            .enumerate()
            .map(|(i, h)| Player::new(PlayerId::new(i as u8), h))
            .collect();
        GameState::new(MissionId(1), players, BoardState::new(4), 42)
    }

    #[test]
    fn test_new_state_defaults() {
        let state = state_with(vec![vec![WireTile::blue(1)], vec![WireTile::blue(2)]]);
        assert_eq!(state.player_count(), 2);
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.phase, GamePhase::Setup);
        assert!(state.turn_effects.is_none());
        assert_eq!(state.captain(), PlayerId::new(0));
    }

    #[test]
    fn test_recompute_track_counts_only_cut_blues() {
        let mut state = state_with(vec![
            vec![WireTile::blue(5), WireTile::red(5.5)],
            vec![WireTile::blue(5), WireTile::blue(6)],
        ]);
        state.players[0].hand[0].cut = true;
        state.players[0].hand[1].cut = true;
        state.players[1].hand[0].cut = true;
        state.board.validation_track[6] = 9;

        state.recompute_validation_track();

        assert_eq!(state.board.validation_track[5], 2);
        assert_eq!(state.board.validation_track[6], 0);
    }

    #[test]
    fn test_hidden_red() {
        let mut state = state_with(vec![vec![WireTile::blue(7)], vec![WireTile::blue(3)]]);
        assert!(!state.is_effectively_red(&state.players[0].hand[0]));

        state.campaign_mut().blue_as_red = Some(7);
        assert!(state.is_hidden_red(&state.players[0].hand[0]));
        assert!(!state.is_hidden_red(&state.players[1].hand[0]));
    }

    #[test]
    fn test_log_clock_and_setup_flag() {
        let mut state = state_with(vec![vec![WireTile::blue(1)]]);
        state.log_setup_only("mission_setup", "blue_as_red:4");
        state.log(Some(PlayerId::new(0)), "dual_cut", "guess:4");

        assert_eq!(state.log.len(), 2);
        assert!(state.log[0].setup_only);
        assert!(state.log[1].timestamp > state.log[0].timestamp);
        assert_eq!(state.log_details("mission_setup").collect::<Vec<_>>(), vec!["blue_as_red:4"]);
    }

    #[test]
    fn test_finish_keeps_first_result() {
        let mut state = state_with(vec![vec![WireTile::blue(1)]]);
        state.finish(GameResult::LossRedWire);
        state.finish(GameResult::Win);
        assert_eq!(state.result, Some(GameResult::LossRedWire));
        assert!(state.is_finished());
    }

    #[test]
    fn test_clone_state_forks_rng() {
        let mut state = state_with(vec![vec![WireTile::blue(1)]]);
        let mut copy = state.clone_state();
        let a: Vec<_> = (0..8).map(|_| state.rng.pick_index(1000)).collect();
        let b: Vec<_> = (0..8).map(|_| copy.rng.pick_index(1000)).collect();
        assert_ne!(a, b);
        assert_eq!(copy.players, state.players);
    }
}
