//! Core types: tiles, players, board, state, actions, RNG, configuration.

pub mod action;
pub mod board;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;
pub mod tile;

pub use action::{Action, ActionResult, DetectorOutcome, ForcedChoice, PendingForcedAction};
pub use board::{BoardState, Marker};
pub use config::EngineConfig;
pub use error::{EngineError, ErrorCode, UnknownHookError, ValidationError};
pub use player::{Player, PlayerId};
pub use rng::{GameRng, GameRngState};
pub use state::{CampaignState, GamePhase, GameResult, GameState, LogEntry, TurnEffects};
pub use tile::{GameValue, InfoToken, Relation, TileId, WireColor, WireTile};
