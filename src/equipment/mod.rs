//! Equipment: shared one-time-use cards.
//!
//! ## Lifecycle
//!
//! Cards start locked and unlock once enough tiles of their value are cut
//! (see [`EquipmentCard::refresh`]). A card is played with an
//! [`EquipmentPayload`] of the same kind; legality lives in
//! [`Engine::validate_use_equipment`](crate::engine::Engine::validate_use_equipment)
//! and effects in `execute`.

mod card;
mod execute;
mod payload;
mod validate;

pub use card::{EquipmentCard, EquipmentId, EquipmentKind, SecondaryLock, Timing};
pub use payload::EquipmentPayload;
