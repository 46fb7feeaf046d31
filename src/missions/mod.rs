//! Mission definitions, the built-in catalog, and the handlers that give
//! each rule kind its behavior.

mod catalog;
pub mod rules;
mod schema;

pub use catalog::MissionCatalog;
pub use rules::{builtin_registry, register_builtin_handlers};
pub use schema::{EquipmentSpec, MissionDef, MissionHookRuleDef, MissionId, SetupSpec, TurnOrderMode};
