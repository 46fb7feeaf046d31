//! Engine configuration.
//!
//! The engine never reads the environment or files on its own; the host
//! builds an `EngineConfig` (or deserializes one) and hands it over.

use serde::{Deserialize, Serialize};

/// Engine-wide settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Missing hook handlers are a hard error instead of a skip.
    ///
    /// Defaults to on in debug builds.
    pub strict_hooks: bool,

    /// Cuts of an equipment card's value needed to unlock it, unless a
    /// mission rule overrides it.
    pub default_unlock_threshold: u8,

    /// Detonator size used when a mission setup does not name one.
    pub default_detonator_max: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_hooks: cfg!(debug_assertions),
            default_unlock_threshold: 2,
            default_detonator_max: 4,
        }
    }
}

impl EngineConfig {
    /// Production settings: unknown hooks are skipped and reported.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict_hooks: false,
            ..Self::default()
        }
    }

    /// Development settings: unknown hooks fail the dispatch.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_hooks: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unlock_threshold(mut self, threshold: u8) -> Self {
        self.default_unlock_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_detonator_max(mut self, max: u8) -> Self {
        self.default_detonator_max = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_unlock_threshold, 2);
        assert_eq!(config.strict_hooks, cfg!(debug_assertions));
        assert!(!EngineConfig::lenient().strict_hooks);
        assert!(EngineConfig::strict().strict_hooks);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"strict_hooks": false}"#).unwrap();
        assert!(!config.strict_hooks);
        assert_eq!(config.default_unlock_threshold, 2);
        assert_eq!(config.default_detonator_max, 4);
    }
}
