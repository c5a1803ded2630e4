use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::interaction::DecayMode;

/// Session-wide knobs. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub decay: DecayMode,
    pub log_level: String,
    /// Size backing stores in device pixels instead of CSS pixels.
    pub device_pixel_ratio_aware: bool,
    /// Install document-level mousemove/click listeners on open.
    pub listen_to_document: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decay: DecayMode::PerFrame,
            log_level: "info".to_string(),
            device_pixel_ratio_aware: false,
            listen_to_document: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Unknown level names fall back to `Info`.
    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
