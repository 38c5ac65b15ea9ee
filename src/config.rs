use crate::error::{ConductorError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ConductorConfig {
    pub event_channel_capacity: usize,
    pub telemetry_enabled: bool,
    pub custom_settings: HashMap<String, String>,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 1000,
            telemetry_enabled: true,
            custom_settings: HashMap::new(),
        }
    }
}

impl ConductorConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("CONDUCTOR_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                ConductorError::ConfigurationError(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        if let Ok(telemetry) = std::env::var("CONDUCTOR_TELEMETRY_ENABLED") {
            config.telemetry_enabled = telemetry.parse().map_err(|e| {
                ConductorError::ConfigurationError(format!("Invalid telemetry_enabled: {e}"))
            })?;
        }

        Ok(config)
    }
}
