use std::time::Duration;

use super::traits::ConfigSection;
use crate::error::GenfuzzError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Target service receiving the generated requests.
    pub target_addr: String,
    /// Coverage agent exposing the reset/dump operations.
    pub oracle_addr: String,
    pub oracle_retry_count: u32,
    pub connect_timeout_ms: u64,
    pub io_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            target_addr: "127.0.0.1:9090".to_string(),
            oracle_addr: "127.0.0.1:6300".to_string(),
            oracle_retry_count: 3,
            connect_timeout_ms: 2000,
            io_timeout_ms: 5000,
        }
    }
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

impl ConfigSection for NetworkConfig {
    fn section_name() -> &'static str {
        "network"
    }

    fn validate(&self) -> Result<(), GenfuzzError> {
        if self.target_addr.is_empty() || self.oracle_addr.is_empty() {
            return Err(GenfuzzError::Configuration(
                "Target and oracle addresses must be set".to_string(),
            ));
        }
        if self.oracle_retry_count == 0 {
            return Err(GenfuzzError::Configuration(
                "Oracle retry count must be at least 1".to_string(),
            ));
        }
        if self.connect_timeout_ms == 0 || self.io_timeout_ms == 0 {
            return Err(GenfuzzError::Configuration(
                "Network timeouts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
