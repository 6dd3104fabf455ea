use super::{
    evolution::EvolutionConfig, fuzzer::FuzzerConfig, network::NetworkConfig, traits::ConfigSection,
};
use crate::error::GenfuzzError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fuzzer: FuzzerConfig,
    pub evolution: EvolutionConfig,
    pub network: NetworkConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GenfuzzError> {
        self.fuzzer.validate()?;
        self.evolution.validate()?;
        self.network.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML file layered with `GENFUZZ_`-prefixed environment
    /// overrides (e.g. `GENFUZZ_NETWORK__TARGET_ADDR`).
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GenfuzzError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("GENFUZZ").separator("__"))
            .build()
            .map_err(|e| GenfuzzError::Configuration(format!("Failed to load config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| GenfuzzError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GenfuzzError> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| GenfuzzError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GenfuzzError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
