pub mod evolution;
pub mod fuzzer;
pub mod manager;
pub mod network;
pub mod traits;

pub use evolution::EvolutionConfig;
pub use fuzzer::FuzzerConfig;
pub use manager::{AppConfig, ConfigManager};
pub use network::NetworkConfig;
