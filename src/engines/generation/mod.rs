pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod progress;

pub use evolution_engine::{EngineConfig, EvolutionEngine, EvolutionSummary, ProgressCallback};
pub use genome::Genome;
