use super::traits::ConfigSection;
use crate::error::GenfuzzError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub elitism_rate: f64,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub crossover_points: usize,
    pub report_interval_generations: u64,
    /// `None` runs until externally cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_generations: Option<u64>,
    /// Seeds template generation and the genetic operators for reproducible
    /// runs; entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elitism_rate: 0.8,
            crossover_rate: 0.3,
            mutation_rate: 0.6,
            tournament_size: 5,
            crossover_points: 10,
            report_interval_generations: 10,
            max_generations: None,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GenfuzzError> {
        if self.population_size < 2 {
            return Err(GenfuzzError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        for (name, rate) in [
            ("Elitism rate", self.elitism_rate),
            ("Crossover rate", self.crossover_rate),
            ("Mutation rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(GenfuzzError::Configuration(format!(
                    "{name} must be between 0 and 1"
                )));
            }
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(GenfuzzError::Configuration(
                "Tournament size must be between 1 and the population size".to_string(),
            ));
        }
        if self.crossover_points == 0 {
            return Err(GenfuzzError::Configuration(
                "Crossover point count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
