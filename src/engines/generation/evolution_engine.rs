use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::{mutate, n_point_crossover, tournament_selection};
use crate::error::Result;
use crate::template::TemplateEngine;

pub struct EngineConfig {
    pub population_size: usize,
    /// Fixed genome length; every seed is generated at this capacity so the
    /// whole population stays crossover-compatible.
    pub genome_length: usize,
    pub elitism_rate: f64,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub crossover_points: usize,
    pub report_interval: u64,
    /// `None` runs until cancelled.
    pub max_generations: Option<u64>,
    pub seed: Option<u64>,
}

pub trait ProgressCallback {
    fn on_generation_complete(&mut self, generation: u64, best_fitness: u64);
    fn on_genome_evaluated(&mut self, genome_num: usize, total: usize);
}

#[derive(Debug, Clone)]
pub struct EvolutionSummary {
    pub generations: u64,
    pub best_fitness: u64,
    pub best_genome: Genome,
}

pub struct EvolutionEngine<E: FitnessEvaluator> {
    config: EngineConfig,
    template: TemplateEngine,
    evaluator: E,
    rng: StdRng,
}

impl<E: FitnessEvaluator> EvolutionEngine<E> {
    pub fn new(config: EngineConfig, template: TemplateEngine, evaluator: E) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            template,
            evaluator,
            rng,
        }
    }

    /// Run the evolution loop until the cancel flag is raised or the
    /// configured generation limit is reached.
    pub fn run<C: ProgressCallback>(
        &mut self,
        cancel: &AtomicBool,
        callback: &mut C,
    ) -> Result<EvolutionSummary> {
        let mut population = self.initialize_population();
        let mut summary = EvolutionSummary {
            generations: 0,
            best_fitness: 0,
            best_genome: Vec::new(),
        };

        let mut generation: u64 = 0;
        loop {
            if cancel.load(Ordering::SeqCst) {
                log::info!("cancellation requested, stopping after {generation} generations");
                break;
            }
            if let Some(max) = self.config.max_generations {
                if generation >= max {
                    break;
                }
            }

            let evaluated = self.evaluate_population(&population, callback);

            let mut generation_best: u64 = 0;
            for (genome, fitness) in &evaluated {
                generation_best = generation_best.max(*fitness);
                if *fitness > summary.best_fitness || summary.best_genome.is_empty() {
                    summary.best_fitness = *fitness;
                    summary.best_genome = genome.clone();
                }
            }

            if generation % self.config.report_interval.max(1) == 0 {
                callback.on_generation_complete(generation, generation_best);
            }

            population = self.next_generation(&evaluated)?;
            generation += 1;
            summary.generations = generation;
        }

        Ok(summary)
    }

    /// Seed N genomes from the same template at the same capacity.
    pub fn initialize_population(&mut self) -> Vec<Genome> {
        (0..self.config.population_size)
            .map(|_| {
                self.template
                    .generate(self.config.genome_length, &mut self.rng)
            })
            .collect()
    }

    /// Score every genome. A failed evaluation is logged and scored 0 so a
    /// flaky target state cannot abort the run.
    pub fn evaluate_population<C: ProgressCallback>(
        &mut self,
        population: &[Genome],
        callback: &mut C,
    ) -> Vec<(Genome, u64)> {
        let total = population.len();
        population
            .iter()
            .enumerate()
            .map(|(i, genome)| {
                callback.on_genome_evaluated(i + 1, total);
                let fitness = match self.evaluator.evaluate(genome) {
                    Ok(fitness) => fitness,
                    Err(err) => {
                        log::warn!("fitness evaluation failed: {err}; assigning zero fitness");
                        0
                    }
                };
                (genome.clone(), fitness)
            })
            .collect()
    }

    /// Elitist generational replacement: carry the top performers unchanged,
    /// fill the rest from tournament-selected parents with crossover at
    /// `crossover_rate` (a lone parent passes through otherwise), then
    /// mutation at `mutation_rate`.
    pub fn next_generation(&mut self, evaluated: &[(Genome, u64)]) -> Result<Vec<Genome>> {
        let size = self.config.population_size;
        let mut next_generation = Vec::with_capacity(size);

        let elite_count = (size as f64 * self.config.elitism_rate) as usize;
        let mut sorted: Vec<&(Genome, u64)> = evaluated.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        for (genome, _) in sorted.iter().take(elite_count) {
            next_generation.push(genome.clone());
        }

        while next_generation.len() < size {
            let offspring = if self.rng.gen::<f64>() < self.config.crossover_rate {
                let parent1 =
                    tournament_selection(evaluated, self.config.tournament_size, &mut self.rng);
                let parent2 =
                    tournament_selection(evaluated, self.config.tournament_size, &mut self.rng);
                let (child1, child2) = n_point_crossover(
                    &parent1,
                    &parent2,
                    self.config.crossover_points,
                    &mut self.rng,
                )?;
                vec![child1, child2]
            } else {
                vec![tournament_selection(
                    evaluated,
                    self.config.tournament_size,
                    &mut self.rng,
                )]
            };

            for child in offspring {
                if next_generation.len() >= size {
                    break;
                }
                let child = if self.rng.gen::<f64>() < self.config.mutation_rate {
                    mutate(&child, &mut self.rng)
                } else {
                    child
                };
                next_generation.push(child);
            }
        }

        next_generation.truncate(size);
        Ok(next_generation)
    }
}
