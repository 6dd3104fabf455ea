use std::sync::atomic::AtomicBool;

use genfuzz::engines::evaluation::FitnessEvaluator;
use genfuzz::engines::generation::{
    EngineConfig, EvolutionEngine, Genome, ProgressCallback,
};
use genfuzz::error::{GenfuzzError, Result};
use genfuzz::template::{GeneratorRegistry, TemplateEngine};

/// Scores a genome by the sum of its bytes; optionally fails every call.
struct StubEvaluator {
    fail: bool,
}

impl FitnessEvaluator for StubEvaluator {
    fn evaluate(&mut self, genome: &[u8]) -> Result<u64> {
        if self.fail {
            return Err(GenfuzzError::Oracle("stub outage".to_string()));
        }
        Ok(genome.iter().map(|b| u64::from(*b)).sum())
    }
}

struct NullCallback;

impl ProgressCallback for NullCallback {
    fn on_generation_complete(&mut self, _generation: u64, _best_fitness: u64) {}
    fn on_genome_evaluated(&mut self, _genome_num: usize, _total: usize) {}
}

fn test_template() -> TemplateEngine {
    let registry = GeneratorRegistry::new();
    TemplateEngine::parse("literal-text \"AAAA\"\n", &registry).expect("template should parse")
}

fn test_config(genome_length: usize, max_generations: Option<u64>) -> EngineConfig {
    EngineConfig {
        population_size: 20,
        genome_length,
        elitism_rate: 0.8,
        crossover_rate: 0.3,
        mutation_rate: 0.6,
        tournament_size: 5,
        crossover_points: 10,
        report_interval: 10,
        max_generations,
        seed: Some(42),
    }
}

#[test]
fn population_size_stays_fixed() {
    let mut engine = EvolutionEngine::new(
        test_config(200, None),
        test_template(),
        StubEvaluator { fail: false },
    );

    let population = engine.initialize_population();
    assert_eq!(population.len(), 20);
    assert!(population.iter().all(|g| g.len() == 200));

    let evaluated = engine.evaluate_population(&population, &mut NullCallback);
    assert_eq!(evaluated.len(), 20);

    let next = engine.next_generation(&evaluated).expect("transition");
    assert_eq!(next.len(), 20);
    assert!(next.iter().all(|g| g.len() == 200));
}

#[test]
fn elites_carry_over_byte_identical() {
    let mut engine = EvolutionEngine::new(
        test_config(150, None),
        test_template(),
        StubEvaluator { fail: false },
    );

    let evaluated: Vec<(Genome, u64)> = (0..20u8)
        .map(|i| (vec![i; 150], u64::from(i)))
        .collect();

    let next = engine.next_generation(&evaluated).expect("transition");
    assert_eq!(next.len(), 20);

    // floor(20 * 0.8) = 16 elites, copied in fitness order.
    for (slot, expected) in (0..16).zip((4..=19u8).rev()) {
        assert_eq!(next[slot], vec![expected; 150], "elite slot {slot}");
    }
}

#[test]
fn run_respects_preset_cancel_flag() {
    let mut engine = EvolutionEngine::new(
        test_config(200, None),
        test_template(),
        StubEvaluator { fail: false },
    );

    let cancel = AtomicBool::new(true);
    let summary = engine.run(&cancel, &mut NullCallback).expect("run");
    assert_eq!(summary.generations, 0);
}

#[test]
fn run_stops_at_generation_limit() {
    let mut engine = EvolutionEngine::new(
        test_config(120, Some(3)),
        test_template(),
        StubEvaluator { fail: false },
    );

    let cancel = AtomicBool::new(false);
    let summary = engine.run(&cancel, &mut NullCallback).expect("run");
    assert_eq!(summary.generations, 3);
    // Seeds are "AAAA" + zero padding; at 120 bytes the change count is
    // drawn from [0, 1), so mutation never alters a byte and every genome
    // keeps the seed byte sum.
    assert_eq!(summary.best_fitness, 4 * u64::from(b'A'));
    assert_eq!(&summary.best_genome[..4], b"AAAA");
}

#[test]
fn failed_evaluations_score_zero_without_aborting() {
    let mut engine = EvolutionEngine::new(
        test_config(200, Some(2)),
        test_template(),
        StubEvaluator { fail: true },
    );

    let cancel = AtomicBool::new(false);
    let summary = engine.run(&cancel, &mut NullCallback).expect("run survives outage");
    assert_eq!(summary.generations, 2);
    assert_eq!(summary.best_fitness, 0);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut engine = EvolutionEngine::new(
            test_config(300, Some(4)),
            test_template(),
            StubEvaluator { fail: false },
        );
        let cancel = AtomicBool::new(false);
        engine.run(&cancel, &mut NullCallback).expect("run")
    };

    let first = run();
    let second = run();
    assert_eq!(first.best_fitness, second.best_fitness);
    assert_eq!(first.best_genome, second.best_genome);
}
