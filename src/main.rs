use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;

use genfuzz::config::{AppConfig, ConfigManager};
use genfuzz::engines::evaluation::{CoverageEvaluator, TargetClient, TcpCoverageOracle};
use genfuzz::engines::generation::progress::ConsoleProgressCallback;
use genfuzz::engines::generation::{EngineConfig, EvolutionEngine};
use genfuzz::template::{GeneratorRegistry, TemplateEngine};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "genfuzz.toml".to_string());
    let manager = ConfigManager::new();
    if Path::new(&config_path).exists() {
        manager
            .load_from_file(&config_path)
            .with_context(|| format!("loading configuration from {config_path}"))?;
    } else {
        log::warn!("configuration file {config_path} not found, using defaults");
    }
    let config = manager.get();

    let source = std::fs::read_to_string(&config.fuzzer.template_path)
        .with_context(|| format!("reading template {}", config.fuzzer.template_path))?;
    let registry = GeneratorRegistry::new();
    let template = TemplateEngine::parse(&source, &registry).context("parsing template")?;

    let oracle = TcpCoverageOracle::new(
        &config.network.oracle_addr,
        config.network.oracle_retry_count,
        config.network.connect_timeout(),
        config.network.io_timeout(),
    )?;
    let target = TargetClient::new(
        &config.network.target_addr,
        config.network.connect_timeout(),
        config.network.io_timeout(),
    )?;
    let evaluator = CoverageEvaluator::new(oracle, target);

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst))
            .context("installing signal handler")?;
    }

    log::info!(
        "fuzzing {} with coverage oracle {}",
        config.network.target_addr,
        config.network.oracle_addr
    );

    let mut engine = EvolutionEngine::new(engine_config(&config), template, evaluator);
    let summary = engine.run(&cancel, &mut ConsoleProgressCallback)?;

    log::info!(
        "stopped after {} generations, best fitness {}",
        summary.generations,
        summary.best_fitness
    );
    Ok(())
}

fn engine_config(config: &AppConfig) -> EngineConfig {
    EngineConfig {
        population_size: config.evolution.population_size,
        genome_length: config.fuzzer.max_request_size,
        elitism_rate: config.evolution.elitism_rate,
        crossover_rate: config.evolution.crossover_rate,
        mutation_rate: config.evolution.mutation_rate,
        tournament_size: config.evolution.tournament_size,
        crossover_points: config.evolution.crossover_points,
        report_interval: config.evolution.report_interval_generations,
        max_generations: config.evolution.max_generations,
        seed: config.evolution.seed,
    }
}
