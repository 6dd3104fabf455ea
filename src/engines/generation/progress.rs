use super::evolution_engine::ProgressCallback;

/// Logs progress through the standard logger.
#[derive(Debug, Default)]
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_complete(&mut self, generation: u64, best_fitness: u64) {
        log::info!("generation {generation}: best fitness {best_fitness}");
    }

    fn on_genome_evaluated(&mut self, genome_num: usize, total: usize) {
        if genome_num % 25 == 0 || genome_num == total {
            log::debug!("evaluated {genome_num}/{total} genomes");
        }
    }
}
