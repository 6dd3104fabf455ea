use rand::Rng;

use crate::engines::generation::genome::Genome;
use crate::error::{GenfuzzError, Result};

/// Tournament selection: sample `tournament_size` distinct individuals
/// uniformly at random, return the one with the highest fitness. Ties go to
/// the first-seen candidate.
pub fn tournament_selection<R: Rng>(
    population: &[(Genome, u64)],
    tournament_size: usize,
    rng: &mut R,
) -> Genome {
    let amount = tournament_size.clamp(1, population.len());
    let mut sampled = rand::seq::index::sample(rng, population.len(), amount).into_iter();

    let mut best_idx = sampled.next().unwrap_or(0);
    for idx in sampled {
        if population[idx].1 > population[best_idx].1 {
            best_idx = idx;
        }
    }

    population[best_idx].0.clone()
}

/// N-point crossover: swap alternating segments between two equal-length
/// parents at `points` distinct cut positions (clamped to `len - 1` for
/// short genomes). Children keep the parents' length.
pub fn n_point_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    points: usize,
    rng: &mut R,
) -> Result<(Genome, Genome)> {
    if parent1.len() != parent2.len() {
        return Err(GenfuzzError::LengthMismatch {
            left: parent1.len(),
            right: parent2.len(),
        });
    }

    let len = parent1.len();
    if len <= 1 {
        return Ok((parent1.clone(), parent2.clone()));
    }

    let points = points.clamp(1, len - 1);
    let mut cuts: Vec<usize> = rand::seq::index::sample(rng, len - 1, points)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    cuts.sort_unstable();

    let mut child1 = Vec::with_capacity(len);
    let mut child2 = Vec::with_capacity(len);
    let mut from_first = true;
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(len)) {
        let (a, b) = if from_first {
            (parent1, parent2)
        } else {
            (parent2, parent1)
        };
        child1.extend_from_slice(&a[start..cut]);
        child2.extend_from_slice(&b[start..cut]);
        from_first = !from_first;
        start = cut;
    }

    Ok((child1, child2))
}

/// Mutation: overwrite up to `len / 100` random positions with random bytes.
/// For genomes shorter than 100 bytes this is a no-op, not an error. Returns
/// a new genome of the same length; the input is never touched.
pub fn mutate<R: Rng>(genome: &Genome, rng: &mut R) -> Genome {
    let max_changes = genome.len() / 100;
    if max_changes == 0 {
        return genome.clone();
    }

    let mut mutated = genome.clone();
    let count = rng.gen_range(0..max_changes);
    for _ in 0..count {
        let pos = rng.gen_range(0..mutated.len());
        mutated[pos] = rng.gen();
    }
    mutated
}
