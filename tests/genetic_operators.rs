use genfuzz::engines::generation::operators::{mutate, n_point_crossover, tournament_selection};
use genfuzz::engines::generation::Genome;
use genfuzz::error::GenfuzzError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_genome(len: usize, rng: &mut StdRng) -> Genome {
    (0..len).map(|_| rng.gen()).collect()
}

#[test]
fn crossover_preserves_length_and_material() {
    let mut rng = StdRng::seed_from_u64(1);
    let parent1 = random_genome(250, &mut rng);
    let parent2 = random_genome(250, &mut rng);

    let (child1, child2) =
        n_point_crossover(&parent1, &parent2, 10, &mut rng).expect("equal lengths");

    assert_eq!(child1.len(), 250);
    assert_eq!(child2.len(), 250);
    for i in 0..250 {
        assert!(child1[i] == parent1[i] || child1[i] == parent2[i]);
        assert!(child2[i] == parent1[i] || child2[i] == parent2[i]);
    }
}

#[test]
fn crossover_rejects_unequal_lengths() {
    let mut rng = StdRng::seed_from_u64(2);
    let parent1 = vec![0u8; 10];
    let parent2 = vec![0u8; 12];

    match n_point_crossover(&parent1, &parent2, 10, &mut rng) {
        Err(GenfuzzError::LengthMismatch { left, right }) => {
            assert_eq!((left, right), (10, 12));
        }
        other => panic!("expected length mismatch, got {other:?}"),
    }
}

#[test]
fn crossover_clamps_points_for_short_genomes() {
    let mut rng = StdRng::seed_from_u64(3);

    let tiny1 = vec![1u8];
    let tiny2 = vec![2u8];
    let (child1, child2) = n_point_crossover(&tiny1, &tiny2, 10, &mut rng).expect("length 1");
    assert_eq!((child1, child2), (tiny1, tiny2));

    let short1 = vec![1u8; 5];
    let short2 = vec![2u8; 5];
    let (child1, child2) = n_point_crossover(&short1, &short2, 10, &mut rng).expect("length 5");
    assert_eq!(child1.len(), 5);
    assert_eq!(child2.len(), 5);
}

#[test]
fn crossover_actually_mixes_segments() {
    let mut rng = StdRng::seed_from_u64(4);
    let parent1 = vec![0u8; 200];
    let parent2 = vec![0xffu8; 200];

    let (child1, _) = n_point_crossover(&parent1, &parent2, 10, &mut rng).expect("equal lengths");
    assert!(child1.contains(&0) && child1.contains(&0xff));
}

#[test]
fn mutation_is_noop_below_hundred_bytes() {
    let mut rng = StdRng::seed_from_u64(5);
    let genome = random_genome(99, &mut rng);
    assert_eq!(mutate(&genome, &mut rng), genome);
}

#[test]
fn mutation_preserves_length_and_change_budget() {
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let genome = random_genome(300, &mut rng);
        let mutated = mutate(&genome, &mut rng);

        assert_eq!(mutated.len(), genome.len());
        // max_changes = 3, so the drawn change count is at most 2.
        let differing = genome
            .iter()
            .zip(&mutated)
            .filter(|(a, b)| a != b)
            .count();
        assert!(differing <= 2, "too many mutated positions: {differing}");
    }
}

#[test]
fn tournament_over_whole_population_returns_maximum() {
    let mut rng = StdRng::seed_from_u64(6);
    let population: Vec<(Genome, u64)> = (0..10u8)
        .map(|i| (vec![i; 4], u64::from(i) * 7))
        .collect();

    let winner = tournament_selection(&population, 10, &mut rng);
    assert_eq!(winner, vec![9u8; 4]);
}

#[test]
fn tournament_selects_maximum_at_closed_form_rate() {
    // With 5 distinct samples out of 10, the population maximum is drawn
    // (and therefore wins) with probability 5/10.
    let mut rng = StdRng::seed_from_u64(7);
    let population: Vec<(Genome, u64)> = (0..10u8).map(|i| (vec![i; 4], u64::from(i))).collect();

    let trials = 20_000;
    let mut max_wins = 0;
    for _ in 0..trials {
        if tournament_selection(&population, 5, &mut rng) == vec![9u8; 4] {
            max_wins += 1;
        }
    }

    let frequency = f64::from(max_wins) / f64::from(trials);
    assert!(
        (frequency - 0.5).abs() < 0.03,
        "selection frequency {frequency} too far from 0.5"
    );
}
