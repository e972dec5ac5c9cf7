// Benchmark suite for the genetic operators
//
// Measures randomize, mutate (at a low and a high mutation chance) and crossover
// on a seeded generator so runs are comparable.
//
// Run with: cargo bench --bench genome_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use petscii_genome::Genome;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_genome(rng: &mut StdRng) -> Genome {
    let mut genome = Genome::new();
    genome.randomize_with(rng);
    genome
}

/// Benchmark a full mutate() pass at different mutation chances
fn benchmark_mutate(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutate");
    let mut rng = StdRng::seed_from_u64(1);

    // 0.02 is the default; 0.5 makes most gates fire and exercises the step sampler
    for chance in [0.0, 0.02, 0.5].iter() {
        let mut genome = random_genome(&mut rng);
        genome
            .set_mutation_chance(*chance)
            .expect("benchmark chances are valid probabilities");

        group.bench_with_input(BenchmarkId::from_parameter(chance), chance, |b, _| {
            b.iter(|| {
                black_box(genome.mutate_with(&mut rng));
            })
        });
    }

    group.finish();
}

/// Benchmark randomize and crossover
fn benchmark_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");
    let mut rng = StdRng::seed_from_u64(2);

    let mut genome = Genome::new();
    group.bench_function("randomize", |b| {
        b.iter(|| genome.randomize_with(black_box(&mut rng)))
    });

    let mom = random_genome(&mut rng);
    let dad = random_genome(&mut rng);
    group.bench_function("crossover", |b| {
        b.iter(|| black_box(mom.crossover_with(black_box(&dad), &mut rng)))
    });

    // Thread-local generator, as a driver without its own rng would use
    group.bench_function("crossover_thread_rng", |b| {
        b.iter(|| black_box(mom.crossover(black_box(&dad))))
    });

    group.finish();
}

criterion_group!(benches, benchmark_mutate, benchmark_operators);
criterion_main!(benches);
