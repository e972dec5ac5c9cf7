// Import the clap derive macros for CLI argument parsing
use clap::{Parser, Subcommand};

// Import our library types
use petscii_genome::random::mutation_magnitude;
use petscii_genome::{mutation_delta, Genome, TileDistance};

use rand::rngs::StdRng;
use rand::SeedableRng;

use std::collections::BTreeMap;

/// PETSCII Genome - genetic operators for 16x16 character-tile images
///
/// Small driver around the genome library: inspect the mutation step
/// distribution, or build, breed and mutate a genome and print it.
#[derive(Parser)]
#[command(name = "petscii-genome")]
#[command(about = "Genetic operators for 16x16 PETSCII tile images", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a histogram of mutation step sizes
    ///
    /// Each step is ceil(Gamma(1, 1)), optionally with its random sign.
    Histogram {
        /// Number of steps to draw
        #[arg(short = 'n', long, default_value_t = 10_000)]
        samples: usize,

        /// Seed for a reproducible run (default: seeded from the OS)
        #[arg(long)]
        seed: Option<u64>,

        /// Include the random sign instead of only the magnitude
        #[arg(long)]
        signed: bool,
    },

    /// Randomize two genomes, cross them over, mutate the child and print it
    Genome {
        /// Seed for a reproducible run (default: seeded from the OS)
        #[arg(long)]
        seed: Option<u64>,

        /// Per-field mutation chance (0.0-1.0)
        ///
        /// Higher = more fields change per generation
        #[arg(short = 'm', long, default_value_t = 0.02)]
        mutation_rate: f64,

        /// Number of mutate() rounds to apply to the child
        #[arg(short, long, default_value_t = 0)]
        generations: usize,

        /// Print the child as JSON instead of a text grid
        #[arg(long)]
        json: bool,
    },
}

/// Main entry point for the CLI application
///
/// Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=debug petscii-genome genome -g 3`
fn main() {
    env_logger::init();

    // If parsing fails (invalid args), clap automatically prints help and exits
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Histogram {
            samples,
            seed,
            signed,
        } => {
            let mut rng = make_rng(seed);
            print_histogram(&mut rng, samples, signed);
        }
        Command::Genome {
            seed,
            mutation_rate,
            generations,
            json,
        } => {
            let mut rng = make_rng(seed);
            let child = breed_and_mutate(&mut rng, mutation_rate, generations)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&child)?);
            } else {
                println!("{}", child);
            }
        }
    }

    Ok(())
}

/// Seed once per run; the generator is never reseeded afterwards
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Draw `samples` steps and print one row per value with a bar of stars
///
/// Each star stands for `samples / 50` draws, so the bars stay the same
/// length whatever the sample count.
fn print_histogram(rng: &mut StdRng, samples: usize, signed: bool) {
    // BTreeMap keeps the keys sorted, so rows come out in order
    let mut histogram: BTreeMap<i32, usize> = BTreeMap::new();
    for _ in 0..samples {
        let step = if signed {
            mutation_delta(rng)
        } else {
            mutation_magnitude(rng)
        };
        *histogram.entry(step).or_insert(0) += 1;
    }

    let per_star = (samples / 50).max(1);
    for (step, count) in &histogram {
        println!("{:>3} {}", step, "*".repeat(count / per_star));
    }
}

/// Build two random parents, cross them over and mutate the child
fn breed_and_mutate(
    rng: &mut StdRng,
    mutation_rate: f64,
    generations: usize,
) -> petscii_genome::Result<Genome> {
    let mut mom = Genome::with_mutation_chance(mutation_rate)?;
    let mut dad = Genome::with_mutation_chance(mutation_rate)?;
    mom.randomize_with(rng);
    dad.randomize_with(rng);

    // A crossover child starts at the default chance, so apply the requested one
    let mut child = mom.crossover_with(&dad, rng);
    child.set_mutation_chance(mutation_rate)?;
    for _ in 0..generations {
        child.mutate_with(rng);
    }

    let from_mom = TileDistance::new(mom);
    let from_dad = TileDistance::new(dad);
    log::info!(
        "Child after {} generation(s): distance {} from first parent, {} from second",
        generations,
        child.calculate_fitness(&from_mom),
        child.calculate_fitness(&from_dad)
    );

    Ok(child)
}
