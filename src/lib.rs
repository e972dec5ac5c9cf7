// Library root for the PETSCII genome
//
// This file is the entry point for the library crate (petscii_genome)
// It declares all the modules that make up our library
//
// A genome encodes a 16x16 grid of PETSCII character tiles plus a background
// colour. The genetic operators (randomize, mutate, crossover) live on Genome;
// the randomness they draw on lives in `random`.

// Tile gene and modular arithmetic
pub mod genes;

// Random primitives: entropy source, Bernoulli gate, mutation step sampler
pub mod random;

// The evolvable individual and its operators
pub mod genome;

// Pluggable scoring strategies
pub mod fitness;

// Error type shared by constructors and setters
pub mod error;

// Re-export commonly used types at the library root for convenience
// This allows users to write:
//   use petscii_genome::Genome;
// instead of:
//   use petscii_genome::genome::Genome;
pub use error::{GenomeError, Result};
pub use fitness::{Fitness, TileDistance, Unscored};
pub use genes::{Tile, NUM_COLOURS, NUM_TYPES};
pub use genome::{Genome, GRID_SIZE, NUM_FIELDS, NUM_TILES};
pub use random::{bool_prob, mutation_delta, EntropySource, Probability};
