// Fitness strategies for scoring genomes
//
// The genome never scores itself: a driver picks a strategy and hands it to
// `Genome::calculate_fitness`. Scores follow one convention - lower is better -
// so a population can be sorted ascending and the best genome comes first.

use crate::genome::Genome;

/// Anything that can rank a genome
///
/// **Rust Concept: Traits as strategies**
/// A trait describes a capability ("can score a genome") without fixing how.
/// Image comparison, aesthetic heuristics or a test closure can all plug in.
pub trait Fitness {
    /// Score `genome`; lower is better
    fn score(&self, genome: &Genome) -> f64;
}

/// Closures work as fitness functions too: `genome.calculate_fitness(&|g: &Genome| ...)`
impl<F> Fitness for F
where
    F: Fn(&Genome) -> f64,
{
    fn score(&self, genome: &Genome) -> f64 {
        self(genome)
    }
}

/// Placeholder strategy: every genome scores `f64::INFINITY`
///
/// Useful as a marker for "not evaluated yet". Every genome ties, so it
/// cannot drive selection on its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unscored;

impl Fitness for Unscored {
    fn score(&self, _genome: &Genome) -> f64 {
        f64::INFINITY
    }
}

/// Field-by-field distance to a reference genome
///
/// Counts the characters, colours and background that differ from the
/// reference, each weighted. A genome identical to the reference scores 0.0.
#[derive(Clone, Debug)]
pub struct TileDistance {
    reference: Genome,
    type_weight: f64,
    colour_weight: f64,
    background_weight: f64,
}

impl TileDistance {
    /// Compare against `reference`, every kind of mismatch weighted 1.0
    pub fn new(reference: Genome) -> Self {
        Self::with_weights(reference, 1.0, 1.0, 1.0)
    }

    /// Compare against `reference` with custom per-field weights
    ///
    /// Colour mismatches usually matter more to the eye than glyph mismatches
    /// on small tiles, so callers may want `colour_weight > type_weight`.
    pub fn with_weights(
        reference: Genome,
        type_weight: f64,
        colour_weight: f64,
        background_weight: f64,
    ) -> Self {
        Self {
            reference,
            type_weight,
            colour_weight,
            background_weight,
        }
    }

    pub fn reference(&self) -> &Genome {
        &self.reference
    }
}

impl Fitness for TileDistance {
    fn score(&self, genome: &Genome) -> f64 {
        let tiles: f64 = genome
            .tiles()
            .iter()
            .zip(self.reference.tiles())
            .map(|(tile, target)| {
                let mut cost = 0.0;
                if tile.tile_type() != target.tile_type() {
                    cost += self.type_weight;
                }
                if tile.colour() != target.colour() {
                    cost += self.colour_weight;
                }
                cost
            })
            .sum();

        let background = if genome.background_colour() != self.reference.background_colour() {
            self.background_weight
        } else {
            0.0
        };

        tiles + background
    }
}
