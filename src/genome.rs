// Import our gene type and its ranges
use crate::genes::{wrap, Tile, NUM_COLOURS};
use crate::error::{GenomeError, Result};
use crate::fitness::Fitness;
use crate::random::{bool_prob, mutation_delta, EntropySource, Probability};

// Serialization support for the CLI's JSON output
use serde::{Deserialize, Serialize, Serializer};

use std::fmt;

/// Tiles along one side of the grid
pub const GRID_SIZE: usize = 16;

/// Tiles in one genome (16x16 grid, row-major)
pub const NUM_TILES: usize = GRID_SIZE * GRID_SIZE;

/// Fields one `mutate()` call can touch: one background plus type and colour per tile
pub const NUM_FIELDS: usize = 1 + NUM_TILES * 2;

/// One candidate image: a 16x16 grid of PETSCII tiles plus a background colour
///
/// **Rust Concept: Fixed-size arrays**
/// `[Tile; NUM_TILES]` has its length baked into the type. Two genomes can
/// never disagree on shape, so crossover needs no runtime size check.
///
/// Each `Genome` owns its tiles outright - there is no shared state between
/// instances, so a child from [`Genome::crossover`] is fully independent of its
/// parents and genomes can be mutated from different threads at once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGenome")]
pub struct Genome {
    #[serde(serialize_with = "serialize_tiles")]
    tiles: [Tile; NUM_TILES],

    background_colour: u8,

    /// Per-field probability that a mutation fires during `mutate()`
    mutation_chance: Probability,
}

/// Unchecked wire form of a [`Genome`]
#[derive(Deserialize)]
struct RawGenome {
    tiles: Vec<Tile>,
    background_colour: u8,
    mutation_chance: Probability,
}

impl TryFrom<RawGenome> for Genome {
    type Error = GenomeError;

    fn try_from(raw: RawGenome) -> Result<Self> {
        if raw.background_colour >= NUM_COLOURS {
            return Err(GenomeError::ColourOutOfRange(raw.background_colour));
        }
        let tiles: [Tile; NUM_TILES] = raw
            .tiles
            .try_into()
            .map_err(|rejected: Vec<Tile>| GenomeError::WrongTileCount(rejected.len()))?;

        Ok(Self {
            tiles,
            background_colour: raw.background_colour,
            mutation_chance: raw.mutation_chance,
        })
    }
}

/// serde's derive only covers arrays up to 32 elements, so write the tiles as a sequence
fn serialize_tiles<S: Serializer>(
    tiles: &[Tile; NUM_TILES],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(tiles.iter())
}

impl Default for Genome {
    fn default() -> Self {
        Self::new()
    }
}

impl Genome {
    /// Create a blank genome: every tile `(0, 0)`, background 0, default mutation chance
    ///
    /// A blank genome is only a starting point - call [`randomize`](Self::randomize)
    /// or build one with [`crossover`](Self::crossover) before evolving it.
    pub fn new() -> Self {
        Self {
            tiles: [Tile::default(); NUM_TILES],
            background_colour: 0,
            mutation_chance: Probability::DEFAULT_MUTATION_CHANCE,
        }
    }

    /// Create a blank genome with a custom mutation chance
    pub fn with_mutation_chance(rate: f64) -> Result<Self> {
        let mut genome = Self::new();
        genome.set_mutation_chance(rate)?;
        Ok(genome)
    }

    /// Overwrite every field with a uniformly random value
    ///
    /// Uses the calling thread's generator. See [`randomize_with`](Self::randomize_with)
    /// to supply your own.
    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::thread_rng());
    }

    /// Overwrite every field with a uniformly random value drawn from `source`
    ///
    /// All 513 values are drawn independently: each tile's character from `0..128`,
    /// each tile's colour from `0..16`, then the background from `0..16`.
    pub fn randomize_with<E: EntropySource + ?Sized>(&mut self, source: &mut E) {
        for tile in self.tiles.iter_mut() {
            *tile = Tile::random(source);
        }
        self.background_colour = source.below(u32::from(NUM_COLOURS)) as u8;
    }

    /// Randomly perturb this genome in place, using the calling thread's generator
    ///
    /// Returns `&mut Self` so calls can be chained: `genome.mutate().mutate()`.
    pub fn mutate(&mut self) -> &mut Self {
        self.mutate_with(&mut rand::thread_rng())
    }

    /// Randomly perturb this genome in place, drawing from `source`
    ///
    /// **Mutation scheme:**
    /// 1. With probability `mutation_chance`, shift the background colour
    /// 2. For every tile, independently:
    ///    - with probability `mutation_chance`, shift its colour
    ///    - with probability `mutation_chance`, shift its character
    ///
    /// Every shift draws its own signed step from [`mutation_delta`] and wraps
    /// around the valid range, so a tile can get zero, one or both mutations.
    pub fn mutate_with<E: EntropySource + ?Sized>(&mut self, source: &mut E) -> &mut Self {
        let chance = self.mutation_chance;
        let mut fired = 0usize;

        if bool_prob(source, chance) {
            let delta = mutation_delta(source);
            self.background_colour = wrap(self.background_colour, delta, NUM_COLOURS);
            fired += 1;
        }

        for tile in self.tiles.iter_mut() {
            if bool_prob(source, chance) {
                tile.shift_colour(mutation_delta(source));
                fired += 1;
            }
            if bool_prob(source, chance) {
                tile.shift_type(mutation_delta(source));
                fired += 1;
            }
        }

        log::debug!(
            "mutate: {} of {} fields mutated (chance {})",
            fired,
            NUM_FIELDS,
            chance.value()
        );

        self
    }

    /// Breed this genome with `other` using the calling thread's generator
    pub fn crossover(&self, other: &Genome) -> Genome {
        self.crossover_with(other, &mut rand::thread_rng())
    }

    /// Breed this genome with `other`, drawing coin flips from `source`
    ///
    /// **Genetic Operator: Uniform Crossover**
    /// Every field is inherited on its own 50/50 coin flip: a tile's character
    /// and its colour can come from different parents, and the background has
    /// its own flip. Neither parent is modified.
    ///
    /// The child is a fresh genome: it starts at the default mutation chance,
    /// whatever either parent's chance is.
    pub fn crossover_with<E: EntropySource + ?Sized>(
        &self,
        other: &Genome,
        source: &mut E,
    ) -> Genome {
        let mut child = Genome {
            tiles: self.tiles,
            background_colour: self.background_colour,
            mutation_chance: Probability::DEFAULT_MUTATION_CHANCE,
        };
        let mut from_other = 0usize;

        // `.zip()` pairs up tiles from both parents - same length by construction
        for ((slot, mine), theirs) in child.tiles.iter_mut().zip(&self.tiles).zip(&other.tiles) {
            let type_from = if bool_prob(source, Probability::HALF) {
                *mine
            } else {
                from_other += 1;
                *theirs
            };
            let colour_from = if bool_prob(source, Probability::HALF) {
                *mine
            } else {
                from_other += 1;
                *theirs
            };
            *slot = Tile::combine(type_from, colour_from);
        }

        if !bool_prob(source, Probability::HALF) {
            child.background_colour = other.background_colour;
            from_other += 1;
        }

        log::trace!(
            "crossover: {} of {} fields inherited from other parent",
            from_other,
            NUM_FIELDS
        );

        child
    }

    /// Score this genome with a fitness strategy (lower is better)
    pub fn calculate_fitness<F: Fitness + ?Sized>(&self, fitness: &F) -> f64 {
        fitness.score(self)
    }

    /// Change the per-field mutation chance used by later `mutate()` calls
    ///
    /// # Errors
    /// Returns [`GenomeError::InvalidProbability`] if `rate` is NaN or outside `0.0..=1.0`.
    /// The current chance is left untouched in that case.
    pub fn set_mutation_chance(&mut self, rate: f64) -> Result<()> {
        self.mutation_chance = Probability::new(rate)?;
        Ok(())
    }

    pub fn mutation_chance(&self) -> f64 {
        self.mutation_chance.value()
    }

    pub fn background_colour(&self) -> u8 {
        self.background_colour
    }

    /// Set the background colour directly
    ///
    /// # Errors
    /// Returns [`GenomeError::ColourOutOfRange`] for colours `>= 16`.
    pub fn set_background_colour(&mut self, colour: u8) -> Result<()> {
        if colour >= NUM_COLOURS {
            return Err(GenomeError::ColourOutOfRange(colour));
        }
        self.background_colour = colour;
        Ok(())
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> &[Tile; NUM_TILES] {
        &self.tiles
    }

    /// Tile at a row-major index, `None` past the end
    pub fn tile(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    /// Tile at `(row, col)` in the 16x16 grid
    pub fn tile_at(&self, row: usize, col: usize) -> Option<Tile> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        self.tile(row * GRID_SIZE + col)
    }

    /// Replace the tile at a row-major index
    ///
    /// # Errors
    /// Returns [`GenomeError::TileIndexOutOfRange`] for indices `>= 256`.
    pub fn set_tile(&mut self, index: usize, tile: Tile) -> Result<()> {
        let slot = self
            .tiles
            .get_mut(index)
            .ok_or(GenomeError::TileIndexOutOfRange(index))?;
        *slot = tile;
        Ok(())
    }

    /// Iterate over the grid one row (16 tiles) at a time
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.tiles.chunks(GRID_SIZE)
    }

    /// How many of the 513 fields differ between two genomes
    ///
    /// Character and colour are counted separately, so a tile can contribute 0, 1 or 2.
    pub fn diff_count(&self, other: &Genome) -> usize {
        let tile_diffs: usize = self
            .tiles
            .iter()
            .zip(&other.tiles)
            .map(|(a, b)| {
                usize::from(a.tile_type() != b.tile_type()) + usize::from(a.colour() != b.colour())
            })
            .sum();

        tile_diffs + usize::from(self.background_colour != other.background_colour)
    }
}

/// Text dump of the grid: one line per row, each tile as `character:colour` in hex
impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|tile| format!("{:02x}:{:x}", tile.tile_type(), tile.colour()))
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        write!(f, "background: {:x}", self.background_colour)
    }
}
