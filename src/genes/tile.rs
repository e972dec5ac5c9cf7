// Import serialization traits - these allow converting our Tile to/from JSON
use serde::{Deserialize, Serialize};

use crate::error::{GenomeError, Result};
use crate::random::EntropySource;

/// Number of distinct characters in the PETSCII set
pub const NUM_TYPES: u8 = 128;

/// Number of colours in the Commodore 64 palette
pub const NUM_COLOURS: u8 = 16;

/// One character cell of the 16x16 grid
///
/// The `#[derive(...)]` macro automatically generates implementations for common traits:
/// - Copy: a Tile is two bytes, so it is copied instead of moved
/// - PartialEq/Eq: lets tests and fitness functions compare tiles directly
/// - Serialize/Deserialize: Allows converting to/from JSON
///
/// Both fields are private: [`Tile::new`] is the only way to build one from raw
/// numbers, so `tile_type < 128` and `colour < 16` always hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTile")]
pub struct Tile {
    tile_type: u8,
    colour: u8,
}

/// Unchecked wire form of a [`Tile`], validated on the way in
#[derive(Deserialize)]
struct RawTile {
    tile_type: u8,
    colour: u8,
}

impl TryFrom<RawTile> for Tile {
    type Error = GenomeError;

    fn try_from(raw: RawTile) -> Result<Self> {
        Tile::new(raw.tile_type, raw.colour)
    }
}

impl Tile {
    /// Build a tile, rejecting out-of-range character or colour indices
    pub fn new(tile_type: u8, colour: u8) -> Result<Self> {
        if tile_type >= NUM_TYPES {
            return Err(GenomeError::TileTypeOutOfRange(tile_type));
        }
        if colour >= NUM_COLOURS {
            return Err(GenomeError::ColourOutOfRange(colour));
        }
        Ok(Self { tile_type, colour })
    }

    /// Character index into the PETSCII set, `0..128`
    pub fn tile_type(&self) -> u8 {
        self.tile_type
    }

    /// Foreground colour index into the palette, `0..16`
    pub fn colour(&self) -> u8 {
        self.colour
    }

    /// Shift the character by `delta`, wrapping around the character set
    pub(crate) fn shift_type(&mut self, delta: i32) {
        self.tile_type = wrap(self.tile_type, delta, NUM_TYPES);
    }

    /// Shift the colour by `delta`, wrapping around the palette
    ///
    /// Only the colour changes; the character is left alone.
    pub(crate) fn shift_colour(&mut self, delta: i32) {
        self.colour = wrap(self.colour, delta, NUM_COLOURS);
    }

    /// Character from one tile, colour from another
    pub(crate) fn combine(type_from: Tile, colour_from: Tile) -> Self {
        Self {
            tile_type: type_from.tile_type,
            colour: colour_from.colour,
        }
    }

    /// Random tile, every character and colour equally likely
    pub(crate) fn random<E: EntropySource + ?Sized>(source: &mut E) -> Self {
        Self {
            tile_type: source.below(u32::from(NUM_TYPES)) as u8,
            colour: source.below(u32::from(NUM_COLOURS)) as u8,
        }
    }
}

/// Add a signed `delta` to `value` and wrap the result into `0..modulus`
///
/// **Rust Concept: rem_euclid vs %**
/// `%` keeps the sign of the left operand, so `(2 - 3) % 16` is `-1`.
/// `rem_euclid` always returns a value in `0..modulus`, which is the
/// wrap-around we want: `(2 - 3).rem_euclid(16)` is `15`.
///
/// The sum is computed in `i64` so even an `i32::MAX` delta cannot overflow.
pub fn wrap(value: u8, delta: i32, modulus: u8) -> u8 {
    (i64::from(value) + i64::from(delta)).rem_euclid(i64::from(modulus)) as u8
}
