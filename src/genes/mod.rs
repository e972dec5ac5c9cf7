// This file declares the genes module and its submodules
//
// A genome is made of 256 tile genes plus one background colour gene.
// The tile gene and its modular arithmetic live in tile.rs.

mod tile;

// Re-export so users can write `use petscii_genome::genes::Tile;`
pub use tile::{wrap, Tile, NUM_COLOURS, NUM_TYPES};
