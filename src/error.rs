use thiserror::Error;

/// Everything that can go wrong when building or editing a genome
///
/// The genetic operators themselves never fail: the only errors come from
/// handing in values that would break the genome's invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenomeError {
    #[error("Invalid probability: {0} (must be within 0.0..=1.0)")]
    InvalidProbability(f64),

    #[error("Tile index out of range: {0} (genome has 256 tiles)")]
    TileIndexOutOfRange(usize),

    #[error("Wrong tile count: {0} (genome needs exactly 256)")]
    WrongTileCount(usize),

    #[error("Tile type out of range: {0} (must be below 128)")]
    TileTypeOutOfRange(u8),

    #[error("Colour out of range: {0} (must be below 16)")]
    ColourOutOfRange(u8),
}

pub type Result<T> = std::result::Result<T, GenomeError>;
