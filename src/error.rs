use thiserror::Error;

/// Which board invariant a configuration broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformation {
    #[error("expected 9 tiles, found {found}")]
    WrongLength { found: usize },
    #[error("invalid character {found:?} at position {position}")]
    InvalidCharacter { position: usize, found: char },
    #[error("tile value {value} at position {position} is out of range 0-8")]
    TileOutOfRange { position: usize, value: u8 },
    #[error("tile {tile} appears more than once and tile {missing} is missing")]
    DuplicateTile { tile: u8, missing: u8 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("malformed configuration: {0}")]
    MalformedConfiguration(#[from] Malformation),
    #[error("illegal move: tile {tile} cannot slide into the blank")]
    IllegalMove { tile: u8 },
}
