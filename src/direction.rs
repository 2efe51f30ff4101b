use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction a tile slides into the blank
///
/// `Up` means the tile below the blank moves up, so the blank itself moves down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl TryFrom<char> for Direction {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self> {
        match value {
            'U' | 'u' | '↑' => Ok(Direction::Up),
            'D' | 'd' | '↓' => Ok(Direction::Down),
            'L' | 'l' | '←' => Ok(Direction::Left),
            'R' | 'r' | '→' => Ok(Direction::Right),
            _ => Err(anyhow!("Invalid direction: {value}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Direction::Up => '↑',
            Direction::Down => '↓',
            Direction::Left => '←',
            Direction::Right => '→',
        };
        write!(f, "{c}")
    }
}

impl Direction {
    /// Every direction, in the order successors are generated
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    pub fn flip(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Index offset from the blank to the tile that slides into it on a row-major board
    pub fn source_offset(&self, width: usize) -> isize {
        match self {
            Direction::Up => width as isize,
            Direction::Down => -(width as isize),
            Direction::Left => 1,
            Direction::Right => -1,
        }
    }

    /// Left and right moves must stay within the blank's row
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}
