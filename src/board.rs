use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::direction::Direction;
use crate::error::{Malformation, PuzzleError};
use crate::point::Point;
use crate::State;

pub const WIDTH: usize = 3;
pub const CELLS: usize = WIDTH * WIDTH;
pub const BLANK: u8 = 0;

/// Tiles in order with the blank in the bottom right corner
pub const GOAL: [u8; CELLS] = [1, 2, 3, 4, 5, 6, 7, 8, BLANK];

/// One configuration of the 3x3 sliding puzzle
///
/// Boards are always a permutation of `0..9` and never change once built; every move produces a
/// new board. The city-block distance to the goal is computed once on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Board {
    tiles: [u8; CELLS],
    heuristic: u32,
}

// Where a tile lives on the solved board
fn goal_index(tile: u8) -> usize {
    if tile == BLANK {
        CELLS - 1
    } else {
        tile as usize - 1
    }
}

fn compute_heuristic(tiles: &[u8; CELLS]) -> u32 {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != BLANK)
        .map(|(index, &tile)| {
            let current = Point::from_index(index, WIDTH);
            let goal = Point::from_index(goal_index(tile), WIDTH);
            current.manhattan_distance(goal) as u32
        })
        .sum()
}

// Index of the tile that would slide into the blank, if that move stays on the board
fn source_index(blank: usize, direction: Direction) -> Option<usize> {
    let source = blank as isize + direction.source_offset(WIDTH);
    if source < 0 || source >= CELLS as isize {
        return None;
    }

    let source = source as usize;
    if direction.is_horizontal() && source / WIDTH != blank / WIDTH {
        return None;
    }

    Some(source)
}

impl Board {
    // Callers guarantee tiles is already a permutation
    fn from_permutation(tiles: [u8; CELLS]) -> Board {
        Board {
            tiles,
            heuristic: compute_heuristic(&tiles),
        }
    }

    /// Build a board from raw tile values, checking that they form a permutation of `0..9`
    pub fn from_tiles(tiles: [u8; CELLS]) -> Result<Board, PuzzleError> {
        for (position, &value) in tiles.iter().enumerate() {
            if value as usize >= CELLS {
                return Err(Malformation::TileOutOfRange { position, value }.into());
            }
        }

        let mut counts = [0; CELLS];
        for &tile in tiles.iter() {
            counts[tile as usize] += 1;
        }

        let duplicate = counts.iter().position(|&count| count > 1);
        let missing = counts.iter().position(|&count| count == 0);
        if let (Some(tile), Some(missing)) = (duplicate, missing) {
            return Err(Malformation::DuplicateTile {
                tile: tile as u8,
                missing: missing as u8,
            }
            .into());
        }

        Ok(Board::from_permutation(tiles))
    }

    pub fn goal() -> Board {
        Board::from_permutation(GOAL)
    }

    /// A uniformly random permutation; about half of these cannot be solved
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Board {
        let mut tiles = GOAL;
        tiles.shuffle(rng);
        Board::from_permutation(tiles)
    }

    /// A random board drawn from the half of all permutations that can reach the goal
    pub fn random_solvable<R: Rng + ?Sized>(rng: &mut R) -> Board {
        loop {
            let board = Board::random(rng);
            if board.is_solvable() {
                return board;
            }
        }
    }

    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    pub fn tile_at(&self, index: usize) -> u8 {
        self.tiles[index]
    }

    pub fn heuristic(&self) -> u32 {
        self.heuristic
    }

    pub fn is_goal(&self) -> bool {
        self.tiles == GOAL
    }

    /// Concatenated tile digits, e.g. `123456780` for the goal
    pub fn key(&self) -> String {
        self.tiles
            .iter()
            .map(|&tile| char::from(b'0' + tile))
            .collect()
    }

    pub fn blank_index(&self) -> usize {
        match self.tiles.iter().position(|&tile| tile == BLANK) {
            Some(index) => index,
            None => unreachable!("board without a blank: {:?}", self.tiles),
        }
    }

    /// Even number of inversions among the numbered tiles
    ///
    /// On an odd-width board a slide never changes inversion parity, so this splits the
    /// permutations into the two components of the move graph.
    pub fn is_solvable(&self) -> bool {
        let numbered: Vec<u8> = self
            .tiles
            .iter()
            .copied()
            .filter(|&tile| tile != BLANK)
            .collect();

        let mut inversions = 0;
        for (i, a) in numbered.iter().enumerate() {
            inversions += numbered[i + 1..].iter().filter(|&b| b < a).count();
        }

        inversions % 2 == 0
    }

    /// Slide the neighbouring tile in the given direction into the blank
    pub fn slide(&self, direction: Direction) -> Option<Board> {
        let blank = self.blank_index();
        let source = source_index(blank, direction)?;

        let mut tiles = self.tiles;
        tiles.swap(blank, source);
        Some(Board::from_permutation(tiles))
    }

    /// The direction that would move the given tile into the blank, if it is adjacent
    pub fn direction_of(&self, tile: u8) -> Option<Direction> {
        if tile == BLANK {
            return None;
        }

        let blank = self.blank_index();
        Direction::all()
            .into_iter()
            .find(|&direction| source_index(blank, direction).map(|i| self.tiles[i]) == Some(tile))
    }

    /// Move a numbered tile into the blank
    pub fn try_move(&self, tile: u8) -> Result<Board, PuzzleError> {
        self.direction_of(tile)
            .and_then(|direction| self.slide(direction))
            .ok_or(PuzzleError::IllegalMove { tile })
    }

    /// Every legal move in the order up, down, left, right
    pub fn successors(&self) -> impl Iterator<Item = (Direction, Board)> {
        let board = *self;
        Direction::all()
            .into_iter()
            .filter_map(move |direction| board.slide(direction).map(|next| (direction, next)))
    }
}

impl State for Board {
    type Step = Direction;

    fn next_states(&self) -> Vec<(Direction, Board)> {
        self.successors().collect()
    }

    fn heuristic(&self) -> u32 {
        self.heuristic
    }

    fn stringify(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Board {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let found = s.chars().count();
        if found != CELLS {
            return Err(Malformation::WrongLength { found }.into());
        }

        let mut tiles = [BLANK; CELLS];
        for (position, c) in s.chars().enumerate() {
            tiles[position] = match c.to_digit(10) {
                Some(digit) if (digit as usize) < CELLS => digit as u8,
                _ => return Err(Malformation::InvalidCharacter { position, found: c }.into()),
            };
        }

        Board::from_tiles(tiles)
    }
}

impl TryFrom<&str> for Board {
    type Error = PuzzleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Board {
    type Error = PuzzleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Board> for String {
    fn from(board: Board) -> String {
        board.key()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = format!("+{}+", "-".repeat(WIDTH * 2 + 1));

        writeln!(f, "{border}")?;
        for row in self.tiles.chunks(WIDTH) {
            write!(f, "|")?;
            for &tile in row {
                if tile == BLANK {
                    write!(f, "  ")?;
                } else {
                    write!(f, " {tile}")?;
                }
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "{border}")
    }
}
