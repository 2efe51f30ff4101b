/// A cell position on the board, `x` being the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: isize,
    pub y: isize,
}

impl Point {
    // Positions are stored row-major, so index / width is the row
    pub fn from_index(index: usize, width: usize) -> Point {
        Point {
            x: (index % width) as isize,
            y: (index / width) as isize,
        }
    }

    pub fn manhattan_distance(&self, other: Point) -> isize {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}
