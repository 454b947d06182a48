//! Grid positions and movement directions.

use std::fmt;

/// A `(row, col)` coordinate on the garden grid.
///
/// Coordinates are signed so that neighbour arithmetic near the origin
/// cannot underflow; validity against a particular grid's bounds is a
/// separate check performed by the grid itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    /// Row index, 0 at the top.
    pub row: i32,
    /// Column index, 0 at the left.
    pub col: i32,
}

impl GridPos {
    /// Construct a position from row and column indices.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The position one cell away in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.offset();
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// Cardinal movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Row − 1.
    Up = 0,
    /// Row + 1.
    Down = 1,
    /// Column − 1.
    Left = 2,
    /// Column + 1.
    Right = 3,
}

impl Direction {
    /// All four directions in action-set order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the `(row_offset, col_offset)` for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_applies_offsets() {
        let p = GridPos::new(2, 3);
        assert_eq!(p.step(Direction::Up), GridPos::new(1, 3));
        assert_eq!(p.step(Direction::Down), GridPos::new(3, 3));
        assert_eq!(p.step(Direction::Left), GridPos::new(2, 2));
        assert_eq!(p.step(Direction::Right), GridPos::new(2, 4));
    }

    #[test]
    fn step_can_leave_the_first_quadrant() {
        // Bounds checking is the grid's job, not the coordinate's.
        let p = GridPos::new(0, 0);
        assert_eq!(p.step(Direction::Up), GridPos::new(-1, 0));
        assert_eq!(p.step(Direction::Left), GridPos::new(0, -1));
    }

    #[test]
    fn opposite_directions_cancel() {
        let p = GridPos::new(5, 5);
        for d in Direction::ALL {
            let back = match d {
                Direction::Up => Direction::Down,
                Direction::Down => Direction::Up,
                Direction::Left => Direction::Right,
                Direction::Right => Direction::Left,
            };
            assert_eq!(p.step(d).step(back), p);
        }
    }
}
