use serde::{Deserialize, Serialize};

/// Direction the snake can face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::North, Direction::South)
                | (Direction::South, Direction::North)
                | (Direction::East, Direction::West)
                | (Direction::West, Direction::East)
        )
    }

    /// Returns true for North and South
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// Returns the delta (dx, dy) for moving in this direction
    ///
    /// The y axis grows downwards, so North decrements y.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::North.is_opposite(Direction::South));
        assert!(Direction::South.is_opposite(Direction::North));
        assert!(Direction::West.is_opposite(Direction::East));
        assert!(Direction::East.is_opposite(Direction::West));

        assert!(!Direction::North.is_opposite(Direction::West));
        assert!(!Direction::North.is_opposite(Direction::East));
        assert!(!Direction::East.is_opposite(Direction::East));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::North.delta(), (0, -1));
        assert_eq!(Direction::South.delta(), (0, 1));
        assert_eq!(Direction::West.delta(), (-1, 0));
        assert_eq!(Direction::East.delta(), (1, 0));
    }

    #[test]
    fn test_vertical() {
        assert!(Direction::North.is_vertical());
        assert!(Direction::South.is_vertical());
        assert!(!Direction::East.is_vertical());
        assert!(!Direction::West.is_vertical());
    }
}
