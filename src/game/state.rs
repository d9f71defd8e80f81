use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::Direction;

/// Row the snake is laid out on when a run starts
const START_ROW: i32 = 2;

/// Column of the tail segment when a run starts
const START_TAIL_COLUMN: i32 = 2;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one unit in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Check if the cell lies inside the square `[0, size)²`
    pub fn is_within(&self, size: usize) -> bool {
        // Every i32 coordinate is below a size that does not fit in i32
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        self.x >= 0 && self.x < size && self.y >= 0 && self.y < size
    }
}

/// The player-controlled actor
///
/// Movement is split in two phases so the owner can inspect the proposed
/// head before anything is committed: [`Snake::advance`] computes the next
/// head cell and [`Snake::commit`] shifts the body onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Cell>,
    /// Direction used by the last advance
    direction: Direction,
    /// Direction the next advance will use
    pending_direction: Direction,
    /// Set when food was eaten, consumed by the next commit
    growth_pending: bool,
}

impl Snake {
    /// Create a snake of the given length lying on row 2, facing East
    ///
    /// The tail sits at (2, 2) and the head at (length + 1, 2).
    pub fn new(length: usize) -> Self {
        let head_x = START_TAIL_COLUMN + length as i32 - 1;
        let body = (0..length as i32)
            .map(|i| Cell::new(head_x - i, START_ROW))
            .collect();

        Self {
            body,
            direction: Direction::East,
            pending_direction: Direction::East,
            growth_pending: false,
        }
    }

    /// Create a snake from explicit segments, head first
    ///
    /// `body` must not be empty.
    pub fn from_cells(body: Vec<Cell>, direction: Direction) -> Self {
        debug_assert!(!body.is_empty(), "a snake needs at least a head");
        Self {
            body,
            direction,
            pending_direction: direction,
            growth_pending: false,
        }
    }

    /// Get the head cell
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Get the tail cell (last segment)
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_growing(&self) -> bool {
        self.growth_pending
    }

    /// Check if any segment, head and tail included, is on the cell
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Request the direction for the next advance
    ///
    /// A request for the reverse of the current direction is ignored.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if !self.direction.is_opposite(direction) {
            self.pending_direction = direction;
        }
    }

    /// Apply the pending direction and return the proposed head cell
    pub fn advance(&mut self) -> Cell {
        self.direction = self.pending_direction;
        self.head().moved_in_direction(self.direction)
    }

    /// Mark the snake to grow on the next commit
    pub fn grow(&mut self) {
        self.growth_pending = true;
    }

    /// Shift every segment onto its predecessor and place the new head
    ///
    /// When growing, the former tail cell is kept as the new last segment.
    pub fn commit(&mut self, new_head: Cell) {
        self.body.insert(0, new_head);

        if self.growth_pending {
            self.growth_pending = false;
        } else {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Kind of collision that ends a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    /// Head left the grid
    OutOfBounds,
    /// Head ran into the body
    SelfCollision,
    /// Head ran into an enemy
    EnemyCollision,
}

/// A collision detected during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind:?} at ({}, {})", .at.x, .at.y)]
pub struct CollisionError {
    pub kind: CollisionKind,
    /// The proposed head cell that collided
    pub at: Cell,
}

impl CollisionError {
    pub fn new(kind: CollisionKind, at: Cell) -> Self {
        Self { kind, at }
    }
}

/// Lifecycle of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    NotStarted,
    Running,
    Stopped,
}

/// Read-only view of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Body segments, head first
    pub body: Vec<Cell>,
    pub food: Cell,
    pub enemies: Vec<Cell>,
    pub running: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_movement() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.moved_in_direction(Direction::East), Cell::new(6, 5));
        assert_eq!(cell.moved_in_direction(Direction::West), Cell::new(4, 5));
        assert_eq!(cell.moved_in_direction(Direction::South), Cell::new(5, 6));
        assert_eq!(cell.moved_in_direction(Direction::North), Cell::new(5, 4));
    }

    #[test]
    fn test_bounds_checking() {
        assert!(Cell::new(0, 0).is_within(50));
        assert!(Cell::new(49, 49).is_within(50));
        assert!(!Cell::new(-1, 0).is_within(50));
        assert!(!Cell::new(0, -1).is_within(50));
        assert!(!Cell::new(50, 0).is_within(50));
        assert!(!Cell::new(0, 50).is_within(50));
    }

    #[test]
    fn test_bounds_checking_huge_size() {
        let size = i32::MAX as usize + 10;
        assert!(Cell::new(0, 0).is_within(size));
        assert!(Cell::new(i32::MAX - 1, 7).is_within(size));
        assert!(!Cell::new(-1, 7).is_within(size));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(10);
        assert_eq!(snake.len(), 10);
        assert_eq!(snake.head(), Cell::new(11, 2));
        assert_eq!(snake.tail(), Cell::new(2, 2));
        assert_eq!(snake.direction(), Direction::East);
        assert!(!snake.is_growing());

        for (i, cell) in snake.body().iter().enumerate() {
            assert_eq!(*cell, Cell::new(11 - i as i32, 2));
        }
    }

    #[test]
    fn test_advance_does_not_move_body() {
        let mut snake = Snake::new(3);
        let body_before = snake.body().to_vec();

        let new_head = snake.advance();

        assert_eq!(new_head, Cell::new(5, 2));
        assert_eq!(snake.body(), body_before.as_slice());
    }

    #[test]
    fn test_commit_shifts_body() {
        let mut snake = Snake::new(3);
        let new_head = snake.advance();
        snake.commit(new_head);

        assert_eq!(snake.len(), 3);
        assert_eq!(
            snake.body(),
            &[Cell::new(5, 2), Cell::new(4, 2), Cell::new(3, 2)]
        );
    }

    #[test]
    fn test_commit_with_growth_keeps_tail() {
        let mut snake = Snake::new(3);
        let old_tail = snake.tail();

        snake.grow();
        let new_head = snake.advance();
        snake.commit(new_head);

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Cell::new(5, 2));
        assert_eq!(snake.tail(), old_tail);
        assert!(!snake.is_growing());

        // Growth is consumed, the next commit keeps the length
        let new_head = snake.advance();
        snake.commit(new_head);
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn test_reverse_is_ignored() {
        let mut snake = Snake::new(3);
        snake.set_pending_direction(Direction::West);
        snake.advance();
        assert_eq!(snake.direction(), Direction::East);
    }

    #[test]
    fn test_turn_applies_on_advance() {
        let mut snake = Snake::new(3);
        snake.set_pending_direction(Direction::South);
        assert_eq!(snake.direction(), Direction::East);

        let new_head = snake.advance();
        assert_eq!(snake.direction(), Direction::South);
        assert_eq!(new_head, Cell::new(4, 3));
    }

    #[test]
    fn test_reverse_checked_against_current_not_pending() {
        let mut snake = Snake::new(3);
        // North is accepted, then West is still the reverse of East
        snake.set_pending_direction(Direction::North);
        snake.set_pending_direction(Direction::West);
        snake.advance();
        assert_eq!(snake.direction(), Direction::North);
    }

    #[test]
    fn test_occupies() {
        let snake = Snake::new(3);
        assert!(snake.occupies(Cell::new(4, 2)));
        assert!(snake.occupies(Cell::new(2, 2)));
        assert!(!snake.occupies(Cell::new(5, 2)));
    }

    #[test]
    fn test_collision_error_display() {
        let err = CollisionError::new(CollisionKind::OutOfBounds, Cell::new(50, 2));
        assert_eq!(err.to_string(), "OutOfBounds at (50, 2)");
    }
}
