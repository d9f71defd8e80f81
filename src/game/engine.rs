use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

use super::{
    action::Direction,
    config::{EnemyPlacement, GameConfig},
    state::{Cell, CollisionError, CollisionKind, RunState, Snake, Snapshot},
};

/// User-facing message emitted on lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    /// Emitted by a successful start
    Welcome,
    /// Emitted by stop
    GameOver { score: usize },
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Welcome => write!(f, "Welcome to snake! (Press 'q' to quit the game)"),
            StatusMessage::GameOver { score } => write!(
                f,
                "Game over! ----- Score: {} ----- (Press 'r' to restart the game)",
                score
            ),
        }
    }
}

/// The simulation: one snake, one food cell and a growing set of enemies
///
/// Nothing here keeps time. A driver calls [`Simulation::tick`] at its own
/// cadence and calls [`Simulation::stop`] when a tick reports a collision.
pub struct Simulation<R = ChaCha8Rng> {
    config: GameConfig,
    rng: R,
    snake: Snake,
    food: Cell,
    enemies: Vec<Cell>,
    state: RunState,
    status: Option<StatusMessage>,
}

impl Simulation<ChaCha8Rng> {
    /// Create a simulation seeded from the config, or from entropy
    ///
    /// Panics on an invalid config, see [`Simulation::with_rng`].
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Create a simulation drawing placements from the given random source
    ///
    /// # Panics
    ///
    /// Panics if `config` does not pass [`GameConfig::validate`]: placement
    /// sampling cannot terminate on a grid that is too small.
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        // Validate config
        config.validate().expect("Invalid game configuration");

        let snake = Snake::new(config.start_length);
        Self {
            config,
            rng,
            snake,
            food: Cell::new(0, 0),
            enemies: Vec::new(),
            state: RunState::NotStarted,
            status: None,
        }
    }

    /// Start a new run
    ///
    /// Ignored while a run is in progress, in which case `None` is returned.
    pub fn start(&mut self) -> Option<StatusMessage> {
        if self.state == RunState::Running {
            return None;
        }

        self.snake = Snake::new(self.config.start_length);
        self.enemies = vec![Cell::new(0, 0)];
        self.spread_food();
        self.relocate_enemies();
        self.state = RunState::Running;

        info!(
            "Run started on a {0}x{0} grid, food at ({1}, {2})",
            self.config.grid_size, self.food.x, self.food.y
        );

        Some(self.emit(StatusMessage::Welcome))
    }

    /// End the current run
    ///
    /// Calling it again reports the same score and leaves the state as is.
    pub fn stop(&mut self) -> StatusMessage {
        if self.state == RunState::Running {
            info!("Run stopped with score {}", self.score());
        }
        self.state = RunState::Stopped;
        self.emit(StatusMessage::GameOver {
            score: self.score(),
        })
    }

    /// Execute one step of the game
    ///
    /// On collision nothing is committed: the snapshot of the previous tick
    /// stays the last valid state. Outside of a run this is a no-op that
    /// returns the current snapshot.
    pub fn tick(&mut self, requested: Direction) -> Result<Snapshot, CollisionError> {
        if self.state != RunState::Running {
            return Ok(self.snapshot());
        }

        self.snake.set_pending_direction(requested);
        let new_head = self.snake.advance();

        if let Some(kind) = self.check_collision(new_head) {
            return Err(CollisionError::new(kind, new_head));
        }

        let ate_food = new_head == self.food;
        if ate_food {
            self.snake.grow();
        }

        self.snake.commit(new_head);

        if ate_food {
            self.spread_food();
            if self.snake.len() % 2 == 0 {
                self.enemies.push(Cell::new(0, 0));
                debug!(
                    "Length {} reached, enemy count now {}",
                    self.snake.len(),
                    self.enemies.len()
                );
            }
            self.relocate_enemies();
        }

        Ok(self.snapshot())
    }

    /// Check the proposed head against the boundary, the body and enemies,
    /// in that order
    fn check_collision(&self, head: Cell) -> Option<CollisionKind> {
        if !head.is_within(self.config.grid_size) {
            return Some(CollisionKind::OutOfBounds);
        }

        if self.snake.occupies(head) {
            return Some(CollisionKind::SelfCollision);
        }

        if self.enemies.contains(&head) {
            return Some(CollisionKind::EnemyCollision);
        }

        None
    }

    /// Move the food to a random cell other than the head
    ///
    /// The rest of the body and the enemies are not avoided.
    fn spread_food(&mut self) {
        let head = self.snake.head();
        self.food = loop {
            let cell = self.random_cell();
            if cell != head {
                break cell;
            }
        };
        debug!("Food placed at ({}, {})", self.food.x, self.food.y);
    }

    /// Give every enemy a new random cell outside the snake's lane
    fn relocate_enemies(&mut self) {
        for i in 0..self.enemies.len() {
            let cell = loop {
                let cell = self.random_cell();
                if !self.is_forbidden_enemy_cell(cell) {
                    break cell;
                }
            };
            self.enemies[i] = cell;
        }
        debug!("Relocated {} enemies", self.enemies.len());
    }

    fn is_forbidden_enemy_cell(&self, cell: Cell) -> bool {
        let head = self.snake.head();
        let in_lane = match self.config.enemy_placement {
            EnemyPlacement::Legacy => cell.y == head.y || cell.x == head.x,
            EnemyPlacement::DirectionAware => {
                if self.snake.direction().is_vertical() {
                    cell.y == head.y
                } else {
                    cell.x == head.x
                }
            }
        };

        in_lane || cell == self.food
    }

    /// Uniform cell with both coordinates in `[1, grid_size - 1]`
    fn random_cell(&mut self) -> Cell {
        // Bounded by MAX_GRID_SIZE at construction
        let size = self.config.grid_size as i32;
        Cell::new(self.rng.gen_range(1..size), self.rng.gen_range(1..size))
    }

    fn emit(&mut self, message: StatusMessage) -> StatusMessage {
        self.status = Some(message);
        message
    }
}

impl<R> Simulation<R> {
    /// Current renderable state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.snake.body().to_vec(),
            food: self.food,
            enemies: self.enemies.clone(),
            running: self.is_running(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Segments grown since the start of the run
    pub fn score(&self) -> usize {
        self.snake.len().saturating_sub(self.config.start_length)
    }

    /// Direction the snake is currently travelling in
    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    /// Last message emitted by start or stop
    pub fn status(&self) -> Option<StatusMessage> {
        self.status
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn enemies(&self) -> &[Cell] {
        &self.enemies
    }
}
