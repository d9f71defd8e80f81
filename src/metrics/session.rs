use std::time::{Duration, Instant};

use crate::game::CollisionKind;

/// Statistics for the current process, reset when it exits
pub struct SessionStats {
    pub run_started_at: Instant,
    /// Duration of the current run, frozen once it stops
    pub run_time: Duration,
    pub high_score: usize,
    pub runs_finished: u32,
    pub out_of_bounds: u32,
    pub self_collisions: u32,
    pub enemy_collisions: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            run_started_at: Instant::now(),
            run_time: Duration::ZERO,
            high_score: 0,
            runs_finished: 0,
            out_of_bounds: 0,
            self_collisions: 0,
            enemy_collisions: 0,
        }
    }

    /// Refresh the run clock; only advances while a run is in progress
    pub fn update(&mut self, running: bool) {
        if running {
            self.run_time = self.run_started_at.elapsed();
        }
    }

    pub fn on_run_start(&mut self) {
        self.run_started_at = Instant::now();
        self.run_time = Duration::ZERO;
    }

    pub fn on_collision(&mut self, kind: CollisionKind) {
        match kind {
            CollisionKind::OutOfBounds => self.out_of_bounds += 1,
            CollisionKind::SelfCollision => self.self_collisions += 1,
            CollisionKind::EnemyCollision => self.enemy_collisions += 1,
        }
    }

    pub fn on_run_stop(&mut self, final_score: usize) {
        self.runs_finished += 1;
        self.high_score = self.high_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.run_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
