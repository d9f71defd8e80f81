use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Direction, GameConfig, Simulation};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Render at ~30 FPS
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive terminal driver around a [`Simulation`]
pub struct HumanMode {
    sim: Simulation,
    tick_interval: Duration,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_exit: bool,
    requested_direction: Direction,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let tick_interval = Duration::from_millis(config.tick_interval_ms);
        let mut sim = Simulation::new(config);
        sim.start();

        Self {
            sim,
            tick_interval,
            stats: SessionStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_exit: false,
            requested_direction: Direction::East,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.tick_interval);
        let mut render_timer = interval(RENDER_INTERVAL);

        info!("Driver loop started, ticking every {:?}", self.tick_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.sim.is_running() {
                        self.update_game();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.stats.update(self.sim.is_running());
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.sim, &self.stats);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_exit = true;
                }
            }

            if self.should_exit {
                break;
            }
        }

        info!("Driver loop finished after {} runs", self.stats.runs_finished);
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                // Reversals are dropped here so an earlier valid turn survives
                if !self.sim.direction().is_opposite(direction) {
                    self.requested_direction = direction;
                }
            }
            KeyAction::Stop => self.stop_run(),
            KeyAction::Restart => self.restart_run(),
            KeyAction::Exit => self.should_exit = true,
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        if let Err(collision) = self.sim.tick(self.requested_direction) {
            info!("Collision: {}", collision);
            self.stats.on_collision(collision.kind);
            self.stop_run();
        }
    }

    fn stop_run(&mut self) {
        let was_running = self.sim.is_running();
        let message = self.sim.stop();
        if was_running {
            self.stats.on_run_stop(self.sim.score());
        }
        debug!("{}", message);
    }

    fn restart_run(&mut self) {
        if let Some(message) = self.sim.start() {
            self.requested_direction = Direction::East;
            self.stats.on_run_start();
            debug!("{}", message);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{RunState, StatusMessage};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn seeded() -> HumanMode {
        HumanMode::new(GameConfig {
            seed: Some(1),
            ..Default::default()
        })
    }

    #[test]
    fn test_game_initialization() {
        let mode = seeded();
        assert!(mode.sim.is_running());
        assert_eq!(mode.sim.score(), 0);
        assert_eq!(mode.sim.status(), Some(StatusMessage::Welcome));
        assert_eq!(mode.tick_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_reverse_key_keeps_earlier_turn() {
        let mut mode = seeded();

        mode.handle_event(key(KeyCode::Up));
        mode.handle_event(key(KeyCode::Left));

        assert_eq!(mode.requested_direction, Direction::North);
    }

    #[test]
    fn test_stop_key() {
        let mut mode = seeded();

        mode.handle_event(key(KeyCode::Char('q')));
        mode.handle_event(key(KeyCode::Char('q')));

        assert_eq!(mode.sim.state(), RunState::Stopped);
        assert_eq!(mode.stats.runs_finished, 1);
        assert!(!mode.should_exit);
    }

    #[test]
    fn test_restart_only_when_stopped() {
        let mut mode = seeded();
        mode.update_game();
        let head = mode.sim.snake().head();

        // Ignored while running
        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.sim.snake().head(), head);

        mode.handle_event(key(KeyCode::Char('q')));
        mode.handle_event(key(KeyCode::Down));
        mode.handle_event(key(KeyCode::Char('r')));

        assert!(mode.sim.is_running());
        assert_eq!(mode.requested_direction, Direction::East);
        assert_eq!(mode.sim.snake().len(), 10);
    }

    #[test]
    fn test_collision_stops_run() {
        let mut mode = seeded();

        // Heading East from (11, 2) leaves the grid on the 39th tick
        for _ in 0..38 {
            mode.update_game();
            assert!(mode.sim.is_running());
        }
        mode.update_game();

        assert_eq!(mode.sim.state(), RunState::Stopped);
        assert_eq!(mode.stats.out_of_bounds, 1);
        assert_eq!(mode.stats.runs_finished, 1);
        assert_eq!(mode.sim.snake().head().x, 49);
        assert!(matches!(
            mode.sim.status(),
            Some(StatusMessage::GameOver { .. })
        ));
    }

    #[test]
    fn test_exit_keys() {
        let mut mode = seeded();
        mode.handle_event(key(KeyCode::Esc));
        assert!(mode.should_exit);
        assert!(mode.sim.is_running());
    }
}
