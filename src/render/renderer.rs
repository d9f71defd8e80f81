use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::collections::HashSet;

use crate::game::{Cell, Simulation, Snapshot};
use crate::metrics::SessionStats;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<R>(&self, frame: &mut Frame, sim: &Simulation<R>, stats: &SessionStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        let snapshot = sim.snapshot();

        frame.render_widget(self.render_stats(sim.score(), &snapshot, stats), chunks[0]);
        frame.render_widget(self.render_grid(&snapshot, sim.grid_size()), chunks[1]);

        let status = sim.status().map(|s| s.to_string()).unwrap_or_default();
        frame.render_widget(self.render_status(status, snapshot.running), chunks[2]);

        frame.render_widget(self.render_controls(), chunks[3]);
    }

    fn render_grid(&self, snapshot: &Snapshot, grid_size: usize) -> Paragraph<'_> {
        let head = snapshot.body.first().copied();
        let body: HashSet<Cell> = snapshot.body.iter().copied().collect();
        let enemies: HashSet<Cell> = snapshot.enemies.iter().copied().collect();

        // The last valid state stays on screen after a collision, drawn dead
        let snake_color = if snapshot.running {
            Color::Green
        } else {
            Color::Red
        };

        let mut lines = Vec::with_capacity(grid_size);

        for y in 0..grid_size as i32 {
            let mut spans = Vec::with_capacity(grid_size);

            for x in 0..grid_size as i32 {
                let cell = Cell::new(x, y);

                let span = if Some(cell) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(snake_color)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&cell) {
                    Span::styled("□ ", Style::default().fg(snake_color))
                } else if enemies.contains(&cell) {
                    Span::styled(
                        "X ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if cell == snapshot.food {
                    Span::styled(
                        "O ",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        score: usize,
        snapshot: &Snapshot,
        stats: &SessionStats,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Enemies: ", label),
            Span::styled(snapshot.enemies.len().to_string(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(stats.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(stats.format_time(), value),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_status(&self, status: String, running: bool) -> Paragraph<'_> {
        let color = if running { Color::Cyan } else { Color::Red };
        Paragraph::new(Line::from(Span::styled(status, Style::default().fg(color))))
            .alignment(Alignment::Left)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to stop | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Esc", Style::default().fg(Color::Red)),
            Span::raw(" to exit"),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
