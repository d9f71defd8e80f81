use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What a key press asks the driver to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Request a new direction for the next tick
    Turn(Direction),
    /// End the current run
    Stop,
    /// Start a new run once the current one is over
    Restart,
    /// Leave the program
    Exit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Exit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::North),
            KeyCode::Down => KeyAction::Turn(Direction::South),
            KeyCode::Left => KeyAction::Turn(Direction::West),
            KeyCode::Right => KeyAction::Turn(Direction::East),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::North),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::South),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::West),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::East),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Stop,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Esc => KeyAction::Exit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
