//! Keyboard latching
//!
//! Host event loops deliver key down/up events at arbitrary times. The
//! latch keeps held directions as state and records presses until the
//! next simulation tick consumes them.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Restart,
    Quit,
}

impl Key {
    /// Map a DOM-style key name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "ArrowUp" | "w" | "W" => Some(Key::Jump),
            "r" | "R" => Some(Key::Restart),
            "q" | "Q" | "Escape" => Some(Key::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    input: TickInput,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = true,
            Key::Right => self.input.right = true,
            Key::Jump => self.input.jump = true,
            Key::Restart => self.input.restart = true,
            Key::Quit => self.input.quit = true,
        }
    }

    /// Only held keys react to release; presses stay latched until consumed
    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = false,
            Key::Right => self.input.right = false,
            Key::Jump | Key::Restart | Key::Quit => {}
        }
    }

    /// Window close behaves like the quit key
    pub fn close_requested(&mut self) {
        self.input.quit = true;
    }

    /// Current input without clearing anything
    pub fn snapshot(&self) -> TickInput {
        self.input
    }

    /// Input for the next tick; one-shot presses are cleared
    pub fn consume(&mut self) -> TickInput {
        let input = self.input;
        self.input.jump = false;
        self.input.restart = false;
        self.input.quit = false;
        input
    }
}
