//! Input state tracking
//!
//! [`InputState`] is the per-frame snapshot of pressed keys, pressed mouse
//! buttons and the cursor position. The platform layer feeds it events and
//! systems such as the editor camera query it.

use std::collections::HashSet;

use crate::events::Event;
use crate::foundation::math::Vec2;

/// Current keyboard and mouse state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    mouse_position: Vec2,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a key is currently held
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Whether a mouse button is currently held
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Cursor position in window pixels
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mark a key as held
    pub fn press_key(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    /// Mark a key as released
    pub fn release_key(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    /// Mark a mouse button as held
    pub fn press_mouse_button(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    /// Mark a mouse button as released
    pub fn release_mouse_button(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }

    /// Move the cursor
    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
    }

    /// Fold an event into the state
    pub fn apply_event(&mut self, event: &Event) {
        match *event {
            Event::KeyPressed(key) => self.press_key(key),
            Event::KeyReleased(key) => self.release_key(key),
            Event::MouseButtonPressed(button) => self.press_mouse_button(button),
            Event::MouseButtonReleased(button) => self.release_mouse_button(button),
            Event::MouseMoved { x, y } => self.set_mouse_position(x, y),
            Event::MouseScrolled { .. } | Event::WindowResized { .. } => {}
        }
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// E key
    E,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Delete key
    Delete,
    /// Left shift
    LeftShift,
    /// Left control
    LeftControl,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_event_tracks_buttons_and_keys() {
        let mut input = InputState::new();
        input.apply_event(&Event::MouseButtonPressed(MouseButton::Middle));
        input.apply_event(&Event::KeyPressed(KeyCode::LeftShift));
        input.apply_event(&Event::MouseMoved { x: 12.0, y: 4.0 });

        assert!(input.is_mouse_button_pressed(MouseButton::Middle));
        assert!(input.is_key_pressed(KeyCode::LeftShift));
        assert_eq!(input.mouse_position(), Vec2::new(12.0, 4.0));

        input.apply_event(&Event::KeyReleased(KeyCode::LeftShift));
        assert!(!input.is_key_pressed(KeyCode::LeftShift));
    }
}
