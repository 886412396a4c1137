//! Window and input events
//!
//! Events are plain enum values produced by the platform layer (or by tests
//! and the headless editor) and routed to interested handlers through an
//! [`EventDispatcher`]. A handler returns `true` when it consumed the event,
//! which stops further forwarding.

use crate::input::{KeyCode, MouseButton};

/// Event type identification, used for filtering and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Mouse wheel moved
    MouseScrolled,
    /// Mouse cursor moved
    MouseMoved,
    /// Mouse button was pressed
    MouseButtonPressed,
    /// Mouse button was released
    MouseButtonReleased,
    /// Keyboard key was pressed
    KeyPressed,
    /// Keyboard key was released
    KeyReleased,
    /// Window framebuffer size changed
    WindowResized,
}

/// A single input or window event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Mouse wheel offsets for this frame
    MouseScrolled {
        /// Horizontal scroll
        x_offset: f32,
        /// Vertical scroll
        y_offset: f32,
    },
    /// Cursor position in window pixels
    MouseMoved {
        /// Cursor x
        x: f32,
        /// Cursor y
        y: f32,
    },
    /// Mouse button went down
    MouseButtonPressed(MouseButton),
    /// Mouse button went up
    MouseButtonReleased(MouseButton),
    /// Key went down
    KeyPressed(KeyCode),
    /// Key went up
    KeyReleased(KeyCode),
    /// New window size in pixels
    WindowResized {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}

impl Event {
    /// Type tag of this event
    pub fn event_type(&self) -> EventType {
        match self {
            Self::MouseScrolled { .. } => EventType::MouseScrolled,
            Self::MouseMoved { .. } => EventType::MouseMoved,
            Self::MouseButtonPressed(_) => EventType::MouseButtonPressed,
            Self::MouseButtonReleased(_) => EventType::MouseButtonReleased,
            Self::KeyPressed(_) => EventType::KeyPressed,
            Self::KeyReleased(_) => EventType::KeyReleased,
            Self::WindowResized { .. } => EventType::WindowResized,
        }
    }
}

/// Routes one event to typed handlers
///
/// Each `dispatch_*` call runs its handler only when the event matches the
/// variant and has not been handled yet. The handler's return value is
/// recorded in [`EventDispatcher::handled`]; events themselves are immutable,
/// so callers report it back as their own `on_event` result.
pub struct EventDispatcher<'a> {
    event: &'a Event,
    handled: bool,
}

impl<'a> EventDispatcher<'a> {
    /// Wrap an event for dispatching
    pub fn new(event: &'a Event) -> Self {
        Self { event, handled: false }
    }

    /// Whether a handler consumed the event
    pub fn handled(&self) -> bool {
        self.handled
    }

    /// Route a scroll event to `handler(x_offset, y_offset)`
    pub fn dispatch_mouse_scrolled(&mut self, handler: impl FnOnce(f32, f32) -> bool) -> bool {
        if self.handled {
            return false;
        }
        if let Event::MouseScrolled { x_offset, y_offset } = *self.event {
            self.handled = handler(x_offset, y_offset);
            return true;
        }
        false
    }

    /// Route a cursor move to `handler(x, y)`
    pub fn dispatch_mouse_moved(&mut self, handler: impl FnOnce(f32, f32) -> bool) -> bool {
        if self.handled {
            return false;
        }
        if let Event::MouseMoved { x, y } = *self.event {
            self.handled = handler(x, y);
            return true;
        }
        false
    }

    /// Route a key press to `handler(key)`
    pub fn dispatch_key_pressed(&mut self, handler: impl FnOnce(KeyCode) -> bool) -> bool {
        if self.handled {
            return false;
        }
        if let Event::KeyPressed(key) = *self.event {
            self.handled = handler(key);
            return true;
        }
        false
    }

    /// Route a mouse button press to `handler(button)`
    pub fn dispatch_mouse_button_pressed(&mut self, handler: impl FnOnce(MouseButton) -> bool) -> bool {
        if self.handled {
            return false;
        }
        if let Event::MouseButtonPressed(button) = *self.event {
            self.handled = handler(button);
            return true;
        }
        false
    }

    /// Route a resize to `handler(width, height)`
    pub fn dispatch_window_resized(&mut self, handler: impl FnOnce(u32, u32) -> bool) -> bool {
        if self.handled {
            return false;
        }
        if let Event::WindowResized { width, height } = *self.event {
            self.handled = handler(width, height);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_variant_only() {
        let event = Event::MouseScrolled { x_offset: 0.0, y_offset: 2.0 };
        let mut dispatcher = EventDispatcher::new(&event);

        let mut seen_key = false;
        assert!(!dispatcher.dispatch_key_pressed(|_| {
            seen_key = true;
            true
        }));
        assert!(!seen_key);

        let mut scrolled = 0.0;
        assert!(dispatcher.dispatch_mouse_scrolled(|_, y| {
            scrolled = y;
            true
        }));
        assert_eq!(scrolled, 2.0);
        assert!(dispatcher.handled());
    }

    #[test]
    fn test_handled_event_stops_forwarding() {
        let event = Event::KeyPressed(KeyCode::Delete);
        let mut dispatcher = EventDispatcher::new(&event);

        assert!(dispatcher.dispatch_key_pressed(|_| true));
        let mut calls = 0;
        dispatcher.dispatch_key_pressed(|_| {
            calls += 1;
            false
        });
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_unconsumed_event_keeps_forwarding() {
        let event = Event::WindowResized { width: 800, height: 600 };
        let mut dispatcher = EventDispatcher::new(&event);

        assert!(dispatcher.dispatch_window_resized(|_, _| false));
        assert!(!dispatcher.handled());
        assert_eq!(event.event_type(), EventType::WindowResized);
    }

    #[test]
    fn test_handled_flag_reaches_the_caller() {
        fn route(event: &Event, consume: bool) -> bool {
            let mut dispatcher = EventDispatcher::new(event);
            dispatcher.dispatch_mouse_button_pressed(|_| consume);
            dispatcher.dispatch_mouse_moved(|_, _| true);
            dispatcher.handled()
        }

        let press = Event::MouseButtonPressed(MouseButton::Left);
        assert!(route(&press, true));
        assert!(!route(&press, false));
        assert!(route(&Event::MouseMoved { x: 1.0, y: 2.0 }, false));
    }
}
