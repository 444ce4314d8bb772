//! Frame-coherent mouse state tracker.
//!
//! While the cursor is captured the OS pointer is locked in place, so raw
//! device motion is accumulated into a virtual pointer position instead. The
//! fly camera only ever looks at [`MouseState::normalized_position`] and does
//! not need to know which source moved it.

use glam::Vec2;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    captured: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event (ignored while captured).
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        if !self.captured {
            self.position = Vec2::new(x as f32, y as f32);
        }
    }

    /// Process a `DeviceEvent::MouseMotion` raw delta (only used while captured).
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.position += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// Capture or release the cursor on `window`.
    ///
    /// Capturing hides the cursor and locks it (falling back to confining it
    /// on platforms without pointer lock).
    pub fn set_captured(&mut self, window: &winit::window::Window, captured: bool) {
        use winit::window::CursorGrabMode;
        self.captured = captured;
        if captured {
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err()
                && let Err(err) = window.set_cursor_grab(CursorGrabMode::Confined)
            {
                tracing::warn!("cursor grab unavailable: {err}");
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                tracing::debug!("cursor release failed: {err}");
            }
            window.set_cursor_visible(true);
        }
    }

    /// Set captured flag without a window reference (for testing).
    #[cfg(test)]
    pub(crate) fn set_captured_flag(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Pointer position mapped to `[-1, 1]` across the window, y pointing up.
    #[must_use]
    pub fn normalized_position(&self, window_size: Vec2) -> Vec2 {
        let size = window_size.max(Vec2::ONE);
        Vec2::new(
            self.position.x / size.x * 2.0 - 1.0,
            1.0 - self.position.y / size.y * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(200.0, 100.0);

    #[test]
    fn test_raw_motion_ignored_when_free() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 50.0);
        ms.on_raw_motion(50.0, 25.0);
        assert_eq!(ms.normalized_position(SIZE), Vec2::ZERO);
    }

    #[test]
    fn test_raw_motion_moves_virtual_pointer_when_captured() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 50.0);
        ms.set_captured_flag(true);

        ms.on_raw_motion(50.0, -25.0);
        ms.on_cursor_moved(0.0, 0.0);
        assert_eq!(ms.normalized_position(SIZE), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_normalized_position_corners() {
        let mut ms = MouseState::new();

        ms.on_cursor_moved(0.0, 0.0);
        assert_eq!(ms.normalized_position(SIZE), Vec2::new(-1.0, 1.0));

        ms.on_cursor_moved(200.0, 100.0);
        assert_eq!(ms.normalized_position(SIZE), Vec2::new(1.0, -1.0));

        ms.on_cursor_moved(100.0, 50.0);
        assert_eq!(ms.normalized_position(SIZE), Vec2::ZERO);
    }

    #[test]
    fn test_zero_window_size_does_not_divide_by_zero() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(1.0, 1.0);
        assert!(ms.normalized_position(Vec2::ZERO).is_finite());
    }
}
