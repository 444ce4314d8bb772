//! Free-fly camera: WASD/QE to move, mouse to look, Space to engage.
//!
//! The controller starts disengaged so the cursor is free. Each rising edge
//! of the toggle key flips it; while engaged the cursor is hidden and mouse
//! movement turns the view.

use glam::{Mat3, Mat4, Vec2, Vec3};
use ocean_input::{KeyboardState, MouseState};
use winit::keyboard::KeyCode;

/// Largest |forward.y| the look direction may reach; keeps the look-at basis
/// away from world up.
pub const MAX_PITCH_SIN: f32 = 0.995;

/// One frame of controller input, sampled from the devices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlyInput {
    /// Level of the toggle key this frame (not an edge).
    pub toggle_held: bool,
    /// +1/-1 per axis: x = D/A, y = E/Q, z = W/S. A, E and W take priority.
    pub movement: Vec3,
    pub boost: bool,
    /// Pointer in normalised window coordinates, y up.
    pub mouse: Vec2,
}

impl FlyInput {
    pub const TOGGLE_KEY: KeyCode = KeyCode::Space;

    pub fn from_devices(keyboard: &KeyboardState, mouse: &MouseState, window_size: Vec2) -> Self {
        // when both keys of a pair are held, the first one wins
        let axis = |first: (KeyCode, f32), second: (KeyCode, f32)| {
            if keyboard.is_pressed(first.0) {
                first.1
            } else if keyboard.is_pressed(second.0) {
                second.1
            } else {
                0.0
            }
        };
        Self {
            toggle_held: keyboard.is_pressed(Self::TOGGLE_KEY),
            movement: Vec3::new(
                axis((KeyCode::KeyA, -1.0), (KeyCode::KeyD, 1.0)),
                axis((KeyCode::KeyE, 1.0), (KeyCode::KeyQ, -1.0)),
                axis((KeyCode::KeyW, 1.0), (KeyCode::KeyS, -1.0)),
            ),
            boost: keyboard.is_pressed(KeyCode::ShiftLeft),
            mouse: mouse.normalized_position(window_size),
        }
    }
}

/// Reported when the controller engages or disengages, so the caller can
/// capture or release the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlyToggle {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct FlyCamera {
    position: Vec3,
    forward: Vec3,
    view: Mat4,
    enabled: bool,
    toggle_was_held: bool,
    last_mouse: Vec2,
    pub translation_speed: f32,
    pub rotation_speed: f32,
}

impl FlyCamera {
    /// Camera at `position` looking toward `target`.
    pub fn new(position: Vec3, target: Vec3, translation_speed: f32, rotation_speed: f32) -> Self {
        let forward = (target - position).try_normalize().unwrap_or(Vec3::NEG_Z);
        let mut cam = Self {
            position,
            forward,
            view: Mat4::IDENTITY,
            enabled: false,
            toggle_was_held: false,
            last_mouse: Vec2::ZERO,
            translation_speed,
            rotation_speed,
        };
        cam.rebuild_view();
        cam
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Advances the controller by `dt` seconds.
    pub fn update(&mut self, input: &FlyInput, dt: f32) -> Option<FlyToggle> {
        let toggle = self.update_toggle(input);
        if !self.enabled {
            return toggle;
        }

        self.translate(input, dt);
        self.rotate(input);
        self.rebuild_view();
        toggle
    }

    fn update_toggle(&mut self, input: &FlyInput) -> Option<FlyToggle> {
        let rising = input.toggle_held && !self.toggle_was_held;
        self.toggle_was_held = input.toggle_held;
        if !rising {
            return None;
        }

        self.enabled = !self.enabled;
        if self.enabled {
            // Start from wherever the pointer is now so the view doesn't jump.
            self.last_mouse = input.mouse;
            Some(FlyToggle::Enabled)
        } else {
            Some(FlyToggle::Disabled)
        }
    }

    fn translate(&mut self, input: &FlyInput, dt: f32) {
        let mut step = input.movement * self.translation_speed * dt;
        if input.boost {
            step *= 2.0;
        }
        let right = self.view.row(0).truncate();
        let up = self.view.row(1).truncate();
        let forward = -self.view.row(2).truncate();
        self.position += step.x * right + step.y * up + step.z * forward;
    }

    fn rotate(&mut self, input: &FlyInput) {
        let delta = input.mouse - self.last_mouse;
        self.last_mouse = input.mouse;
        if delta == Vec2::ZERO {
            return;
        }

        let angles = Vec2::new(-delta.x, delta.y) * self.rotation_speed;
        let right = self.view.row(0).truncate();
        let yaw = Mat3::from_rotation_y(angles.x);
        let pitch = Mat3::from_axis_angle(right, angles.y);

        let mut forward = (yaw * pitch * self.forward).normalize();
        if forward.y.abs() > MAX_PITCH_SIN {
            forward = (yaw * self.forward).normalize();
        }
        self.forward = forward;
    }

    fn rebuild_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    fn camera() -> FlyCamera {
        FlyCamera::new(Vec3::new(0.0, 5.0, 10.0), Vec3::new(0.0, 5.0, 0.0), 20.0, 0.5)
    }

    fn enabled_camera() -> FlyCamera {
        let mut cam = camera();
        let press = FlyInput {
            toggle_held: true,
            ..Default::default()
        };
        assert_eq!(cam.update(&press, DT), Some(FlyToggle::Enabled));
        cam.update(&FlyInput::default(), DT);
        cam
    }

    #[test]
    fn test_starts_disabled_looking_at_target() {
        let cam = camera();
        assert!(!cam.is_enabled());
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_holding_toggle_flips_once() {
        let mut cam = camera();
        let held = FlyInput {
            toggle_held: true,
            ..Default::default()
        };
        let toggles: Vec<_> = (0..30).filter_map(|_| cam.update(&held, DT)).collect();
        assert_eq!(toggles, vec![FlyToggle::Enabled]);
        assert!(cam.is_enabled());
    }

    #[test]
    fn test_release_and_press_again_disables() {
        let mut cam = enabled_camera();
        let press = FlyInput {
            toggle_held: true,
            ..Default::default()
        };
        assert_eq!(cam.update(&press, DT), Some(FlyToggle::Disabled));
        assert!(!cam.is_enabled());
    }

    #[test]
    fn test_disabled_ignores_movement_and_mouse() {
        let mut cam = camera();
        let before = cam.position();
        let input = FlyInput {
            movement: Vec3::new(1.0, 1.0, 1.0),
            mouse: Vec2::new(0.8, 0.3),
            ..Default::default()
        };
        cam.update(&input, DT);
        assert_eq!(cam.position(), before);
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_forward_moves_along_view() {
        let mut cam = enabled_camera();
        let start = cam.position();
        let input = FlyInput {
            movement: Vec3::Z,
            ..Default::default()
        };
        cam.update(&input, DT);
        let moved = cam.position() - start;
        assert!((moved - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5, "{moved}");
    }

    #[test]
    fn test_strafe_and_rise() {
        let mut cam = enabled_camera();
        let start = cam.position();
        let input = FlyInput {
            movement: Vec3::new(1.0, 1.0, 0.0),
            ..Default::default()
        };
        cam.update(&input, DT);
        let moved = cam.position() - start;
        assert!((moved - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-5, "{moved}");
    }

    #[test]
    fn test_boost_doubles_speed() {
        let mut a = enabled_camera();
        let mut b = enabled_camera();
        let walk = FlyInput {
            movement: Vec3::Z,
            ..Default::default()
        };
        let run = FlyInput { boost: true, ..walk };
        a.update(&walk, DT);
        b.update(&run, DT);
        let da = (a.position() - Vec3::new(0.0, 5.0, 10.0)).length();
        let db = (b.position() - Vec3::new(0.0, 5.0, 10.0)).length();
        assert!((db - 2.0 * da).abs() < 1e-5);
    }

    #[test]
    fn test_enabling_does_not_jump_view() {
        let mut cam = camera();
        let press = FlyInput {
            toggle_held: true,
            mouse: Vec2::new(0.7, -0.4),
            ..Default::default()
        };
        cam.update(&press, DT);
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_mouse_right_turns_right_and_up_looks_up() {
        let mut cam = enabled_camera();
        let input = FlyInput {
            mouse: Vec2::new(0.2, 0.0),
            ..Default::default()
        };
        cam.update(&input, DT);
        assert!(cam.forward().x > 0.0);

        let mut cam = enabled_camera();
        let input = FlyInput {
            mouse: Vec2::new(0.0, 0.2),
            ..Default::default()
        };
        cam.update(&input, DT);
        assert!(cam.forward().y > 0.0);
        assert!((cam.forward().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_never_reaches_vertical() {
        let mut cam = enabled_camera();
        for i in 1..=40 {
            let input = FlyInput {
                mouse: Vec2::new(0.0, i as f32 * 0.5),
                ..Default::default()
            };
            cam.update(&input, DT);
            assert!(cam.forward().y.abs() <= MAX_PITCH_SIN + 1e-6);
            assert!(cam.view_matrix().is_finite());
        }
    }

    #[test]
    fn test_input_from_devices() {
        use ocean_input::RawKeyEvent;
        use winit::event::ElementState;

        let mut kb = KeyboardState::new();
        for key in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyQ, KeyCode::ShiftLeft] {
            kb.process_raw(RawKeyEvent {
                key,
                state: ElementState::Pressed,
                repeat: false,
            });
        }
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(150.0, 50.0);

        let input = FlyInput::from_devices(&kb, &mouse, Vec2::new(200.0, 100.0));
        assert_eq!(input.movement, Vec3::new(-1.0, -1.0, 1.0));
        assert!(input.boost);
        assert!(!input.toggle_held);
        assert_eq!(input.mouse, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_opposing_keys_resolve_by_priority() {
        use ocean_input::RawKeyEvent;
        use winit::event::ElementState;

        let mut kb = KeyboardState::new();
        for key in [
            KeyCode::KeyA,
            KeyCode::KeyD,
            KeyCode::KeyQ,
            KeyCode::KeyE,
            KeyCode::KeyW,
            KeyCode::KeyS,
        ] {
            kb.process_raw(RawKeyEvent {
                key,
                state: ElementState::Pressed,
                repeat: false,
            });
        }
        let input = FlyInput::from_devices(&kb, &MouseState::new(), Vec2::new(200.0, 100.0));
        assert_eq!(input.movement, Vec3::new(-1.0, 1.0, 1.0));
    }
}
