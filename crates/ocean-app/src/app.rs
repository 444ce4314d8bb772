//! Window, event handling and the per-frame update/render sequence.
//!
//! [`OceanApp`] implements winit's [`ApplicationHandler`]. Each redraw:
//! 1. keyboard shortcuts are turned into parameter updates,
//! 2. all queued updates are applied to [`SceneParams`],
//! 3. the frame clock runs one update (fly camera) and one render,
//! 4. a snapshot is published for the tuning API.

use std::cell::Cell;
use std::sync::{Arc, Mutex};

use glam::{Vec2, Vec3};
use ocean_config::Config;
use ocean_debug::{TuningServer, TuningState, get_tuning_port};
use ocean_input::{KeyboardState, MouseState};
use ocean_player::{FlyCamera, FlyInput, FlyToggle};
use ocean_render::{
    Camera, FrameEncoder, RenderContext, SceneAssets, SceneRenderer, SurfaceError,
    init_render_context_blocking,
};
use ocean_scene::{ParamQueue, ParamSender, ParamUpdate, SceneParams, param_channel};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::assets::{initial_camera, initial_params, load_scene_assets};
use crate::error::AppError;
use crate::frame_clock::FrameClock;

/// Digit keys selecting terrain presets, in preset order.
pub const PRESET_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

/// Function keys selecting skyboxes, in preset order.
pub const SKYBOX_KEYS: [KeyCode; 4] = [KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4];

pub const QUIT_KEY: KeyCode = KeyCode::Escape;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_fullscreen(
            config
                .window
                .fullscreen
                .then_some(Fullscreen::Borderless(None)),
        )
}

/// Parameter updates requested by this frame's key presses.
pub fn shortcut_updates(keyboard: &KeyboardState) -> Vec<ParamUpdate> {
    let presets = PRESET_KEYS
        .iter()
        .enumerate()
        .filter(|(_, key)| keyboard.just_pressed(**key))
        .map(|(id, _)| ParamUpdate::ApplyPreset(id));
    let skyboxes = SKYBOX_KEYS
        .iter()
        .enumerate()
        .filter(|(_, key)| keyboard.just_pressed(**key))
        .map(|(id, _)| ParamUpdate::ApplySkybox(id));
    presets.chain(skyboxes).collect()
}

/// What happened to the frame handed to the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameOutcome {
    Presented,
    Skipped,
    Fatal,
}

/// Application state: window, GPU, scene and input.
pub struct OceanApp {
    config: Config,
    assets: SceneAssets,

    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,

    camera: Camera,
    fly: FlyCamera,
    params: SceneParams,
    param_sender: ParamSender,
    param_queue: ParamQueue,

    keyboard: KeyboardState,
    mouse: MouseState,
    clock: FrameClock,

    tuning_state: Arc<Mutex<TuningState>>,
    tuning_server: Option<TuningServer>,

    error: Option<AppError>,
}

impl OceanApp {
    pub fn new(config: Config, assets: SceneAssets, params: SceneParams) -> Self {
        let (param_sender, param_queue) = param_channel();
        let fly = FlyCamera::new(
            Vec3::from_array(config.camera.position),
            Vec3::from_array(config.camera.target),
            params.camera.translation_speed,
            params.camera.rotation_speed,
        );
        let mut camera = initial_camera(&config, config.window.width, config.window.height);
        camera.set_view(fly.view_matrix());

        let tuning_server = config
            .debug
            .tuning_server
            .then(|| TuningServer::new(get_tuning_port(config.debug.tuning_port)));

        Self {
            config,
            assets,
            window: None,
            gpu: None,
            renderer: None,
            camera,
            fly,
            params,
            param_sender,
            param_queue,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            clock: FrameClock::new(),
            tuning_state: Arc::new(Mutex::new(TuningState::default())),
            tuning_server,
            error: None,
        }
    }

    /// The error that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    /// Sender for parameter updates; applied at the start of the next frame.
    pub fn param_sender(&self) -> ParamSender {
        self.param_sender.clone()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);

        let gpu = init_render_context_blocking(window.clone(), self.config.window.vsync)?;
        let size = gpu.size();
        let renderer = SceneRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format,
            size,
            &self.assets,
            self.config.scene.shader_dir.as_deref(),
            &self.params,
        )?;
        self.camera.set_aspect_ratio(size.0 as f32, size.1 as f32);

        if let Some(server) = &mut self.tuning_server {
            if let Err(e) = server.start(self.tuning_state.clone(), self.param_sender.clone()) {
                warn!("Failed to start tuning server: {e}");
            } else {
                info!("Tuning API started on port {}", server.actual_port());
            }
        }

        self.renderer = Some(renderer);
        self.gpu = Some(gpu);
        self.window = Some(window);
        Ok(())
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            // minimized; keep the old targets until a real size arrives
            return;
        }
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.resize(width, height);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(&gpu.device, width, height);
        }
        self.camera.set_aspect_ratio(width as f32, height as f32);
        info!("Window resized to {width}x{height}");
    }

    fn queue_shortcuts(&self) {
        for update in shortcut_updates(&self.keyboard) {
            self.param_sender.send(update);
        }
    }

    /// Runs the frame clock: fly camera update, then prepare + encode + present.
    fn run_frame(&mut self) -> FrameOutcome {
        let window_size = self
            .window
            .as_ref()
            .map(|w| {
                let size = w.inner_size();
                Vec2::new(size.width as f32, size.height as f32)
            })
            .unwrap_or(Vec2::ONE);

        let view = Cell::new(self.fly.view_matrix());
        let time = Cell::new(0.0f32);
        let mut outcome = FrameOutcome::Skipped;

        let fly = &mut self.fly;
        let mouse = &mut self.mouse;
        let keyboard = &self.keyboard;
        let window = &self.window;
        let params = &self.params;
        let camera = &mut self.camera;
        let gpu = &self.gpu;
        let renderer = &mut self.renderer;

        self.clock.tick(
            |dt, elapsed| {
                fly.translation_speed = params.camera.translation_speed;
                fly.rotation_speed = params.camera.rotation_speed;
                let input = FlyInput::from_devices(keyboard, mouse, window_size);
                if let Some(toggle) = fly.update(&input, dt as f32)
                    && let Some(window) = window
                {
                    mouse.set_captured(window, toggle == FlyToggle::Enabled);
                }
                view.set(fly.view_matrix());
                time.set(elapsed as f32);
            },
            || {
                if let (Some(gpu), Some(renderer)) = (gpu, renderer.as_mut()) {
                    camera.set_view(view.get());
                    outcome = render_frame(gpu, renderer, params, camera, time.get());
                }
            },
        );

        outcome
    }

    fn publish_tuning_state(&self) {
        let (window_width, window_height) = self.gpu.as_ref().map(|g| g.size()).unwrap_or_default();
        let dt = self.clock.last_dt();
        if let Ok(mut state) = self.tuning_state.lock() {
            state.frame_count = self.clock.frame_count();
            state.frame_time_ms = dt * 1000.0;
            state.fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
            state.window_width = window_width;
            state.window_height = window_height;
            state.uptime_seconds = self.clock.uptime();
            state.fly_camera_enabled = self.fly.is_enabled();
            state.params = self.params.clone();
        }
    }

    /// Checks if quit was requested via the tuning API.
    fn quit_requested(&self) -> bool {
        self.tuning_state
            .lock()
            .map(|state| state.quit_requested)
            .unwrap_or(false)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }
}

fn render_frame(
    gpu: &RenderContext,
    renderer: &mut SceneRenderer,
    params: &SceneParams,
    camera: &Camera,
    time: f32,
) -> FrameOutcome {
    renderer.prepare(&gpu.device, &gpu.queue, params, camera, time);
    match gpu.get_current_texture() {
        Ok(surface_texture) => {
            let mut frame = FrameEncoder::new(&gpu.device, &gpu.queue, surface_texture);
            if let Some((encoder, view)) = frame.parts() {
                renderer.encode(encoder, view);
            }
            frame.submit();
            FrameOutcome::Presented
        }
        Err(SurfaceError::Timeout) => {
            warn!("Surface timeout, skipping frame");
            FrameOutcome::Skipped
        }
        Err(SurfaceError::Lost) => {
            warn!("Surface lost, skipping frame");
            FrameOutcome::Skipped
        }
        Err(SurfaceError::OutOfMemory) => {
            error!("GPU out of memory");
            FrameOutcome::Fatal
        }
    }
}

impl ApplicationHandler for OceanApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.initialize(event_loop) {
            self.fail(event_loop, err);
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height);
            }
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::RedrawRequested => {
                if self.quit_requested() {
                    info!("Quit requested via tuning API");
                    event_loop.exit();
                    return;
                }
                if self.keyboard.just_pressed(QUIT_KEY) {
                    info!("Escape pressed, shutting down");
                    event_loop.exit();
                    return;
                }

                self.queue_shortcuts();
                self.param_queue.drain_into(&mut self.params);

                if self.run_frame() == FrameOutcome::Fatal {
                    event_loop.exit();
                    return;
                }
                self.publish_tuning_state();

                // Clear per-frame transient input state after all systems have run.
                self.keyboard.clear_transients();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }
}

/// Builds the scene from `config`, opens the window and runs until it closes.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let assets = load_scene_assets(&config)?;
    let params = initial_params(&config)?;

    let event_loop = EventLoop::new()?;
    let mut app = OceanApp::new(config, assets, params);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocean_input::RawKeyEvent;
    use ocean_render::SceneAssets;
    use winit::event::ElementState;

    fn press(keyboard: &mut KeyboardState, key: KeyCode) {
        keyboard.process_raw(RawKeyEvent {
            key,
            state: ElementState::Pressed,
            repeat: false,
        });
    }

    fn empty_assets() -> SceneAssets {
        SceneAssets {
            heightmaps: Vec::new(),
            skyboxes: Vec::new(),
            terrain_albedo: None,
            grid_resolution: 2,
        }
    }

    #[test]
    fn test_digit_keys_apply_presets() {
        let mut keyboard = KeyboardState::new();
        press(&mut keyboard, KeyCode::Digit3);
        assert_eq!(shortcut_updates(&keyboard), vec![ParamUpdate::ApplyPreset(2)]);
    }

    #[test]
    fn test_function_keys_apply_skyboxes() {
        let mut keyboard = KeyboardState::new();
        press(&mut keyboard, KeyCode::F1);
        press(&mut keyboard, KeyCode::F4);
        assert_eq!(
            shortcut_updates(&keyboard),
            vec![ParamUpdate::ApplySkybox(0), ParamUpdate::ApplySkybox(3)]
        );
    }

    #[test]
    fn test_held_keys_fire_once() {
        let mut keyboard = KeyboardState::new();
        press(&mut keyboard, KeyCode::Digit1);
        assert_eq!(shortcut_updates(&keyboard).len(), 1);
        keyboard.clear_transients();
        assert!(shortcut_updates(&keyboard).is_empty());
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let mut keyboard = KeyboardState::new();
        press(&mut keyboard, KeyCode::KeyW);
        press(&mut keyboard, KeyCode::Digit9);
        assert!(shortcut_updates(&keyboard).is_empty());
    }

    #[test]
    fn test_new_app_starts_without_window() {
        let mut config = Config::default();
        config.debug.tuning_server = false;
        let params = initial_params(&config).unwrap();
        let mut app = OceanApp::new(config, empty_assets(), params);
        assert!(app.window.is_none());
        assert!(app.tuning_server.is_none());
        assert!(app.take_error().is_none());
        assert!(!app.fly.is_enabled());
    }

    #[test]
    fn test_queued_updates_apply_on_drain() {
        let mut config = Config::default();
        config.debug.tuning_server = false;
        let params = initial_params(&config).unwrap();
        let mut app = OceanApp::new(config, empty_assets(), params);
        app.param_sender().send(ParamUpdate::ApplyPreset(1));
        app.param_sender().send(ParamUpdate::ApplySkybox(9));
        assert_eq!(app.params().terrain_preset, 0);
        assert_eq!(app.param_queue.drain_into(&mut app.params), 1);
        assert_eq!(app.params().terrain_preset, 1);
        assert_eq!(app.params().skybox_preset, 0);
    }

    #[test]
    fn test_shortcuts_go_through_the_queue() {
        let mut config = Config::default();
        config.debug.tuning_server = false;
        let params = initial_params(&config).unwrap();
        let mut app = OceanApp::new(config, empty_assets(), params);
        press(&mut app.keyboard, KeyCode::Digit2);
        press(&mut app.keyboard, KeyCode::F3);
        app.queue_shortcuts();
        assert_eq!(app.params().terrain_preset, 0);
        app.param_queue.drain_into(&mut app.params);
        assert_eq!(app.params().terrain_preset, 1);
        assert_eq!(app.params().skybox_preset, 2);
    }

    #[test]
    fn test_frame_without_gpu_updates_snapshot() {
        let mut config = Config::default();
        config.debug.tuning_server = false;
        let params = initial_params(&config).unwrap();
        let mut app = OceanApp::new(config, empty_assets(), params);
        assert_eq!(app.run_frame(), FrameOutcome::Skipped);
        app.publish_tuning_state();
        let state = app.tuning_state.lock().unwrap();
        assert_eq!(state.frame_count, 1);
        assert_eq!(state.params, app.params);
        assert!(!state.quit_requested);
    }

    #[test]
    fn test_quit_flag_is_read_from_snapshot() {
        let mut config = Config::default();
        config.debug.tuning_server = false;
        let params = initial_params(&config).unwrap();
        let app = OceanApp::new(config, empty_assets(), params);
        assert!(!app.quit_requested());
        app.tuning_state.lock().unwrap().quit_requested = true;
        assert!(app.quit_requested());
    }

    #[test]
    fn test_camera_starts_at_configured_eye() {
        let mut config = Config::default();
        config.debug.tuning_server = false;
        let params = initial_params(&config).unwrap();
        let app = OceanApp::new(config.clone(), empty_assets(), params);
        let eye = Vec3::from_array(config.camera.position);
        assert!((app.camera.translation() - eye).length() < 1e-3);
    }
}
