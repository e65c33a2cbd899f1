use std::time::Instant;

use anyhow::{Context as _, Result};
use winit::{
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, KeyCode, NamedKey, PhysicalKey},
    window::{Window, WindowBuilder},
};

use renderer::{GlBackend, Renderer};

use crate::{
    Cli,
    context::GlContext,
    data::camera_controller::{AxisMovement, CameraController},
    input,
};

pub mod conf {
    pub const WINDOW_TITLE: &str = "LearnGL viewer";
    pub const FRAME_RESOLUTION: (u32, u32) = (1600, 1200);
    pub const FOV_DEGREES: f32 = 45.;
}

pub struct App {
    renderer: Renderer<GlBackend>,

    // state
    last_frame: Instant,
    inputs: input::State,
    camera_controller: CameraController,

    // declared last so the renderer releases its resources while the
    // context is still current
    gl: GlContext,
    window: Window,
}

impl App {
    pub fn new(window: Window, scene: &scene::Scene, cli: &Cli) -> Result<Self> {
        firestorm::profile_method!(new);

        let (gl, context) =
            GlContext::create(&window, !cli.no_vsync).context("Failed to create GL context")?;

        let resolution: (u32, u32) = window.inner_size().into();
        let camera_controller =
            CameraController::frame_bounds(scene.bounding_box, resolution, cli.fov);

        let mut renderer = Renderer::create(GlBackend::new(context), scene, resolution)
            .context("Failed to upload scene")?;
        renderer.set_wireframe(cli.wireframe);

        Ok(Self {
            renderer,

            last_frame: Instant::now(),
            inputs: input::State::default(),
            camera_controller,

            gl,
            window,
        })
    }

    fn render(&mut self) -> Result<()> {
        self.update();
        self.renderer.render(&self.camera_controller.camera());
        self.gl.swap_buffers()
    }

    fn update(&mut self) {
        let now = Instant::now();
        let delta_us = (now - self.last_frame).as_micros();

        let moves = [
            AxisMovement::new(
                self.inputs.key_pressed(KeyCode::KeyW),
                self.inputs.key_pressed(KeyCode::KeyS),
            ),
            AxisMovement::new(
                self.inputs.key_pressed(KeyCode::KeyD),
                self.inputs.key_pressed(KeyCode::KeyA),
            ),
            AxisMovement::new(
                self.inputs.key_pressed(KeyCode::Space),
                self.inputs.key_pressed(KeyCode::ShiftLeft),
            ),
        ];

        if moves.iter().any(AxisMovement::has_some) {
            let slow_move = self.inputs.key_pressed(KeyCode::ControlLeft);
            self.camera_controller
                .move_in_direction(&moves, slow_move, delta_us);
        }

        let mouse_delta = self.inputs.mouse_delta();
        if mouse_delta.length_squared() > 0. {
            self.camera_controller.pan(mouse_delta);
        }

        let scroll = self.inputs.scroll_delta();
        if scroll != 0. {
            self.camera_controller.zoom(scroll);
        }

        self.last_frame = now;
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        log::debug!("Resizing to {}x{}", size.width, size.height);
        self.gl.resize(size.width, size.height);
        self.renderer.resize(size.width, size.height);
        self.camera_controller.set_resolution(size.into());
    }

    pub fn window_builder(cli: &Cli) -> WindowBuilder {
        WindowBuilder::new()
            .with_title(conf::WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(cli.width, cli.height))
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> Result<()> {
        let mut result = Ok(());

        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run(|event, elwt| match event {
            Event::AboutToWait => {
                if let Err(err) = self.render() {
                    result = Err(err);
                    elwt.exit();
                }
            }
            Event::WindowEvent { ref event, .. } => match event {
                WindowEvent::Resized(size) => self.resize(*size),
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => elwt.exit(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code @ (KeyCode::Digit1 | KeyCode::Digit2)),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => self.renderer.set_wireframe(*code == KeyCode::Digit1),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(key_code),
                            state,
                            ..
                        },
                    ..
                } => self.inputs.handle_key(*key_code, *state),
                WindowEvent::MouseInput { button, state, .. } => {
                    self.inputs.handle_button(*button, *state);
                }
                WindowEvent::MouseWheel { delta, .. } => self.inputs.handle_scroll(*delta),
                _ => (),
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => self.inputs.handle_mouse_motion(delta),
            Event::LoopExiting => {
                log::info!("Closing {}", self.window.title());
                self.renderer.destroy();
            }
            _ => (),
        })?;

        result
    }
}
