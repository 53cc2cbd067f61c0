//! Blinka -- a side-scrolling platformer on a 160x128 screen.
//!
//! The player sprite never moves. Each tick the held buttons become a
//! proposed world scroll, walls clamp it, every wall is moved by what is
//! left, and the player's walk cycle advances one frame (see `pipeline`).
//!
//! Two frontends drive the same pipeline:
//!
//!   - **Windowed:** winit's `ApplicationHandler` wakes at each tick deadline
//!     (`ControlFlow::WaitUntil`), runs the due fixed steps from `TimeState`,
//!     then draws the batch built by `SceneBuilder` plus the egui overlay.
//!   - **Headless:** `--headless <replay.json>` plays recorded inputs through
//!     the pipeline with a sleeping pacer (or none with `--fast`) and logs
//!     where the player ended up.

mod collision;
mod headless;
mod physics;
mod pipeline;
mod render_bridge;
mod replay;
mod settings;
mod world;

use std::path::PathBuf;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use blinka_core::input::{InputState, Key};
use blinka_core::time::{NoPacing, TimeState};
use blinka_devtools::{DebugOverlay, OverlayStats};
use blinka_render::palette::LETTERBOX;
use blinka_render::{Camera2D, GpuContext, MeshBuffers, TilePipeline};
use pipeline::{FramePipeline, RunState, ShutdownSignal, Simulation};
use render_bridge::SceneBuilder;
use settings::Settings;

const USAGE: &str =
    "usage: blinka_game [--settings <path>] | --headless <replay.json> [--fast]";

type WindowPipeline = FramePipeline<InputState, SceneBuilder, NoPacing>;

/// Ownership is split into two groups:
///  - **Game** (time, pipeline, pause state) -- advanced in fixed ticks
///  - **GPU resources** (pipeline, mesh buffers, camera, overlay) -- redrawn every frame
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    tile_pipeline: TilePipeline,
    debug_overlay: DebugOverlay,

    pipeline: WindowPipeline,
    shutdown: ShutdownSignal,
    paused: bool,
    single_step_requested: bool,

    // The tile batch is rebuilt on the CPU after every tick and streamed into
    // these buffers. The camera never moves, so its uniform is written once.
    mesh: MeshBuffers,
    _camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl EngineState {
    fn new(window: Arc<Window>, settings: &Settings) -> Self {
        let gpu = GpuContext::new(window.clone())
            .unwrap_or_else(|err| panic!("GPU initialisation failed: {err}"));
        let tile_pipeline = TilePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(
            &gpu.device,
            gpu.surface_format,
            &window,
            settings.show_debug_overlay,
        );

        let camera_uniform = Camera2D::screen().build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = tile_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let mesh = MeshBuffers::new(&gpu.device);

        let mut pipeline = FramePipeline::new(
            InputState::new(),
            SceneBuilder::new(),
            NoPacing,
            Simulation::initial(),
        );
        pipeline.present();

        Self {
            window,
            gpu,
            time: TimeState::with_fps(settings.fps),
            tile_pipeline,
            debug_overlay,
            pipeline,
            shutdown: ShutdownSignal::new(),
            paused: false,
            single_step_requested: false,
            mesh,
            _camera_buffer: camera_buffer,
            camera_bind_group,
        }
    }

    /// Devtools hotkeys. Read once per rendered frame, before any tick runs.
    fn handle_hotkeys(&mut self) {
        let input = self.pipeline.input_mut();
        let escape = input.is_just_pressed(Key::Escape);
        let toggle_overlay = input.is_just_pressed(Key::F3);
        let toggle_pause = input.is_just_pressed(Key::P);
        let step = input.is_just_pressed(Key::N);

        if escape {
            log::info!("Escape pressed, shutting down.");
            self.shutdown.request();
        }
        if toggle_overlay {
            self.debug_overlay.toggle();
        }
        if toggle_pause {
            self.toggle_pause();
        }
        if step && self.paused {
            self.single_step_requested = true;
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!(
            "Simulation {}",
            if self.paused { "PAUSED" } else { "RESUMED" }
        );
    }

    /// Run every tick that is due. While paused the due time is dropped,
    /// except for one tick per single-step request.
    fn run_due_ticks(&mut self) {
        self.time.begin_frame();
        while self.time.should_step() {
            if self.paused && !self.single_step_requested {
                continue;
            }
            self.single_step_requested = false;
            self.pipeline.run_tick();
        }
    }

    fn redraw(&mut self) {
        if self.gpu.size.0 == 0 || self.gpu.size.1 == 0 {
            return;
        }

        self.handle_hotkeys();
        if self.pipeline.check_shutdown(&self.shutdown) == RunState::Stopped {
            return;
        }
        self.run_due_ticks();
        self.pipeline.input_mut().end_frame();

        // Render phase reads the state left by the last tick.
        self.mesh
            .upload(&self.gpu.device, &self.gpu.queue, self.pipeline.sink().batch());

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = overlay_stats(
            self.pipeline.simulation(),
            self.pipeline.sink().batch().quad_count(),
            self.mesh.allocated_bytes(),
            self.paused,
        );
        let (egui_primitives, egui_textures_delta, overlay_actions) =
            self.debug_overlay.prepare(&self.window, &self.time, &stats);

        if overlay_actions.toggle_pause {
            self.toggle_pause();
        }
        if overlay_actions.single_step {
            self.single_step_requested = true;
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let viewport = self.gpu.screen_viewport();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Screen Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(LETTERBOX),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_viewport(
                viewport.x as f32,
                viewport.y as f32,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );
            if self.mesh.index_count() > 0 {
                render_pass.set_pipeline(&self.tile_pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.mesh.index_count(), 0, 0..1);
            }
        }

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    settings: Settings,
    state: Option<EngineState>,
}

impl App {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            if let Some(state) = &self.state {
                state.window.request_redraw();
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let config = self.settings.platform_config();
        let window = blinka_platform::window::create_window(event_loop, &config);
        log::info!("Window created: {}x{}", config.width(), config.height());
        let state = EngineState::new(window, &self.settings);
        state.window.request_redraw();
        self.state = Some(state);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.pipeline.check_shutdown(&state.shutdown) == RunState::Stopped {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(state.time.next_step_deadline()));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.shutdown.request();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        let input = state.pipeline.input_mut();
                        match event.state {
                            ElementState::Pressed => input.key_down(game_key),
                            ElementState::Released => input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => state.redraw(),

            _ => {
                if state.debug_overlay.visible {
                    state.window.request_redraw();
                }
            }
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::KeyN => Some(Key::N),
        _ => None,
    }
}

fn overlay_stats(
    simulation: &Simulation,
    quad_count: usize,
    gpu_bytes: usize,
    paused: bool,
) -> OverlayStats {
    let last = simulation.last_report();
    OverlayStats {
        tick: simulation.tick(),
        dx: last.map_or(0, |r| r.displacement.dx),
        dy: last.map_or(0, |r| r.displacement.dy),
        y_velocity: simulation.motion.y_velocity,
        jump_time: simulation.motion.jump_time,
        max_jump_time: simulation.config.max_jump_time,
        player_frame: simulation.world.player.frame,
        world_offset: simulation.world.scroll_offset(),
        game_state_label: simulation.game_state.label().to_string(),
        quad_count: quad_count as u32,
        gpu_bytes: gpu_bytes as u32,
        paused,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Window,
    Headless { replay: PathBuf, fast: bool },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    settings_path: PathBuf,
    command: Command,
}

fn parse_args<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut settings_path = PathBuf::from(settings::DEFAULT_SETTINGS_PATH);
    let mut settings_given = false;
    let mut replay = None;
    let mut fast = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--settings needs a path".to_string())?;
                settings_path = PathBuf::from(value);
                settings_given = true;
            }
            "--headless" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--headless needs a replay path".to_string())?;
                replay = Some(PathBuf::from(value));
            }
            "--fast" => fast = true,
            "-h" | "--help" => {
                return Ok(CliArgs {
                    settings_path,
                    command: Command::Help,
                })
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    let command = match replay {
        Some(_) if settings_given => {
            return Err("--settings does not apply with --headless".to_string())
        }
        Some(replay) => Command::Headless { replay, fast },
        None if fast => return Err("--fast only applies with --headless".to_string()),
        None => Command::Window,
    };
    Ok(CliArgs {
        settings_path,
        command,
    })
}

fn run_windowed(settings: Settings) -> Result<(), String> {
    let event_loop = EventLoop::new().map_err(|e| format!("Failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(settings);
    event_loop
        .run_app(&mut app)
        .map_err(|e| format!("Event loop error: {e}"))
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            log::error!("{err}");
            eprintln!("{USAGE}");
            return Err(err);
        }
    };

    log::info!("Blinka starting...");

    match args.command {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Headless {
            replay: replay_path,
            fast,
        } => {
            let sequence = replay::load_replay_from_path(&replay_path).inspect_err(|err| {
                log::error!("{err}");
            })?;
            log::info!(
                "Replaying {} ({} ticks at {} fps{})",
                replay_path.display(),
                sequence.tick_count(),
                sequence.fps,
                if fast { ", unpaced" } else { "" }
            );
            headless::run_headless(&sequence, fast).inspect_err(|err| {
                log::error!("{err}");
            })?;
            Ok(())
        }
        Command::Window => {
            let settings =
                settings::load_settings_or_default(&args.settings_path).inspect_err(|err| {
                    log::error!("{err}");
                })?;
            run_windowed(settings)
        }
    }
}
