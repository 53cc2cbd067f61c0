//! Debug overlay rendered via egui on top of the game screen.
//!
//! egui needs a `RenderPass<'static>` while `begin_render_pass` borrows the
//! encoder, so rendering is split into phases:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! UI logic only runs while `visible` (F3), but window events are always
//! forwarded so the overlay can swallow clicks while shown.

use blinka_core::time::TimeState;
use winit::window::Window;

/// Snapshot of the simulation for display. Filled by the game each frame.
#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub tick: u64,
    pub dx: i32,
    pub dy: i32,
    pub y_velocity: i32,
    pub jump_time: u32,
    pub max_jump_time: u32,
    pub player_frame: u16,
    /// Accumulated scroll of the world since startup.
    pub world_offset: (i32, i32),
    pub game_state_label: String,
    pub quad_count: u32,
    pub gpu_bytes: u32,
    pub paused: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    /// User clicked the pause toggle
    pub toggle_pause: bool,
    /// User clicked the single-step button (advance one tick while paused)
    pub single_step: bool,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        visible: bool,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        stats: &OverlayStats,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if self.visible {
                egui::Window::new("Debug")
                    .default_pos([8.0, 8.0])
                    .show(ctx, |ui| {
                        for line in timing_lines(time) {
                            ui.label(line);
                        }
                        ui.separator();
                        for line in simulation_lines(stats) {
                            ui.label(line);
                        }
                        ui.separator();
                        ui.horizontal(|ui| {
                            let pause_label = if stats.paused { "Resume" } else { "Pause" };
                            if ui.button(pause_label).clicked() {
                                actions.toggle_pause = true;
                            }
                            if stats.paused && ui.button("Step").clicked() {
                                actions.single_step = true;
                            }
                        });
                        if stats.paused {
                            ui.label("\u{23f8} PAUSED");
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn timing_lines(time: &TimeState) -> Vec<String> {
    vec![
        format!("FPS: {:.1}", time.smoothed_fps),
        format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms),
        format!("Ticks this frame: {}", time.steps_this_frame),
        format!("Total ticks: {}", time.fixed_step_count),
    ]
}

fn simulation_lines(stats: &OverlayStats) -> Vec<String> {
    vec![
        format!("Tick: {}", stats.tick),
        format!("Scroll: dx {:+} dy {:+}", stats.dx, stats.dy),
        format!(
            "World offset: ({}, {})",
            stats.world_offset.0, stats.world_offset.1
        ),
        format!("y_velocity: {}", stats.y_velocity),
        format!("jump_time: {}/{}", stats.jump_time, stats.max_jump_time),
        format!("Player frame: {}", stats.player_frame),
        format!("State: {}", stats.game_state_label),
        format!(
            "Quads: {} ({:.1} KB GPU)",
            stats.quad_count,
            stats.gpu_bytes as f32 / 1024.0
        ),
    ]
}
