use blinka_platform::display::{SCREEN_HEIGHT, SCREEN_WIDTH};
use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Fixed screen-space camera. The origin is the top-left pixel and y grows
/// downward, matching sprite coordinates one to one.
pub struct Camera2D {
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    /// Camera covering the whole logical display.
    pub fn screen() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let proj = Mat4::orthographic_rh(
            0.0,
            self.viewport.0 as f32,
            self.viewport.1 as f32,
            0.0,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
