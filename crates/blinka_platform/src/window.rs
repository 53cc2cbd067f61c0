use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::display::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const DEFAULT_WINDOW_SCALE: u32 = 4;

pub struct PlatformConfig {
    pub title: String,
    /// Integer upscale from the logical screen to window pixels.
    pub scale: u32,
}

impl PlatformConfig {
    pub fn width(&self) -> u32 {
        SCREEN_WIDTH * self.scale.max(1)
    }

    pub fn height(&self) -> u32 {
        SCREEN_HEIGHT * self.scale.max(1)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Blinka".to_string(),
            scale: DEFAULT_WINDOW_SCALE,
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(false)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width(), config.height()));

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::debug!(
        "Window '{}' requested at {}x{} (scale {})",
        config.title,
        config.width(),
        config.height(),
        config.scale
    );
    Arc::new(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_four_times_the_screen() {
        let config = PlatformConfig::default();
        assert_eq!(config.width(), 640);
        assert_eq!(config.height(), 512);
    }

    #[test]
    fn zero_scale_falls_back_to_native_size() {
        let config = PlatformConfig {
            title: "test".to_string(),
            scale: 0,
        };
        assert_eq!(config.width(), SCREEN_WIDTH);
        assert_eq!(config.height(), SCREEN_HEIGHT);
    }
}
