pub mod display;
pub mod window;
