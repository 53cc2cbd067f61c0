pub mod batch;
pub mod camera;
pub mod gpu_context;
pub mod palette;
pub mod tile_pipeline;
pub mod vertex;

pub use batch::{MeshBuffers, QuadSpec, TileBatch};
pub use camera::{Camera2D, CameraUniform};
pub use gpu_context::GpuContext;
pub use tile_pipeline::TilePipeline;
pub use vertex::TileVertex;
