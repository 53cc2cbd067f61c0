//! CPU-side quad batching and the GPU buffers it streams into.
//!
//! The whole screen is rebuilt every frame: at 10x8 background tiles plus a
//! few dozen sprites the batch stays tiny, so there is no dirty tracking.
//! Buffers grow in powers of two and never shrink.

use crate::palette::Rgba;
use crate::vertex::TileVertex;

/// One axis-aligned quad in screen pixels, positioned by its top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct QuadSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgba,
}

#[derive(Debug, Default)]
pub struct TileBatch {
    vertices: Vec<TileVertex>,
    indices: Vec<u32>,
}

impl TileBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn push_quad(&mut self, spec: QuadSpec) {
        let base_index = self.vertices.len() as u32;
        let (x0, y0) = (spec.x, spec.y);
        let (x1, y1) = (spec.x + spec.width, spec.y + spec.height);

        for position in [[x0, y0], [x1, y0], [x1, y1], [x0, y1]] {
            self.vertices.push(TileVertex {
                position,
                color: spec.color,
            });
        }
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn vertices(&self) -> &[TileVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    index_count: u32,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            vertex_buffer: create_vertex_buffer(device, 1),
            index_buffer: create_index_buffer(device, 1),
            vertex_capacity: 1,
            index_capacity: 1,
            index_count: 0,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Bytes currently reserved on the GPU for the mesh.
    pub fn allocated_bytes(&self) -> usize {
        self.vertex_capacity * std::mem::size_of::<TileVertex>()
            + self.index_capacity * std::mem::size_of::<u32>()
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, batch: &TileBatch) {
        let needed_vertices = grown_capacity(self.vertex_capacity, batch.vertices.len());
        if needed_vertices != self.vertex_capacity {
            self.vertex_capacity = needed_vertices;
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }
        let needed_indices = grown_capacity(self.index_capacity, batch.indices.len());
        if needed_indices != self.index_capacity {
            self.index_capacity = needed_indices;
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }

        if !batch.vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&batch.vertices));
        }
        if !batch.indices.is_empty() {
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&batch.indices));
        }
        self.index_count = batch.indices.len() as u32;
    }
}

fn grown_capacity(current: usize, needed: usize) -> usize {
    let needed = needed.max(1);
    if needed > current {
        needed.next_power_of_two()
    } else {
        current
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<TileVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Tile Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Tile Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
