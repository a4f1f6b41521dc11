//! Vertex type shared by every pipeline

use bytemuck::{Pod, Zeroable};

/// Position + normal + texture coordinate + color, one layout for all demos.
/// 2D shapes sit in the z = 0 plane with a +z normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            uv,
            color,
        }
    }

    /// 2D vertex in the z = 0 plane, white, no texture coordinate
    pub const fn flat(x: f32, y: f32) -> Self {
        Self::new([x, y, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0], [1.0; 4])
    }

    /// 2D vertex with a texture coordinate
    pub const fn flat_uv(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self::new([x, y, 0.0], [0.0, 0.0, 1.0], [u, v], [1.0; 4])
    }

    /// 2D vertex with an explicit color
    pub const fn flat_colored(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self::new([x, y, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0], color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const FLOOR_GRASS: [f32; 4] = [0.3, 0.8, 0.2, 1.0];
    pub const MUD: [f32; 4] = [0.6, 0.4, 0.0, 1.0];
    pub const ROPE: [f32; 4] = [1.0, 0.8, 0.0, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const OPPONENT: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const WINDMILL_BASE: [f32; 4] = [0.5, 0.3, 0.0, 1.0];
    pub const BLADES: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 1.0],
        [1.0, 1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0, 1.0],
        [0.0, 1.0, 0.0, 1.0],
    ];
    pub const LIGHT_MARKER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SPIN_CUBE: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const MOUNTAIN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

    /// Sky clear color for the tug scenes
    pub const SKY_TUG: [f64; 4] = [0.0, 0.7, 1.0, 1.0];
    /// Sky clear color for the 3D scenes
    pub const SKY_3D: [f64; 4] = [0.0, 0.6, 1.0, 1.0];
    /// Black canvas for the sketch pad and polygon demos
    pub const CANVAS: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
}
