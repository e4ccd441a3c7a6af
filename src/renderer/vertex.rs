//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position, texture coordinate and tint
///
/// Solid shapes sample the 1x1 white texture, so `uv` is ignored for them.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [0.0, 0.0],
            color,
        }
    }

    pub const fn textured(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Convert an 8-bit RGB triple to a float color
pub const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Replace the alpha of a color
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Theme colors
pub mod colors {
    use super::rgb;

    pub const BRAND: [f32; 4] = rgb(112, 4, 88);
    pub const BACKGROUND: [f32; 4] = rgb(242, 242, 242);
    pub const CARD: [f32; 4] = rgb(255, 255, 255);
    pub const GREEN: [f32; 4] = rgb(96, 178, 70);
    pub const HEADER_LINE: [f32; 4] = rgb(220, 220, 220);
    pub const SHADOW: [f32; 4] = rgb(200, 200, 200);
    pub const WHITE: [f32; 4] = rgb(255, 255, 255);
    pub const BLACK: [f32; 4] = rgb(0, 0, 0);
    pub const GOLD: [f32; 4] = rgb(255, 215, 0);
    pub const GOLD_DARK: [f32; 4] = rgb(218, 165, 32);
    pub const PIPE_BODY: [f32; 4] = rgb(60, 60, 70);
    pub const PIPE_HIGHLIGHT: [f32; 4] = rgb(80, 80, 90);
    pub const PIPE_CAP_LINE: [f32; 4] = rgb(255, 160, 80);
    /// Letterbox bars around the 400x600 playfield
    pub const LETTERBOX: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
