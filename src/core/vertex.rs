use glam::Vec3;

use super::Color;

/// A single vertex as stored in a vertex buffer. Copied by value on upload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Color,
}

impl Vertex {
    pub const fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Color::WHITE,
        }
    }
}
