//! Object space to screen space: MVP multiply, perspective divide, viewport map.
//!
//! Nothing is clipped. Vertices behind the eye or outside the view volume come out
//! with screen coordinates far outside the buffer and the line rasterizer discards
//! whatever lands off screen.

use glam::{Mat4, Vec3, Vec4};

use crate::error::{RenderError, Result};

/// Fixed depth range used for the depth remap. It is not derived from the
/// projection matrix.
pub const DEPTH_NEAR: f64 = 0.1;
pub const DEPTH_FAR: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    depth_scale: f32,
    depth_offset: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            depth_scale: ((DEPTH_FAR - DEPTH_NEAR) / 2.0) as f32,
            depth_offset: ((DEPTH_FAR + DEPTH_NEAR) / 2.0) as f32,
        }
    }

    /// Maps NDC [-1, 1] to [0, width] x [0, height]. Depth is remapped to
    /// [near, far] but nothing downstream reads it yet.
    pub fn to_screen(&self, ndc: Vec3) -> Vec3 {
        Vec3::new(
            0.5 * self.width * (ndc.x + 1.0),
            0.5 * self.height * (ndc.y + 1.0),
            ndc.z * self.depth_scale + self.depth_offset,
        )
    }
}

/// Divides every component by w. A zero w, or a divide that produces a
/// non-finite coordinate, is reported instead of propagating NaN/inf.
pub fn perspective_divide(clip: Vec4) -> Result<Vec3> {
    if clip.w == 0.0 {
        return Err(RenderError::DegenerateProjection);
    }
    let ndc = (clip / clip.w).truncate();
    if !ndc.is_finite() {
        return Err(RenderError::DegenerateProjection);
    }
    Ok(ndc)
}

/// Runs one object space position through the whole chain.
pub fn project(mvp: &Mat4, position: Vec3, viewport: &Viewport) -> Result<Vec3> {
    let clip = *mvp * position.extend(1.0);
    let ndc = perspective_divide(clip)?;
    Ok(viewport.to_screen(ndc))
}
