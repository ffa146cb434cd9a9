//! Presentation bridge: how a finished pixel buffer reaches a display.
//!
//! The core only hands out a [`Frame`]. A backend treats it as an RGBA float
//! texture stretched over [`FULLSCREEN_QUAD`] and samples it with nearest
//! filtering. Texture row 0 is the bottom of the quad, so +y in screen space
//! points up on the display.

use glam::Vec2;
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

use crate::core::Color;
use crate::error::Result;

/// Two triangles covering normalized device space [-1, 1]^2.
#[rustfmt::skip]
pub const FULLSCREEN_QUAD: [Vec2; 6] = [
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),

    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
];

/// Borrowed view of a finished pixel buffer.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pixels: &'a [Color],
    width: usize,
    height: usize,
}

impl<'a> Frame<'a> {
    pub fn new(pixels: &'a [Color], width: usize, height: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &'a [Color] {
        self.pixels
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest texel for texture coordinates in [0, 1]; outside values clamp to edge.
    pub fn sample_nearest(&self, u: f32, v: f32) -> Color {
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.pixels[y * self.width + x]
    }

    /// Draws the quad into a `target_width` x `target_height` surface whose row 0
    /// is the top of the screen, converting each sample with `map`.
    pub fn resolve_into<T, F>(&self, target_width: usize, target_height: usize, out: &mut [T], map: F)
    where
        T: Send,
        F: Fn(Color) -> T + Sync,
    {
        debug_assert!(out.len() >= target_width * target_height);
        if target_width == 0 || target_height == 0 {
            return;
        }
        out[..target_width * target_height]
            .par_chunks_mut(target_width)
            .enumerate()
            .for_each(|(row, line)| {
                let v = 1.0 - (row as f32 + 0.5) / target_height as f32;
                for (col, texel) in line.iter_mut().enumerate() {
                    let u = (col as f32 + 0.5) / target_width as f32;
                    *texel = map(self.sample_nearest(u, v));
                }
            });
    }
}

/// A display backend. Resources are acquired when the presenter is built and
/// released when it is dropped.
pub trait Present {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;
}

impl<P: Present + ?Sized> Present for Box<P> {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).present(frame)
    }
}

impl<P: Present + ?Sized> Present for &mut P {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).present(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_ndc_square() {
        let min = FULLSCREEN_QUAD.iter().fold(Vec2::MAX, |a, &b| a.min(b));
        let max = FULLSCREEN_QUAD.iter().fold(Vec2::MIN, |a, &b| a.max(b));
        assert_eq!(min, Vec2::splat(-1.0));
        assert_eq!(max, Vec2::splat(1.0));
    }

    #[test]
    fn nearest_sampling_clamps_to_edge() {
        let pixels = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        let frame = Frame::new(&pixels, 2, 2);
        assert_eq!(frame.sample_nearest(0.0, 0.0), Color::RED);
        assert_eq!(frame.sample_nearest(0.99, 0.0), Color::GREEN);
        assert_eq!(frame.sample_nearest(1.0, 1.0), Color::WHITE);
        assert_eq!(frame.sample_nearest(-3.0, 0.7), Color::BLUE);
    }

    #[test]
    fn resolve_puts_row_zero_at_the_bottom() {
        // row 0 (bottom): RED GREEN, row 1 (top): BLUE WHITE
        let pixels = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        let frame = Frame::new(&pixels, 2, 2);
        let mut out = vec![Color::BLACK; 4];
        frame.resolve_into(2, 2, &mut out, |c| c);
        assert_eq!(out, vec![Color::BLUE, Color::WHITE, Color::RED, Color::GREEN]);
    }

    #[test]
    fn resolve_upscales_without_filtering() {
        let pixels = [Color::RED, Color::BLUE];
        let frame = Frame::new(&pixels, 2, 1);
        let mut out = vec![0u32; 4 * 3];
        frame.resolve_into(4, 3, &mut out, |c| c.to_u32());
        for row in out.chunks(4) {
            assert_eq!(row, &[0xFF0000, 0xFF0000, 0x0000FF, 0x0000FF]);
        }
    }
}
