use glam::{IVec2, Vec2};
use rayon::slice::ParallelSliceMut;
use rayon::iter::ParallelIterator;

use crate::core::Color;
use crate::error::{RenderError, Result};

use super::rasterizer::bresenham;

/// Dense row-major RGBA pixel store, indexed by `row * width + col`.
/// Its size is fixed at construction.
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, fill: Color) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            data: vec![fill; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[Color] {
        &self.data
    }

    /// Overwrites every pixel.
    pub fn clear(&mut self, color: Color) {
        self.data.par_chunks_mut(1024).for_each(|chunk| {
            for pixel in chunk {
                *pixel = color;
            }
        });
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes outside the buffer are dropped silently.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x as u64 >= self.width as u64 || y as u64 >= self.height as u64 {
            return;
        }
        let index = y as usize * self.width + x as usize;
        self.data[index] = color;
    }

    /// Flat colored segment; `color` is used for every pixel.
    pub fn draw_line(&mut self, start: Vec2, end: Vec2, color: Color) {
        let bounds = IVec2::new(self.width as i32, self.height as i32);
        bresenham(start, end, bounds, |pos| {
            self.set_pixel(pos.x as i64, pos.y as i64, color);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 10, Color::BLACK),
            Err(RenderError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn row_major_layout() {
        let mut buffer = PixelBuffer::new(4, 3, Color::BLACK).unwrap();
        buffer.set_pixel(1, 2, Color::RED);
        assert_eq!(buffer.data()[2 * 4 + 1], Color::RED);
        assert_eq!(buffer.get(1, 2), Some(Color::RED));
        assert_eq!(buffer.get(4, 0), None);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buffer = PixelBuffer::new(4, 4, Color::BLACK).unwrap();
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4), (i64::MAX, i64::MIN)] {
            buffer.set_pixel(x, y, Color::WHITE);
        }
        assert!(buffer.data().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn clear_covers_buffers_larger_than_one_chunk() {
        let mut buffer = PixelBuffer::new(100, 37, Color::BLACK).unwrap();
        buffer.draw_line(Vec2::ZERO, Vec2::new(99.0, 36.0), Color::GREEN);
        buffer.clear(Color::BLUE);
        assert_eq!(buffer.data().len(), 3700);
        assert!(buffer.data().iter().all(|&c| c == Color::BLUE));
    }

    #[test]
    fn draw_line_uses_one_color() {
        let mut buffer = PixelBuffer::new(10, 10, Color::BLACK).unwrap();
        buffer.draw_line(Vec2::new(0.0, 0.0), Vec2::new(9.0, 9.0), Color::YELLOW);
        let lit: Vec<_> = buffer.data().iter().filter(|&&c| c != Color::BLACK).collect();
        assert_eq!(lit.len(), 10);
        assert!(lit.iter().all(|&&c| c == Color::YELLOW));
        for i in 0..10 {
            assert_eq!(buffer.get(i, i), Some(Color::YELLOW));
        }
    }
}
