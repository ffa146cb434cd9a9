use std::path::PathBuf;

use image::{ImageBuffer, Rgba};

use crate::error::{RenderError, Result};
use crate::pipeline::{Frame, Present};

/// Saves every presented frame to the same PNG file, overwriting the previous one.
pub struct ImagePresenter {
    path: PathBuf,
    written: u64,
}

impl ImagePresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl Present for ImagePresenter {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let (width, height) = (frame.width(), frame.height());
        let mut raw = vec![[0u8; 4]; width * height];
        frame.resolve_into(width, height, &mut raw, |c| c.to_rgba8());

        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(width as u32, height as u32, raw.concat())
                .ok_or_else(|| RenderError::Present("image size mismatch".to_string()))?;
        img.save(&self.path)
            .map_err(|e| RenderError::Present(e.to_string()))?;

        self.written += 1;
        log::debug!("Wrote {:?}", self.path);
        Ok(())
    }
}

impl Drop for ImagePresenter {
    fn drop(&mut self) {
        if self.written > 0 {
            log::info!("Last frame saved to {:?}", self.path);
        }
    }
}
