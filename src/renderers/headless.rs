use crate::error::Result;
use crate::pipeline::{Frame, Present};

/// Discards frames. Useful for benchmarking the rasterizer on its own.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    frames: u64,
}

impl HeadlessPresenter {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Present for HeadlessPresenter {
    fn present(&mut self, _frame: &Frame<'_>) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}
