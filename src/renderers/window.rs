use minifb::{Key, Scale, Window, WindowOptions};

use crate::error::{RenderError, Result};
use crate::pipeline::{Frame, Present};

/// Shows frames in a native window. The window may be resized; the frame is
/// stretched over it with nearest sampling.
pub struct WindowPresenter {
    window: Window,
    surface: Vec<u32>,
}

impl WindowPresenter {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                scale: Scale::X1,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| RenderError::Present(e.to_string()))?;

        log::info!("Opened {}x{} window", width, height);
        Ok(Self {
            window,
            surface: vec![0; width * height],
        })
    }

    /// False once the window was closed or Escape/Q was pressed.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_down(Key::Escape)
            && !self.window.is_key_down(Key::Q)
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}

impl Present for WindowPresenter {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let (width, height) = self.window.get_size();
        let (width, height) = if width == 0 || height == 0 {
            (frame.width(), frame.height())
        } else {
            (width, height)
        };

        self.surface.resize(width * height, 0);
        frame.resolve_into(width, height, &mut self.surface, |c| c.to_u32());

        self.window
            .update_with_buffer(&self.surface, width, height)
            .map_err(|e| RenderError::Present(e.to_string()))
    }
}

impl Drop for WindowPresenter {
    fn drop(&mut self) {
        log::info!("Closing window");
    }
}
