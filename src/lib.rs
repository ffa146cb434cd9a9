use std::{
    fmt::Display,
    time::{Duration, Instant},
};

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod renderers;
pub mod scene;
pub mod util;

pub use config::{Config, DisplayTarget};
pub use crate::core::{Camera, Color, Mesh, Vertex};
pub use error::{RenderError, Result};
pub use pipeline::{DrawStats, FrameState, Handle, Present, Renderer};
pub use scene::Scene;
pub use util::format_mat4;

/// Frame timing, reported once per second.
pub struct Metrics {
    pub last_frame: Instant,
    pub fps_counter: u32,
    pub fps_update_timer: Instant,
    pub current_fps: f32,
    pub frame_times: Vec<f32>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            fps_counter: 0,
            fps_update_timer: Instant::now(),
            current_fps: 0.0,
            frame_times: Vec::with_capacity(120),
        }
    }

    /// Records the time since the previous call and returns it. Returns `true`
    /// in the second slot whenever a new FPS figure is ready.
    pub fn tick(&mut self) -> (Duration, bool) {
        let now = Instant::now();
        let frame_delta = now - self.last_frame;
        self.last_frame = now;

        self.fps_counter += 1;
        self.frame_times.push(frame_delta.as_secs_f32() * 1000.0);

        if self.fps_update_timer.elapsed() < Duration::from_secs(1) {
            return (frame_delta, false);
        }
        self.current_fps = self.fps_counter as f32 / self.fps_update_timer.elapsed().as_secs_f32();
        self.fps_counter = 0;
        self.fps_update_timer = now;
        (frame_delta, true)
    }

    fn average_frame_time(&self) -> f32 {
        if self.frame_times.is_empty() {
            0.0
        } else {
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
        }
    }

    /// Clears the per-second frame time window.
    pub fn reset_window(&mut self) {
        self.frame_times.clear();
    }
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FPS: {:.2} | Avg: {:.2}ms | Min: {:.2}ms | Max: {:.2}ms",
            self.current_fps,
            self.average_frame_time(),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::min)
                .unwrap_or(0.0),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::max)
                .unwrap_or(0.0)
        )
    }
}
