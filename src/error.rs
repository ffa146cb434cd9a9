use thiserror::Error;

use crate::pipeline::Handle;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A handle that was never returned by an upload (or the null handle).
    #[error("no buffer is stored under handle {0}")]
    InvalidHandle(Handle),

    #[error("index buffer length {len} is not a multiple of 3")]
    MalformedIndexBuffer { len: usize },

    /// Clip-space w was zero (or the divide produced a non-finite value).
    #[error("perspective divide by zero")]
    DegenerateProjection,

    #[error("uniform {0:?} was never set")]
    MissingUniform(String),

    #[error("index {index} is out of range for a vertex buffer of {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: usize },

    #[error("buffer handle counter exhausted")]
    HandlesExhausted,

    #[error("invalid pixel buffer dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("presentation failed: {0}")]
    Present(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
