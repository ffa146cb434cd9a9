use std::collections::HashMap;

use glam::Mat4;

use crate::error::{RenderError, Result};
use crate::util::format_mat4;

pub const MODEL_MATRIX: &str = "modelMatrix";
pub const VIEW_MATRIX: &str = "viewMatrix";
pub const PROJECTION_MATRIX: &str = "projectionMatrix";

/// Named 4x4 matrices. Last write wins.
#[derive(Debug, Default, Clone)]
pub struct UniformStore {
    matrices: HashMap<String, Mat4>,
}

impl UniformStore {
    pub fn set(&mut self, name: impl Into<String>, matrix: Mat4) {
        let name = name.into();
        log::trace!("{}", format_mat4(&name, &matrix));
        self.matrices.insert(name, matrix);
    }

    pub fn get(&self, name: &str) -> Option<Mat4> {
        self.matrices.get(name).copied()
    }

    /// Like [`get`](Self::get) but an unset name is an error rather than a zero matrix.
    pub fn require(&self, name: &str) -> Result<Mat4> {
        self.get(name)
            .ok_or_else(|| RenderError::MissingUniform(name.to_string()))
    }

    /// `projection * view * model`, composed once per draw.
    pub fn model_view_projection(&self) -> Result<Mat4> {
        let model = self.require(MODEL_MATRIX)?;
        let view = self.require(VIEW_MATRIX)?;
        let projection = self.require(PROJECTION_MATRIX)?;
        Ok(projection * view * model)
    }
}
