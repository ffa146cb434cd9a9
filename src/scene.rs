use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::core::{Camera, Mesh};
use crate::error::Result;
use crate::pipeline::{
    DrawStats, Handle, Present, Renderer, MODEL_MATRIX, PROJECTION_MATRIX, VIEW_MATRIX,
};

/// Radians per second around the y axis
const SPIN_SPEED: f32 = 0.8;

/// One mesh spinning in front of a fixed camera.
pub struct Scene {
    pub camera: Camera,
    pub mesh: Mesh,
    angle: f32,
    buffers: Option<(Handle, Handle)>,
}

impl Scene {
    pub fn new(mesh: Mesh, aspect_ratio: f32) -> Self {
        let camera = Camera::new(Vec3::new(0.0, 1.5, 4.0), Vec3::ZERO, aspect_ratio);
        Self {
            camera,
            mesh,
            angle: 0.0,
            buffers: None,
        }
    }

    /// Uploads the mesh and binds it. Uploading leaves nothing bound, so the
    /// returned handles are bound explicitly.
    pub fn upload<P: Present>(&mut self, renderer: &mut Renderer<P>) -> Result<()> {
        let vertices = renderer.upload_vertices(&self.mesh.vertices)?;
        let indices = renderer.upload_indices(&self.mesh.indices)?;
        renderer.bind_vertex_buffer(vertices);
        renderer.bind_index_buffer(indices);
        self.buffers = Some((vertices, indices));

        renderer.set_uniform(VIEW_MATRIX, self.camera.view_matrix());
        renderer.set_uniform(PROJECTION_MATRIX, self.camera.projection_matrix());
        renderer.set_uniform(MODEL_MATRIX, self.model_matrix());
        Ok(())
    }

    pub fn update(&mut self, delta: Duration) {
        self.angle = (self.angle + SPIN_SPEED * delta.as_secs_f32()) % std::f32::consts::TAU;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle) * Mat4::from_rotation_x(0.35)
    }

    pub fn render<P: Present>(&self, renderer: &mut Renderer<P>) -> Result<DrawStats> {
        renderer.set_uniform(MODEL_MATRIX, self.model_matrix());
        renderer.clear();
        renderer.draw()
    }
}
