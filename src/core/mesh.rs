use std::path::Path;

use glam::Vec3;
use rand::Rng;
use thiserror::Error;

use super::{Color, Vertex};

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("mesh has {0} vertices, 16-bit indices address at most 65536")]
    TooManyVertices(usize),
}

/// CPU side geometry in exactly the shape the renderer uploads: a vertex list and
/// a triangle list of 16-bit indices.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> Self {
        Mesh { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Red/green/blue triangle in the z = 0 plane.
    pub fn create_triangle() -> Self {
        let vertices = vec![
            Vertex::new(Vec3::new(0.0, 0.5, 0.0), Color::RED),
            Vertex::new(Vec3::new(-0.5, -0.5, 0.0), Color::GREEN),
            Vertex::new(Vec3::new(0.5, -0.5, 0.0), Color::BLUE),
        ];
        Mesh::new(vertices, vec![0, 1, 2])
    }

    pub fn create_cube() -> Self {
        let vertices = vec![
            Vertex::new(Vec3::new(-1.0, -1.0, -1.0), Color::BLUE),
            Vertex::new(Vec3::new(1.0, -1.0, -1.0), Color::GREEN),
            Vertex::new(Vec3::new(1.0, 1.0, -1.0), Color::RED),
            Vertex::new(Vec3::new(-1.0, 1.0, -1.0), Color::YELLOW),
            Vertex::new(Vec3::new(-1.0, -1.0, 1.0), Color::CYAN),
            Vertex::new(Vec3::new(1.0, -1.0, 1.0), Color::MAGENTA),
            Vertex::new(Vec3::new(1.0, 1.0, 1.0), Color::WHITE),
            Vertex::new(Vec3::new(-1.0, 1.0, 1.0), Color::ORANGE),
        ];

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 2, 3, 0, // Front
            1, 5, 6, 6, 2, 1, // Right
            7, 6, 5, 5, 4, 7, // Back
            4, 0, 3, 3, 7, 4, // Left
            4, 5, 1, 1, 0, 4, // Bottom
            3, 2, 6, 6, 7, 3, // Top
        ];

        Mesh::new(vertices, indices)
    }

    /// Loads every model in an OBJ file into one mesh. OBJ files carry no per-vertex
    /// color we can rely on, so each vertex gets a random bright color from `rng`.
    pub fn from_obj<P: AsRef<Path>, R: Rng>(path: P, rng: &mut R) -> Result<Self, MeshError> {
        let (models, _materials) = tobj::load_obj(
            path.as_ref(),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let mut mesh = Mesh::default();

        for model in models {
            let mesh_data = model.mesh;
            let base = mesh.vertices.len();

            for pos in mesh_data.positions.chunks_exact(3) {
                let color = Color::new(
                    rng.gen_range(0.3..=1.0),
                    rng.gen_range(0.3..=1.0),
                    rng.gen_range(0.3..=1.0),
                );
                mesh.vertices
                    .push(Vertex::new(Vec3::new(pos[0], pos[1], pos[2]), color));
            }

            if mesh.vertices.len() > u16::MAX as usize + 1 {
                return Err(MeshError::TooManyVertices(mesh.vertices.len()));
            }

            // triangulate: true guarantees whole triples
            mesh.indices
                .extend(mesh_data.indices.iter().map(|&i| (base + i as usize) as u16));
        }

        log::info!(
            "Loaded OBJ {:?}: {} vertices, {} triangles",
            path.as_ref(),
            mesh.vertices.len(),
            mesh.triangle_count()
        );

        Ok(mesh)
    }

    /// Recenters the mesh on the origin and scales it to fit inside [-1, 1]^3.
    pub fn normalize(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        let (min, max) = self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), v| (min.min(v.position), max.max(v.position)),
        );
        let center = (min + max) * 0.5;
        let extent = (max - min).max_element() * 0.5;
        let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };

        for v in &mut self.vertices {
            v.position = (v.position - center) * scale;
        }
    }
}
