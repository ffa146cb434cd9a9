pub mod camera;
pub mod color;
pub mod mesh;
pub mod vertex;

pub use camera::Camera;
pub use color::Color;
pub use mesh::{Mesh, MeshError};
pub use vertex::Vertex;
