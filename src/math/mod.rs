pub mod mesh;
pub mod surface;

pub use mesh::MeshStats;
pub use surface::{DEFAULT_STEPS_U, DEFAULT_STEPS_V, tessellate, vertex_count};
