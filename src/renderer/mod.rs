pub mod context;
pub mod geometry;
pub mod gpu;
pub mod shader;
pub mod trackball;
pub mod transform;
pub mod viewport;

pub use context::{FrameStatus, RenderContext};
pub use gpu::GpuState;
pub use trackball::RedrawRequest;
