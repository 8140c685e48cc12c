//! WebGPU rendering module
//!
//! Drawing calls are tessellated into colored triangles on the CPU, then drawn
//! in a single pass.

pub mod batch;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use batch::ShapeBatch;
pub use pipeline::RenderState;
pub use vertex::Vertex;
