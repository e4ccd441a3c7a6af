//! WebGPU rendering module
//!
//! Scenes are built as plain vertex lists in logical screen space (testable
//! without a GPU), then mapped through the letterbox viewport and drawn.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use pipeline::RenderState;
pub use scene::{DrawCmd, Scene, SpriteSlot, build};
pub use viewport::Viewport;
