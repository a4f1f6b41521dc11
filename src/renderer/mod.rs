//! Rendering module
//!
//! `shapes` generates vertex data on the CPU, `draw` turns a scene into
//! device calls through the `DrawDevice` abstraction, and `pipeline` is the
//! WebGPU backend implementing it.

pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw::{DrawDevice, LightRig, Primitive, dispatch_scene, entity_transform, view_proj};
pub use pipeline::{GfxError, WgpuDevice};
pub use vertex::Vertex;
