//! WebGPU rendering pipeline for trust graphs
//!
//! Owns GPU buffer lifetime and issues the per-frame draw: nodes as point
//! primitives, edges as line primitives, colored by selection state and
//! trust value. The pipeline draws to an offscreen target; presenting to a
//! window or canvas is the embedding shell's concern.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trustviz::gpu::{GpuRenderer, RenderConfig, request_device};
//! use trustviz::layout::Dimensions;
//!
//! let (device, queue) = pollster::block_on(request_device())?;
//! let mut renderer = GpuRenderer::new(
//!     Arc::new(device),
//!     Arc::new(queue),
//!     RenderConfig::default(),
//!     Dimensions::Two,
//! );
//!
//! renderer.set_graph_data(&positions, &edges, None);
//! renderer.update_camera(&camera.uniforms());
//! renderer.draw();
//! let pixels = renderer.read_pixels();
//! ```
//!
//! If no GPU adapter exists, [`request_device`] fails with
//! [`RenderError::GpuUnavailable`]; the rest of the system (graph queries,
//! layout) keeps working without a renderer attached.

mod renderer;
mod shaders;
pub mod types;

pub use renderer::{GpuRenderer, RenderError, request_device};
pub use shaders::graph_shader;
pub use types::{
    CLEAR_COLOR, CameraUniforms, EDGE_NEGATIVE_COLOR, EDGE_NEUTRAL_COLOR, EDGE_POSITIVE_COLOR,
    NODE_BASE_COLOR, NODE_SELECTED_COLOR, RenderConfig, edge_color, node_color,
};
