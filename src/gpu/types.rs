//! GPU buffer types and the trust color table
//!
//! These types are uploaded directly to GPU buffers. All use f32 for GPU
//! compatibility and are repr(C) for predictable layout.

use bytemuck::{Pod, Zeroable};

use crate::graph::TrustValue;

// =============================================================================
// Colors
// =============================================================================

/// Base node color (light blue)
pub const NODE_BASE_COLOR: [f32; 4] = [0.4, 0.7, 0.9, 1.0];

/// Highlight color for the selected node (yellow)
pub const NODE_SELECTED_COLOR: [f32; 4] = [1.0, 0.8, 0.2, 1.0];

/// Positive trust edge color (green, translucent)
pub const EDGE_POSITIVE_COLOR: [f32; 4] = [0.2, 0.8, 0.4, 0.7];

/// Neutral trust edge color (gray, translucent)
pub const EDGE_NEUTRAL_COLOR: [f32; 4] = [0.6, 0.6, 0.6, 0.5];

/// Negative trust edge color (red, translucent)
pub const EDGE_NEGATIVE_COLOR: [f32; 4] = [0.8, 0.3, 0.3, 0.7];

/// Background clear color (dark blue-gray)
pub const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.15, 1.0];

/// Color for a node, depending on selection state
pub fn node_color(selected: bool) -> [f32; 4] {
    if selected {
        NODE_SELECTED_COLOR
    } else {
        NODE_BASE_COLOR
    }
}

/// Color for an edge, from its trust value
pub fn edge_color(value: TrustValue) -> [f32; 4] {
    match value {
        TrustValue::Positive => EDGE_POSITIVE_COLOR,
        TrustValue::Neutral => EDGE_NEUTRAL_COLOR,
        TrustValue::Negative => EDGE_NEGATIVE_COLOR,
    }
}

// =============================================================================
// Uniforms and Configuration
// =============================================================================

/// Camera matrices passed to the GPU for rendering.
///
/// Layout matches the WGSL uniform struct for direct buffer upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniforms {
    /// View matrix (world -> camera space)
    pub view: [[f32; 4]; 4],
    /// Projection matrix (camera -> clip space)
    pub projection: [[f32; 4]; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        let identity = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        Self {
            view: identity,
            projection: identity,
        }
    }
}

/// Configuration for the renderer's offscreen target
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Render target width in pixels
    pub width: u32,
    /// Render target height in pixels
    pub height: u32,
    /// Background clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            clear_color: CLEAR_COLOR,
        }
    }
}
