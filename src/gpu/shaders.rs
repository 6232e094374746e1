//! WGSL shaders for graph rendering
//!
//! One shader pair per dimensionality: the vertex layout depends on
//! coordinate arity (vec2 in 2D, vec3 in 3D), which is why switching
//! dimensions requires a full pipeline rebuild.

use crate::layout::Dimensions;

/// Camera uniform struct shared by both shader variants
pub const CAMERA_UNIFORMS: &str = r#"
struct CameraUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
}

@group(0) @binding(0) var<uniform> camera: CameraUniforms;
"#;

/// 2D vertex shader: positions are vec2, z fixed to 0
pub const GRAPH_VERTEX_SHADER_2D: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_graph(
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    let world = vec4<f32>(position, 0.0, 1.0);
    out.clip_position = camera.projection * camera.view * world;
    out.color = color;
    return out;
}
"#;

/// 3D vertex shader: positions are vec3
pub const GRAPH_VERTEX_SHADER_3D: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_graph(
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    let world = vec4<f32>(position, 1.0);
    out.clip_position = camera.projection * camera.view * world;
    out.color = color;
    return out;
}
"#;

/// Fragment shader shared by both variants: pass the vertex color through
pub const GRAPH_FRAGMENT_SHADER: &str = r#"
struct FragmentInput {
    @location(0) color: vec4<f32>,
}

@fragment
fn fs_graph(in: FragmentInput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Assemble the complete shader source for the given dimensionality
pub fn graph_shader(dimensions: Dimensions) -> String {
    let vertex = match dimensions {
        Dimensions::Two => GRAPH_VERTEX_SHADER_2D,
        Dimensions::Three => GRAPH_VERTEX_SHADER_3D,
    };
    format!("{}\n{}\n{}", CAMERA_UNIFORMS, vertex, GRAPH_FRAGMENT_SHADER)
}
