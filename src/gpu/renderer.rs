//! GPU renderer for trust graph visualization
//!
//! Owns the wgpu pipelines, the flat position/color vertex buffers, and an
//! offscreen render target. Nodes are drawn as one point primitive each,
//! edges as one line primitive each, both reading the same pair of vertex
//! buffers: node vertices first, then two vertices per edge.
//!
//! Buffers are a pure function of (positions, edges, selection): every
//! [`GpuRenderer::set_graph_data`] destroys and recreates them in full, and
//! [`GpuRenderer::draw`] is idempotent. Presentation is the caller's
//! concern; the renderer draws to an offscreen texture that can be read
//! back with [`GpuRenderer::read_pixels`].

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;
use wgpu::util::DeviceExt;

use crate::gpu::shaders::graph_shader;
use crate::gpu::types::{CameraUniforms, RenderConfig, edge_color, node_color};
use crate::graph::TrustValue;
use crate::layout::Dimensions;

/// Errors from the rendering path
#[derive(Error, Debug)]
pub enum RenderError {
    /// No GPU adapter or device could be created. Fatal only to the
    /// rendering path; graph and layout queries keep working.
    #[error("GPU unavailable: {0}")]
    GpuUnavailable(String),
}

/// Request a GPU device and queue for rendering.
///
/// Fails with [`RenderError::GpuUnavailable`] instead of panicking so the
/// caller can degrade to a non-rendering state.
pub async fn request_device() -> Result<(wgpu::Device, wgpu::Queue), RenderError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| RenderError::GpuUnavailable("no suitable GPU adapter".to_string()))?;

    adapter
        .request_device(&wgpu::DeviceDescriptor::default(), None)
        .await
        .map_err(|e| RenderError::GpuUnavailable(e.to_string()))
}

/// GPU renderer drawing nodes as points and edges as lines.
pub struct GpuRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,

    node_pipeline: wgpu::RenderPipeline,
    edge_pipeline: wgpu::RenderPipeline,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    camera_bind_group_layout: wgpu::BindGroupLayout,

    position_buffer: Option<wgpu::Buffer>,
    color_buffer: Option<wgpu::Buffer>,
    node_vertex_count: u32,
    edge_vertex_count: u32,

    color_texture: wgpu::Texture,
    depth_texture: Option<wgpu::Texture>,
    staging_buffer: wgpu::Buffer,

    config: RenderConfig,
    dimensions: Dimensions,
}

impl GpuRenderer {
    /// Create a renderer with the given device, queue, target configuration,
    /// and initial dimensionality.
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        config: RenderConfig,
        dimensions: Dimensions,
    ) -> Self {
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform Buffer"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let (node_pipeline, edge_pipeline) =
            build_pipelines(&device, &camera_bind_group_layout, dimensions);

        let (color_texture, depth_texture, staging_buffer) =
            build_targets(&device, &config, dimensions);

        Self {
            device,
            queue,
            node_pipeline,
            edge_pipeline,
            camera_buffer,
            camera_bind_group,
            camera_bind_group_layout,
            position_buffer: None,
            color_buffer: None,
            node_vertex_count: 0,
            edge_vertex_count: 0,
            color_texture,
            depth_texture,
            staging_buffer,
            config,
            dimensions,
        }
    }

    /// Current dimensionality
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Render target configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Rebuild the position and color buffers from a layout snapshot.
    ///
    /// The position buffer holds one vertex per node followed by two per
    /// edge; the color buffer is parallel to it. Node color is the base
    /// color unless the node is selected; edge colors come from the trust
    /// value mapping. Old buffers are destroyed, never patched.
    pub fn set_graph_data(
        &mut self,
        positions: &[[f32; 3]],
        edges: &[(usize, usize, TrustValue)],
        selection: Option<usize>,
    ) {
        let axes = self.dimensions.axes();
        let vertex_count = positions.len() + 2 * edges.len();
        let mut position_data: Vec<f32> = Vec::with_capacity(vertex_count * axes);
        let mut color_data: Vec<f32> = Vec::with_capacity(vertex_count * 4);

        for (i, pos) in positions.iter().enumerate() {
            position_data.extend_from_slice(&pos[..axes]);
            color_data.extend_from_slice(&node_color(selection == Some(i)));
        }

        let mut skipped = 0usize;
        for &(source, target, value) in edges {
            let (Some(a), Some(b)) = (positions.get(source), positions.get(target)) else {
                skipped += 1;
                continue;
            };
            position_data.extend_from_slice(&a[..axes]);
            position_data.extend_from_slice(&b[..axes]);
            let color = edge_color(value);
            color_data.extend_from_slice(&color);
            color_data.extend_from_slice(&color);
        }
        if skipped > 0 {
            warn!(skipped, "skipped edges without layout positions");
        }

        if let Some(buffer) = self.position_buffer.take() {
            buffer.destroy();
        }
        if let Some(buffer) = self.color_buffer.take() {
            buffer.destroy();
        }

        self.node_vertex_count = positions.len() as u32;
        self.edge_vertex_count = 2 * (edges.len() - skipped) as u32;

        if position_data.is_empty() {
            return;
        }

        self.position_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Graph Position Buffer"),
                contents: bytemuck::cast_slice(&position_data),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.color_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Graph Color Buffer"),
                contents: bytemuck::cast_slice(&color_data),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
    }

    /// Upload new camera matrices
    pub fn update_camera(&self, uniforms: &CameraUniforms) {
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Issue one draw pass: clear, bind the camera, draw nodes then edges.
    ///
    /// Idempotent; no state accumulates across calls beyond what
    /// [`GpuRenderer::set_graph_data`] established.
    pub fn draw(&self) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Graph Render Encoder"),
            });

        let color_view = self
            .color_texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = self
            .depth_texture
            .as_ref()
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()));

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Graph Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.config.clear_color[0] as f64,
                            g: self.config.clear_color[1] as f64,
                            b: self.config.clear_color[2] as f64,
                            a: self.config.clear_color[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: depth_view.as_ref().map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (Some(positions), Some(colors)) =
                (self.position_buffer.as_ref(), self.color_buffer.as_ref())
            {
                // Edges first so nodes draw on top
                if self.edge_vertex_count > 0 {
                    render_pass.set_pipeline(&self.edge_pipeline);
                    render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, positions.slice(..));
                    render_pass.set_vertex_buffer(1, colors.slice(..));
                    render_pass.draw(
                        self.node_vertex_count..self.node_vertex_count + self.edge_vertex_count,
                        0..1,
                    );
                }

                if self.node_vertex_count > 0 {
                    render_pass.set_pipeline(&self.node_pipeline);
                    render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, positions.slice(..));
                    render_pass.set_vertex_buffer(1, colors.slice(..));
                    render_pass.draw(0..self.node_vertex_count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Switch dimensionality, rebuilding shaders, pipelines, and the depth
    /// target.
    ///
    /// This is the expensive path: the vertex layout's coordinate arity
    /// changes, so the whole pipeline is recreated. Call only on explicit
    /// configuration change, never per frame. Vertex buffers are dropped;
    /// the caller must supply fresh data via
    /// [`GpuRenderer::set_graph_data`].
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        if self.dimensions == dimensions {
            return;
        }
        self.dimensions = dimensions;

        let (node_pipeline, edge_pipeline) =
            build_pipelines(&self.device, &self.camera_bind_group_layout, dimensions);
        self.node_pipeline = node_pipeline;
        self.edge_pipeline = edge_pipeline;

        let (color_texture, depth_texture, staging_buffer) =
            build_targets(&self.device, &self.config, dimensions);
        self.color_texture = color_texture;
        self.depth_texture = depth_texture;
        self.staging_buffer = staging_buffer;

        if let Some(buffer) = self.position_buffer.take() {
            buffer.destroy();
        }
        if let Some(buffer) = self.color_buffer.take() {
            buffer.destroy();
        }
        self.node_vertex_count = 0;
        self.edge_vertex_count = 0;
    }

    /// Resize the offscreen target, destroying and recreating the textures
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        let (color_texture, depth_texture, staging_buffer) =
            build_targets(&self.device, &self.config, self.dimensions);
        self.color_texture = color_texture;
        self.depth_texture = depth_texture;
        self.staging_buffer = staging_buffer;
    }

    /// Read back the rendered frame as RGBA pixels.
    ///
    /// Blocks until the GPU has finished and the copy has landed. Returns
    /// width x height x 4 bytes.
    pub fn read_pixels(&self) -> Vec<u8> {
        let unpadded_bytes_per_row = self.config.width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.config.height),
                },
            },
            wgpu::Extent3d {
                width: self.config.width,
                height: self.config.height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = self.staging_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .expect("map_async callback dropped")
            .expect("failed to map staging buffer");

        let data = buffer_slice.get_mapped_range();
        let mut pixels =
            Vec::with_capacity((self.config.width * self.config.height * 4) as usize);
        for y in 0..self.config.height {
            let start = (y * padded_bytes_per_row) as usize;
            let end = start + unpadded_bytes_per_row as usize;
            pixels.extend_from_slice(&data[start..end]);
        }

        drop(data);
        self.staging_buffer.unmap();

        pixels
    }
}

/// Build the node (point-list) and edge (line-list) pipelines for the given
/// dimensionality. Both share the vertex layout: positions in slot 0,
/// colors in slot 1.
fn build_pipelines(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    dimensions: Dimensions,
) -> (wgpu::RenderPipeline, wgpu::RenderPipeline) {
    let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Graph Shader"),
        source: wgpu::ShaderSource::Wgsl(graph_shader(dimensions).into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Graph Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout],
        push_constant_ranges: &[],
    });

    let position_format = match dimensions {
        Dimensions::Two => wgpu::VertexFormat::Float32x2,
        Dimensions::Three => wgpu::VertexFormat::Float32x3,
    };
    let position_stride = (dimensions.axes() * std::mem::size_of::<f32>()) as u64;

    let depth_stencil = match dimensions {
        Dimensions::Two => None,
        Dimensions::Three => Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
    };

    let build = |label: &str, topology: wgpu::PrimitiveTopology| {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vs_graph"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: position_stride,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            format: position_format,
                            offset: 0,
                            shader_location: 0,
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: (4 * std::mem::size_of::<f32>()) as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x4,
                            offset: 0,
                            shader_location: 1,
                        }],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fs_graph"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: depth_stencil.clone(),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    };

    (
        build("Node Render Pipeline", wgpu::PrimitiveTopology::PointList),
        build("Edge Render Pipeline", wgpu::PrimitiveTopology::LineList),
    )
}

/// Build the offscreen color target, the depth target (3D only), and the
/// readback staging buffer.
fn build_targets(
    device: &wgpu::Device,
    config: &RenderConfig,
    dimensions: Dimensions,
) -> (wgpu::Texture, Option<wgpu::Texture>, wgpu::Buffer) {
    let color_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Color Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });

    let depth_texture = match dimensions {
        Dimensions::Two => None,
        Dimensions::Three => Some(device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })),
    };

    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = (config.width * 4).div_ceil(align) * align;
    let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Staging Buffer"),
        size: (padded_bytes_per_row * config.height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    (color_texture, depth_texture, staging_buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// GPU tests run only where an adapter exists; on headless CI they
    /// return early instead of failing.
    fn try_device() -> Option<(Arc<wgpu::Device>, Arc<wgpu::Queue>)> {
        match pollster::block_on(request_device()) {
            Ok((device, queue)) => Some((Arc::new(device), Arc::new(queue))),
            Err(_) => None,
        }
    }

    fn triangle_data() -> (Vec<[f32; 3]>, Vec<(usize, usize, TrustValue)>) {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [0.5, 0.0, 0.0],
            [0.0, 0.5, 0.0],
        ];
        let edges = vec![
            (0, 1, TrustValue::Positive),
            (1, 2, TrustValue::Negative),
            (2, 0, TrustValue::Neutral),
        ];
        (positions, edges)
    }

    #[test]
    fn test_renderer_creation_both_modes() {
        let Some((device, queue)) = try_device() else {
            return;
        };
        for dimensions in [Dimensions::Two, Dimensions::Three] {
            let renderer = GpuRenderer::new(
                device.clone(),
                queue.clone(),
                RenderConfig::default(),
                dimensions,
            );
            assert_eq!(renderer.dimensions(), dimensions);
        }
    }

    #[test]
    fn test_draw_empty_scene() {
        let Some((device, queue)) = try_device() else {
            return;
        };
        let renderer =
            GpuRenderer::new(device, queue, RenderConfig::default(), Dimensions::Two);
        renderer.draw();

        let pixels = renderer.read_pixels();
        assert_eq!(pixels.len(), 800 * 600 * 4);
    }

    #[test]
    fn test_draw_nodes_and_edges() {
        let Some((device, queue)) = try_device() else {
            return;
        };
        let mut renderer =
            GpuRenderer::new(device, queue, RenderConfig::default(), Dimensions::Two);
        let (positions, edges) = triangle_data();
        renderer.set_graph_data(&positions, &edges, None);
        renderer.update_camera(&CameraUniforms::default());
        renderer.draw();

        let pixels = renderer.read_pixels();
        let background = [
            (0.1f32 * 255.0) as u8,
            (0.1f32 * 255.0) as u8,
            (0.15f32 * 255.0) as u8,
        ];
        let has_content = pixels.chunks(4).any(|pixel| {
            (pixel[0] as i32 - background[0] as i32).abs() > 10
                || (pixel[1] as i32 - background[1] as i32).abs() > 10
                || (pixel[2] as i32 - background[2] as i32).abs() > 10
        });
        assert!(has_content, "expected drawn primitives in the frame");
    }

    #[test]
    fn test_draw_is_idempotent() {
        let Some((device, queue)) = try_device() else {
            return;
        };
        let mut renderer =
            GpuRenderer::new(device, queue, RenderConfig::default(), Dimensions::Two);
        let (positions, edges) = triangle_data();
        renderer.set_graph_data(&positions, &edges, Some(0));
        renderer.update_camera(&CameraUniforms::default());

        renderer.draw();
        let first = renderer.read_pixels();
        renderer.draw();
        let second = renderer.read_pixels();
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_dimensions_rebuilds_and_draws() {
        let Some((device, queue)) = try_device() else {
            return;
        };
        let mut renderer =
            GpuRenderer::new(device, queue, RenderConfig::default(), Dimensions::Two);
        let (positions, edges) = triangle_data();
        renderer.set_graph_data(&positions, &edges, None);

        renderer.set_dimensions(Dimensions::Three);
        assert_eq!(renderer.dimensions(), Dimensions::Three);

        // Buffers were invalidated by the arity change; resupply and draw
        renderer.set_graph_data(&positions, &edges, None);
        renderer.update_camera(&CameraUniforms::default());
        renderer.draw();
        let pixels = renderer.read_pixels();
        assert_eq!(pixels.len(), 800 * 600 * 4);
    }

    #[test]
    fn test_resize_recreates_target() {
        let Some((device, queue)) = try_device() else {
            return;
        };
        let mut renderer =
            GpuRenderer::new(device, queue, RenderConfig::default(), Dimensions::Two);
        renderer.resize(256, 128);
        renderer.draw();
        let pixels = renderer.read_pixels();
        assert_eq!(pixels.len(), 256 * 128 * 4);
    }

    #[test]
    fn test_out_of_range_edges_skipped() {
        let Some((device, queue)) = try_device() else {
            return;
        };
        let mut renderer =
            GpuRenderer::new(device, queue, RenderConfig::default(), Dimensions::Two);
        let positions = vec![[0.0, 0.0, 0.0]];
        let edges = vec![(0, 5, TrustValue::Positive)];
        renderer.set_graph_data(&positions, &edges, None);
        // Draw must not panic with the bad edge dropped
        renderer.draw();
    }
}
