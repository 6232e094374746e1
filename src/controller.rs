//! Visualization controller
//!
//! Orchestrates the graph model, layout engine, camera, renderer, and
//! interaction module. The controller is the sole owner of the current
//! graph and configuration: it derives the filtered sub-graph, triggers
//! re-layout, rebuilds GPU buffers, and collapses redraw requests into a
//! single pending frame. Everything runs synchronously on the caller's
//! thread.
//!
//! The renderer is optional: with no GPU attached the controller still
//! answers graph and layout queries and handles selection, it just draws
//! nothing ([`Controller::gpu_available`] reports the capability).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::camera::Camera;
use crate::gpu::{GpuRenderer, RenderConfig, RenderError};
use crate::graph::{GraphError, LoadReport, NetworkStats, Threshold, TrustGraph};
use crate::layout::{
    compute_layout, Dimensions, LayoutError, LayoutKind, LayoutParams, LayoutSnapshot,
};
use crate::picking::{self, Interaction, SELECTION_RADIUS, SelectionEvent};

/// Rotation advance per frame while auto-rotate is on, in radians
pub const AUTO_ROTATE_STEP: f32 = 0.005;

/// Errors surfaced by the controller
#[derive(Error, Debug)]
pub enum VizError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Live visualization configuration.
///
/// Deserialization validates at the boundary: a threshold outside
/// {-1, 0, 1} or dimensions outside {2, 3} fail to parse rather than being
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VizConfig {
    pub layout: LayoutKind,
    pub dimensions: Dimensions,
    pub threshold: Threshold,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::ForceDirected,
            dimensions: Dimensions::Two,
            threshold: Threshold::Neutral,
        }
    }
}

/// Orchestrates graph, layout, camera, renderer, and interaction.
pub struct Controller {
    graph: TrustGraph,
    filtered: TrustGraph,
    config: VizConfig,
    params: LayoutParams,
    snapshot: LayoutSnapshot,
    camera: Camera,
    interaction: Interaction,
    renderer: Option<GpuRenderer>,
    selected: Option<usize>,
    redraw_pending: bool,
    auto_rotate: bool,
    viewport: (u32, u32),
}

impl Controller {
    /// Create a controller with an empty graph
    pub fn new(config: VizConfig) -> Self {
        Self {
            graph: TrustGraph::new(),
            filtered: TrustGraph::new(),
            config,
            params: LayoutParams::default(),
            snapshot: LayoutSnapshot::default(),
            camera: Camera::new(config.dimensions, 800, 600),
            interaction: Interaction::new(),
            renderer: None,
            selected: None,
            redraw_pending: false,
            auto_rotate: false,
            viewport: (800, 600),
        }
    }

    /// Replace the force-layout parameters (takes effect on the next
    /// layout pass)
    pub fn set_layout_params(&mut self, params: LayoutParams) {
        self.params = params;
    }

    /// Current configuration
    pub fn config(&self) -> VizConfig {
        self.config
    }

    /// The full (unfiltered) graph
    pub fn graph(&self) -> &TrustGraph {
        &self.graph
    }

    /// The threshold-filtered sub-graph currently displayed
    pub fn filtered(&self) -> &TrustGraph {
        &self.filtered
    }

    /// Statistics over the full graph
    pub fn stats(&self) -> NetworkStats {
        self.graph.stats()
    }

    /// The current layout snapshot
    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    /// The camera state
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The selected entity, if any
    pub fn selected_entity(&self) -> Option<&str> {
        self.selected.map(|i| self.graph.entities()[i].as_str())
    }

    /// Whether a renderer is attached and the GPU path is usable
    pub fn gpu_available(&self) -> bool {
        self.renderer.is_some()
    }

    /// Parse and adopt a trust network JSON document.
    ///
    /// Malformed edges are dropped with a count in the returned report.
    pub fn load_graph(&mut self, json: &str) -> Result<LoadReport, VizError> {
        let (graph, report) = TrustGraph::from_json(json)?;
        self.set_graph(graph);
        Ok(report)
    }

    /// Adopt a new graph: re-filter, re-layout, rebuild buffers
    pub fn set_graph(&mut self, graph: TrustGraph) {
        self.graph = graph;
        self.selected = None;
        self.relayout();
    }

    /// Change the trust threshold; re-derives the filtered graph
    pub fn set_threshold(&mut self, threshold: Threshold) {
        if self.config.threshold == threshold {
            return;
        }
        self.config.threshold = threshold;
        self.relayout();
    }

    /// Change the layout strategy
    pub fn set_layout(&mut self, layout: LayoutKind) {
        if self.config.layout == layout {
            return;
        }
        self.config.layout = layout;
        self.relayout();
    }

    /// Change dimensionality.
    ///
    /// This is the expensive path: the renderer's shader and vertex layout
    /// depend on coordinate arity, so the whole pipeline is re-initialized.
    /// Only call on explicit user configuration change.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        if self.config.dimensions == dimensions {
            return;
        }
        self.config.dimensions = dimensions;
        self.camera.set_mode(dimensions);
        if let Some(renderer) = &mut self.renderer {
            renderer.set_dimensions(dimensions);
        }
        self.relayout();
    }

    /// Apply a whole configuration object, taking only the transitions the
    /// diff requires
    pub fn apply_config(&mut self, config: VizConfig) {
        self.set_dimensions(config.dimensions);
        self.set_layout(config.layout);
        self.set_threshold(config.threshold);
    }

    /// Attach a GPU renderer. Existing graph data and camera state are
    /// uploaded immediately.
    pub fn attach_renderer(
        &mut self,
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        config: RenderConfig,
    ) {
        self.viewport = (config.width, config.height);
        self.camera.resize(config.width, config.height);
        self.renderer = Some(GpuRenderer::new(
            device,
            queue,
            config,
            self.config.dimensions,
        ));
        self.rebuild_buffers();
        self.request_redraw();
    }

    /// Detach the renderer, degrading to the non-rendering state
    pub fn detach_renderer(&mut self) {
        if self.renderer.take().is_some() {
            warn!("renderer detached, continuing without GPU");
        }
    }

    /// Re-run the layout from a fresh initialization
    pub fn regenerate(&mut self) {
        self.relayout();
    }

    /// Toggle the per-frame rotation animation (3D only)
    pub fn set_auto_rotate(&mut self, on: bool) {
        self.auto_rotate = on;
        if on {
            self.request_redraw();
        }
    }

    /// Resize the viewport: camera aspect and render target follow
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera.resize(width, height);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
        self.request_redraw();
    }

    /// Begin a pointer drag
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.interaction.pointer_down(x, y);
    }

    /// Continue a pointer drag; schedules a redraw if the camera moved
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.interaction.pointer_move(x, y, &mut self.camera) {
            self.request_redraw();
        }
    }

    /// End a pointer gesture. A click (not a drag) picks the nearest node;
    /// a selection change is returned for the UI and updates highlighting.
    pub fn pointer_up(&mut self, x: f32, y: f32) -> Option<SelectionEvent> {
        if !self.interaction.pointer_up() {
            return None;
        }

        let (ndc_x, ndc_y) = picking::pixel_to_ndc(x, y, self.viewport.0, self.viewport.1);
        let hit = picking::pick_nearest(ndc_x, ndc_y, self.snapshot.positions(), SELECTION_RADIUS)?;
        if self.selected == Some(hit) {
            return None;
        }

        self.selected = Some(hit);
        let entity = self.graph.entities()[hit].clone();
        debug!(entity = %entity, "selection changed");
        self.rebuild_buffers();
        self.request_redraw();
        Some(SelectionEvent { entity })
    }

    /// Apply a wheel step to the zoom
    pub fn wheel(&mut self, delta_y: f32) {
        self.interaction.wheel(delta_y, &mut self.camera);
        self.request_redraw();
    }

    /// Schedule a redraw. Multiple requests before the next frame collapse
    /// into one pending callback.
    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// Whether a redraw is pending
    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Run one frame: draws if a redraw is pending and a renderer is
    /// attached. Returns true when a frame was actually drawn.
    pub fn render_frame(&mut self) -> bool {
        let animating = self.auto_rotate && self.config.dimensions == Dimensions::Three;
        if animating {
            self.camera.rotate(AUTO_ROTATE_STEP, 0.0);
            self.redraw_pending = true;
        }

        if !self.redraw_pending {
            return false;
        }
        self.redraw_pending = false;

        let drawn = match &self.renderer {
            Some(renderer) => {
                renderer.update_camera(&self.camera.uniforms());
                renderer.draw();
                true
            }
            None => false,
        };

        // The animation schedules the next frame after this one completes
        if animating {
            self.request_redraw();
        }
        drawn
    }

    /// Read back the last rendered frame as RGBA pixels.
    ///
    /// Returns None when no renderer is attached.
    pub fn read_pixels(&self) -> Option<Vec<u8>> {
        self.renderer.as_ref().map(|renderer| renderer.read_pixels())
    }

    /// Re-derive the filtered graph and layout, then rebuild GPU buffers
    fn relayout(&mut self) {
        self.filtered = self.graph.filter_by_threshold(self.config.threshold);
        self.snapshot = compute_layout(
            &self.filtered,
            self.config.layout,
            self.config.dimensions,
            &self.params,
        );
        self.rebuild_buffers();
        self.request_redraw();
    }

    fn rebuild_buffers(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let edges: Vec<_> = self.filtered.edge_indices().collect();
        renderer.set_graph_data(self.snapshot.positions(), &edges, self.selected);
        renderer.update_camera(&self.camera.uniforms());
    }
}
