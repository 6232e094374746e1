//! Pointer interaction and nearest-node picking
//!
//! Maps pointer and wheel input to camera updates or node selection. A
//! pointer-down begins a drag; movement while dragging rotates the 3D
//! camera proportionally to pixel delta; a release with little movement
//! counts as a click and runs the nearest-node pick.

use crate::camera::Camera;
use crate::layout::Dimensions;

/// Maximum normalized distance at which a click selects a node
pub const SELECTION_RADIUS: f32 = 0.1;

/// Camera rotation per pixel of drag, in radians
pub const ROTATE_SPEED: f32 = 0.01;

/// Zoom factor per wheel step toward the scene
pub const ZOOM_IN_STEP: f32 = 1.1;

/// Zoom factor per wheel step away from the scene
pub const ZOOM_OUT_STEP: f32 = 0.9;

/// Maximum accumulated pointer travel (pixels) for a release to count as a
/// click rather than the end of a drag
pub const CLICK_SLOP_PX: f32 = 4.0;

/// A selection change, carrying the selected entity identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub entity: String,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    last_x: f32,
    last_y: f32,
    travel: f32,
}

/// Drag/click state machine over pointer events.
#[derive(Debug, Default)]
pub struct Interaction {
    drag: Option<DragState>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Begin a drag at the given pixel position
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag = Some(DragState {
            last_x: x,
            last_y: y,
            travel: 0.0,
        });
    }

    /// Continue a drag. Rotates the camera in 3D mode; returns true when
    /// the camera changed and a redraw is needed.
    pub fn pointer_move(&mut self, x: f32, y: f32, camera: &mut Camera) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let dx = x - drag.last_x;
        let dy = y - drag.last_y;
        drag.last_x = x;
        drag.last_y = y;
        drag.travel += dx.abs() + dy.abs();

        let rotates = camera.mode() == Dimensions::Three;
        camera.rotate(dx * ROTATE_SPEED, dy * ROTATE_SPEED);
        rotates
    }

    /// End the drag. Returns true when the gesture was a click (pointer
    /// travel stayed under [`CLICK_SLOP_PX`]), in which case the caller
    /// should run the pick.
    pub fn pointer_up(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => drag.travel <= CLICK_SLOP_PX,
            None => false,
        }
    }

    /// Apply a wheel step to the camera zoom. Positive delta zooms out,
    /// negative zooms in.
    pub fn wheel(&self, delta_y: f32, camera: &mut Camera) {
        let factor = if delta_y > 0.0 {
            ZOOM_OUT_STEP
        } else {
            ZOOM_IN_STEP
        };
        camera.zoom_by(factor);
    }
}

/// Convert pixel coordinates to normalized device coordinates (-1 to 1,
/// y up).
pub fn pixel_to_ndc(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    let ndc_x = x / width.max(1) as f32 * 2.0 - 1.0;
    let ndc_y = -(y / height.max(1) as f32 * 2.0 - 1.0);
    (ndc_x, ndc_y)
}

/// Find the node nearest to a click point, if any lies within `radius`.
///
/// Distance is Euclidean against the raw layout coordinates (for 3D this
/// is an approximation that ignores the projection). Ties go to the
/// first-seen node in iteration order; this is an accepted, not
/// guaranteed-stable, policy.
pub fn pick_nearest(
    ndc_x: f32,
    ndc_y: f32,
    positions: &[[f32; 3]],
    radius: f32,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, pos) in positions.iter().enumerate() {
        let dx = ndc_x - pos[0];
        let dy = ndc_y - pos[1];
        let dz = pos[2];
        let distance = (dx * dx + dy * dy + dz * dz).sqrt();
        if distance < radius && best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}
