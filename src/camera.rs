//! Camera and projection transforms
//!
//! Maintains view and projection matrices for the two viewing modes: 2D
//! orthographic and 3D perspective. The mode is switched explicitly, never
//! inferred. Rotation, zoom, and viewport state live on the [`Camera`]
//! struct and are mutated only through its operations.

use std::f32::consts::PI;

use crate::gpu::types::CameraUniforms;
use crate::layout::Dimensions;

/// Field of view for 3D perspective projection (45 degrees)
pub const FOV: f32 = PI / 4.0;

/// Near clip plane for 3D perspective projection
pub const NEAR: f32 = 0.1;

/// Far clip plane for 3D perspective projection
pub const FAR: f32 = 100.0;

/// Fixed distance the 3D camera sits back along the view axis
pub const CAMERA_DISTANCE: f32 = 3.0;

/// Minimum zoom factor
pub const MIN_ZOOM: f32 = 0.1;

/// Maximum zoom factor
pub const MAX_ZOOM: f32 = 5.0;

/// A 4x4 matrix in column-major order, as WGSL expects it
pub type Mat4 = [[f32; 4]; 4];

/// Camera state for 2D orthographic or 3D perspective viewing.
///
/// In 2D the view is a uniform zoom scale and the projection is a fixed
/// orthographic box; rotation is a no-op. In 3D the view translates back
/// by [`CAMERA_DISTANCE`], applies the accumulated drag rotation, then the
/// zoom scale; the projection is a perspective frustum with the aspect
/// ratio of the current viewport.
#[derive(Debug, Clone)]
pub struct Camera {
    mode: Dimensions,
    rotation_x: f32,
    rotation_y: f32,
    zoom: f32,
    width: u32,
    height: u32,
}

impl Camera {
    /// Create a camera in the given mode with a viewport in pixels
    pub fn new(mode: Dimensions, width: u32, height: u32) -> Self {
        Self {
            mode,
            rotation_x: 0.0,
            rotation_y: 0.0,
            zoom: 1.0,
            width,
            height,
        }
    }

    /// Current viewing mode
    pub fn mode(&self) -> Dimensions {
        self.mode
    }

    /// Switch viewing mode explicitly; rotation and zoom are retained
    pub fn set_mode(&mut self, mode: Dimensions) {
        self.mode = mode;
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Accumulated rotation angles (x, y) in radians
    pub fn rotation(&self) -> (f32, f32) {
        (self.rotation_x, self.rotation_y)
    }

    /// Viewport aspect ratio (width / height)
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Accumulate drag rotation in radians. 3D only; a no-op in 2D.
    ///
    /// `delta_x` rotates about the y axis (horizontal drag), `delta_y`
    /// about the x axis (vertical drag).
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        if self.mode != Dimensions::Three {
            return;
        }
        self.rotation_y += delta_x;
        self.rotation_x += delta_y;
    }

    /// Multiply the zoom by a factor, clamped to the [`MIN_ZOOM`] to
    /// [`MAX_ZOOM`] range. Never silently exceeds the bounds.
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Update the viewport dimensions (recomputes the aspect ratio)
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// View matrix for the current mode
    pub fn view_matrix(&self) -> Mat4 {
        match self.mode {
            Dimensions::Two => scaling(self.zoom, self.zoom, 1.0),
            Dimensions::Three => {
                let mut m = translation(0.0, 0.0, -CAMERA_DISTANCE);
                m = multiply(m, rotation_x(self.rotation_x));
                m = multiply(m, rotation_y(self.rotation_y));
                multiply(m, scaling(self.zoom, self.zoom, self.zoom))
            }
        }
    }

    /// Projection matrix for the current mode
    pub fn projection_matrix(&self) -> Mat4 {
        match self.mode {
            Dimensions::Two => orthographic(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0),
            Dimensions::Three => perspective(FOV, self.aspect(), NEAR, FAR),
        }
    }

    /// Combined uniforms for GPU upload
    pub fn uniforms(&self) -> CameraUniforms {
        CameraUniforms {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
        }
    }
}

// =============================================================================
// Matrix Math Helpers
// =============================================================================

/// Identity matrix
pub fn identity() -> Mat4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Axis-aligned scaling matrix
pub fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
    [
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Translation matrix
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [x, y, z, 1.0],
    ]
}

/// Rotation about the x axis
pub fn rotation_x(rad: f32) -> Mat4 {
    let (s, c) = rad.sin_cos();
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, s, 0.0],
        [0.0, -s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Rotation about the y axis
pub fn rotation_y(rad: f32) -> Mat4 {
    let (s, c) = rad.sin_cos();
    [
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Orthographic projection matrix
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let lr = 1.0 / (left - right);
    let bt = 1.0 / (bottom - top);
    let nf = 1.0 / (near - far);
    [
        [-2.0 * lr, 0.0, 0.0, 0.0],
        [0.0, -2.0 * bt, 0.0, 0.0],
        [0.0, 0.0, 2.0 * nf, 0.0],
        [(left + right) * lr, (top + bottom) * bt, (far + near) * nf, 1.0],
    ]
}

/// Perspective projection matrix
pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov / 2.0).tan();
    let nf = 1.0 / (near - far);
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (far + near) * nf, -1.0],
        [0.0, 0.0, 2.0 * far * near * nf, 0.0],
    ]
}

/// Column-major matrix product a * b
pub fn multiply(a: Mat4, b: Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for (col, out_col) in out.iter_mut().enumerate() {
        for (row, out_cell) in out_col.iter_mut().enumerate() {
            *out_cell = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    out
}
