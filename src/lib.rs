//! trustviz - signed trust-graph layout and WebGPU rendering.
//!
//! This crate visualizes trust networks: entities connected by
//! balanced-ternary trust relationships (-1, 0, +1). It splits into a pure
//! core - graph model, layout engine, camera math, picking - that is
//! testable without any GPU, and a wgpu rendering adapter that consumes
//! immutable position/color snapshots. The [`controller::Controller`]
//! orchestrates the two.

pub mod camera;
pub mod controller;
pub mod gpu;
pub mod graph;
pub mod layout;
pub mod picking;

pub use controller::{Controller, VizConfig, VizError};
pub use graph::{Threshold, TrustGraph, TrustValue};
pub use layout::{Dimensions, LayoutKind, LayoutParams};
