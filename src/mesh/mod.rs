//! Mesh data and GPU geometry synchronization.
//!
//! This module provides the geometry pipeline, leaves first:
//!
//! - [`VertexPool`] - flat per-vertex attribute storage
//! - [`Face`] / [`FaceSet`] - validated polygon records over a pool
//! - [`VertexLayout`] - interleaved buffer description for draw binding
//! - [`GeometryBuffer`] - triangulation, interleaving, and GPU upload

mod face;
mod geometry;
mod layout;
mod vertex_pool;

pub use face::{Face, FaceSet};
pub use geometry::{GeometryBuffer, SharedGeometryBuffer, SyncState};
pub use layout::{VertexAttribute, VertexAttributeFormat, VertexLayout};
pub use vertex_pool::{SharedVertexPool, VertexPool};
