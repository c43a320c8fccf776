//! Core data structures and traits for pointbrush
//!
//! This crate provides the fundamental types for feature-based point
//! cloud highlighting: point clouds with parallel attribute arrays,
//! renderer-facing vertex buffers and the conversions between them,
//! and the highlight configuration types.

pub mod buffer_interop;
pub mod config;
pub mod error;
pub mod point;
pub mod point_cloud;
pub mod traits;
pub mod vertex_buffer;

pub use config::*;
pub use error::*;
pub use point::*;
pub use point_cloud::*;
pub use traits::*;
pub use vertex_buffer::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
