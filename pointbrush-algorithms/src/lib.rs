//! # Pointbrush Algorithms
//!
//! Spatial queries and highlighting for point clouds.
//!
//! This crate provides the R*-tree backed neighbor search used to find
//! points near a feature position, and the colorizer that turns those
//! query results into a highlighted point cloud.

pub mod colorize;
pub mod nearest_neighbor;

// Re-export commonly used items
pub use colorize::*;
pub use nearest_neighbor::*;
