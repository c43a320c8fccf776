//! Highlighting pipeline built from the conversion, query, and I/O crates
//!
//! The [`Session`] type owns the point cloud being displayed and exposes
//! the interactive actions as plain method calls: load a mesh vertex
//! buffer, recolor around feature points, and save the result. All
//! operations are synchronous and run on the calling thread.

pub mod session;

pub use session::Session;
