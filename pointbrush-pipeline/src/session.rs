//! Session state for the interactive highlighting pipeline

use log::debug;
use pointbrush_algorithms::colorize_point_cloud;
use pointbrush_core::{Error, HighlightConfig, PointCloud, Result, VertexBuffer};
use std::path::Path;

/// Owner of the point cloud currently on display.
///
/// A session wires the three interactive actions (load, colorize, save)
/// to the conversion and highlighting routines. It holds at most one
/// cloud at a time; every action that changes the cloud constructs the
/// replacement in full before the old value is dropped, so a failed
/// action leaves the previous cloud on display.
///
/// # Example
///
/// ```
/// use pointbrush_core::{FeaturePoint, HighlightConfig, VertexAttribute, VertexBuffer};
/// use pointbrush_pipeline::Session;
///
/// fn main() -> pointbrush_core::Result<()> {
///     let mut buffer = VertexBuffer::new();
///     buffer.insert_attribute(
///         VertexAttribute::Position,
///         vec![[0.0, 0.0, 0.0], [0.05, 0.0, 0.0], [10.0, 0.0, 0.0]],
///     );
///
///     let mut session = Session::new();
///     session.load_mesh_buffer(&buffer)?;
///
///     let config = HighlightConfig::new(vec![FeaturePoint::new(0.0, 0.0, 0.0, 0.08)]);
///     session.apply_highlights(&config)?;
///
///     let colors = session.cloud().unwrap().colors.as_ref().unwrap().clone();
///     assert_eq!(colors[0], [0.0, 1.0, 0.0]);
///     assert_eq!(colors[1], [0.0, 1.0, 0.0]);
///     assert_eq!(colors[2], [1.0, 1.0, 1.0]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct Session {
    cloud: Option<PointCloud>,
}

impl Session {
    /// Creates a session with no cloud loaded
    pub fn new() -> Self {
        Self { cloud: None }
    }

    /// The point cloud currently on display, if any
    pub fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }

    /// Returns true if a cloud is currently loaded
    pub fn has_cloud(&self) -> bool {
        self.cloud.is_some()
    }

    /// Converts a freshly loaded mesh buffer into the displayed cloud.
    ///
    /// Vertex colors in the buffer are ignored; the new cloud starts
    /// uncolored. Replaces any previously displayed cloud.
    pub fn load_mesh_buffer(&mut self, buffer: &VertexBuffer) -> Result<()> {
        let cloud = PointCloud::from_mesh_buffer(buffer)?;
        debug!("session loaded mesh buffer with {} vertices", cloud.len());
        self.cloud = Some(cloud);
        Ok(())
    }

    /// Adopts an already-displayed renderable buffer, colors included.
    ///
    /// Used when the renderer's buffer is the source of truth, for
    /// example after an external edit to the displayed geometry.
    pub fn adopt_buffer(&mut self, buffer: &VertexBuffer) -> Result<()> {
        let cloud = PointCloud::from_vertex_buffer(buffer)?;
        debug!("session adopted buffer with {} vertices", cloud.len());
        self.cloud = Some(cloud);
        Ok(())
    }

    /// Recolors the displayed cloud from the highlight configuration.
    ///
    /// Every point is repainted with the base color first, so repeated
    /// calls do not accumulate highlights from earlier configurations.
    /// The replacement cloud is built in full before it is swapped in;
    /// an invalid configuration leaves the current cloud untouched.
    pub fn apply_highlights(&mut self, config: &HighlightConfig) -> Result<()> {
        let cloud = self
            .cloud
            .as_ref()
            .ok_or_else(|| Error::InvalidData("no point cloud loaded".to_string()))?;

        let colored = colorize_point_cloud(cloud, config)?;
        debug!(
            "session recolored {} points using {} feature points",
            colored.len(),
            config.feature_points.len()
        );
        self.cloud = Some(colored);
        Ok(())
    }

    /// Produces a renderable vertex buffer for the displayed cloud
    pub fn render_buffer(&self) -> Option<VertexBuffer> {
        self.cloud.as_ref().map(|cloud| cloud.to_vertex_buffer())
    }

    /// Saves the displayed cloud, picking the format from the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let cloud = self
            .cloud
            .as_ref()
            .ok_or_else(|| Error::InvalidData("no point cloud loaded".to_string()))?;

        pointbrush_io::save_point_cloud(cloud, path)?;
        debug!("session saved {} points to {:?}", cloud.len(), path);
        Ok(())
    }

    /// Drops the displayed cloud
    pub fn clear(&mut self) {
        self.cloud = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointbrush_core::{FeaturePoint, VertexAttribute};

    fn sample_buffer() -> VertexBuffer {
        let mut buffer = VertexBuffer::new();
        buffer.insert_attribute(
            VertexAttribute::Position,
            vec![[0.0, 0.0, 0.0], [0.05, 0.0, 0.0], [10.0, 0.0, 0.0]],
        );
        buffer.insert_attribute(
            VertexAttribute::Normal,
            vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        );
        buffer
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(!session.has_cloud());
        assert!(session.cloud().is_none());
        assert!(session.render_buffer().is_none());
    }

    #[test]
    fn test_load_mesh_buffer_ignores_colors() {
        let mut buffer = sample_buffer();
        buffer.insert_attribute(
            VertexAttribute::Color,
            vec![[1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0]],
        );

        let mut session = Session::new();
        session.load_mesh_buffer(&buffer).unwrap();

        let cloud = session.cloud().unwrap();
        assert_eq!(cloud.len(), 3);
        assert!(cloud.has_normals());
        assert!(!cloud.has_colors());
    }

    #[test]
    fn test_adopt_buffer_keeps_colors() {
        let mut buffer = sample_buffer();
        buffer.insert_attribute(
            VertexAttribute::Color,
            vec![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]],
        );

        let mut session = Session::new();
        session.adopt_buffer(&buffer).unwrap();

        let cloud = session.cloud().unwrap();
        assert!(cloud.has_colors());
        assert_eq!(cloud.colors.as_ref().unwrap()[1], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_apply_highlights_without_cloud_fails() {
        let mut session = Session::new();
        let config = HighlightConfig::default();

        let result = session.apply_highlights(&config);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_failed_recolor_keeps_previous_cloud() {
        let mut session = Session::new();
        session.load_mesh_buffer(&sample_buffer()).unwrap();

        let config = HighlightConfig::new(vec![FeaturePoint::new(0.0, 0.0, 0.0, 0.08)]);
        session.apply_highlights(&config).unwrap();
        let before = session.cloud().unwrap().clone();

        let bad = HighlightConfig::new(vec![FeaturePoint::new(0.0, 0.0, 0.0, -1.0)]);
        let result = session.apply_highlights(&bad);
        assert!(matches!(result, Err(Error::InvalidRadius(r)) if r == -1.0));

        assert_eq!(session.cloud().unwrap(), &before);
    }

    #[test]
    fn test_render_buffer_round_trip() {
        let mut session = Session::new();
        session.load_mesh_buffer(&sample_buffer()).unwrap();

        let config = HighlightConfig::new(vec![FeaturePoint::new(0.0, 0.0, 0.0, 0.08)]);
        session.apply_highlights(&config).unwrap();
        let displayed = session.cloud().unwrap().clone();

        let buffer = session.render_buffer().unwrap();
        let mut other = Session::new();
        other.adopt_buffer(&buffer).unwrap();

        assert_eq!(other.cloud().unwrap(), &displayed);
    }

    #[test]
    fn test_save_without_cloud_fails() {
        let session = Session::new();
        let result = session.save("pointbrush_test_empty_session.ply");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_clear_drops_cloud() {
        let mut session = Session::new();
        session.load_mesh_buffer(&sample_buffer()).unwrap();
        assert!(session.has_cloud());

        session.clear();
        assert!(!session.has_cloud());
    }
}
