//! Point cloud data structure

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A point cloud with optional per-point normals and colors.
///
/// Attributes are stored as parallel arrays: when `normals` or `colors`
/// is present it has exactly one entry per position, and index `i`
/// always refers to the same point across all three arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub positions: Vec<Point3f>,
    pub normals: Option<Vec<Vector3f>>,
    pub colors: Option<Vec<[f32; 3]>>,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: None,
            colors: None,
        }
    }

    /// Create a point cloud from positions only
    pub fn from_positions(positions: Vec<Point3f>) -> Self {
        Self {
            positions,
            normals: None,
            colors: None,
        }
    }

    /// Create a point cloud from positions and optional attribute arrays.
    ///
    /// Returns an error if a provided attribute array does not have
    /// exactly one entry per position.
    pub fn from_parts(
        positions: Vec<Point3f>,
        normals: Option<Vec<Vector3f>>,
        colors: Option<Vec<[f32; 3]>>,
    ) -> Result<Self> {
        let mut cloud = Self::from_positions(positions);
        if let Some(normals) = normals {
            cloud.set_normals(normals)?;
        }
        if let Some(colors) = colors {
            cloud.set_colors(colors)?;
        }
        Ok(cloud)
    }

    /// Get the number of points
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check if per-point normals are present
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Check if per-point colors are present
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Set per-point normals, one per position
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) -> Result<()> {
        if normals.len() != self.positions.len() {
            return Err(Error::InvalidData(format!(
                "normal count {} does not match point count {}",
                normals.len(),
                self.positions.len()
            )));
        }
        self.normals = Some(normals);
        Ok(())
    }

    /// Set per-point colors, one per position
    pub fn set_colors(&mut self, colors: Vec<[f32; 3]>) -> Result<()> {
        if colors.len() != self.positions.len() {
            return Err(Error::InvalidData(format!(
                "color count {} does not match point count {}",
                colors.len(),
                self.positions.len()
            )));
        }
        self.colors = Some(colors);
        Ok(())
    }

    /// Set every point's color to the same value, creating the color
    /// array if the cloud was uncolored
    pub fn paint_uniform_color(&mut self, color: [f32; 3]) {
        self.colors = Some(vec![color; self.positions.len()]);
    }

    /// Clear the point cloud
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals = None;
        self.colors = None;
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_positions() -> Vec<Point3f> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_from_positions() {
        let cloud = PointCloud::from_positions(sample_positions());
        assert_eq!(cloud.len(), 3);
        assert!(!cloud.is_empty());
        assert!(!cloud.has_normals());
        assert!(!cloud.has_colors());
    }

    #[test]
    fn test_attribute_count_mismatch() {
        let mut cloud = PointCloud::from_positions(sample_positions());

        let result = cloud.set_normals(vec![Vector3f::new(0.0, 0.0, 1.0); 2]);
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert!(!cloud.has_normals());

        let result = cloud.set_colors(vec![[1.0, 0.0, 0.0]; 4]);
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert!(!cloud.has_colors());
    }

    #[test]
    fn test_from_parts_validates() {
        let result =
            PointCloud::from_parts(sample_positions(), None, Some(vec![[0.0, 0.0, 0.0]; 2]));
        assert!(result.is_err());

        let cloud = PointCloud::from_parts(
            sample_positions(),
            Some(vec![Vector3f::new(0.0, 0.0, 1.0); 3]),
            Some(vec![[1.0, 1.0, 1.0]; 3]),
        )
        .unwrap();
        assert!(cloud.has_normals());
        assert!(cloud.has_colors());
    }

    #[test]
    fn test_paint_uniform_color() {
        let mut cloud = PointCloud::from_positions(sample_positions());
        cloud.paint_uniform_color([1.0, 1.0, 1.0]);

        let colors = cloud.colors.as_ref().unwrap();
        assert_eq!(colors.len(), 3);
        assert!(colors.iter().all(|c| *c == [1.0, 1.0, 1.0]));

        // repainting overwrites existing colors
        cloud.paint_uniform_color([0.0, 1.0, 0.0]);
        let colors = cloud.colors.as_ref().unwrap();
        assert!(colors.iter().all(|c| *c == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_paint_empty_cloud() {
        let mut cloud = PointCloud::new();
        cloud.paint_uniform_color([1.0, 0.0, 0.0]);
        assert_eq!(cloud.colors, Some(Vec::new()));
    }

    #[test]
    fn test_serde_round_trip() {
        let cloud = PointCloud::from_parts(
            sample_positions(),
            Some(vec![Vector3f::new(0.0, 0.0, 1.0); 3]),
            Some(vec![[0.5, 0.25, 0.125]; 3]),
        )
        .unwrap();

        let json = serde_json::to_string(&cloud).unwrap();
        let restored: PointCloud = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cloud);
    }
}
