//! Feature-based point cloud colorizing

use crate::nearest_neighbor::RTreeIndex;
use log::debug;
use pointbrush_core::{HighlightConfig, NearestNeighborSearch, PointCloud, Result};

/// Recolor a point cloud around a set of feature points.
///
/// Every point is first reset to the configured base color, then for
/// each feature point in input order all points within its radius
/// (boundary inclusive, so a point sitting exactly on a feature
/// position is highlighted too) are set to the highlight color. Where
/// radii overlap, the later feature wins by overwriting.
///
/// The input cloud is never modified; a freshly colored copy with the
/// same positions, normals and ordering is returned.
///
/// # Arguments
/// * `cloud` - Input point cloud
/// * `config` - Feature points plus base and highlight colors
///
/// # Returns
/// * `Result<PointCloud>` - Recolored copy of the input cloud
///
/// # Example
/// ```rust
/// use pointbrush_core::{FeaturePoint, HighlightConfig, Point3f, PointCloud};
/// use pointbrush_algorithms::colorize_point_cloud;
///
/// fn main() -> pointbrush_core::Result<()> {
///     let cloud = PointCloud::from_positions(vec![
///         Point3f::new(0.0, 0.0, 0.0),
///         Point3f::new(0.05, 0.0, 0.0),
///         Point3f::new(10.0, 0.0, 0.0),
///     ]);
///
///     let config = HighlightConfig::new(vec![FeaturePoint::new(0.0, 0.0, 0.0, 0.08)]);
///     let highlighted = colorize_point_cloud(&cloud, &config)?;
///
///     let colors = highlighted.colors.as_ref().unwrap();
///     assert_eq!(colors[0], config.highlight_color);
///     assert_eq!(colors[1], config.highlight_color);
///     assert_eq!(colors[2], config.base_color);
///     Ok(())
/// }
/// ```
pub fn colorize_point_cloud(cloud: &PointCloud, config: &HighlightConfig) -> Result<PointCloud> {
    // validate all radii before touching anything, so a bad feature
    // cannot leave a half-colored result behind
    config.validate()?;

    let mut colored = cloud.clone();
    colored.paint_uniform_color(config.base_color);

    if colored.is_empty() || config.feature_points.is_empty() {
        return Ok(colored);
    }

    let total = colored.len();
    let index = RTreeIndex::build(&colored.positions);

    if let Some(colors) = colored.colors.as_mut() {
        for feature in &config.feature_points {
            let neighbors = index.find_radius_neighbors(&feature.position, feature.radius);
            debug!(
                "feature at ({:.4}, {:.4}, {:.4}) radius {}: {} of {} points highlighted",
                feature.position.x,
                feature.position.y,
                feature.position.z,
                feature.radius,
                neighbors.len(),
                total
            );

            for &(idx, _) in &neighbors {
                colors[idx] = config.highlight_color;
            }
        }
    }

    Ok(colored)
}

/// Count how many points a highlight pass would recolor.
///
/// Runs the same inclusive radius queries as [`colorize_point_cloud`]
/// without producing a cloud, deduplicating points covered by several
/// features.
pub fn count_highlighted(cloud: &PointCloud, config: &HighlightConfig) -> Result<usize> {
    config.validate()?;

    if cloud.is_empty() || config.feature_points.is_empty() {
        return Ok(0);
    }

    let index = RTreeIndex::build(&cloud.positions);
    let mut hit = vec![false; cloud.len()];
    for feature in &config.feature_points {
        for (idx, _) in index.find_radius_neighbors(&feature.position, feature.radius) {
            hit[idx] = true;
        }
    }

    Ok(hit.iter().filter(|h| **h).count())
}
