//! Highlight configuration
//!
//! A highlight pass is driven by an ordered list of [`FeaturePoint`]s
//! plus a base and a highlight color. Feature points are typically
//! user-entered, so they serialize with serde and parse from the plain
//! text form `"x y z radius"`.

use crate::error::{Error, Result};
use crate::point::Point3f;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Color applied to every point before highlighting (white)
pub const DEFAULT_BASE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Color applied to points inside a feature radius (green)
pub const DEFAULT_HIGHLIGHT_COLOR: [f32; 3] = [0.0, 1.0, 0.0];

/// A location of interest with the radius around it to highlight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeaturePoint {
    pub position: Point3f,
    pub radius: f32,
}

impl FeaturePoint {
    pub fn new(x: f32, y: f32, z: f32, radius: f32) -> Self {
        Self {
            position: Point3f::new(x, y, z),
            radius,
        }
    }

    /// Check that the radius is usable for a highlight pass.
    ///
    /// Negative and non-finite radii are both authoring mistakes; a
    /// NaN radius would otherwise make every distance comparison false
    /// and silently highlight nothing.
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(Error::InvalidRadius(self.radius));
        }
        Ok(())
    }
}

impl FromStr for FeaturePoint {
    type Err = Error;

    /// Parse a feature point from the form `"x y z radius"`
    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(Error::InvalidData(format!(
                "expected 4 fields (x y z radius), got {}",
                fields.len()
            )));
        }

        let values = fields
            .iter()
            .map(|field| {
                field.parse::<f32>().map_err(|_| {
                    Error::InvalidData(format!("'{}' is not a valid coordinate", field))
                })
            })
            .collect::<Result<Vec<f32>>>()?;

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

/// Configuration for one highlight pass over a point cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Feature points, applied in order; later ones overwrite earlier
    /// ones where radii overlap
    pub feature_points: Vec<FeaturePoint>,
    pub base_color: [f32; 3],
    pub highlight_color: [f32; 3],
}

impl HighlightConfig {
    /// Create a config with the default white/green colors
    pub fn new(feature_points: Vec<FeaturePoint>) -> Self {
        Self {
            feature_points,
            base_color: DEFAULT_BASE_COLOR,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR,
        }
    }

    /// Set the base color
    pub fn with_base_color(mut self, color: [f32; 3]) -> Self {
        self.base_color = color;
        self
    }

    /// Set the highlight color
    pub fn with_highlight_color(mut self, color: [f32; 3]) -> Self {
        self.highlight_color = color;
        self
    }

    /// Check every feature radius up front
    pub fn validate(&self) -> Result<()> {
        for feature in &self.feature_points {
            feature.validate()?;
        }
        Ok(())
    }

    /// Positions where the display layer should place feature markers
    pub fn marker_positions(&self) -> Vec<Point3f> {
        self.feature_points.iter().map(|f| f.position).collect()
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
