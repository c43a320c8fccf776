//! Vertex buffer interoperability
//!
//! Conversions between [`PointCloud`] and the renderer-facing
//! [`VertexBuffer`]. These are the seams between the display layer and
//! the geometry processing layer: loaded meshes enter as buffers, and
//! recolored clouds leave as buffers.

use crate::error::{Error, Result};
use crate::point::{Point3f, Vector3f};
use crate::point_cloud::PointCloud;
use crate::vertex_buffer::{VertexAttribute, VertexAttributeValues, VertexBuffer};

fn extract_normals(buffer: &VertexBuffer, expected: usize) -> Result<Option<Vec<Vector3f>>> {
    match buffer.attribute(VertexAttribute::Normal) {
        Some(VertexAttributeValues::Float32x3(normals)) => {
            if normals.len() != expected {
                return Err(Error::InvalidBuffer(format!(
                    "normal count {} does not match vertex count {}",
                    normals.len(),
                    expected
                )));
            }
            Ok(Some(
                normals.iter().map(|n| Vector3f::new(n[0], n[1], n[2])).collect(),
            ))
        }
        Some(_) => Err(Error::InvalidBuffer(
            "normal attribute must be Float32x3".to_string(),
        )),
        None => Ok(None),
    }
}

fn extract_colors(buffer: &VertexBuffer, expected: usize) -> Result<Option<Vec<[f32; 3]>>> {
    match buffer.attribute(VertexAttribute::Color) {
        Some(VertexAttributeValues::Float32x4(colors)) => {
            if colors.len() != expected {
                return Err(Error::InvalidBuffer(format!(
                    "color count {} does not match vertex count {}",
                    colors.len(),
                    expected
                )));
            }
            Ok(Some(colors.iter().map(|c| [c[0], c[1], c[2]]).collect()))
        }
        Some(_) => Err(Error::InvalidBuffer(
            "color attribute must be Float32x4".to_string(),
        )),
        None => Ok(None),
    }
}

impl PointCloud {
    /// Create a point cloud from a loaded mesh's vertex buffer.
    ///
    /// Every mesh vertex becomes one point, in vertex order. Normals are
    /// carried over when the buffer has them; any color column is
    /// ignored, so the resulting cloud starts uncolored.
    ///
    /// # Example
    ///
    /// ```
    /// use pointbrush_core::{PointCloud, VertexAttribute, VertexBuffer};
    ///
    /// let mut buffer = VertexBuffer::new();
    /// buffer.insert_attribute(
    ///     VertexAttribute::Position,
    ///     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
    /// );
    ///
    /// let cloud = PointCloud::from_mesh_buffer(&buffer).unwrap();
    /// assert_eq!(cloud.len(), 2);
    /// assert!(!cloud.has_colors());
    /// ```
    pub fn from_mesh_buffer(buffer: &VertexBuffer) -> Result<Self> {
        let positions: Vec<Point3f> = buffer
            .positions()?
            .iter()
            .map(|p| Point3f::new(p[0], p[1], p[2]))
            .collect();

        let normals = extract_normals(buffer, positions.len())?;
        PointCloud::from_parts(positions, normals, None)
    }

    /// Create a point cloud from a displayed point buffer, keeping its
    /// colors.
    ///
    /// This is the inverse of [`to_vertex_buffer`](Self::to_vertex_buffer)
    /// and is used to round-trip an already-colored buffer back into a
    /// cloud for further recoloring. The alpha channel is dropped.
    pub fn from_vertex_buffer(buffer: &VertexBuffer) -> Result<Self> {
        let positions: Vec<Point3f> = buffer
            .positions()?
            .iter()
            .map(|p| Point3f::new(p[0], p[1], p[2]))
            .collect();

        let normals = extract_normals(buffer, positions.len())?;
        let colors = extract_colors(buffer, positions.len())?;
        PointCloud::from_parts(positions, normals, colors)
    }

    /// Convert the cloud into a renderable vertex buffer.
    ///
    /// Writes one vertex per point in point order: positions always,
    /// normals when present, and colors (with alpha 1.0) when present.
    /// An empty cloud yields a buffer with an empty position column.
    pub fn to_vertex_buffer(&self) -> VertexBuffer {
        let mut buffer = VertexBuffer::new();

        let positions: Vec<[f32; 3]> = self
            .positions
            .iter()
            .map(|p| [p.x, p.y, p.z])
            .collect();
        buffer.insert_attribute(VertexAttribute::Position, positions);

        if let Some(ref normals) = self.normals {
            let normals: Vec<[f32; 3]> = normals.iter().map(|n| [n.x, n.y, n.z]).collect();
            buffer.insert_attribute(VertexAttribute::Normal, normals);
        }

        if let Some(ref colors) = self.colors {
            let colors: Vec<[f32; 4]> = colors
                .iter()
                .map(|c| [c[0], c[1], c[2], 1.0])
                .collect();
            buffer.insert_attribute(VertexAttribute::Color, colors);
        }

        buffer
    }
}
