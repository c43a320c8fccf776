//! Renderer-facing vertex buffer representation
//!
//! [`VertexBuffer`] models the columnar vertex data a point-list render
//! pipeline consumes: named attribute arrays for position, normal and
//! color. It is the interchange type between the display layer and
//! [`PointCloud`](crate::PointCloud), deliberately independent of any
//! particular rendering framework.

use crate::error::{Error, Result};
use crate::point::PointVertex;
use std::collections::BTreeMap;

/// Identifies one attribute column of a [`VertexBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    Color,
}

impl VertexAttribute {
    /// Attribute name as used in shader layouts and error messages
    pub fn name(&self) -> &'static str {
        match self {
            VertexAttribute::Position => "position",
            VertexAttribute::Normal => "normal",
            VertexAttribute::Color => "color",
        }
    }
}

/// Storage for one attribute column
#[derive(Debug, Clone, PartialEq)]
pub enum VertexAttributeValues {
    Float32x3(Vec<[f32; 3]>),
    Float32x4(Vec<[f32; 4]>),
}

impl VertexAttributeValues {
    /// Number of vertices in this column
    pub fn len(&self) -> usize {
        match self {
            VertexAttributeValues::Float32x3(values) => values.len(),
            VertexAttributeValues::Float32x4(values) => values.len(),
        }
    }

    /// Check if the column has no vertices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<[f32; 3]>> for VertexAttributeValues {
    fn from(values: Vec<[f32; 3]>) -> Self {
        VertexAttributeValues::Float32x3(values)
    }
}

impl From<Vec<[f32; 4]>> for VertexAttributeValues {
    fn from(values: Vec<[f32; 4]>) -> Self {
        VertexAttributeValues::Float32x4(values)
    }
}

/// Columnar vertex data for a renderable point primitive.
///
/// A buffer is well formed when it has a position column and every other
/// column has the same vertex count as the positions. Conversions that
/// consume a buffer verify this and report [`Error::InvalidBuffer`]
/// when it does not hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    attributes: BTreeMap<VertexAttribute, VertexAttributeValues>,
}

impl VertexBuffer {
    /// Create a new buffer with no attributes
    pub fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
        }
    }

    /// Insert or replace an attribute column
    pub fn insert_attribute(
        &mut self,
        attribute: VertexAttribute,
        values: impl Into<VertexAttributeValues>,
    ) {
        self.attributes.insert(attribute, values.into());
    }

    /// Get an attribute column if present
    pub fn attribute(&self, attribute: VertexAttribute) -> Option<&VertexAttributeValues> {
        self.attributes.get(&attribute)
    }

    /// Check if an attribute column is present
    pub fn contains_attribute(&self, attribute: VertexAttribute) -> bool {
        self.attributes.contains_key(&attribute)
    }

    /// Number of vertices, taken from the position column (0 if absent)
    pub fn vertex_count(&self) -> usize {
        self.attribute(VertexAttribute::Position)
            .map_or(0, |values| values.len())
    }

    /// Position column as `[f32; 3]` rows.
    ///
    /// Returns [`Error::InvalidBuffer`] if the column is missing or has
    /// an unexpected format.
    pub fn positions(&self) -> Result<&[[f32; 3]]> {
        match self.attribute(VertexAttribute::Position) {
            Some(VertexAttributeValues::Float32x3(values)) => Ok(values),
            Some(_) => Err(Error::InvalidBuffer(
                "position attribute must be Float32x3".to_string(),
            )),
            None => Err(Error::InvalidBuffer(
                "missing position attribute".to_string(),
            )),
        }
    }

    /// Flatten the buffer into interleaved vertices for upload.
    ///
    /// Requires a position column; missing normals default to +Z and
    /// missing colors to opaque white. Columns that disagree with the
    /// position count are rejected.
    pub fn interleaved(&self) -> Result<Vec<PointVertex>> {
        let positions = self.positions()?;
        let count = positions.len();

        let normals = match self.attribute(VertexAttribute::Normal) {
            Some(VertexAttributeValues::Float32x3(values)) => Some(values.as_slice()),
            Some(_) => {
                return Err(Error::InvalidBuffer(
                    "normal attribute must be Float32x3".to_string(),
                ))
            }
            None => None,
        };
        let colors = match self.attribute(VertexAttribute::Color) {
            Some(VertexAttributeValues::Float32x4(values)) => Some(values.as_slice()),
            Some(_) => {
                return Err(Error::InvalidBuffer(
                    "color attribute must be Float32x4".to_string(),
                ))
            }
            None => None,
        };

        for (attribute, values) in [
            (VertexAttribute::Normal, normals.map(<[_]>::len)),
            (VertexAttribute::Color, colors.map(<[_]>::len)),
        ] {
            if let Some(len) = values {
                if len != count {
                    return Err(Error::InvalidBuffer(format!(
                        "{} count {} does not match vertex count {}",
                        attribute.name(),
                        len,
                        count
                    )));
                }
            }
        }

        let default = PointVertex::default();
        Ok((0..count)
            .map(|i| PointVertex {
                position: positions[i],
                normal: normals.map_or(default.normal, |n| n[i]),
                color: colors.map_or(default.color, |c| c[i]),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut buffer = VertexBuffer::new();
        buffer.insert_attribute(
            VertexAttribute::Position,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        );

        assert!(buffer.contains_attribute(VertexAttribute::Position));
        assert!(!buffer.contains_attribute(VertexAttribute::Normal));
        assert_eq!(buffer.vertex_count(), 2);
        assert_eq!(buffer.positions().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_position() {
        let buffer = VertexBuffer::new();
        assert_eq!(buffer.vertex_count(), 0);
        assert!(matches!(
            buffer.positions(),
            Err(Error::InvalidBuffer(_))
        ));
    }

    #[test]
    fn test_position_format_mismatch() {
        let mut buffer = VertexBuffer::new();
        buffer.insert_attribute(VertexAttribute::Position, vec![[0.0, 0.0, 0.0, 1.0]]);
        assert!(matches!(
            buffer.positions(),
            Err(Error::InvalidBuffer(_))
        ));
    }

    #[test]
    fn test_interleaved_defaults() {
        let mut buffer = VertexBuffer::new();
        buffer.insert_attribute(VertexAttribute::Position, vec![[1.0, 2.0, 3.0]]);

        let vertices = buffer.interleaved().unwrap();
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[0].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_interleaved_full() {
        let mut buffer = VertexBuffer::new();
        buffer.insert_attribute(
            VertexAttribute::Position,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        );
        buffer.insert_attribute(
            VertexAttribute::Normal,
            vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        );
        buffer.insert_attribute(
            VertexAttribute::Color,
            vec![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]],
        );

        let vertices = buffer.interleaved().unwrap();
        assert_eq!(vertices[1].normal, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_interleaved_count_mismatch() {
        let mut buffer = VertexBuffer::new();
        buffer.insert_attribute(
            VertexAttribute::Position,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        );
        buffer.insert_attribute(VertexAttribute::Normal, vec![[0.0, 0.0, 1.0]]);

        assert!(matches!(
            buffer.interleaved(),
            Err(Error::InvalidBuffer(_))
        ));
    }

    #[test]
    fn test_empty_position_column() {
        let mut buffer = VertexBuffer::new();
        buffer.insert_attribute(VertexAttribute::Position, Vec::<[f32; 3]>::new());

        assert_eq!(buffer.vertex_count(), 0);
        assert!(buffer.interleaved().unwrap().is_empty());
    }
}
