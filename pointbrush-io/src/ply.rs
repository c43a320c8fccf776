//! PLY format support
//!
//! Reading and writing of colored point clouds as PLY files. Writing
//! defaults to the compact binary little endian encoding with colors
//! stored as float properties, which round-trips the in-memory colors
//! without quantization; [`PlyWriteOptions`] selects ASCII output or
//! 8-bit colors for interop with tools that expect them.

use crate::{PointCloudReader, PointCloudWriter};
use log::debug;
use pointbrush_core::{Error, Point3f, PointCloud, Result, Vector3f};
use ply_rs::{
    parser::Parser,
    ply::{
        Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
        ScalarType,
    },
    writer::Writer,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// On-disk encoding of a PLY file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

/// How color properties are stored in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorEncoding {
    /// `float` red/green/blue in [0, 1], lossless for in-memory colors
    Float,
    /// `uchar` red/green/blue in [0, 255], quantized
    UChar,
}

/// Options controlling how a point cloud is written
#[derive(Debug, Clone)]
pub struct PlyWriteOptions {
    pub format: PlyFormat,
    pub color_encoding: ColorEncoding,
    pub comments: Vec<String>,
}

impl Default for PlyWriteOptions {
    fn default() -> Self {
        Self {
            format: PlyFormat::BinaryLittleEndian,
            color_encoding: ColorEncoding::Float,
            comments: Vec::new(),
        }
    }
}

impl PlyWriteOptions {
    /// Options for a human-readable ASCII file
    pub fn ascii() -> Self {
        Self {
            format: PlyFormat::Ascii,
            ..Default::default()
        }
    }

    /// Set the on-disk encoding
    pub fn with_format(mut self, format: PlyFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the color property encoding
    pub fn with_color_encoding(mut self, encoding: ColorEncoding) -> Self {
        self.color_encoding = encoding;
        self
    }

    /// Add a header comment line
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comments.push(comment.to_string());
        self
    }
}

pub struct PlyReader;
pub struct PlyWriter;

impl PlyWriter {
    /// Write a point cloud with explicit encoding options.
    ///
    /// The vertex element carries `x`/`y`/`z`, plus `nx`/`ny`/`nz` when
    /// the cloud has normals and `red`/`green`/`blue` when it has
    /// colors. An empty cloud is rejected rather than written as a
    /// zero-vertex file.
    pub fn write_point_cloud_with_options<P: AsRef<Path>>(
        cloud: &PointCloud,
        path: P,
        options: &PlyWriteOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        if cloud.is_empty() {
            return Err(Error::InvalidData(
                "cannot save an empty point cloud".to_string(),
            ));
        }

        let mut ply = Ply::<DefaultElement>::new();
        ply.header.encoding = match options.format {
            PlyFormat::Ascii => Encoding::Ascii,
            PlyFormat::BinaryLittleEndian => Encoding::BinaryLittleEndian,
            PlyFormat::BinaryBigEndian => Encoding::BinaryBigEndian,
        };
        for comment in &options.comments {
            ply.header.comments.push(comment.clone());
        }

        let mut vertex_element = ElementDef::new("vertex".to_string());
        vertex_element.count = cloud.len();
        for name in ["x", "y", "z"] {
            vertex_element.properties.add(PropertyDef::new(
                name.to_string(),
                PropertyType::Scalar(ScalarType::Float),
            ));
        }
        if cloud.has_normals() {
            for name in ["nx", "ny", "nz"] {
                vertex_element.properties.add(PropertyDef::new(
                    name.to_string(),
                    PropertyType::Scalar(ScalarType::Float),
                ));
            }
        }
        if cloud.has_colors() {
            let color_type = match options.color_encoding {
                ColorEncoding::Float => PropertyType::Scalar(ScalarType::Float),
                ColorEncoding::UChar => PropertyType::Scalar(ScalarType::UChar),
            };
            for name in ["red", "green", "blue"] {
                vertex_element
                    .properties
                    .add(PropertyDef::new(name.to_string(), color_type.clone()));
            }
        }
        ply.header.elements.add(vertex_element);

        let mut vertices = Vec::with_capacity(cloud.len());
        for (i, point) in cloud.positions.iter().enumerate() {
            let mut vertex = DefaultElement::new();
            vertex.insert("x".to_string(), Property::Float(point.x));
            vertex.insert("y".to_string(), Property::Float(point.y));
            vertex.insert("z".to_string(), Property::Float(point.z));

            if let Some(normals) = &cloud.normals {
                vertex.insert("nx".to_string(), Property::Float(normals[i].x));
                vertex.insert("ny".to_string(), Property::Float(normals[i].y));
                vertex.insert("nz".to_string(), Property::Float(normals[i].z));
            }

            if let Some(colors) = &cloud.colors {
                let [r, g, b] = colors[i];
                match options.color_encoding {
                    ColorEncoding::Float => {
                        vertex.insert("red".to_string(), Property::Float(r));
                        vertex.insert("green".to_string(), Property::Float(g));
                        vertex.insert("blue".to_string(), Property::Float(b));
                    }
                    ColorEncoding::UChar => {
                        vertex.insert("red".to_string(), Property::UChar(quantize_channel(r)));
                        vertex.insert("green".to_string(), Property::UChar(quantize_channel(g)));
                        vertex.insert("blue".to_string(), Property::UChar(quantize_channel(b)));
                    }
                }
            }

            vertices.push(vertex);
        }
        ply.payload.insert("vertex".to_string(), vertices);

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let ply_writer = Writer::new();
        ply_writer.write_ply(&mut writer, &mut ply)?;

        debug!(
            "wrote {} points to {} ({:?})",
            cloud.len(),
            path.display(),
            options.format
        );
        Ok(())
    }
}

impl PointCloudWriter for PlyWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<()> {
        Self::write_point_cloud_with_options(cloud, path, &PlyWriteOptions::default())
    }
}

impl PointCloudReader for PlyReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser.read_ply(&mut reader)?;

        let vertices = match ply.payload.get("vertex") {
            Some(vertices) => vertices,
            None => return Ok(PointCloud::new()),
        };

        let mut positions = Vec::with_capacity(vertices.len());
        for vertex in vertices {
            positions.push(Point3f::new(
                extract_property_value(vertex, "x")?,
                extract_property_value(vertex, "y")?,
                extract_property_value(vertex, "z")?,
            ));
        }

        let normals = extract_normals(vertices);
        let colors = extract_colors(vertices);

        debug!("read {} points from {}", positions.len(), path.display());
        PointCloud::from_parts(positions, normals, colors)
    }
}

/// Extract a property value as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        _ => Err(Error::InvalidData(format!(
            "Property '{}' not found or invalid type",
            name
        ))),
    }
}

/// Extract a color channel normalized to [0, 1]
fn extract_color_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::UChar(val)) => Ok(*val as f32 / 255.0),
        Some(Property::UShort(val)) => Ok(*val as f32 / 65535.0),
        _ => Err(Error::InvalidData(format!(
            "Property '{}' not found or invalid type",
            name
        ))),
    }
}

fn extract_normals(vertices: &[DefaultElement]) -> Option<Vec<Vector3f>> {
    let mut normals = Vec::with_capacity(vertices.len());
    for vertex in vertices {
        match (
            extract_property_value(vertex, "nx"),
            extract_property_value(vertex, "ny"),
            extract_property_value(vertex, "nz"),
        ) {
            (Ok(nx), Ok(ny), Ok(nz)) => normals.push(Vector3f::new(nx, ny, nz)),
            _ => return None,
        }
    }
    if normals.is_empty() {
        None
    } else {
        Some(normals)
    }
}

fn extract_colors(vertices: &[DefaultElement]) -> Option<Vec<[f32; 3]>> {
    let mut colors = Vec::with_capacity(vertices.len());
    for vertex in vertices {
        match (
            extract_color_value(vertex, "red"),
            extract_color_value(vertex, "green"),
            extract_color_value(vertex, "blue"),
        ) {
            (Ok(r), Ok(g), Ok(b)) => colors.push([r, g, b]),
            _ => return None,
        }
    }
    if colors.is_empty() {
        None
    } else {
        Some(colors)
    }
}

fn quantize_channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
