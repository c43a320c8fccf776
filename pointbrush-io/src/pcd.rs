//! PCD (Point Cloud Data) format support
//!
//! A focused PCD v0.7 reader and writer for the clouds this crate
//! produces: unorganized data with float32 scalar fields `x y z`, plus
//! `normal_x normal_y normal_z` when normals are present and `r g b`
//! when colors are. Both ASCII and binary (little endian) data
//! sections are supported; `binary_compressed` files are reported as
//! unsupported rather than misread.

use crate::{PointCloudReader, PointCloudWriter};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use pointbrush_core::{Error, Point3f, PointCloud, Result, Vector3f};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// PCD data section encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcdDataFormat {
    Ascii,
    Binary,
}

/// Options controlling how a point cloud is written
#[derive(Debug, Clone)]
pub struct PcdWriteOptions {
    pub data_format: PcdDataFormat,
    pub version: String,
}

impl Default for PcdWriteOptions {
    fn default() -> Self {
        Self {
            data_format: PcdDataFormat::Binary,
            version: "0.7".to_string(),
        }
    }
}

impl PcdWriteOptions {
    /// Options for a human-readable ASCII data section
    pub fn ascii() -> Self {
        Self {
            data_format: PcdDataFormat::Ascii,
            ..Default::default()
        }
    }
}

/// Parsed PCD header, restricted to what the reader supports
#[derive(Debug, Clone)]
struct PcdHeader {
    fields: Vec<String>,
    points: usize,
    data_format: PcdDataFormat,
}

pub struct PcdReader;
pub struct PcdWriter;

fn field_names(cloud: &PointCloud) -> Vec<&'static str> {
    let mut names = vec!["x", "y", "z"];
    if cloud.has_normals() {
        names.extend(["normal_x", "normal_y", "normal_z"]);
    }
    if cloud.has_colors() {
        names.extend(["r", "g", "b"]);
    }
    names
}

fn point_row(cloud: &PointCloud, i: usize) -> Vec<f32> {
    let point = &cloud.positions[i];
    let mut row = vec![point.x, point.y, point.z];
    if let Some(normals) = &cloud.normals {
        row.extend([normals[i].x, normals[i].y, normals[i].z]);
    }
    if let Some(colors) = &cloud.colors {
        row.extend(colors[i]);
    }
    row
}

impl PcdWriter {
    /// Write a point cloud with explicit data format options
    pub fn write_point_cloud_with_options<P: AsRef<Path>>(
        cloud: &PointCloud,
        path: P,
        options: &PcdWriteOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        if cloud.is_empty() {
            return Err(Error::InvalidData(
                "cannot save an empty point cloud".to_string(),
            ));
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let names = field_names(cloud);
        Self::write_header(&mut writer, cloud, &names, options)?;

        match options.data_format {
            PcdDataFormat::Ascii => {
                for i in 0..cloud.len() {
                    let row: Vec<String> =
                        point_row(cloud, i).iter().map(|v| v.to_string()).collect();
                    writeln!(writer, "{}", row.join(" "))?;
                }
            }
            PcdDataFormat::Binary => {
                for i in 0..cloud.len() {
                    for value in point_row(cloud, i) {
                        writer.write_f32::<LittleEndian>(value)?;
                    }
                }
            }
        }
        writer.flush()?;

        debug!(
            "wrote {} points to {} ({:?})",
            cloud.len(),
            path.display(),
            options.data_format
        );
        Ok(())
    }

    fn write_header<W: Write>(
        writer: &mut W,
        cloud: &PointCloud,
        names: &[&str],
        options: &PcdWriteOptions,
    ) -> Result<()> {
        writeln!(
            writer,
            "# .PCD v{} - Point Cloud Data file format",
            options.version
        )?;
        writeln!(writer, "VERSION {}", options.version)?;
        writeln!(writer, "FIELDS {}", names.join(" "))?;
        writeln!(writer, "SIZE{}", " 4".repeat(names.len()))?;
        writeln!(writer, "TYPE{}", " F".repeat(names.len()))?;
        writeln!(writer, "COUNT{}", " 1".repeat(names.len()))?;
        writeln!(writer, "WIDTH {}", cloud.len())?;
        writeln!(writer, "HEIGHT 1")?;
        writeln!(writer, "VIEWPOINT 0 0 0 1 0 0 0")?;
        writeln!(writer, "POINTS {}", cloud.len())?;
        match options.data_format {
            PcdDataFormat::Ascii => writeln!(writer, "DATA ascii")?,
            PcdDataFormat::Binary => writeln!(writer, "DATA binary")?,
        }
        Ok(())
    }
}

impl PointCloudWriter for PcdWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<()> {
        Self::write_point_cloud_with_options(cloud, path, &PcdWriteOptions::default())
    }
}

impl PcdReader {
    fn read_header<R: BufRead>(reader: &mut R) -> Result<PcdHeader> {
        let mut fields: Vec<String> = Vec::new();
        let mut sizes: Vec<usize> = Vec::new();
        let mut types: Vec<String> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut width = None;
        let mut height = None;
        let mut points = None;

        let mut line = String::new();
        // the header ends at its DATA line; reaching end of file first
        // means the header is incomplete
        let data_format = loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(Error::InvalidData(
                    "unexpected end of file in PCD header".to_string(),
                ));
            }

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "VERSION" => {}
                "FIELDS" => fields = parts[1..].iter().map(|s| s.to_string()).collect(),
                "SIZE" => {
                    sizes = parts[1..]
                        .iter()
                        .map(|s| {
                            s.parse::<usize>().map_err(|_| {
                                Error::InvalidData(format!("invalid SIZE value: {}", s))
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                }
                "TYPE" => types = parts[1..].iter().map(|s| s.to_string()).collect(),
                "COUNT" => {
                    counts = parts[1..]
                        .iter()
                        .map(|s| {
                            s.parse::<usize>().map_err(|_| {
                                Error::InvalidData(format!("invalid COUNT value: {}", s))
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                }
                "WIDTH" => {
                    width = Some(parts.get(1).and_then(|s| s.parse::<usize>().ok()).ok_or_else(
                        || Error::InvalidData("invalid WIDTH in PCD header".to_string()),
                    )?);
                }
                "HEIGHT" => {
                    height = Some(parts.get(1).and_then(|s| s.parse::<usize>().ok()).ok_or_else(
                        || Error::InvalidData("invalid HEIGHT in PCD header".to_string()),
                    )?);
                }
                "VIEWPOINT" => {}
                "POINTS" => {
                    points = Some(parts.get(1).and_then(|s| s.parse::<usize>().ok()).ok_or_else(
                        || Error::InvalidData("invalid POINTS in PCD header".to_string()),
                    )?);
                }
                "DATA" => match parts.get(1) {
                    Some(&"ascii") => break PcdDataFormat::Ascii,
                    Some(&"binary") => break PcdDataFormat::Binary,
                    Some(&"binary_compressed") => {
                        return Err(Error::UnsupportedFormat(
                            "binary_compressed PCD data".to_string(),
                        ))
                    }
                    other => {
                        return Err(Error::InvalidData(format!(
                            "unknown PCD data format: {:?}",
                            other
                        )))
                    }
                },
                _ => {}
            }
        };

        if fields.is_empty() {
            return Err(Error::InvalidData(
                "missing FIELDS in PCD header".to_string(),
            ));
        }

        // this reader only handles float32 scalar fields, which is all
        // the matching writer ever produces
        let scalar_f32 = sizes.iter().all(|s| *s == 4)
            && types.iter().all(|t| t == "F")
            && counts.iter().all(|c| *c == 1);
        if !(sizes.len() == fields.len() && types.len() == fields.len()) || !scalar_f32 {
            return Err(Error::InvalidData(
                "only float32 scalar PCD fields are supported".to_string(),
            ));
        }
        if !counts.is_empty() && counts.len() != fields.len() {
            return Err(Error::InvalidData(
                "COUNT does not match FIELDS in PCD header".to_string(),
            ));
        }

        let points = match (points, width, height) {
            (Some(points), _, _) => points,
            (None, Some(width), Some(height)) => width * height,
            _ => {
                return Err(Error::InvalidData(
                    "missing POINTS in PCD header".to_string(),
                ))
            }
        };
        Ok(PcdHeader {
            fields,
            points,
            data_format,
        })
    }

    fn read_rows<R: BufRead>(reader: &mut R, header: &PcdHeader) -> Result<Vec<Vec<f32>>> {
        let columns = header.fields.len();
        let mut rows = Vec::with_capacity(header.points);

        match header.data_format {
            PcdDataFormat::Ascii => {
                let mut line = String::new();
                while rows.len() < header.points {
                    line.clear();
                    let bytes_read = reader.read_line(&mut line)?;
                    if bytes_read == 0 {
                        return Err(Error::InvalidData(format!(
                            "PCD data ended after {} of {} points",
                            rows.len(),
                            header.points
                        )));
                    }

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let row = trimmed
                        .split_whitespace()
                        .map(|v| {
                            v.parse::<f32>().map_err(|_| {
                                Error::InvalidData(format!("invalid PCD value: {}", v))
                            })
                        })
                        .collect::<Result<Vec<f32>>>()?;
                    if row.len() != columns {
                        return Err(Error::InvalidData(format!(
                            "expected {} values per point, got {}",
                            columns,
                            row.len()
                        )));
                    }
                    rows.push(row);
                }
            }
            PcdDataFormat::Binary => {
                for _ in 0..header.points {
                    let mut row = Vec::with_capacity(columns);
                    for _ in 0..columns {
                        row.push(reader.read_f32::<LittleEndian>()?);
                    }
                    rows.push(row);
                }
            }
        }

        Ok(rows)
    }
}

impl PointCloudReader for PcdReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let header = Self::read_header(&mut reader)?;
        let rows = Self::read_rows(&mut reader, &header)?;

        let column = |names: &[&str]| -> Option<usize> {
            header
                .fields
                .iter()
                .position(|f| names.iter().any(|n| f == n))
        };

        let x = column(&["x"])
            .ok_or_else(|| Error::InvalidData("missing x field in PCD file".to_string()))?;
        let y = column(&["y"])
            .ok_or_else(|| Error::InvalidData("missing y field in PCD file".to_string()))?;
        let z = column(&["z"])
            .ok_or_else(|| Error::InvalidData("missing z field in PCD file".to_string()))?;

        let positions: Vec<Point3f> = rows
            .iter()
            .map(|row| Point3f::new(row[x], row[y], row[z]))
            .collect();

        let normal_columns = (
            column(&["normal_x", "nx"]),
            column(&["normal_y", "ny"]),
            column(&["normal_z", "nz"]),
        );
        let normals = match normal_columns {
            (Some(nx), Some(ny), Some(nz)) => Some(
                rows.iter()
                    .map(|row| Vector3f::new(row[nx], row[ny], row[nz]))
                    .collect(),
            ),
            _ => None,
        };

        let colors = match (column(&["r"]), column(&["g"]), column(&["b"])) {
            (Some(r), Some(g), Some(b)) => {
                Some(rows.iter().map(|row| [row[r], row[g], row[b]]).collect())
            }
            _ => None,
        };

        debug!("read {} points from {}", positions.len(), path.display());
        PointCloud::from_parts(positions, normals, colors)
    }
}
