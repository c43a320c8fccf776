//! I/O operations for point clouds
//!
//! This crate reads and writes the colored point clouds produced by a
//! highlight pass. PLY is the primary format; PCD is available for
//! tools that expect it. Format selection goes by file extension, and
//! writing defaults to each format's compact binary encoding.

pub mod pcd;
pub mod ply;

pub use pcd::{PcdDataFormat, PcdReader, PcdWriteOptions, PcdWriter};
pub use ply::{ColorEncoding, PlyFormat, PlyReader, PlyWriteOptions, PlyWriter};

use pointbrush_core::{Error, PointCloud, Result};
use std::path::Path;

/// Trait for reading point clouds from files
pub trait PointCloudReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud>;
}

/// Trait for writing point clouds to files
pub trait PointCloudWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<()>;
}

/// Auto-detect format from the file extension and read a point cloud
pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("ply") => PlyReader::read_point_cloud(path),
        Some("pcd") => PcdReader::read_point_cloud(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "unsupported point cloud format: {:?}",
            path.extension()
        ))),
    }
}

/// Auto-detect format from the file extension and save a point cloud.
///
/// Writing an empty cloud is an error for every format; the target
/// file is left untouched in that case.
pub fn save_point_cloud<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("ply") => PlyWriter::write_point_cloud(cloud, path),
        Some("pcd") => PcdWriter::write_point_cloud(cloud, path),
        _ => Err(Error::UnsupportedFormat(format!(
            "unsupported point cloud format: {:?}",
            path.extension()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointbrush_core::Point3f;
    use std::fs;

    fn sample_cloud() -> PointCloud {
        PointCloud::from_parts(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            None,
            Some(vec![[1.0, 1.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0, 1.0]]),
        )
        .unwrap()
    }

    #[test]
    fn test_save_and_read_by_extension() {
        let cloud = sample_cloud();

        for temp_file in ["pointbrush_test_dispatch.ply", "pointbrush_test_dispatch.pcd"] {
            save_point_cloud(&cloud, temp_file).unwrap();
            let loaded = read_point_cloud(temp_file).unwrap();

            assert_eq!(loaded.len(), cloud.len());
            assert_eq!(loaded.colors.as_ref().unwrap()[1], [0.0, 1.0, 0.0]);

            let _ = fs::remove_file(temp_file);
        }
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let cloud = sample_cloud();

        let result = save_point_cloud(&cloud, "cloud.xyz");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));

        let result = save_point_cloud(&cloud, "cloud");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));

        let result = read_point_cloud("cloud.xyz");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_point_cloud("pointbrush_no_such_file.ply");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_save_to_missing_directory_is_io_error() {
        let cloud = sample_cloud();

        for target in [
            "pointbrush_no_such_dir/cloud.ply",
            "pointbrush_no_such_dir/cloud.pcd",
        ] {
            let result = save_point_cloud(&cloud, target);
            assert!(matches!(result, Err(Error::Io(_))));
        }
    }
}
