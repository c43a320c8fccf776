//! Error types for pointbrush

use thiserror::Error;

/// Main error type for pointbrush operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vertex buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid feature radius: {0}")]
    InvalidRadius(f32),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for pointbrush operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidBuffer("missing position attribute".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid vertex buffer: missing position attribute"
        );

        let err = Error::InvalidRadius(-0.5);
        assert_eq!(err.to_string(), "Invalid feature radius: -0.5");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
