//! Error types for vectorization operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all vectorization operations
#[derive(Debug)]
pub enum TraceError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Source data doesn't meet pipeline requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Pipeline parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The caller requested cancellation mid-run
    Cancelled {
        /// Pipeline stage that observed the cancellation flag
        stage: &'static str,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Cancelled { stage } => {
                write!(f, "Vectorization cancelled during {stage}")
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for vectorization results
pub type Result<T> = std::result::Result<T, TraceError>;

impl From<std::io::Error> for TraceError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &(impl ToString + ?Sized),
    reason: &(impl ToString + ?Sized),
) -> TraceError {
    TraceError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid source data error
pub fn source_data_error(reason: &(impl ToString + ?Sized)) -> TraceError {
    TraceError::InvalidSourceData {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = invalid_parameter("colors", &1, &"must be at least 2");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'colors' = '1': must be at least 2"
        );
    }

    #[test]
    fn test_source_data_from_bare_literal() {
        let err = source_data_error("buffer is empty");
        assert_eq!(err.to_string(), "Invalid source data: buffer is empty");
    }

    #[test]
    fn test_cancelled_display() {
        let err = TraceError::Cancelled { stage: "tracing" };
        assert_eq!(err.to_string(), "Vectorization cancelled during tracing");
    }
}
