//! Input/output operations, configuration and error handling

/// Command-line interface and batch file processing
pub mod cli;
/// Constants and configurable defaults
pub mod configuration;
/// Error types
pub mod error;
/// PNG decoding into pixel buffers
pub mod image;
/// Batch progress display
pub mod progress;
/// SVG document rendering
pub mod svg;
