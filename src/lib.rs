//! Raster image to vector path tracing
//!
//! The pipeline reduces an image's colors to a small palette, separates it
//! into per-color regions, traces each region boundary as a closed contour,
//! and approximates every contour with a minimal sequence of line and
//! quadratic segments suitable for a vector document.

#![forbid(unsafe_code)]

/// Read-only RGBA pixel buffer views
pub mod buffer;
/// Color values and palettes
pub mod color;
/// Path command assembly for document writers
pub mod emit;
/// Input/output operations and error handling
pub mod io;
/// The full vectorization pipeline
pub mod pipeline;
/// Color quantization
pub mod quantize;
/// Contour tracing and curve fitting
pub mod trace;

pub use buffer::PixelBuffer;
pub use io::error::{Result, TraceError};
pub use pipeline::{VectorizeConfig, VectorizedImage, Vectorizer};
