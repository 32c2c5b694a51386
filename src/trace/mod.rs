//! Contour extraction and curve fitting over the quantized index matrix

/// Boundary-walk automaton producing closed contours
pub mod contour;
/// Recursive segment fitting
pub mod fit;
/// Shared geometric primitives
pub mod geometry;
/// Midpoint interpolation and direction tagging
pub mod interpolate;
/// Boundary classification layers
pub mod layer;

pub use contour::{IncompleteContour, LayerPaths, trace_layer};
pub use fit::{fit_layer, fit_path};
pub use geometry::{BoundingBox, Contour, Direction, Point, Segment, SmoothPath, TracedPath};
pub use interpolate::interpolate;
pub use layer::build_layers;
