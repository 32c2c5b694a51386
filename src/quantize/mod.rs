//! Color quantization: palette extraction and the per-pixel index matrix

mod median_cut;
/// Refinement-cycle quantizer producing the palette and index matrix
pub mod quantizer;

pub use quantizer::{QuantizeOptions, Quantized, quantize};
