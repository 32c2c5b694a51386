//! The full raster-to-vector pipeline

use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::buffer::PixelBuffer;
use crate::color::palette::Palette;
use crate::emit::{ColorOutline, TracedLayer, emit_layers};
use crate::io::configuration::{
    DEFAULT_LINE_THRESHOLD, DEFAULT_MINIMUM_PATH_NODES, DEFAULT_QUADRATIC_THRESHOLD, DEFAULT_SEED,
};
use crate::io::error::{Result, TraceError, invalid_parameter};
use crate::quantize::{QuantizeOptions, quantize};
use crate::trace::contour::IncompleteContour;
use crate::trace::{build_layers, fit_layer, trace_layer};

/// Full configuration of one vectorization run
#[derive(Debug, Clone, Copy)]
pub struct VectorizeConfig {
    /// Palette extraction and refinement options
    pub quantize: QuantizeOptions,
    /// Closed contours with fewer points are discarded
    pub minimum_path_nodes: usize,
    /// Re-insert axis-aligned corners lost to midpoint smoothing
    pub enhance_right_angle: bool,
    /// Squared-distance threshold for accepting a line fit
    pub line_threshold: f64,
    /// Squared-distance threshold for accepting a quadratic fit
    pub quadratic_threshold: f64,
    /// Seed for palette randomization, making runs reproducible
    pub seed: u64,
}

impl Default for VectorizeConfig {
    fn default() -> Self {
        Self {
            quantize: QuantizeOptions::default(),
            minimum_path_nodes: DEFAULT_MINIMUM_PATH_NODES,
            enhance_right_angle: false,
            line_threshold: DEFAULT_LINE_THRESHOLD,
            quadratic_threshold: DEFAULT_QUADRATIC_THRESHOLD,
            seed: DEFAULT_SEED,
        }
    }
}

/// A walk that failed to close, tagged with the layer it occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDiagnostic {
    /// Palette index of the affected layer
    pub palette_index: usize,
    /// The abandoned walk
    pub contour: IncompleteContour,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct VectorizedImage {
    /// Source image width in pixels
    pub width: usize,
    /// Source image height in pixels
    pub height: usize,
    /// Refined palette the layers index into
    pub palette: Palette,
    /// Fitted paths per present palette color
    pub layers: Vec<TracedLayer>,
    /// Contour walks that terminated without closing
    pub diagnostics: Vec<LayerDiagnostic>,
}

impl VectorizedImage {
    /// Assemble the abstract command lists for a document writer
    pub fn outlines(&self) -> Vec<ColorOutline> {
        emit_layers(&self.palette, &self.layers)
    }
}

/// Runs the quantize, trace and fit stages over one pixel buffer
#[derive(Debug, Clone, Default)]
pub struct Vectorizer {
    config: VectorizeConfig,
}

impl Vectorizer {
    /// Create a vectorizer with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error when a threshold is negative or not finite.
    pub fn new(config: VectorizeConfig) -> Result<Self> {
        if !config.line_threshold.is_finite() || config.line_threshold < 0.0 {
            return Err(invalid_parameter(
                "line_threshold",
                &config.line_threshold,
                &"must be a non-negative finite number",
            ));
        }
        if !config.quadratic_threshold.is_finite() || config.quadratic_threshold < 0.0 {
            return Err(invalid_parameter(
                "quadratic_threshold",
                &config.quadratic_threshold,
                &"must be a non-negative finite number",
            ));
        }
        Ok(Self { config })
    }

    /// The active configuration
    pub const fn config(&self) -> &VectorizeConfig {
        &self.config
    }

    /// Run the full pipeline over one pixel buffer
    ///
    /// The optional cancellation flag is checked between layers; per-path
    /// problems never abort the run and surface as diagnostics instead.
    ///
    /// # Errors
    ///
    /// Returns an error when quantization options are out of range, the
    /// buffer is empty, or cancellation was requested.
    pub fn vectorize(
        &self,
        pixels: &PixelBuffer<'_>,
        cancel: Option<&AtomicBool>,
    ) -> Result<VectorizedImage> {
        let check_cancelled = |stage: &'static str| -> Result<()> {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(TraceError::Cancelled { stage });
            }
            Ok(())
        };

        check_cancelled("quantization")?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let quantized = quantize(pixels, &self.config.quantize, &mut rng)?;

        check_cancelled("layer construction")?;
        let mut layer_matrices = build_layers(&quantized.matrix);

        let mut layers = Vec::with_capacity(layer_matrices.len());
        let mut diagnostics = Vec::new();
        for (&palette_index, matrix) in &mut layer_matrices {
            check_cancelled("tracing")?;
            let traced = trace_layer(matrix, self.config.minimum_path_nodes);
            diagnostics.extend(traced.incomplete.iter().map(|&contour| LayerDiagnostic {
                palette_index: palette_index as usize,
                contour,
            }));
            let paths = fit_layer(
                &traced,
                self.config.enhance_right_angle,
                self.config.line_threshold,
                self.config.quadratic_threshold,
            );
            if !paths.is_empty() {
                layers.push(TracedLayer {
                    palette_index: palette_index as usize,
                    paths,
                });
            }
        }

        Ok(VectorizedImage {
            width: pixels.width(),
            height: pixels.height(),
            palette: quantized.palette,
            layers,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{VectorizeConfig, Vectorizer};

    #[test]
    fn test_rejects_negative_thresholds() {
        let config = VectorizeConfig {
            line_threshold: -1.0,
            ..VectorizeConfig::default()
        };
        assert!(Vectorizer::new(config).is_err());
        let config = VectorizeConfig {
            quadratic_threshold: f64::NAN,
            ..VectorizeConfig::default()
        };
        assert!(Vectorizer::new(config).is_err());
    }
}
