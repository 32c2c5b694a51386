//! Iterative palette refinement and per-pixel color assignment

use std::collections::HashMap;

use ndarray::Array2;
use rand::rngs::StdRng;

use crate::buffer::PixelBuffer;
use crate::color::palette::{self, Palette, PaletteStrategy};
use crate::color::rgba::Rgba;
use crate::io::configuration::{
    DEFAULT_CYCLES, DEFAULT_MINIMUM_COLOR_RATIO, DEFAULT_NUMBER_OF_COLORS, MAX_PALETTE_SIZE,
    MIN_PALETTE_SIZE,
};
use crate::io::error::{Result, invalid_parameter, source_data_error};
use crate::quantize::median_cut::median_cut_palette;

/// Tuning knobs for palette extraction and refinement
#[derive(Debug, Clone, Copy)]
pub struct QuantizeOptions {
    /// How the seed palette is obtained
    pub strategy: PaletteStrategy,
    /// Size of the palette, between 2 and 256
    pub number_of_colors: usize,
    /// Number of assignment/refinement passes over the image
    pub cycles: usize,
    /// Palette entries claiming less than this share of pixels are
    /// re-randomized between passes
    pub minimum_color_ratio: f64,
    /// Background that partially transparent pixels are flattened onto
    pub background: Rgba,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            strategy: PaletteStrategy::Histogram,
            number_of_colors: DEFAULT_NUMBER_OF_COLORS,
            cycles: DEFAULT_CYCLES,
            minimum_color_ratio: DEFAULT_MINIMUM_COLOR_RATIO,
            background: Rgba::WHITE,
        }
    }
}

/// Result of quantization: the refined palette and the index matrix
///
/// The matrix is two cells wider and taller than the image; the outermost
/// ring holds the sentinel value `-1` so that edge pixels always have a
/// differing neighbor during tracing.
#[derive(Debug, Clone)]
pub struct Quantized {
    /// Palette after the final refinement pass
    pub palette: Palette,
    /// Palette index per pixel, `(height + 2) x (width + 2)` with a `-1` border
    pub matrix: Array2<i16>,
}

/// Running per-entry channel sums used to re-center palette colors
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
    count: u64,
}

impl Accumulator {
    fn add(&mut self, color: Rgba) {
        self.red += f64::from(color.red);
        self.green += f64::from(color.green);
        self.blue += f64::from(color.blue);
        self.alpha += f64::from(color.alpha);
        self.count += 1;
    }

    fn mean(&self) -> Rgba {
        let divide = |sum: f64| -> u8 { (sum / self.count as f64).round().clamp(0.0, 255.0) as u8 };
        Rgba::new(
            divide(self.red),
            divide(self.green),
            divide(self.blue),
            divide(self.alpha),
        )
    }
}

fn validate(pixels: &PixelBuffer<'_>, options: &QuantizeOptions) -> Result<()> {
    if options.number_of_colors < MIN_PALETTE_SIZE || options.number_of_colors > MAX_PALETTE_SIZE {
        return Err(invalid_parameter(
            "number_of_colors",
            &options.number_of_colors,
            &format!("must be between {MIN_PALETTE_SIZE} and {MAX_PALETTE_SIZE}"),
        ));
    }
    if options.cycles == 0 {
        return Err(invalid_parameter("cycles", &0, &"must be at least 1"));
    }
    if !(0.0..=1.0).contains(&options.minimum_color_ratio) {
        return Err(invalid_parameter(
            "minimum_color_ratio",
            &options.minimum_color_ratio,
            &"must be within [0, 1]",
        ));
    }
    if pixels.pixel_count() == 0 {
        return Err(source_data_error("image has zero pixels"));
    }
    Ok(())
}

fn seed_palette(
    pixels: &PixelBuffer<'_>,
    options: &QuantizeOptions,
    rng: &mut StdRng,
) -> Result<Palette> {
    match options.strategy {
        PaletteStrategy::Generated => Ok(Palette::generated(options.number_of_colors, rng)),
        PaletteStrategy::Sampled => Ok(Palette::sampled(pixels, options.number_of_colors)),
        PaletteStrategy::Histogram => {
            let colors =
                median_cut_palette(pixels, options.number_of_colors, options.background)?;
            Ok(Palette::from_colors(colors))
        }
    }
}

/// Quantize an image to a fixed palette and per-pixel index matrix
///
/// Each cycle assigns every pixel to its nearest palette entry under the
/// weighted squared distance metric, comparing colors flattened onto the
/// configured background. Between cycles every palette entry is re-centered
/// on the mean of its assigned pixels; entries whose pixel share fell below
/// `minimum_color_ratio` are replaced with a random color instead, except
/// ahead of the final cycle so the output palette always matches the matrix.
///
/// # Errors
///
/// Returns an error when an option is out of range or the buffer is empty.
pub fn quantize(
    pixels: &PixelBuffer<'_>,
    options: &QuantizeOptions,
    rng: &mut StdRng,
) -> Result<Quantized> {
    validate(pixels, options)?;

    let width = pixels.width();
    let height = pixels.height();
    let pixel_count = pixels.pixel_count() as f64;
    let mut palette = seed_palette(pixels, options, rng)?;
    let mut matrix = Array2::from_elem((height + 2, width + 2), -1i16);
    let mut accumulators = vec![Accumulator::default(); palette.len()];

    for cycle in 0..options.cycles {
        let is_last = cycle + 1 == options.cycles;

        if cycle > 0 {
            for (index, accumulator) in accumulators.iter().enumerate() {
                let ratio = accumulator.count as f64 / pixel_count;
                if !is_last && ratio < options.minimum_color_ratio {
                    palette.replace(index, Rgba::random(rng));
                } else if accumulator.count > 0 {
                    palette.replace(index, accumulator.mean());
                }
            }
            accumulators = vec![Accumulator::default(); palette.len()];
        }

        // Distances compare flattened colors, so flatten the palette once
        // per cycle
        let flattened: Vec<Rgba> = palette
            .colors()
            .iter()
            .map(|color| color.flatten_onto(options.background))
            .collect();
        let mut cache: HashMap<u32, usize> = HashMap::new();

        for y in 0..height {
            for x in 0..width {
                let pixel = pixels.color_at(x, y).unwrap_or(Rgba::WHITE);
                let index = *cache.entry(pixel.key()).or_insert_with(|| {
                    palette::nearest_index(&flattened, pixel.flatten_onto(options.background))
                });
                if let Some(accumulator) = accumulators.get_mut(index) {
                    accumulator.add(pixel);
                }
                if is_last && let Some(cell) = matrix.get_mut((y + 1, x + 1)) {
                    *cell = index as i16;
                }
            }
        }
    }

    Ok(Quantized { palette, matrix })
}
