//! Ordered color palettes and deterministic seeding strategies

use rand::rngs::StdRng;

use crate::buffer::PixelBuffer;
use crate::color::rgba::Rgba;

/// How the initial palette is obtained before refinement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteStrategy {
    /// Deterministic gray ramp (below 8 colors) or RGB cube corners plus
    /// random fill
    Generated,
    /// Regular spatial grid sample of the source image
    Sampled,
    /// Median cut over a reduced-precision color histogram
    Histogram,
}

/// An ordered, index-addressable sequence of palette colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Build a palette from an explicit color sequence
    pub const fn from_colors(colors: Vec<Rgba>) -> Self {
        Self { colors }
    }

    /// Number of palette entries
    pub const fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no entries
    pub const fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at a palette index
    pub fn get(&self, index: usize) -> Option<Rgba> {
        self.colors.get(index).copied()
    }

    /// All entries in palette order
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Replace the entry at an index, ignoring out-of-range indices
    pub(crate) fn replace(&mut self, index: usize, color: Rgba) {
        if let Some(entry) = self.colors.get_mut(index) {
            *entry = color;
        }
    }

    /// Deterministic generated palette
    ///
    /// Below 8 colors this is a pure grayscale ramp. From 8 colors up it is
    /// the largest RGB cube grid that fits, topped up with random colors from
    /// the seeded generator.
    pub fn generated(number_of_colors: usize, rng: &mut StdRng) -> Self {
        let mut colors = Vec::with_capacity(number_of_colors);
        if number_of_colors < 8 {
            let steps = 255 / number_of_colors.saturating_sub(1).max(1);
            for i in 0..number_of_colors {
                colors.push(Rgba::gray((i * steps).min(255) as u8));
            }
        } else {
            // Largest edge length whose cube still fits in the palette
            let mut edge = 2usize;
            while (edge + 1).pow(3) <= number_of_colors {
                edge += 1;
            }
            let steps = 255 / (edge - 1);
            for r in 0..edge {
                for g in 0..edge {
                    for b in 0..edge {
                        colors.push(Rgba::opaque(
                            (r * steps) as u8,
                            (g * steps) as u8,
                            (b * steps) as u8,
                        ));
                    }
                }
            }
            while colors.len() < number_of_colors {
                colors.push(Rgba::random(rng));
            }
        }
        Self::from_colors(colors)
    }

    /// Palette sampled on a regular spatial grid over the image
    ///
    /// Sample points with alpha below 125 are replaced by white, mirroring a
    /// white page background behind transparent regions.
    pub fn sampled(pixels: &PixelBuffer<'_>, number_of_colors: usize) -> Self {
        let mut colors = Vec::with_capacity(number_of_colors);
        let steps_x = (number_of_colors as f64).sqrt().ceil() as usize;
        let steps_y = (number_of_colors as f64 / steps_x as f64).ceil() as usize;
        let factor_x = pixels.width() as f64 / (steps_x + 1) as f64;
        let factor_y = pixels.height() as f64 / (steps_y + 1) as f64;
        for y in 0..steps_y {
            for x in 0..steps_x {
                if colors.len() >= number_of_colors {
                    return Self::from_colors(colors);
                }
                let px = ((x as f64 * factor_x) as usize).min(pixels.width().saturating_sub(1));
                let py = ((y as f64 * factor_y) as usize).min(pixels.height().saturating_sub(1));
                let sample = pixels.color_at(px, py).unwrap_or(Rgba::WHITE);
                if sample.alpha < 125 {
                    colors.push(Rgba::WHITE);
                } else {
                    colors.push(Rgba::opaque(sample.red, sample.green, sample.blue));
                }
            }
        }
        Self::from_colors(colors)
    }
}

/// Index of the nearest color in a slice under the canonical distance metric
///
/// Both the candidates and the target are expected to be flattened onto the
/// same background already. An empty slice maps everything to index 0.
pub(crate) fn nearest_index(colors: &[Rgba], target: Rgba) -> usize {
    let mut best_index = 0;
    let mut best_distance = f64::INFINITY;
    for (index, color) in colors.iter().enumerate() {
        let distance = color.distance_squared(target);
        if distance < best_distance {
            best_distance = distance;
            best_index = index;
        }
    }
    best_index
}

#[cfg(test)]
mod tests {
    use super::{Palette, nearest_index};
    use crate::color::rgba::Rgba;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_small_palette_is_grayscale() {
        let mut rng = StdRng::seed_from_u64(7);
        let palette = Palette::generated(4, &mut rng);
        assert_eq!(palette.len(), 4);
        for color in palette.colors() {
            assert_eq!(color.red, color.green);
            assert_eq!(color.green, color.blue);
        }
        assert_eq!(palette.get(0), Some(Rgba::gray(0)));
    }

    #[test]
    fn test_generated_large_palette_fills_exact_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let palette = Palette::generated(16, &mut rng);
        assert_eq!(palette.len(), 16);
        // 2^3 cube corners first, then random fill
        assert_eq!(palette.get(0), Some(Rgba::opaque(0, 0, 0)));
        assert_eq!(palette.get(7), Some(Rgba::opaque(255, 255, 255)));
    }

    #[test]
    fn test_nearest_index_picks_closest() {
        let colors = vec![Rgba::gray(0), Rgba::gray(128), Rgba::gray(255)];
        assert_eq!(nearest_index(&colors, Rgba::gray(10)), 0);
        assert_eq!(nearest_index(&colors, Rgba::gray(120)), 1);
        assert_eq!(nearest_index(&colors, Rgba::gray(250)), 2);
    }
}
