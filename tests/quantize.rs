//! Validates palette extraction and index matrix construction

use rand::SeedableRng;
use rand::rngs::StdRng;
use vectrace::PixelBuffer;
use vectrace::color::palette::PaletteStrategy;
use vectrace::color::rgba::Rgba;
use vectrace::quantize::{QuantizeOptions, quantize};

fn checkerboard(width: usize, height: usize, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let pixel = if (x + y) % 2 == 0 { a } else { b };
            bytes.extend_from_slice(&pixel);
        }
    }
    bytes
}

fn noise(width: usize, height: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(width * height * 4);
    let mut state = 0x9e37u32;
    for _ in 0..width * height {
        state = state.wrapping_mul(48271) % 0x7fff_ffff;
        bytes.extend_from_slice(&[
            (state >> 16) as u8,
            (state >> 8) as u8,
            state as u8,
            255,
        ]);
    }
    bytes
}

#[test]
fn test_histogram_palette_has_exactly_k_entries() {
    let bytes = noise(16, 16);
    let pixels = PixelBuffer::new(&bytes, 16, 16).unwrap();
    for k in [2, 5, 16] {
        let options = QuantizeOptions {
            number_of_colors: k,
            ..QuantizeOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let quantized = quantize(&pixels, &options, &mut rng).unwrap();
        assert_eq!(quantized.palette.len(), k);
    }
}

#[test]
fn test_histogram_palette_on_uniform_image() {
    // Even a single-color image must fill the requested palette size, and
    // the padded entries must not repeat each other
    let bytes = [120u8, 90, 60, 255].repeat(64);
    let pixels = PixelBuffer::new(&bytes, 8, 8).unwrap();
    let options = QuantizeOptions {
        number_of_colors: 4,
        ..QuantizeOptions::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let quantized = quantize(&pixels, &options, &mut rng).unwrap();
    assert_eq!(quantized.palette.len(), 4);

    let keys: std::collections::HashSet<u32> =
        quantized.palette.colors().iter().map(|c| c.key()).collect();
    assert_eq!(keys.len(), 4);
}

#[test]
fn test_same_seed_gives_identical_results() {
    let bytes = noise(12, 12);
    let pixels = PixelBuffer::new(&bytes, 12, 12).unwrap();
    let options = QuantizeOptions {
        strategy: PaletteStrategy::Generated,
        number_of_colors: 16,
        minimum_color_ratio: 0.05,
        ..QuantizeOptions::default()
    };

    let mut rng_a = StdRng::seed_from_u64(7);
    let mut rng_b = StdRng::seed_from_u64(7);
    let first = quantize(&pixels, &options, &mut rng_a).unwrap();
    let second = quantize(&pixels, &options, &mut rng_b).unwrap();
    assert_eq!(first.palette.colors(), second.palette.colors());
    assert_eq!(first.matrix, second.matrix);
}

#[test]
fn test_every_interior_cell_gets_a_valid_index() {
    let bytes = checkerboard(6, 4, [255, 0, 0, 255], [0, 0, 255, 255]);
    let pixels = PixelBuffer::new(&bytes, 6, 4).unwrap();
    let options = QuantizeOptions {
        number_of_colors: 2,
        ..QuantizeOptions::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let quantized = quantize(&pixels, &options, &mut rng).unwrap();

    assert_eq!(quantized.matrix.dim(), (6, 8));
    for y in 1..5 {
        for x in 1..7 {
            let index = quantized.matrix[(y, x)];
            assert!(index >= 0);
            assert!((index as usize) < quantized.palette.len());
        }
    }
}

#[test]
fn test_transparency_flattens_onto_background() {
    // Fully transparent black over a white background should land next to
    // the white palette entry, not the black one
    let bytes = [0u8, 0, 0, 0].repeat(16);
    let pixels = PixelBuffer::new(&bytes, 4, 4).unwrap();
    let options = QuantizeOptions {
        number_of_colors: 2,
        background: Rgba::WHITE,
        ..QuantizeOptions::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let quantized = quantize(&pixels, &options, &mut rng).unwrap();

    let index = quantized.matrix[(1, 1)] as usize;
    let chosen = quantized.palette.get(index).unwrap();
    let flattened = chosen.flatten_onto(Rgba::WHITE);
    assert!(flattened.red > 200 && flattened.green > 200 && flattened.blue > 200);
}

#[test]
fn test_quantization_fixed_point_on_bin_centered_colors() {
    // These colors sit exactly at the centers of their histogram bins, so
    // the seeded palette already equals the pixel population and further
    // refinement passes must not move it
    let bytes = checkerboard(8, 8, [252, 4, 4, 255], [4, 4, 252, 255]);
    let pixels = PixelBuffer::new(&bytes, 8, 8).unwrap();

    let mut palettes = Vec::new();
    for cycles in [1, 3, 5] {
        let options = QuantizeOptions {
            number_of_colors: 2,
            cycles,
            ..QuantizeOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let quantized = quantize(&pixels, &options, &mut rng).unwrap();
        palettes.push(quantized.palette.colors().to_vec());
    }
    assert_eq!(palettes[0], palettes[1]);
    assert_eq!(palettes[1], palettes[2]);
}

#[test]
fn test_sampled_strategy_produces_requested_size() {
    let bytes = noise(10, 10);
    let pixels = PixelBuffer::new(&bytes, 10, 10).unwrap();
    let options = QuantizeOptions {
        strategy: PaletteStrategy::Sampled,
        number_of_colors: 9,
        ..QuantizeOptions::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let quantized = quantize(&pixels, &options, &mut rng).unwrap();
    assert_eq!(quantized.palette.len(), 9);
}

#[test]
fn test_palette_size_bounds_are_enforced() {
    let bytes = [0u8; 16];
    let pixels = PixelBuffer::new(&bytes, 2, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    for bad in [0, 1, 257] {
        let options = QuantizeOptions {
            number_of_colors: bad,
            ..QuantizeOptions::default()
        };
        assert!(quantize(&pixels, &options, &mut rng).is_err());
    }
}
