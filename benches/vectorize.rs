//! Performance measurement for the full tracing pipeline

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vectrace::quantize::QuantizeOptions;
use vectrace::{PixelBuffer, VectorizeConfig, Vectorizer};

/// Deterministic multi-region test image: colored stripes with noise
fn stripes(width: usize, height: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(width * height * 4);
    let mut state = 0x2545_f491u32;
    for y in 0..height {
        for x in 0..width {
            state = state.wrapping_mul(48271) % 0x7fff_ffff;
            let jitter = (state & 0x0f) as u8;
            let base = match (y / 16 + x / 24) % 4 {
                0 => [220, 40, 40],
                1 => [40, 180, 60],
                2 => [50, 60, 210],
                _ => [240, 220, 80],
            };
            bytes.extend_from_slice(&[
                base[0].saturating_add(jitter),
                base[1].saturating_add(jitter),
                base[2].saturating_add(jitter),
                255,
            ]);
        }
    }
    bytes
}

/// Measures a complete run over a 128x128 image with an 8-color palette
fn bench_vectorize_128(c: &mut Criterion) {
    let bytes = stripes(128, 128);

    c.bench_function("vectorize_128x128", |b| {
        b.iter(|| {
            let Ok(pixels) = PixelBuffer::new(&bytes, 128, 128) else {
                return;
            };
            let config = VectorizeConfig {
                quantize: QuantizeOptions {
                    number_of_colors: 8,
                    ..QuantizeOptions::default()
                },
                ..VectorizeConfig::default()
            };
            let Ok(vectorizer) = Vectorizer::new(config) else {
                return;
            };
            if let Ok(result) = vectorizer.vectorize(&pixels, None) {
                black_box(result.layers.len());
            }
        });
    });
}

criterion_group!(benches, bench_vectorize_128);
criterion_main!(benches);
