//! Color values and palette handling

/// Ordered palettes and seeding strategies
pub mod palette;
/// RGBA color type and distance metric
pub mod rgba;
