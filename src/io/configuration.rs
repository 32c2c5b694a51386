//! Pipeline constants and runtime configuration defaults

// Palette size limits shared by every seeding strategy
/// Smallest accepted palette
pub const MIN_PALETTE_SIZE: usize = 2;
/// Largest accepted palette
pub const MAX_PALETTE_SIZE: usize = 256;

// Default values for configurable parameters
/// Default palette size
pub const DEFAULT_NUMBER_OF_COLORS: usize = 16;

/// Default number of palette refinement passes
pub const DEFAULT_CYCLES: usize = 3;

/// Default minimum pixel share below which a palette entry is re-randomized
pub const DEFAULT_MINIMUM_COLOR_RATIO: f64 = 0.0;

/// Default minimum point count for a contour to survive
pub const DEFAULT_MINIMUM_PATH_NODES: usize = 8;

/// Default squared-distance threshold for line fits
pub const DEFAULT_LINE_THRESHOLD: f64 = 1.0;

/// Default squared-distance threshold for quadratic fits
pub const DEFAULT_QUADRATIC_THRESHOLD: f64 = 1.0;

/// Fixed seed for reproducible palette randomization
pub const DEFAULT_SEED: u64 = 42;

// Safety limit for adversarially low fitting thresholds
/// Maximum curve-fitting recursion depth before falling back to lines
pub const FIT_RECURSION_LIMIT: usize = 1024;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_traced";

/// Decimal places kept in emitted path coordinates
pub const COORDINATE_PRECISION: usize = 2;
