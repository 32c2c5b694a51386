//! Command-line interface for batch tracing PNG files into SVG documents

use crate::color::palette::PaletteStrategy;
use crate::color::rgba::Rgba;
use crate::io::configuration::{
    DEFAULT_CYCLES, DEFAULT_LINE_THRESHOLD, DEFAULT_MINIMUM_COLOR_RATIO,
    DEFAULT_MINIMUM_PATH_NODES, DEFAULT_NUMBER_OF_COLORS, DEFAULT_QUADRATIC_THRESHOLD,
    DEFAULT_SEED, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::LoadedImage;
use crate::io::progress::ProgressManager;
use crate::io::svg::save_svg;
use crate::pipeline::{VectorizeConfig, Vectorizer};
use crate::quantize::QuantizeOptions;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Palette seeding strategy as exposed on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Deterministic RGB grid plus random fill
    Generated,
    /// Regular spatial sample of the image
    Sampled,
    /// Median cut over a color histogram
    Histogram,
}

impl From<StrategyArg> for PaletteStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Generated => Self::Generated,
            StrategyArg::Sampled => Self::Sampled,
            StrategyArg::Histogram => Self::Histogram,
        }
    }
}

#[derive(Parser)]
#[command(name = "vectrace")]
#[command(author, version, about = "Trace raster images into vector paths")]
/// Command-line arguments for the tracing tool
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Number of palette colors
    #[arg(short, long, default_value_t = DEFAULT_NUMBER_OF_COLORS)]
    pub colors: usize,

    /// Palette seeding strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Histogram)]
    pub strategy: StrategyArg,

    /// Number of palette refinement passes
    #[arg(long, default_value_t = DEFAULT_CYCLES)]
    pub cycles: usize,

    /// Re-randomize palette entries below this pixel share between passes
    #[arg(long, default_value_t = DEFAULT_MINIMUM_COLOR_RATIO)]
    pub minimum_color_ratio: f64,

    /// Background color for flattening transparency, as a hex string
    #[arg(short, long, default_value = "#fff")]
    pub background: String,

    /// Discard contours with fewer points than this
    #[arg(long, default_value_t = DEFAULT_MINIMUM_PATH_NODES)]
    pub minimum_path_nodes: usize,

    /// Preserve sharp axis-aligned corners
    #[arg(short, long)]
    pub right_angles: bool,

    /// Squared-distance threshold for line fits
    #[arg(long, default_value_t = DEFAULT_LINE_THRESHOLD)]
    pub line_threshold: f64,

    /// Squared-distance threshold for quadratic fits
    #[arg(long, default_value_t = DEFAULT_QUADRATIC_THRESHOLD)]
    pub quadratic_threshold: f64,

    /// Output coordinate scale factor
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Random seed for reproducible palette randomization
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the pipeline configuration from the parsed arguments
    ///
    /// # Errors
    ///
    /// Returns an error when the background color cannot be parsed.
    pub fn to_config(&self) -> Result<VectorizeConfig> {
        let background = Rgba::from_hex(&self.background).ok_or_else(|| {
            invalid_parameter(
                "background",
                &self.background,
                &"expected a #rgb or #rrggbb hex color",
            )
        })?;
        Ok(VectorizeConfig {
            quantize: QuantizeOptions {
                strategy: self.strategy.into(),
                number_of_colors: self.colors,
                cycles: self.cycles,
                minimum_color_ratio: self.minimum_color_ratio,
                background,
            },
            minimum_path_nodes: self.minimum_path_nodes,
            enhance_right_angle: self.right_angles,
            line_threshold: self.line_threshold,
            quadratic_threshold: self.quadratic_threshold,
            seed: self.seed,
        })
    }
}

/// Orchestrates batch tracing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, tracing, or output writing
    /// fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let vectorizer = Vectorizer::new(self.cli.to_config()?)?;

        for file in &files {
            self.process_file(&vectorizer, file)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if self.cli.target.extension().and_then(|s| s.to_str()) == Some("png") {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"target file must be a PNG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) == Some("png")
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"target must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    // Allow print for user feedback on abandoned contour walks
    #[allow(clippy::print_stderr)]
    fn process_file(&self, vectorizer: &Vectorizer, input_path: &Path) -> Result<()> {
        let output_path = Self::get_output_path(input_path);

        if let Some(ref pm) = self.progress_manager {
            pm.start_file(input_path);
        }

        let image = LoadedImage::from_png_path(input_path)?;
        let buffer = image.as_buffer()?;
        let result = vectorizer.vectorize(&buffer, None)?;

        if !self.cli.quiet && !result.diagnostics.is_empty() {
            eprintln!(
                "{}: {} contour walk(s) ended without closing",
                input_path.display(),
                result.diagnostics.len()
            );
        }

        save_svg(&result, self.cli.scale, &output_path)?;

        if let Some(ref pm) = self.progress_manager {
            pm.complete_file();
        }

        Ok(())
    }

    fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{}.svg", stem.to_string_lossy(), OUTPUT_SUFFIX);

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}
