//! CLI entry point for the raster-to-vector tracing tool

use clap::Parser;
use vectrace::io::cli::{Cli, FileProcessor};

fn main() -> vectrace::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
