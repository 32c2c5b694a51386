//! Validates the batch file processor end to end on a temporary directory

use vectrace::io::cli::{Cli, FileProcessor, StrategyArg};

fn test_cli(target: std::path::PathBuf) -> Cli {
    Cli {
        target,
        colors: 2,
        strategy: StrategyArg::Histogram,
        cycles: 3,
        minimum_color_ratio: 0.0,
        background: "#fff".to_string(),
        minimum_path_nodes: 4,
        right_angles: false,
        line_threshold: 1.0,
        quadratic_threshold: 1.0,
        scale: 1.0,
        seed: 42,
        quiet: true,
        no_skip: false,
    }
}

fn write_test_png(path: &std::path::Path) {
    let mut img = image::RgbaImage::new(8, 8);
    for (x, _y, pixel) in img.enumerate_pixels_mut() {
        *pixel = if x < 4 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        };
    }
    img.save(path).unwrap();
}

#[test]
fn test_processing_a_file_writes_svg_next_to_it() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("halves.png");
    write_test_png(&input);

    let mut processor = FileProcessor::new(test_cli(input.clone()));
    processor.process().unwrap();

    let output = dir.path().join("halves_traced.svg");
    let document = std::fs::read_to_string(&output).unwrap();
    assert!(document.starts_with("<svg"));
    assert!(document.contains("<path"));
}

#[test]
fn test_existing_output_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("halves.png");
    write_test_png(&input);
    let output = dir.path().join("halves_traced.svg");
    std::fs::write(&output, "sentinel").unwrap();

    let mut processor = FileProcessor::new(test_cli(input));
    processor.process().unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "sentinel");
}

#[test]
fn test_directory_target_processes_every_png() {
    let dir = tempfile::tempdir().unwrap();
    write_test_png(&dir.path().join("one.png"));
    write_test_png(&dir.path().join("two.png"));
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut processor = FileProcessor::new(test_cli(dir.path().to_path_buf()));
    processor.process().unwrap();

    assert!(dir.path().join("one_traced.svg").exists());
    assert!(dir.path().join("two_traced.svg").exists());
    assert!(!dir.path().join("notes_traced.svg").exists());
}

#[test]
fn test_non_png_file_target_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("image.bmp");
    std::fs::write(&input, "not a png").unwrap();

    let mut processor = FileProcessor::new(test_cli(input));
    assert!(processor.process().is_err());
}
