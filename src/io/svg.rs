//! SVG document rendering for vectorization results

use std::fmt::Write as _;
use std::path::Path;

use crate::emit::PathCommand;
use crate::io::configuration::COORDINATE_PRECISION;
use crate::io::error::{Result, TraceError};
use crate::pipeline::VectorizedImage;

/// Format a coordinate with fixed precision, trimming trailing zeros
fn number(value: f64) -> String {
    let mut text = format!("{value:.precision$}", precision = COORDINATE_PRECISION);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

fn path_data(commands: &[PathCommand], scale: f64) -> String {
    let mut data = String::new();
    for command in commands {
        match *command {
            PathCommand::MoveTo { x, y } => {
                let _ = write!(data, "M {} {} ", number(x * scale), number(y * scale));
            }
            PathCommand::LineTo { x, y } => {
                let _ = write!(data, "L {} {} ", number(x * scale), number(y * scale));
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                let _ = write!(
                    data,
                    "Q {} {} {} {} ",
                    number(cx * scale),
                    number(cy * scale),
                    number(x * scale),
                    number(y * scale)
                );
            }
            PathCommand::Close => data.push_str("Z "),
        }
    }
    data.trim_end().to_string()
}

/// Render a vectorization result as a standalone SVG document
///
/// The first palette color becomes a full-canvas background rectangle; every
/// traced outline becomes one path element filled with its palette color.
/// Coordinates are multiplied by `scale`.
pub fn render_svg(result: &VectorizedImage, scale: f64) -> String {
    let width = result.width as f64 * scale;
    let height = result.height as f64 * scale;
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
         viewBox=\"0 0 {} {}\">\n",
        number(width),
        number(height),
        number(width),
        number(height)
    );

    if let Some(background) = result.palette.get(0) {
        let _ = writeln!(
            svg,
            "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            background.to_hex()
        );
    }

    for outline in result.outlines() {
        let opacity = if outline.color.alpha < 255 {
            format!(
                " fill-opacity=\"{}\"",
                number(f64::from(outline.color.alpha) / 255.0)
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            svg,
            "  <path d=\"{}\" fill=\"{}\"{opacity}/>",
            path_data(&outline.commands, scale),
            outline.color.to_hex()
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render and write an SVG document to disk
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn save_svg(result: &VectorizedImage, scale: f64, path: &Path) -> Result<()> {
    let document = render_svg(result, scale);
    std::fs::write(path, document).map_err(|source| TraceError::FileSystem {
        path: path.to_path_buf(),
        operation: "write",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{number, path_data};
    use crate::emit::PathCommand;

    #[test]
    fn test_number_trims_trailing_zeros() {
        assert_eq!(number(1.0), "1");
        assert_eq!(number(1.5), "1.5");
        assert_eq!(number(1.25), "1.25");
        assert_eq!(number(1.257), "1.26");
    }

    #[test]
    fn test_path_data_round_trip() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.5, y: 0.0 },
            PathCommand::LineTo { x: 2.0, y: 0.5 },
            PathCommand::QuadTo {
                cx: 2.0,
                cy: 2.0,
                x: 0.5,
                y: 2.0,
            },
            PathCommand::Close,
        ];
        assert_eq!(path_data(&commands, 1.0), "M 0.5 0 L 2 0.5 Q 2 2 0.5 2 Z");
        assert_eq!(path_data(&commands, 2.0), "M 1 0 L 4 1 Q 4 4 1 4 Z");
    }
}
