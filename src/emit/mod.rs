//! Assembly of fitted paths into abstract drawing commands
//!
//! The emitter owns no markup syntax; it hands an ordered command list per
//! colored outline to whatever document writer the caller plugs in.

use crate::color::palette::Palette;
use crate::color::rgba::Rgba;
use crate::trace::geometry::{Segment, TracedPath};

/// One abstract drawing command in un-scaled contour coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath
    MoveTo {
        /// Target x
        x: f64,
        /// Target y
        y: f64,
    },
    /// Straight segment to a point
    LineTo {
        /// Target x
        x: f64,
        /// Target y
        y: f64,
    },
    /// Quadratic Bezier segment to a point
    QuadTo {
        /// Control point x
        cx: f64,
        /// Control point y
        cy: f64,
        /// Target x
        x: f64,
        /// Target y
        y: f64,
    },
    /// Close the current subpath
    Close,
}

/// All fitted paths of one palette color
#[derive(Debug, Clone)]
pub struct TracedLayer {
    /// Index into the palette
    pub palette_index: usize,
    /// Fitted paths of this color, holes included
    pub paths: Vec<TracedPath>,
}

/// The command list for one filled outline, ready for a document writer
#[derive(Debug, Clone)]
pub struct ColorOutline {
    /// Index into the palette
    pub palette_index: usize,
    /// Fill color of the outline
    pub color: Rgba,
    /// Outer ring commands followed by one reversed subpath per hole
    pub commands: Vec<PathCommand>,
}

fn push_forward(commands: &mut Vec<PathCommand>, segments: &[Segment]) {
    let Some(first) = segments.first() else {
        return;
    };
    let (x, y) = first.start();
    commands.push(PathCommand::MoveTo { x, y });
    for segment in segments {
        match *segment {
            Segment::Line { end, .. } => commands.push(PathCommand::LineTo {
                x: end.0,
                y: end.1,
            }),
            Segment::Quadratic { control, end, .. } => commands.push(PathCommand::QuadTo {
                cx: control.0,
                cy: control.1,
                x: end.0,
                y: end.1,
            }),
        }
    }
    commands.push(PathCommand::Close);
}

/// Append a hole subpath walked backward so it winds opposite its parent
fn push_reversed(commands: &mut Vec<PathCommand>, segments: &[Segment]) {
    let Some(last) = segments.last() else {
        return;
    };
    let (x, y) = last.end();
    commands.push(PathCommand::MoveTo { x, y });
    for segment in segments.iter().rev() {
        match *segment {
            Segment::Line { start, .. } => commands.push(PathCommand::LineTo {
                x: start.0,
                y: start.1,
            }),
            Segment::Quadratic { start, control, .. } => commands.push(PathCommand::QuadTo {
                cx: control.0,
                cy: control.1,
                x: start.0,
                y: start.1,
            }),
        }
    }
    commands.push(PathCommand::Close);
}

/// Commands for one outer path and every hole attached to it
///
/// `layer_paths` is the path list the hole indices point into. Holes wind
/// opposite to the outer ring so even-odd and nonzero fill rules both
/// render them as cut-outs.
pub fn outline_path(path: &TracedPath, layer_paths: &[TracedPath]) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    push_forward(&mut commands, &path.segments);
    for &hole_index in &path.hole_children {
        if let Some(hole) = layer_paths.get(hole_index) {
            push_reversed(&mut commands, &hole.segments);
        }
    }
    commands
}

/// Build the outline list for every non-background color
///
/// Palette index 0 is skipped; the document writer represents it as a
/// full-canvas background fill instead of traced geometry. Hole paths are
/// only emitted as subpaths of their parent, never as outlines of their
/// own.
pub fn emit_layers(palette: &Palette, layers: &[TracedLayer]) -> Vec<ColorOutline> {
    let mut outlines = Vec::new();
    for layer in layers {
        if layer.palette_index == 0 {
            continue;
        }
        let Some(color) = palette.get(layer.palette_index) else {
            continue;
        };
        for path in &layer.paths {
            if path.is_hole {
                continue;
            }
            let commands = outline_path(path, &layer.paths);
            if commands.is_empty() {
                continue;
            }
            outlines.push(ColorOutline {
                palette_index: layer.palette_index,
                color,
                commands,
            });
        }
    }
    outlines
}
