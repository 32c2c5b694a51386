//! Recursive least-error reduction of point rings to line and quadratic
//! segments

use crate::io::configuration::FIT_RECURSION_LIMIT;
use crate::trace::contour::LayerPaths;
use crate::trace::geometry::{Contour, OrientedPoint, Segment, SmoothPath, TracedPath};
use crate::trace::interpolate::interpolate;

/// Index distance from `start` to `index` walking forward around the ring
fn span(start: usize, index: usize, length: usize) -> f64 {
    let mut distance = index as i64 - start as i64;
    if distance <= 0 {
        distance += length as i64;
    }
    distance as f64
}

fn coordinates(point: &OrientedPoint) -> (f64, f64) {
    (point.x, point.y)
}

/// Fit the ring span `[start, end]` with as few segments as possible
///
/// A straight line is tried first against the line threshold; on failure a
/// quadratic through the worst-deviating point is tried against the
/// quadratic threshold; on failure again the span splits at the point of
/// maximum curve deviation and both halves recurse. The depth budget turns
/// pathological splits into plain lines instead of overflowing the stack.
fn fit_sequence(
    points: &[OrientedPoint],
    line_threshold: f64,
    quadratic_threshold: f64,
    start: usize,
    end: usize,
    depth: usize,
) -> Vec<Segment> {
    let length = points.len();
    if start >= length || end >= length {
        return Vec::new();
    }
    let Some(first) = points.get(start) else {
        return Vec::new();
    };
    let Some(last) = points.get(end) else {
        return Vec::new();
    };
    let trace_length = span(start, end, length);
    let line = Segment::Line {
        start: coordinates(first),
        end: coordinates(last),
    };

    // Straight-line attempt, parametrized linearly by ring index
    let vx = (last.x - first.x) / trace_length;
    let vy = (last.y - first.y) / trace_length;
    let mut fits_line = true;
    let mut error_value = 0.0;
    let mut error_index = start;
    let mut index = (start + 1) % length;
    while index != end {
        if let Some(point) = points.get(index) {
            let position = span(start, index, length);
            let dx = point.x - vx.mul_add(position, first.x);
            let dy = point.y - vy.mul_add(position, first.y);
            let deviation = dx.mul_add(dx, dy * dy);
            if deviation > line_threshold {
                fits_line = false;
            }
            if deviation > error_value {
                error_value = deviation;
                error_index = index;
            }
        }
        index = (index + 1) % length;
    }
    if fits_line {
        return vec![line];
    }

    // Quadratic attempt: solve the control point so the curve passes
    // through the worst line-fit point at its parametric position
    let fit_index = error_index;
    let Some(fit_point) = points.get(fit_index) else {
        return vec![line];
    };
    let t = span(start, fit_index, length) / trace_length;
    let t1 = (1.0 - t) * (1.0 - t);
    let t2 = 2.0 * (1.0 - t) * t;
    let t3 = t * t;
    if t2.abs() < f64::EPSILON {
        return vec![line];
    }
    let control_x = t3.mul_add(-last.x, t1.mul_add(-first.x, fit_point.x)) / t2;
    let control_y = t3.mul_add(-last.y, t1.mul_add(-first.y, fit_point.y)) / t2;

    let mut fits_curve = true;
    let mut error_value = 0.0;
    let mut error_index = fit_index;
    let mut index = (start + 1) % length;
    while index != end {
        if let Some(point) = points.get(index) {
            let t = span(start, index, length) / trace_length;
            let t1 = (1.0 - t) * (1.0 - t);
            let t2 = 2.0 * (1.0 - t) * t;
            let t3 = t * t;
            let dx = point.x - t3.mul_add(last.x, t1.mul_add(first.x, t2 * control_x));
            let dy = point.y - t3.mul_add(last.y, t1.mul_add(first.y, t2 * control_y));
            let deviation = dx.mul_add(dx, dy * dy);
            if deviation > quadratic_threshold {
                fits_curve = false;
            }
            if deviation > error_value {
                error_value = deviation;
                error_index = index;
            }
        }
        index = (index + 1) % length;
    }
    if fits_curve {
        return vec![Segment::Quadratic {
            start: coordinates(first),
            control: (control_x, control_y),
            end: coordinates(last),
        }];
    }

    // Split at the worst curve-fit point; each half spans strictly fewer
    // ring indices, so recursion terminates
    if depth == 0 {
        return vec![line];
    }
    let split = error_index;
    let mut segments = fit_sequence(
        points,
        line_threshold,
        quadratic_threshold,
        start,
        split,
        depth - 1,
    );
    segments.extend(fit_sequence(
        points,
        line_threshold,
        quadratic_threshold,
        split,
        end,
        depth - 1,
    ));
    segments
}

/// Reduce an interpolated point ring to a fitted segment path
///
/// The ring is partitioned into runs spanning at most two distinct step
/// directions, each run fitted independently. Paths fitting into one
/// segment are discarded as visually negligible; a trailing line segment is
/// dropped since path closure reconnects to the start implicitly; after
/// that the path survives only with more than two segments or more than one
/// quadratic.
pub fn fit_path(
    path: &SmoothPath,
    line_threshold: f64,
    quadratic_threshold: f64,
) -> Option<TracedPath> {
    let points = &path.points;
    let length = points.len();
    if length < 2 {
        return None;
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut start = 0;
    while start < length {
        let first_direction = points.get(start).map(|p| p.direction)?;
        let mut second_direction = None;
        let mut sequence_end = start + 1;
        while sequence_end < length - 1 {
            let direction = points.get(sequence_end).map(|p| p.direction)?;
            if direction != first_direction && second_direction != Some(direction) {
                if second_direction.is_some() {
                    break;
                }
                second_direction = Some(direction);
            }
            sequence_end += 1;
        }
        if sequence_end == length - 1 {
            sequence_end = 0;
        }
        segments.extend(fit_sequence(
            points,
            line_threshold,
            quadratic_threshold,
            start,
            sequence_end,
            FIT_RECURSION_LIMIT,
        ));
        start = if sequence_end > 0 { sequence_end } else { length };
    }

    if segments.len() <= 1 {
        return None;
    }
    if matches!(segments.last(), Some(Segment::Line { .. })) {
        segments.pop();
    }
    let quadratics = segments
        .iter()
        .filter(|segment| matches!(segment, Segment::Quadratic { .. }))
        .count();
    if segments.len() > 2 || quadratics > 1 {
        Some(TracedPath {
            segments,
            is_hole: path.is_hole,
            bounds: path.bounds,
            hole_children: path.hole_children.clone(),
        })
    } else {
        None
    }
}

/// Interpolate and fit every contour of a layer, re-linking hole indices
///
/// Contours whose fit is discarded leave gaps in the original indexing;
/// surviving paths get their hole lists rewritten to the compacted indices,
/// and holes whose fit was discarded disappear from their parent's list.
pub fn fit_layer(
    traced: &LayerPaths,
    enhance_right_angle: bool,
    line_threshold: f64,
    quadratic_threshold: f64,
) -> Vec<TracedPath> {
    let fitted: Vec<Option<TracedPath>> = traced
        .paths
        .iter()
        .map(|contour: &Contour| {
            let smooth = interpolate(contour, enhance_right_angle);
            fit_path(&smooth, line_threshold, quadratic_threshold)
        })
        .collect();

    let mut remap: Vec<Option<usize>> = Vec::with_capacity(fitted.len());
    let mut next_index = 0;
    for entry in &fitted {
        if entry.is_some() {
            remap.push(Some(next_index));
            next_index += 1;
        } else {
            remap.push(None);
        }
    }

    fitted
        .into_iter()
        .flatten()
        .map(|mut path| {
            path.hole_children = path
                .hole_children
                .iter()
                .filter_map(|&old| remap.get(old).copied().flatten())
                .collect();
            path
        })
        .collect()
}
