//! Boundary-following contour walk over a classification layer

use ndarray::Array2;

use crate::io::configuration::DEFAULT_MINIMUM_PATH_NODES;
use crate::trace::geometry::{BoundingBox, Contour, Point};

/// One transition of the boundary-walk automaton
#[derive(Debug, Clone, Copy)]
struct Step {
    /// Code written back into the visited cell
    replacement: u8,
    /// Outgoing walk direction
    direction: u8,
    /// Horizontal cell offset
    dx: i32,
    /// Vertical cell offset
    dy: i32,
}

const fn step(replacement: u8, direction: u8, dx: i32, dy: i32) -> Option<Step> {
    Some(Step {
        replacement,
        direction,
        dx,
        dy,
    })
}

/// Transition table indexed by `[cell code][incoming direction]`
///
/// Codes 0 and 15 are interior cells and terminal everywhere; codes 5 and
/// 10 are saddle cells crossed twice, so their replacement re-arms the
/// opposite crossing instead of consuming the cell.
const LOOKUP: [[Option<Step>; 4]; 16] = [
    [None, None, None, None],
    [step(0, 1, 0, -1), None, None, step(0, 2, -1, 0)],
    [None, None, step(0, 1, 0, -1), step(0, 0, 1, 0)],
    [step(0, 0, 1, 0), None, step(0, 2, -1, 0), None],
    [None, step(0, 0, 1, 0), step(0, 3, 0, 1), None],
    [
        step(13, 3, 0, 1),
        step(13, 2, -1, 0),
        step(7, 1, 0, -1),
        step(7, 0, 1, 0),
    ],
    [None, step(0, 1, 0, -1), None, step(0, 3, 0, 1)],
    [step(0, 3, 0, 1), step(0, 2, -1, 0), None, None],
    [step(0, 3, 0, 1), step(0, 2, -1, 0), None, None],
    [None, step(0, 1, 0, -1), None, step(0, 3, 0, 1)],
    [
        step(11, 1, 0, -1),
        step(14, 0, 1, 0),
        step(14, 3, 0, 1),
        step(11, 2, -1, 0),
    ],
    [None, step(0, 0, 1, 0), step(0, 3, 0, 1), None],
    [step(0, 0, 1, 0), None, step(0, 2, -1, 0), None],
    [None, None, step(0, 1, 0, -1), step(0, 0, 1, 0)],
    [step(0, 1, 0, -1), None, None, step(0, 2, -1, 0)],
    [None, None, None, None],
];

/// Cell code that starts an outer contour
const OUTER_START: u8 = 4;
/// Cell code that starts a hole contour
const HOLE_START: u8 = 11;
/// Initial walk direction for both contour kinds
const START_DIRECTION: u8 = 1;

/// Diagnostic for a walk that hit a terminal transition before closing
///
/// The partial path is abandoned, but the event is reported instead of
/// silently dropped so callers can notice malformed layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncompleteContour {
    /// Contour x coordinate where the walk started
    pub start_x: i32,
    /// Contour y coordinate where the walk started
    pub start_y: i32,
    /// Number of points recorded before the walk terminated
    pub points_walked: usize,
}

/// All contours traced out of one layer, plus per-path diagnostics
#[derive(Debug, Clone, Default)]
pub struct LayerPaths {
    /// Closed contours in discovery order; holes are attached to the
    /// tightest enclosing outer contour discovered before them
    pub paths: Vec<Contour>,
    /// Walks that terminated without closing
    pub incomplete: Vec<IncompleteContour>,
}

enum WalkOutcome {
    Closed(Vec<Point>, BoundingBox),
    Incomplete(usize),
}

fn walk(layer: &mut Array2<u8>, start_y: usize, start_x: usize) -> WalkOutcome {
    let (rows, cols) = layer.dim();
    // Every cell can be crossed at most twice (saddles), so a longer walk
    // means the automaton is stuck
    let step_limit = rows * cols * 4;

    let mut cell_x = start_x;
    let mut cell_y = start_y;
    let mut direction = START_DIRECTION;

    let first = Point::new(start_x as i32 - 1, start_y as i32 - 1);
    let mut points = vec![first];
    let mut bounds = BoundingBox::from_point(first);

    for _ in 0..step_limit {
        let code = layer.get((cell_y, cell_x)).copied().unwrap_or(0);
        let transition = LOOKUP
            .get(code as usize)
            .and_then(|row| row.get(direction as usize))
            .copied()
            .flatten();
        let Some(next) = transition else {
            return WalkOutcome::Incomplete(points.len());
        };

        if let Some(cell) = layer.get_mut((cell_y, cell_x)) {
            *cell = next.replacement;
        }
        direction = next.direction;
        cell_x = cell_x.wrapping_add_signed(next.dx as isize);
        cell_y = cell_y.wrapping_add_signed(next.dy as isize);

        let point = Point::new(cell_x as i32 - 1, cell_y as i32 - 1);
        if point == first {
            return WalkOutcome::Closed(points, bounds);
        }
        points.push(point);
        bounds.include(point);
    }
    WalkOutcome::Incomplete(points.len())
}

/// Index of the tightest previously traced outer contour strictly
/// containing `bounds`
///
/// A later candidate only displaces the current best when its box nests
/// strictly inside the best's box; overlapping but non-nested candidates
/// leave the earlier choice in place.
fn find_parent(paths: &[Contour], bounds: &BoundingBox) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, candidate) in paths.iter().enumerate() {
        if candidate.is_hole || !candidate.bounds.strictly_contains(bounds) {
            continue;
        }
        let tighter = best
            .and_then(|b| paths.get(b))
            .is_none_or(|current| current.bounds.strictly_contains(&candidate.bounds));
        if tighter {
            best = Some(index);
        }
    }
    best
}

/// Trace every contour out of a boundary-classification layer
///
/// Cells are scanned in row-major order; a cell holding the outer start
/// code opens a filled-region contour, the hole start code opens a hole.
/// Visited cells are overwritten during the walk so no contour is traced
/// twice. Closed contours shorter than `minimum_path_nodes` points are
/// discarded (zero selects the default). Each surviving hole is attached
/// to the tightest outer contour whose bounding box strictly contains its
/// own; holes with no qualifying parent stay unattached.
pub fn trace_layer(layer: &mut Array2<u8>, minimum_path_nodes: usize) -> LayerPaths {
    let min_nodes = if minimum_path_nodes == 0 {
        DEFAULT_MINIMUM_PATH_NODES
    } else {
        minimum_path_nodes
    };

    let (rows, cols) = layer.dim();
    let mut result = LayerPaths::default();

    for y in 0..rows {
        for x in 0..cols {
            let code = layer.get((y, x)).copied().unwrap_or(0);
            if code != OUTER_START && code != HOLE_START {
                continue;
            }
            let is_hole = code == HOLE_START;

            match walk(layer, y, x) {
                WalkOutcome::Closed(points, bounds) => {
                    if points.len() < min_nodes {
                        continue;
                    }
                    if is_hole && let Some(parent) = find_parent(&result.paths, &bounds) {
                        let hole_index = result.paths.len();
                        if let Some(outer) = result.paths.get_mut(parent) {
                            outer.hole_children.push(hole_index);
                        }
                    }
                    result.paths.push(Contour {
                        points,
                        is_hole,
                        bounds,
                        hole_children: Vec::new(),
                    });
                }
                WalkOutcome::Incomplete(points_walked) => {
                    result.incomplete.push(IncompleteContour {
                        start_x: x as i32 - 1,
                        start_y: y as i32 - 1,
                        points_walked,
                    });
                }
            }
        }
    }

    result
}
