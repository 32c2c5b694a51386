//! Midpoint interpolation and direction tagging of raw contours

use crate::trace::geometry::{Contour, Direction, OrientedPoint, Point, SmoothPath};

/// Whether the point at `index` is the middle of an axis-aligned right angle
///
/// True when it shares its x with both predecessors and its y with both
/// successors, or the mirrored arrangement.
fn is_right_angle(points: &[Point], index: usize) -> bool {
    let length = points.len();
    if length < 5 {
        return false;
    }
    let at = |offset: i64| {
        let wrapped = (index as i64 + offset).rem_euclid(length as i64) as usize;
        points.get(wrapped).copied().unwrap_or_default()
    };
    let center = at(0);
    let before2 = at(-2);
    let before1 = at(-1);
    let after1 = at(1);
    let after2 = at(2);

    (center.x == before2.x && center.x == before1.x && center.y == after1.y && center.y == after2.y)
        || (center.y == before2.y
            && center.y == before1.y
            && center.x == after1.x
            && center.x == after2.x)
}

/// Smooth a contour into a midpoint ring tagged with step directions
///
/// Every consecutive point pair contributes its midpoint, tagged with the
/// compass direction towards the following midpoint. With right-angle
/// enhancement enabled, an axis-aligned corner is re-inserted at its exact
/// original location so that midpoint smoothing does not round it off; the
/// previously emitted point is re-tagged to aim at the corner.
pub fn interpolate(contour: &Contour, enhance_right_angle: bool) -> SmoothPath {
    let points = &contour.points;
    let length = points.len();
    let mut smooth: Vec<OrientedPoint> = Vec::with_capacity(length);

    let at = |index: usize| points.get(index % length).copied().unwrap_or_default();

    for index in 0..length {
        let current = at(index);
        let next = at(index + 1);
        let after = at(index + 2);

        let midpoint_x = f64::from(current.x + next.x) / 2.0;
        let midpoint_y = f64::from(current.y + next.y) / 2.0;
        let next_midpoint_x = f64::from(next.x + after.x) / 2.0;
        let next_midpoint_y = f64::from(next.y + after.y) / 2.0;

        if enhance_right_angle && is_right_angle(points, index) {
            let corner_x = f64::from(current.x);
            let corner_y = f64::from(current.y);
            if let Some(previous) = smooth.last_mut() {
                previous.direction =
                    Direction::between(previous.x, previous.y, corner_x, corner_y);
            }
            smooth.push(OrientedPoint {
                x: corner_x,
                y: corner_y,
                direction: Direction::between(corner_x, corner_y, midpoint_x, midpoint_y),
            });
        }

        smooth.push(OrientedPoint {
            x: midpoint_x,
            y: midpoint_y,
            direction: Direction::between(midpoint_x, midpoint_y, next_midpoint_x, next_midpoint_y),
        });
    }

    SmoothPath {
        points: smooth,
        is_hole: contour.is_hole,
        bounds: contour.bounds,
        hole_children: contour.hole_children.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::interpolate;
    use crate::trace::geometry::{BoundingBox, Contour, Direction, Point};

    fn square_contour() -> Contour {
        // Clockwise unit square walked at double resolution
        let points = vec![
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(2, 1),
            Point::new(2, 2),
            Point::new(1, 2),
            Point::new(0, 2),
            Point::new(0, 1),
        ];
        let bounds = BoundingBox {
            left: 0,
            top: 0,
            right: 2,
            bottom: 2,
        };
        Contour {
            points,
            is_hole: false,
            bounds,
            hole_children: Vec::new(),
        }
    }

    #[test]
    fn test_midpoints_and_directions() {
        let smooth = interpolate(&square_contour(), false);
        assert_eq!(smooth.points.len(), 8);
        // First midpoint lies on the top edge heading east
        assert!((smooth.points[0].x - 0.5).abs() < f64::EPSILON);
        assert!(smooth.points[0].y.abs() < f64::EPSILON);
        assert_eq!(smooth.points[0].direction, Direction::East);
        // The top-right corner pair turns south-east then south
        assert_eq!(smooth.points[1].direction, Direction::SouthEast);
        assert_eq!(smooth.points[2].direction, Direction::South);
    }

    #[test]
    fn test_right_angle_enhancement_inserts_corners() {
        let plain = interpolate(&square_contour(), false);
        let enhanced = interpolate(&square_contour(), true);
        // Four corners of the square get re-inserted
        assert_eq!(enhanced.points.len(), plain.points.len() + 4);
        assert!(
            enhanced
                .points
                .iter()
                .any(|p| p.x.abs() < f64::EPSILON && p.y.abs() < f64::EPSILON)
        );
    }
}
