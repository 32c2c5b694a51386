//! Geometric primitives shared across the tracing stages

/// An integer lattice point recorded while walking a contour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl Point {
    /// Create a point from its coordinates
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in contour coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Smallest x
    pub left: i32,
    /// Smallest y
    pub top: i32,
    /// Largest x
    pub right: i32,
    /// Largest y
    pub bottom: i32,
}

impl BoundingBox {
    /// Degenerate box covering a single point
    pub const fn from_point(point: Point) -> Self {
        Self {
            left: point.x,
            top: point.y,
            right: point.x,
            bottom: point.y,
        }
    }

    /// Grow the box to cover a point
    pub const fn include(&mut self, point: Point) {
        if point.x < self.left {
            self.left = point.x;
        }
        if point.x > self.right {
            self.right = point.x;
        }
        if point.y < self.top {
            self.top = point.y;
        }
        if point.y > self.bottom {
            self.bottom = point.y;
        }
    }

    /// Whether `other` lies strictly inside this box on all four sides
    pub const fn strictly_contains(&self, other: &Self) -> bool {
        self.left < other.left
            && self.top < other.top
            && self.right > other.right
            && self.bottom > other.bottom
    }

    /// Box width in cells
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Box height in cells
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Compass direction of a step between two interpolated points
///
/// The `Center` code marks a zero-length step, which only occurs for
/// degenerate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards positive x
    East,
    /// Towards positive x and positive y
    SouthEast,
    /// Towards positive y
    South,
    /// Towards negative x and positive y
    SouthWest,
    /// Towards negative x
    West,
    /// Towards negative x and negative y
    NorthWest,
    /// Towards negative y
    North,
    /// Towards positive x and negative y
    NorthEast,
    /// No movement
    Center,
}

impl Direction {
    /// Classify the octant of the step from one point to another
    pub fn between(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> Self {
        if to_x > from_x {
            if to_y > from_y {
                Self::SouthEast
            } else if to_y < from_y {
                Self::NorthEast
            } else {
                Self::East
            }
        } else if to_x < from_x {
            if to_y > from_y {
                Self::SouthWest
            } else if to_y < from_y {
                Self::NorthWest
            } else {
                Self::West
            }
        } else if to_y > from_y {
            Self::South
        } else if to_y < from_y {
            Self::North
        } else {
            Self::Center
        }
    }
}

/// A closed raw contour produced by the boundary walk
#[derive(Debug, Clone)]
pub struct Contour {
    /// Corner points in walk order
    pub points: Vec<Point>,
    /// Whether this contour bounds a hole rather than a filled region
    pub is_hole: bool,
    /// Bounding box over all points
    pub bounds: BoundingBox,
    /// Indices of hole contours nested inside this one (outer contours only)
    pub hole_children: Vec<usize>,
}

/// An interpolated point carrying its outgoing step direction
#[derive(Debug, Clone, Copy)]
pub struct OrientedPoint {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
    /// Direction towards the next point in the ring
    pub direction: Direction,
}

/// A contour after midpoint interpolation, ready for curve fitting
#[derive(Debug, Clone)]
pub struct SmoothPath {
    /// Direction-tagged point ring
    pub points: Vec<OrientedPoint>,
    /// Whether the source contour was a hole
    pub is_hole: bool,
    /// Bounding box carried over from the source contour
    pub bounds: BoundingBox,
    /// Hole indices carried over from the source contour
    pub hole_children: Vec<usize>,
}

/// One fitted piece of a traced path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Straight segment between two points
    Line {
        /// Start point
        start: (f64, f64),
        /// End point
        end: (f64, f64),
    },
    /// Quadratic Bezier segment
    Quadratic {
        /// Start point
        start: (f64, f64),
        /// Control point
        control: (f64, f64),
        /// End point
        end: (f64, f64),
    },
}

impl Segment {
    /// Start point of the segment
    pub const fn start(&self) -> (f64, f64) {
        match self {
            Self::Line { start, .. } | Self::Quadratic { start, .. } => *start,
        }
    }

    /// End point of the segment
    pub const fn end(&self) -> (f64, f64) {
        match self {
            Self::Line { end, .. } | Self::Quadratic { end, .. } => *end,
        }
    }
}

/// A path whose geometry has been reduced to fitted segments
#[derive(Debug, Clone)]
pub struct TracedPath {
    /// Fitted segments in ring order
    pub segments: Vec<Segment>,
    /// Whether the path bounds a hole
    pub is_hole: bool,
    /// Bounding box of the source contour
    pub bounds: BoundingBox,
    /// Indices of hole paths nested inside this one, into the same layer's
    /// path list
    pub hole_children: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::{BoundingBox, Direction, Point};

    #[test]
    fn test_bounding_box_growth_and_containment() {
        let mut outer = BoundingBox::from_point(Point::new(0, 0));
        outer.include(Point::new(10, 10));
        let inner = BoundingBox {
            left: 2,
            top: 2,
            right: 8,
            bottom: 8,
        };
        assert!(outer.strictly_contains(&inner));
        assert!(!inner.strictly_contains(&outer));
        // Touching an edge is not strict containment
        let touching = BoundingBox {
            left: 0,
            top: 2,
            right: 8,
            bottom: 8,
        };
        assert!(!outer.strictly_contains(&touching));
    }

    #[test]
    fn test_direction_octants() {
        assert_eq!(Direction::between(0.0, 0.0, 1.0, 0.0), Direction::East);
        assert_eq!(Direction::between(0.0, 0.0, 1.0, 1.0), Direction::SouthEast);
        assert_eq!(Direction::between(0.0, 0.0, 0.0, 1.0), Direction::South);
        assert_eq!(Direction::between(0.0, 0.0, -1.0, -1.0), Direction::NorthWest);
        assert_eq!(Direction::between(2.0, 2.0, 2.0, 2.0), Direction::Center);
    }
}
