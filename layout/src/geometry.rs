//! Orthogonal geometry primitives shared by the grid, placement and routing
//! modules: integer points and axis-aligned rectangles on the even-coordinate
//! grid, plus the small `Edge`/`Direction`/`Corner` vocabulary the rest of
//! this crate indexes by.

/// Which side of a component or region a thing is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Orientation of a cutline or a routing lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn flip(self) -> Direction {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

/// One of the four corners a [`RegionGroup`](crate::connectivity::RegionGroup)
/// is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(&self, other: &Point) -> i64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// An axis-aligned rectangle. `x`/`y` is the top-left corner; `width`/`height`
/// are always non-negative. Mirrors the decorated `QRect` the source wraps
/// (`width()`/`height()` there subtract Qt's "historical" +1 fencepost) —
/// here `width`/`height` are the plain extents with no such adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            width: bottom_right.x - top_left.x,
            height: bottom_right.y - top_left.y,
        }
    }

    pub fn left(&self) -> i64 { self.x }
    pub fn right(&self) -> i64 { self.x + self.width }
    pub fn top(&self) -> i64 { self.y }
    pub fn bottom(&self) -> i64 { self.y + self.height }

    pub fn top_left(&self) -> Point { Point::new(self.left(), self.top()) }
    pub fn top_right(&self) -> Point { Point::new(self.right(), self.top()) }
    pub fn bottom_left(&self) -> Point { Point::new(self.left(), self.bottom()) }
    pub fn bottom_right(&self) -> Point { Point::new(self.right(), self.bottom()) }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn area(&self) -> i64 { self.width * self.height }

    /// Snapped to the even-coordinate grid, per the data model's
    /// `x % 2 == 0 && y % 2 == 0` invariant.
    pub fn is_snapped(&self) -> bool { self.x % 2 == 0 && self.y % 2 == 0 }

    pub fn snap(&self) -> Rect {
        Rect::new(self.x - self.x.rem_euclid(2), self.y - self.y.rem_euclid(2), self.width, self.height)
    }

    /// Grows the rectangle outward by `amount` on the given edge.
    pub fn grow(&self, edge: Edge, amount: i64) -> Rect {
        match edge {
            Edge::Top => Rect::new(self.x, self.y - amount, self.width, self.height + amount),
            Edge::Bottom => Rect::new(self.x, self.y, self.width, self.height + amount),
            Edge::Left => Rect::new(self.x - amount, self.y, self.width + amount, self.height),
            Edge::Right => Rect::new(self.x, self.y, self.width + amount, self.height),
        }
    }

    pub fn edge_line(&self, edge: Edge) -> Line {
        match edge {
            Edge::Top => Line::new(self.top_left(), self.top_right()),
            Edge::Bottom => Line::new(self.bottom_left(), self.bottom_right()),
            Edge::Left => Line::new(self.top_left(), self.bottom_left()),
            Edge::Right => Line::new(self.top_right(), self.bottom_right()),
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right() && other.left() < self.right() && self.top() < other.bottom() && other.top() < self.bottom()
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// A horizontal or vertical line segment with integer endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    p1: Point,
    p2: Point,
    orientation: Direction,
}

/// Whether an intersection must be a proper crossing or may terminate exactly
/// on the other line's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectKind {
    Cross,
    OnEdge,
}

impl Line {
    pub fn new(p1: Point, p2: Point) -> Self {
        assert!(p1.x == p2.x || p1.y == p2.y, "a Line must be axis-aligned");
        let orientation = if p1.x == p2.x { Direction::Vertical } else { Direction::Horizontal };
        Self { p1, p2, orientation }
    }

    pub fn p1(&self) -> Point { self.p1 }
    pub fn p2(&self) -> Point { self.p2 }
    pub fn orientation(&self) -> Direction { self.orientation }

    /// Normalized so `p1` is the lesser endpoint along the line's axis.
    pub fn normalized(&self) -> Line {
        let (p1, p2) = match self.orientation {
            Direction::Horizontal => if self.p1.x <= self.p2.x { (self.p1, self.p2) } else { (self.p2, self.p1) },
            Direction::Vertical => if self.p1.y <= self.p2.y { (self.p1, self.p2) } else { (self.p2, self.p1) },
        };
        Line { p1, p2, orientation: self.orientation }
    }

    /// Intersection point of `self` and `other`, which must have opposite
    /// orientations. `kind` selects whether lines merely touching at an
    /// endpoint count.
    pub fn intersect(&self, other: &Line, kind: IntersectKind) -> Option<Point> {
        assert!(self.orientation != other.orientation, "intersect requires one horizontal and one vertical line");
        let (hz, vt) = match self.orientation {
            Direction::Horizontal => (self.normalized(), other.normalized()),
            Direction::Vertical => (other.normalized(), self.normalized()),
        };
        let (hz_hit, vt_hit) = match kind {
            IntersectKind::Cross => (
                hz.p1.x < vt.p1.x && vt.p1.x < hz.p2.x,
                vt.p1.y < hz.p1.y && hz.p1.y < vt.p2.y,
            ),
            IntersectKind::OnEdge => (
                hz.p1.x <= vt.p1.x && vt.p1.x <= hz.p2.x,
                vt.p1.y <= hz.p1.y && hz.p1.y <= vt.p2.y,
            ),
        };
        (hz_hit && vt_hit).then(|| Point::new(vt.p1.x, hz.p1.y))
    }
}
