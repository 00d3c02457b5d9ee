// Plane geometry in canvas pixels (+Y points down).

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Radius of the circle that encloses a box of this size.
    pub fn half_diagonal(self) -> f32 {
        self.width.hypot(self.height) / 2.0
    }
}

/// Axis-aligned bounding box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Slab test for the segment `from -> to` passing through the box interior.
    pub fn intersects_segment(&self, from: Position, to: Position) -> bool {
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        let axes = [
            (from.x, to.x - from.x, self.left(), self.right()),
            (from.y, to.y - from.y, self.top(), self.bottom()),
        ];

        for (origin, delta, low, high) in axes {
            if delta == 0.0 {
                if origin <= low || origin >= high {
                    return false;
                }
                continue;
            }

            let t1 = (low - origin) / delta;
            let t2 = (high - origin) / delta;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));

            if t_min >= t_max {
                return false;
            }
        }

        true
    }
}
