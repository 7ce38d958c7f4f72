use serde::Serialize;

/// A point in integer canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new(
            self.x.saturating_add(other.x).div_euclid(2),
            self.y.saturating_add(other.y).div_euclid(2),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.top.saturating_add(self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left.saturating_add(self.width.div_euclid(2)),
            self.top.saturating_add(self.height.div_euclid(2)),
        )
    }

    /// Location of a connection site on the bounding box.
    pub fn site(&self, site: Site) -> Point {
        let center = self.center();
        match site {
            Site::Top => Point::new(center.x, self.top),
            Site::Left => Point::new(self.left, center.y),
            Site::Bottom => Point::new(center.x, self.bottom()),
            Site::Right => Point::new(self.right(), center.y),
        }
    }

    /// Builds a rectangle of the given size centered on `center`.
    pub fn centered(center: Point, width: i64, height: i64) -> Self {
        Self::new(
            center.x.saturating_sub(width.div_euclid(2)),
            center.y.saturating_sub(height.div_euclid(2)),
            width,
            height,
        )
    }
}

/// Named connection sites, numbered the way presentation shapes number them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Top,
    Left,
    Bottom,
    Right,
}

impl Site {
    pub fn index(self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Left => 1,
            Self::Bottom => 2,
            Self::Right => 3,
        }
    }
}
