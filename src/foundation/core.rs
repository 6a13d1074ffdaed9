use serde::{Deserialize, Serialize};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Axis-aligned rectangle `{x, y, width, height}` in the space it was computed in.
///
/// Width and height are never negative. A zero-area box is a valid degenerate box;
/// "no content" is expressed as `Option::<BoundingBox>::None`, never as a zero box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Extent along x, `>= 0`.
    pub width: f64,
    /// Extent along y, `>= 0`.
    pub height: f64,
}

impl BoundingBox {
    /// Create a box, normalizing negative extents so the invariant `width, height >= 0` holds.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(x, y, x + width, y + height)
    }

    /// Smallest box enclosing the two corner points, in any order.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Smallest box enclosing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in it {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Self::from_corners(x0, y0, x1, y1))
    }

    /// Full `width x height` rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Area, zero for degenerate boxes.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// `true` when the box has zero area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// `width / height`, or `None` when the height is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// Smallest box containing both inputs.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// Union of every box, or `None` when there are none.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<Self> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<Self>, b| match acc {
                Some(acc) => Some(acc.union(b)),
                None => Some(*b),
            })
    }

    /// `true` when `other` lies entirely inside `self` (edges inclusive).
    pub fn contains_box(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// `true` when `p` lies inside `self` (edges inclusive).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.max_x() && p.y <= self.max_y()
    }

    /// Grow every side by `amount`.
    pub fn inflate(&self, amount: f64) -> Self {
        Self::from_corners(
            self.x - amount,
            self.y - amount,
            self.max_x() + amount,
            self.max_y() + amount,
        )
    }

    /// Intersection with `bounds`, or `None` when they do not overlap.
    pub fn intersect(&self, bounds: &Self) -> Option<Self> {
        let x0 = self.x.max(bounds.x);
        let y0 = self.y.max(bounds.y);
        let x1 = self.max_x().min(bounds.max_x());
        let y1 = self.max_y().min(bounds.max_y());
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some(Self::from_corners(x0, y0, x1, y1))
    }

    /// Axis-aligned box of the four corners mapped through `affine`.
    pub fn transform(&self, affine: Affine) -> Self {
        let corners = [
            Point::new(self.x, self.y),
            Point::new(self.max_x(), self.y),
            Point::new(self.x, self.max_y()),
            Point::new(self.max_x(), self.max_y()),
        ];
        // Four corners always produce a box.
        Self::from_points(corners.map(|p| affine * p)).unwrap_or(*self)
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }

    /// Convert into a `kurbo` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.max_x(), self.max_y())
    }
}

impl From<Rect> for BoundingBox {
    fn from(r: Rect) -> Self {
        Self::from_corners(r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
