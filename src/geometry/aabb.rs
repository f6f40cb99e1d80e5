use crate::core::Vec2;

/// Axis-aligned bounding box stored as center + half extents.
///
/// Half extents are never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_width: f32,
    pub half_height: f32,
}

impl Aabb {
    pub fn new(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            center,
            half_width: half_width.abs(),
            half_height: half_height.abs(),
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        let lo = min.min(max);
        let hi = min.max(max);
        Self {
            center: (lo + hi) * 0.5,
            half_width: (hi.x - lo.x) * 0.5,
            half_height: (hi.y - lo.y) * 0.5,
        }
    }

    /// Min/max reduction over `points`. An empty slice gives a zero box at the origin.
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (lo, hi) = points
            .iter()
            .skip(1)
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Self::from_min_max(lo, hi)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.center.x - self.half_width, self.center.y - self.half_height)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.center.x + self.half_width, self.center.y + self.half_height)
    }

    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half_height * 2.0
    }

    /// Closed containment test (edges count as inside)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        (p.x - self.center.x).abs() <= self.half_width
            && (p.y - self.center.y).abs() <= self.half_height
    }

    /// Separated-axis overlap test. Touching boxes intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() <= self.half_width + other.half_width
            && (self.center.y - other.center.y).abs() <= self.half_height + other.half_height
    }

    /// Grow every side by `margin`
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(self.center, self.half_width + margin, self.half_height + margin)
    }
}
