use crate::core::Vec2;

/// Bounding circle centered on the vertex mean.
///
/// Not the minimal enclosing circle: callers must not assume tightness.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl BoundingCircle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius: radius.max(0.0) }
    }

    pub fn from_points(points: &[Vec2]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let sum = points.iter().fold(Vec2::zero(), |acc, p| acc + *p);
        let center = sum / points.len() as f32;
        let radius_sq = points
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0f32, f32::max);
        Self { center, radius: radius_sq.sqrt() }
    }

    /// Same circle moved to `center`
    pub fn at(&self, center: Vec2) -> Self {
        Self { center, radius: self.radius }
    }

    #[inline]
    pub fn intersects(&self, other: &BoundingCircle) -> bool {
        let r = self.radius + other.radius;
        self.center.distance_squared(other.center) <= r * r
    }
}
