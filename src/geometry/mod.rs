//! Geometry primitives: bounding volumes and polygon mass properties

mod aabb;
mod circle;
mod polygon;

pub use aabb::Aabb;
pub use circle::BoundingCircle;
pub use polygon::{area_of_polygon, moment_of_inertia_of_polygon, signed_area, Polygon};
