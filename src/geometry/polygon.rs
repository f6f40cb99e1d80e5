//! Polygon - validated vertex loop with area and moment of inertia
//!
//! Mass properties use a triangle fan rooted at vertex 0. Every fan triangle
//! is split into two right triangles at the foot of the perpendicular dropped
//! from vertex 0 onto the opposite edge; each right triangle's polar moment
//! about its own centroid is moved to the local origin with the parallel-axis
//! theorem. Signed areas carry the winding so overlapping pieces cancel.

use crate::core::{PhysicsError, Vec2, EPSILON};

use super::{Aabb, BoundingCircle};

/// Signed area, positive for counter-clockwise winding. Zero for fewer than 3 vertices.
pub fn signed_area(verts: &[Vec2]) -> f32 {
    if verts.len() < 3 {
        return 0.0;
    }
    let p0 = verts[0];
    verts
        .windows(2)
        .skip(1)
        .map(|w| (w[0] - p0).cross(w[1] - p0) * 0.5)
        .sum()
}

/// Unsigned polygon area. Collinear input gives 0.
pub fn area_of_polygon(verts: &[Vec2]) -> f32 {
    signed_area(verts).abs()
}

/// Signed area and polar moment about the origin of the right triangle
/// (apex, base, foot) whose right angle sits at `foot`.
#[inline]
fn right_triangle_moment(apex: Vec2, base: Vec2, foot: Vec2, density: f32) -> f32 {
    let width = base.distance(foot);
    let height = apex.distance(foot);
    if width <= EPSILON || height <= EPSILON {
        return 0.0;
    }
    let mass = density * (base - apex).cross(foot - apex) * 0.5;
    let centroid = (apex + base + foot) / 3.0;
    // Polar moment of a right triangle about its centroid: m (w² + h²) / 18
    let about_centroid = mass * (width * width + height * height) / 18.0;
    about_centroid + mass * centroid.length_squared()
}

/// Polar moment of inertia about the local origin for a uniform-density polygon.
pub fn moment_of_inertia_of_polygon(verts: &[Vec2], density: f32) -> f32 {
    if verts.len() < 3 {
        return 0.0;
    }
    let apex = verts[0];
    let mut total = 0.0f32;
    for w in verts.windows(2).skip(1) {
        let (b, c) = (w[0], w[1]);
        let edge = c - b;
        let edge_len_sq = edge.length_squared();
        if edge_len_sq <= EPSILON {
            continue;
        }
        let t = (apex - b).dot(edge) / edge_len_sq;
        let foot = b + edge * t;
        // (apex, b, c) = (apex, b, foot) + (apex, foot, c) as signed areas
        total += right_triangle_moment(apex, b, foot, density);
        total -= right_triangle_moment(apex, c, foot, density);
    }
    total.abs()
}

/// Ordered vertex loop with at least three vertices and non-zero area.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    verts: Vec<Vec2>,
}

impl Polygon {
    pub fn new(verts: Vec<Vec2>) -> Result<Self, PhysicsError> {
        if verts.len() < 3 {
            return Err(PhysicsError::DegeneratePolygon { vertices: verts.len() });
        }
        for (i, v) in verts.iter().enumerate() {
            let next = verts[(i + 1) % verts.len()];
            if v.distance_squared(next) <= EPSILON * EPSILON {
                return Err(PhysicsError::ZeroLengthEdge { index: i });
            }
        }
        if area_of_polygon(&verts) <= EPSILON {
            return Err(PhysicsError::ZeroArea);
        }
        Ok(Self { verts })
    }

    /// Axis-aligned rectangle centered on the origin
    pub fn rectangle(width: f32, height: f32) -> Result<Self, PhysicsError> {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Regular n-gon centered on the origin
    pub fn regular(radius: f32, sides: usize) -> Result<Self, PhysicsError> {
        let step = std::f32::consts::TAU / sides.max(1) as f32;
        Self::new(
            (0..sides)
                .map(|i| Vec2::new(radius, 0.0).rotate(step * i as f32))
                .collect(),
        )
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.verts
    }

    pub fn len(&self) -> usize {
        self.verts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    pub fn area(&self) -> f32 {
        area_of_polygon(&self.verts)
    }

    /// +1 for counter-clockwise, -1 for clockwise
    pub fn winding(&self) -> f32 {
        signed_area(&self.verts).signum()
    }

    pub fn moment_of_inertia(&self, density: f32) -> f32 {
        moment_of_inertia_of_polygon(&self.verts, density)
    }

    /// First vertex where the outline turns against its overall orientation.
    /// Collinear runs count as convex.
    pub fn reflex_vertex(&self) -> Option<usize> {
        let v = &self.verts;
        let n = v.len();
        let orient: f32 = (0..n).map(|i| v[i].cross(v[(i + 1) % n])).sum::<f32>().signum();
        (0..n).find(|&i| {
            let e1 = v[i] - v[(i + n - 1) % n];
            let e2 = v[(i + 1) % n] - v[i];
            e1.cross(e2) * orient < -EPSILON * e1.length() * e2.length()
        })
    }

    pub fn is_convex(&self) -> bool {
        self.reflex_vertex().is_none()
    }

    /// Area-weighted centroid
    pub fn centroid(&self) -> Vec2 {
        let p0 = self.verts[0];
        let mut acc = Vec2::zero();
        let mut area = 0.0;
        for w in self.verts.windows(2).skip(1) {
            let a = (w[0] - p0).cross(w[1] - p0) * 0.5;
            acc += (p0 + w[0] + w[1]) * (a / 3.0);
            area += a;
        }
        acc / area
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.verts)
    }

    pub fn bounding_circle(&self) -> BoundingCircle {
        BoundingCircle::from_points(&self.verts)
    }

    /// Vertices rotated by `rotation` then translated by `pos`
    pub fn world_vertices(&self, pos: Vec2, rotation: f32) -> Vec<Vec2> {
        let mut out = Vec::with_capacity(self.verts.len());
        self.world_vertices_into(pos, rotation, &mut out);
        out
    }

    pub fn world_vertices_into(&self, pos: Vec2, rotation: f32, out: &mut Vec<Vec2>) {
        let (sin, cos) = rotation.sin_cos();
        out.clear();
        out.extend(self.verts.iter().map(|v| {
            Vec2::new(pos.x + v.x * cos - v.y * sin, pos.y + v.x * sin + v.y * cos)
        }));
    }
}
