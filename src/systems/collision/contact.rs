//! Polygon contact generation for rigid bodies
//!
//! Two detectors share one [`Contact`] shape:
//! - [`polygon_contact`]: separating-axis test on the current vertices, for
//!   bodies that already overlap.
//! - [`swept_contact`]: every vertex path (`prev -> curr`) of one body against
//!   every moving edge of the other, for bodies that passed through each
//!   other within the step.
//!
//! Normals always point from the first body toward the second.

use crate::core::{Vec2, EPSILON};
use crate::geometry::signed_area;

use super::swept::test_point_line;

/// Fraction of the penetration within which vertices count as equally deep
const FEATURE_TOLERANCE: f32 = 0.05;
/// Swept hits this close to the earliest one count as simultaneous
const TOI_TOLERANCE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Unit normal from body A toward body B
    pub normal: Vec2,
    /// Penetration along `normal` (0 for swept contacts)
    pub depth: f32,
    /// World-space contact point
    pub point: Vec2,
    /// Time of impact within the step; 1 for overlap contacts
    pub toi: f32,
}

#[inline]
fn outward_normal(verts: &[Vec2], i: usize, winding: f32) -> Vec2 {
    let edge = verts[(i + 1) % verts.len()] - verts[i];
    Vec2::new(edge.y, -edge.x).normalize() * winding
}

/// Face of `a` whose outward normal gives the largest separation of `b`.
/// Returns (separation, face index); positive separation means disjoint.
fn least_penetration_axis(a: &[Vec2], b: &[Vec2]) -> (f32, usize) {
    let winding = signed_area(a).signum();
    let mut best = (f32::NEG_INFINITY, 0);
    for i in 0..a.len() {
        let n = outward_normal(a, i, winding);
        let deepest = b
            .iter()
            .map(|v| n.dot(*v - a[i]))
            .fold(f32::INFINITY, f32::min);
        if deepest > best.0 {
            best = (deepest, i);
        }
    }
    best
}

/// Mean of the `incident` vertices lying within tolerance of the deepest
/// penetration behind face `face` of `reference`.
fn deepest_feature(reference: &[Vec2], face: usize, normal: Vec2, separation: f32, incident: &[Vec2]) -> Vec2 {
    let origin = reference[face];
    let cutoff = separation + (-separation) * FEATURE_TOLERANCE + EPSILON;
    let (sum, count) = incident
        .iter()
        .filter(|v| normal.dot(**v - origin) <= cutoff)
        .fold((Vec2::zero(), 0usize), |(s, n), v| (s + *v, n + 1));
    if count == 0 {
        return origin;
    }
    sum / count as f32
}

/// SAT contact between two convex polygons given in world space.
pub fn polygon_contact(a: &[Vec2], b: &[Vec2]) -> Option<Contact> {
    if a.len() < 3 || b.len() < 3 {
        return None;
    }
    let (sep_a, face_a) = least_penetration_axis(a, b);
    if sep_a > 0.0 {
        return None;
    }
    let (sep_b, face_b) = least_penetration_axis(b, a);
    if sep_b > 0.0 {
        return None;
    }

    // Prefer A's face on ties so the result is stable under symmetry
    if sep_a >= sep_b - EPSILON {
        let n = outward_normal(a, face_a, signed_area(a).signum());
        Some(Contact {
            normal: n,
            depth: -sep_a,
            point: deepest_feature(a, face_a, n, sep_a, b),
            toi: 1.0,
        })
    } else {
        let n = outward_normal(b, face_b, signed_area(b).signum());
        Some(Contact {
            normal: -n,
            depth: -sep_b,
            point: deepest_feature(b, face_b, n, sep_b, a),
            toi: 1.0,
        })
    }
}

/// Earliest vertex-vs-edge crossing between two moving polygons.
///
/// Vertices that reach the same face within [`TOI_TOLERANCE`] of the earliest
/// hit are averaged into one contact point, so a face landing flat on a face
/// does not register as a corner hit.
///
/// `*_prev` and `*_curr` must have matching lengths per body.
pub fn swept_contact(a_prev: &[Vec2], a_curr: &[Vec2], b_prev: &[Vec2], b_curr: &[Vec2]) -> Option<Contact> {
    if a_prev.len() != a_curr.len() || b_prev.len() != b_curr.len() {
        return None;
    }
    let mut hits: Vec<Contact> = Vec::new();

    // Vertices of `mover` against edges of `target`; `flip` orients the normal A -> B
    let mut scan = |mover_prev: &[Vec2], mover_curr: &[Vec2], target_prev: &[Vec2], target_curr: &[Vec2], flip: f32| {
        let n = target_curr.len();
        if n < 3 {
            return;
        }
        let winding = signed_area(target_curr).signum();
        for (p1, p2) in mover_prev.iter().zip(mover_curr) {
            for i in 0..n {
                let j = (i + 1) % n;
                let Some(hit) = test_point_line(*p1, *p2, target_prev[i], target_prev[j], target_curr[i], target_curr[j]) else {
                    continue;
                };
                let l1 = target_prev[i].lerp(target_curr[i], hit.t1);
                let l2 = target_prev[j].lerp(target_curr[j], hit.t1);
                let edge = l2 - l1;
                let outward = Vec2::new(edge.y, -edge.x).normalize() * winding;
                hits.push(Contact {
                    normal: outward * flip,
                    depth: 0.0,
                    point: hit.point,
                    toi: hit.t1,
                });
            }
        }
    };

    // A's vertices hit B's faces: B's outward normal points back at A
    scan(a_prev, a_curr, b_prev, b_curr, -1.0);
    // B's vertices hit A's faces: A's outward normal already points at B
    scan(b_prev, b_curr, a_prev, a_curr, 1.0);

    let first = hits.iter().copied().reduce(|best, c| if c.toi < best.toi { c } else { best })?;
    let (sum, count) = hits
        .iter()
        .filter(|c| c.toi - first.toi <= TOI_TOLERANCE && c.normal.dot(first.normal) >= 1.0 - TOI_TOLERANCE)
        .fold((Vec2::zero(), 0usize), |(s, n), c| (s + c.point, n + 1));
    Some(Contact {
        point: sum / count.max(1) as f32,
        ..first
    })
}
