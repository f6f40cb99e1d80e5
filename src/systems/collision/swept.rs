//! Continuous point-vs-moving-segment collision
//!
//! Over one unit interval the point travels `p1 -> p2` while the segment's
//! endpoints travel `l1 -> l3` and `l2 -> l4`. With `e(t) = B(t) - A(t)` and
//! `w(t) = P(t) - A(t)` both linear in `t`, the point sits on the segment's
//! line when `cross(e(t), w(t)) = 0`, a quadratic in `t`. Each root in
//! `[0, 1]` is then checked for where along the segment the crossing lies.

use crate::core::math::near_zero;
use crate::core::{Vec2, EPSILON};

use super::quadratic::solve_quadratic;

/// Earliest crossing of a moving point with a moving segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweptHit {
    /// Time of impact within the interval
    pub t1: f32,
    /// Position along the segment at impact, 0 at the first endpoint
    pub t2: f32,
    /// Point position at impact
    pub point: Vec2,
    /// Unit segment normal at impact, facing against the point's travel
    pub normal: Vec2,
    /// Travel direction mirrored about `normal`
    pub reflection: Vec2,
}

#[inline]
fn in_unit(t: f32) -> bool {
    (-EPSILON..=1.0 + EPSILON).contains(&t)
}

/// Find the earliest `(t1, t2)` with both in `[0, 1]`, or `None` when the
/// swept paths never meet.
pub fn test_point_line(p1: Vec2, p2: Vec2, l1: Vec2, l2: Vec2, l3: Vec2, l4: Vec2) -> Option<SweptHit> {
    let e0 = l2 - l1;
    let e1 = (l4 - l2) - (l3 - l1);
    let w0 = p1 - l1;
    let w1 = (p2 - p1) - (l3 - l1);

    let a_quad = e1.cross(w1);
    let b_quad = e0.cross(w1) + e1.cross(w0);
    let c_quad = e0.cross(w0);

    let mut best: Option<(f32, f32)> = None;
    for t1 in solve_quadratic(a_quad, b_quad, c_quad).candidates() {
        if !in_unit(t1) {
            continue;
        }
        let p = p1.lerp(p2, t1);
        let a = l1.lerp(l3, t1);
        let b = l2.lerp(l4, t1);
        let seg = b - a;

        // Inverse-interpolate on the axis with more spread
        let t2 = if seg.x.abs() >= seg.y.abs() {
            if near_zero(seg.x) {
                continue;
            }
            (p.x - a.x) / seg.x
        } else {
            if near_zero(seg.y) {
                continue;
            }
            (p.y - a.y) / seg.y
        };
        if !in_unit(t2) {
            continue;
        }
        if best.map_or(true, |(bt, _)| t1 < bt) {
            best = Some((t1, t2));
        }
    }

    let (t1, t2) = best?;
    let t1 = t1.clamp(0.0, 1.0);
    let t2 = t2.clamp(0.0, 1.0);
    let a = l1.lerp(l3, t1);
    let b = l2.lerp(l4, t1);
    let dir = p2 - p1;
    let mut normal = (b - a).perp().normalize();
    if normal.dot(dir) > 0.0 {
        normal = -normal;
    }
    Some(SweptHit {
        t1,
        t2,
        point: p1.lerp(p2, t1),
        normal,
        reflection: dir.reflect(normal),
    })
}
