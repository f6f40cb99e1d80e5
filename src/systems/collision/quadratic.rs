use crate::core::math::near_zero;

/// Real roots of `a t² + b t + c = 0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Roots {
    None,
    One(f32),
    Two(f32, f32),
    /// `0 = 0`: every t is a solution
    Any,
}

impl Roots {
    /// Candidate values to test, ascending. `Any` is represented by `0.0`.
    pub fn candidates(&self) -> impl Iterator<Item = f32> {
        let (buf, n) = match *self {
            Roots::None => ([0.0, 0.0], 0),
            Roots::One(t) => ([t, 0.0], 1),
            Roots::Two(a, b) => ([a.min(b), a.max(b)], 2),
            Roots::Any => ([0.0, 0.0], 1),
        };
        buf.into_iter().take(n)
    }
}

/// Solve a quadratic, degrading to the linear and constant cases when the
/// leading coefficients vanish. Never yields complex roots.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Roots {
    if near_zero(a) {
        if near_zero(b) {
            return if near_zero(c) { Roots::Any } else { Roots::None };
        }
        return Roots::One(-c / b);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Roots::None;
    }
    if near_zero(disc) {
        return Roots::One(-b / (2.0 * a));
    }

    // Cancellation-free form
    let sqrt_disc = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_disc);
    let r1 = q / a;
    let r2 = if near_zero(q) { -r1 } else { c / q };
    Roots::Two(r1.min(r2), r1.max(r2))
}
