//! Narrow phase: swept point-vs-segment, disk overlap and polygon contacts

mod circle;
mod contact;
mod quadratic;
mod swept;

pub use circle::collide;
pub use contact::{polygon_contact, swept_contact, Contact};
pub use quadratic::{solve_quadratic, Roots};
pub use swept::{test_point_line, SweptHit};
