mod vector;
mod transform;
mod aabb;
mod segment;

pub use vector::Vector2;
pub use transform::{Transform2, transform_point, transform_vector};
pub use aabb::{Aabb, CONTAINS_EPSILON};
pub use segment::LineSegment;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Clamps a value between a minimum and maximum value
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Linearly interpolates between two values
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

