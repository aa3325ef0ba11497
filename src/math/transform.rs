use nalgebra as na;
use crate::math::Vector2;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A rigid 2D transformation (rotation followed by translation)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform2 {
    /// Translation in world space
    pub position: Vector2,

    /// Counter-clockwise rotation in radians
    pub rotation: f32,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2 {
    /// Creates a new transform with the given position and rotation
    #[inline]
    pub fn new(position: Vector2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Creates a new identity transform
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vector2::ZERO,
            rotation: 0.0,
        }
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector2) -> Self {
        Self { position, rotation: 0.0 }
    }

    /// Converts to a nalgebra isometry
    #[inline]
    pub fn to_isometry(&self) -> na::Isometry2<f32> {
        na::Isometry2::new(self.position.to_nalgebra(), self.rotation)
    }

    /// Converts from a nalgebra isometry
    #[inline]
    pub fn from_isometry(iso: &na::Isometry2<f32>) -> Self {
        Self {
            position: Vector2::from_nalgebra(&iso.translation.vector),
            rotation: iso.rotation.angle(),
        }
    }

    /// Composes two transforms: the result applies `local` first, then `self`
    #[inline]
    pub fn combine(&self, local: &Transform2) -> Self {
        Self::from_isometry(&(self.to_isometry() * local.to_isometry()))
    }

    /// Returns the inverse transform
    #[inline]
    pub fn inverse(&self) -> Self {
        Self::from_isometry(&self.to_isometry().inverse())
    }

    /// Transforms a point from local to world space
    #[inline]
    pub fn transform_point(&self, point: Vector2) -> Vector2 {
        Vector2::from_point(&self.to_isometry().transform_point(&point.to_point()))
    }

    /// Rotates a direction from local to world space (translation ignored)
    #[inline]
    pub fn transform_vector(&self, vector: Vector2) -> Vector2 {
        vector.rotate(self.rotation)
    }
}

/// Applies an isometry to a point
#[inline]
pub fn transform_point(iso: &na::Isometry2<f32>, point: Vector2) -> Vector2 {
    Vector2::from_point(&iso.transform_point(&point.to_point()))
}

/// Applies only the rotational part of an isometry to a direction
#[inline]
pub fn transform_vector(iso: &na::Isometry2<f32>, vector: Vector2) -> Vector2 {
    Vector2::from_nalgebra(&iso.transform_vector(&vector.to_nalgebra()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn inverse_round_trips_point() {
        let transform = Transform2::new(Vector2::new(3.0, -1.0), 0.7);
        let p = Vector2::new(1.5, 2.0);
        let back = transform.inverse().transform_point(transform.transform_point(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-5);
    }

    #[test]
    fn combine_applies_local_first() {
        let body = Transform2::new(Vector2::new(10.0, 0.0), FRAC_PI_2);
        let offset = Transform2::from_position(Vector2::new(1.0, 0.0));
        let p = body.combine(&offset).transform_point(Vector2::ZERO);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }
}
