use crate::math::Vector2;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A directed line segment, the query primitive for ray casts
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LineSegment {
    /// Start point
    pub start: Vector2,

    /// End point
    pub end: Vector2,
}

impl LineSegment {
    /// Creates a new segment between two points
    #[inline]
    pub fn new(start: Vector2, end: Vector2) -> Self {
        Self { start, end }
    }

    /// Unnormalized direction `end - start`
    #[inline]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }

    /// Length of the segment
    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    /// Midpoint of the segment
    #[inline]
    pub fn midpoint(&self) -> Vector2 {
        (self.start + self.end) * 0.5
    }

    /// Returns the point at parameter `t`, where 0 is `start` and 1 is `end`
    #[inline]
    pub fn point_at(&self, t: f32) -> Vector2 {
        self.start + self.direction() * t
    }

    /// Returns the closest point on the segment to a given point
    pub fn closest_point(&self, point: Vector2) -> Vector2 {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq <= crate::math::EPSILON {
            return self.start;
        }

        let t = ((point - self.start).dot(&dir) / len_sq).clamp(0.0, 1.0);
        self.point_at(t)
    }

    /// Returns the distance from the segment to a point
    #[inline]
    pub fn distance_to_point(&self, point: Vector2) -> f32 {
        (point - self.closest_point(point)).length()
    }
}
