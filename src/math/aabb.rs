use crate::math::Vector2;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Margin used by [`Aabb::contains`] so points sitting on the boundary are
/// reported as outside.
pub const CONTAINS_EPSILON: f32 = 1.0e-5;

/// Axis-Aligned Bounding Box (AABB) for efficient collision detection.
///
/// Equality is an exact comparison of the corners. It is only used to skip
/// redundant incremental updates, never to decide a collision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner of the AABB
    pub min: Vector2,

    /// Maximum corner of the AABB
    pub max: Vector2,
}

impl Aabb {
    /// Creates a new AABB from two corner points in any order
    #[inline]
    pub fn new(a: Vector2, b: Vector2) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// Creates an AABB centered at a position with the given half extents
    #[inline]
    pub fn from_center_half_extents(center: Vector2, half_extents: Vector2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Creates an AABB from a set of points
    pub fn from_points(points: &[Vector2]) -> Option<Self> {
        let mut aabb = Self::default();
        if aabb.update(points) {
            Some(aabb)
        } else {
            None
        }
    }

    /// Recomputes the box so it tightly encloses `points`.
    ///
    /// Returns false and leaves the box untouched when `points` is empty.
    pub fn update(&mut self, points: &[Vector2]) -> bool {
        let Some(first) = points.first() else {
            return false;
        };

        let mut min = *first;
        let mut max = *first;

        for point in points.iter().skip(1) {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);

            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        self.min = min;
        self.max = max;
        true
    }

    /// Width of the box
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the box
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Returns the center of the AABB
    #[inline]
    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    /// Returns the extents of the AABB in each dimension
    #[inline]
    pub fn extents(&self) -> Vector2 {
        self.max - self.min
    }

    /// Returns half the extents of the AABB in each dimension
    #[inline]
    pub fn half_extents(&self) -> Vector2 {
        self.extents() * 0.5
    }

    /// Length of the shorter side
    #[inline]
    pub fn shortest_side(&self) -> f32 {
        self.width().min(self.height())
    }

    /// The four corners, counter-clockwise from the minimum corner
    pub fn corners(&self) -> [Vector2; 4] {
        [
            self.min,
            Vector2::new(self.max.x, self.min.y),
            self.max,
            Vector2::new(self.min.x, self.max.y),
        ]
    }

    /// Strict interior test. Points within [`CONTAINS_EPSILON`] of the
    /// boundary are outside.
    #[inline]
    pub fn contains(&self, point: Vector2) -> bool {
        point.x > self.min.x + CONTAINS_EPSILON
            && point.x < self.max.x - CONTAINS_EPSILON
            && point.y > self.min.y + CONTAINS_EPSILON
            && point.y < self.max.y - CONTAINS_EPSILON
    }

    /// Checks if this AABB fully contains another AABB
    #[inline]
    pub fn contains_aabb(&self, other: &Self) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x &&
        self.min.y <= other.min.y && self.max.y >= other.max.y
    }

    /// True unless the boxes are disjoint on either axis. Touching boxes
    /// intersect.
    #[inline]
    pub fn intersect(a: &Aabb, b: &Aabb) -> bool {
        if a.min.x > b.max.x || b.min.x > a.max.x {
            return false;
        }
        !(a.min.y > b.max.y || b.min.y > a.max.y)
    }

    /// Method form of [`Aabb::intersect`]
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        Self::intersect(self, other)
    }

    /// Distance from `point` to the box: 0 inside, otherwise the Euclidean
    /// distance to the nearest edge or corner.
    pub fn get_distance(&self, point: Vector2) -> f32 {
        let center = self.center();
        let half = self.half_extents();

        let dx = ((point.x - center.x).abs() - half.x).max(0.0);
        let dy = ((point.y - center.y).abs() - half.y).max(0.0);

        if dx > 0.0 && dy > 0.0 {
            dx.hypot(dy)
        } else {
            dx.max(dy)
        }
    }

    /// Returns the union of this AABB with another
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// Expands this AABB by a margin in all directions
    #[inline]
    pub fn expand(&self, margin: f32) -> Self {
        let margin_vec = Vector2::new(margin, margin);
        Self {
            min: self.min - margin_vec,
            max: self.max + margin_vec,
        }
    }

    /// Returns the closest point on the AABB to a given point
    pub fn closest_point(&self, point: Vector2) -> Vector2 {
        Vector2::new(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }
}
