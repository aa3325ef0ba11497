//! Polygon outlines.
//!
//! Winding follows screen coordinates (y pointing down): a polygon is
//! "counter-clockwise" when its shoelace signed area is negative. In that
//! order the left perpendicular of every edge points out of the shape, which
//! is what the narrow phases rely on.

use std::ops::{Deref, DerefMut};

use crate::collision::Feature;
use crate::math::{Vector2, LineSegment};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// An ordered polygon outline. Edge `i` runs from vertex `i` to vertex
/// `(i + 1) % len`.
///
/// Functions computing normals, areas or features assume at least three
/// non-degenerate vertices; fewer produce meaningless numbers, not errors.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Vertices {
    points: Vec<Vector2>,
}

impl Deref for Vertices {
    type Target = Vec<Vector2>;

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl DerefMut for Vertices {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.points
    }
}

impl From<Vec<Vector2>> for Vertices {
    fn from(points: Vec<Vector2>) -> Self {
        Self { points }
    }
}

impl FromIterator<Vector2> for Vertices {
    fn from_iter<I: IntoIterator<Item = Vector2>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

impl Vertices {
    /// Creates an empty outline
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates an empty outline with room for `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        Self { points: Vec::with_capacity(capacity) }
    }

    /// Borrows the points as a slice
    pub fn as_slice(&self) -> &[Vector2] {
        &self.points
    }

    /// Index of the vertex after `index`, wrapping around
    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 >= self.points.len() { 0 } else { index + 1 }
    }

    /// Index of the vertex before `index`, wrapping around
    #[inline]
    pub fn previous_index(&self, index: usize) -> usize {
        if index == 0 { self.points.len() - 1 } else { index - 1 }
    }

    #[inline]
    pub fn next_vertex(&self, index: usize) -> Vector2 {
        self.points[self.next_index(index)]
    }

    #[inline]
    pub fn previous_vertex(&self, index: usize) -> Vector2 {
        self.points[self.previous_index(index)]
    }

    /// Edge vector from vertex `index` to the next vertex
    #[inline]
    pub fn get_edge(&self, index: usize) -> Vector2 {
        self.next_vertex(index) - self.points[index]
    }

    /// Edge `index` as a segment
    #[inline]
    pub fn get_edge_segment(&self, index: usize) -> LineSegment {
        LineSegment::new(self.points[index], self.next_vertex(index))
    }

    /// Midpoint of edge `index`
    #[inline]
    pub fn get_edge_midpoint(&self, index: usize) -> Vector2 {
        self.get_edge_segment(index).midpoint()
    }

    /// Outward unit normal of edge `index` (left perpendicular of the edge)
    #[inline]
    pub fn get_edge_normal(&self, index: usize) -> Vector2 {
        self.get_edge(index).perpendicular().normalize()
    }

    /// Angle-bisector normal at vertex `index`: the normalized sum of the
    /// normals of the two edges meeting there.
    pub fn get_vertex_normal(&self, index: usize) -> Vector2 {
        let next = self.get_edge_normal(index);
        let previous = self.get_edge_normal(self.previous_index(index));
        (next + previous).normalize()
    }

    /// Shoelace signed area. Negative for counter-clockwise outlines in this
    /// crate's winding convention.
    pub fn get_signed_area(&self) -> f32 {
        let count = self.points.len();
        let mut area = 0.0;

        for i in 0..count {
            let j = (i + 1) % count;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[i].y * self.points[j].x;
        }

        area * 0.5
    }

    /// Unsigned polygon area
    pub fn get_area(&self) -> f32 {
        self.get_signed_area().abs()
    }

    /// Polygon centroid. Works for either winding since the signed area
    /// divides out the orientation.
    pub fn get_centroid(&self) -> Vector2 {
        let area = self.get_signed_area();
        if crate::math::approx_zero(area) {
            return self.points.iter().fold(Vector2::ZERO, |acc, p| acc + *p)
                / self.points.len().max(1) as f32;
        }

        let count = self.points.len();
        let mut centroid = Vector2::ZERO;

        for i in 0..count {
            let current = self.points[i];
            let next = self.points[(i + 1) % count];
            let cross = current.cross(&next);
            centroid.x += (current.x + next.x) * cross;
            centroid.y += (current.y + next.y) * cross;
        }

        centroid / (6.0 * area)
    }

    /// True when the outline is in this crate's counter-clockwise order
    #[inline]
    pub fn is_counter_clockwise(&self) -> bool {
        self.get_signed_area() <= 0.0
    }

    /// Reverses the order if the signed area is positive, so the outline
    /// ends up counter-clockwise. Idempotent.
    pub fn force_counter_clockwise_order(&mut self) {
        if self.get_signed_area() > 0.0 {
            self.points.reverse();
        }
    }

    /// Convex iff the cross products of consecutive edges never change sign.
    /// Collinear vertices are tolerated.
    pub fn is_convex(&self) -> bool {
        let count = self.points.len();
        if count < 3 {
            return false;
        }

        let mut sign = 0.0f32;
        for i in 0..count {
            let d0 = self.points[i] - self.previous_vertex(i);
            let d1 = self.next_vertex(i) - self.points[i];
            let cross = d0.cross(&d1);

            if cross == 0.0 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }

        true
    }

    /// Second moment of area about the centroid, per unit mass
    pub fn get_moment_of_inertia(&self) -> f32 {
        let count = self.points.len();
        if count < 3 {
            return 0.0;
        }

        let centroid = self.get_centroid();
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for i in 0..count {
            let a = self.points[i] - centroid;
            let b = self.points[(i + 1) % count] - centroid;
            let cross = a.cross(&b).abs();

            numerator += cross * (a.dot(&a) + a.dot(&b) + b.dot(&b));
            denominator += cross;
        }

        if denominator <= crate::math::EPSILON {
            return 0.0;
        }
        numerator / (6.0 * denominator)
    }

    /// Translates every vertex by `offset`
    pub fn translate(&mut self, offset: Vector2) {
        for point in self.points.iter_mut() {
            *point += offset;
        }
    }

    /// Rotates every vertex about the origin
    pub fn rotate(&mut self, angle: f32) {
        for point in self.points.iter_mut() {
            *point = point.rotate(angle);
        }
    }

    /// Scales every vertex component-wise about the origin
    pub fn scale(&mut self, factor: Vector2) {
        for point in self.points.iter_mut() {
            point.x *= factor.x;
            point.y *= factor.y;
        }
    }

    /// Projects the outline onto `axis`, returning the `(min, max)` interval
    pub fn project_to_axis(&self, axis: Vector2) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for point in &self.points {
            let d = point.dot(&axis);
            min = min.min(d);
            max = max.max(d);
        }

        (min, max)
    }

    /// Even-odd ray casting point-in-polygon test. Points exactly on a
    /// horizontal edge count as outside.
    pub fn contains_point(&self, point: Vector2) -> bool {
        let count = self.points.len();
        let mut inside = false;
        let mut j = count.wrapping_sub(1);

        for i in 0..count {
            let pi = self.points[i];
            let pj = self.points[j];

            if (pi.y > point.y) != (pj.y > point.y)
                && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Projects `point` onto edge `index`, clamped to the segment. The
    /// returned feature carries the unsigned distance; at the endpoints the
    /// vertex normal is used instead of the edge normal.
    pub fn get_nearest_feature(&self, point: Vector2, index: usize) -> Feature {
        let start = self.points[index];
        let next_index = self.next_index(index);
        let end = self.points[next_index];

        let edge = end - start;
        let to_point = point - start;
        let c1 = to_point.dot(&edge);

        if c1 < 0.0 {
            return Feature::new(start, self.get_vertex_normal(index), (point - start).length());
        }

        let c2 = edge.dot(&edge);
        if c2 < c1 {
            return Feature::new(end, self.get_vertex_normal(next_index), (point - end).length());
        }

        let position = start + edge * (c1 / c2);
        Feature::new(position, self.get_edge_normal(index), (point - position).length())
    }

    /// Signed distance from `point` to the outline: positive outside,
    /// negative inside.
    pub fn get_nearest_distance(&self, point: Vector2) -> f32 {
        let mut nearest = f32::MAX;
        let mut nearest_index = 0;

        for i in 0..self.points.len() {
            let feature = self.get_nearest_feature(point, i);
            if feature.distance < nearest {
                nearest = feature.distance;
                nearest_index = i;
            }
        }

        let feature = self.get_nearest_feature(point, nearest_index);
        if (point - feature.position).dot(&feature.normal) > 0.0 {
            feature.distance
        } else {
            -feature.distance
        }
    }

    /// Splits every edge longer than `max_edge_length` into equal pieces
    pub fn subdivide_edges(&mut self, max_edge_length: f32) {
        if max_edge_length <= 0.0 || self.points.len() < 2 {
            return;
        }

        let mut result = Vec::with_capacity(self.points.len());
        for i in 0..self.points.len() {
            let start = self.points[i];
            let edge = self.get_edge(i);
            let pieces = (edge.length() / max_edge_length).ceil().max(1.0) as usize;

            result.push(start);
            for piece in 1..pieces {
                result.push(start + edge * (piece as f32 / pieces as f32));
            }
        }

        self.points = result;
    }
}
