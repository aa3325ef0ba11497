//! Segment intersection queries against polygons, bounding boxes and
//! geometries.

use crate::collision::Geom;
use crate::core::{GeomHandle, GeomStorage};
use crate::math::{Aabb, Vector2};
use crate::shapes::Vertices;

/// Denominators at or below this are treated as parallel lines
pub const LINE_INTERSECT_EPSILON: f32 = 1e-5;

/// Intersects line `a1 -> a2` with line `b1 -> b2`.
///
/// With `first_is_segment` / `second_is_segment` set, the hit must lie
/// within that segment. Nearly parallel lines never intersect, and a hit at
/// the start of both lines is discarded.
pub fn line_intersect(
    a1: Vector2,
    a2: Vector2,
    b1: Vector2,
    b2: Vector2,
    first_is_segment: bool,
    second_is_segment: bool,
) -> Option<Vector2> {
    let a = b2.y - b1.y;
    let b = a2.x - a1.x;
    let c = b2.x - b1.x;
    let d = a2.y - a1.y;

    let denom = a * b - c * d;
    if denom.abs() <= LINE_INTERSECT_EPSILON {
        return None;
    }

    let e = a1.y - b1.y;
    let f = a1.x - b1.x;
    let inv_denom = 1.0 / denom;

    let ua = (c * e - a * f) * inv_denom;
    if first_is_segment && !(0.0..=1.0).contains(&ua) {
        return None;
    }

    let ub = (b * e - d * f) * inv_denom;
    if second_is_segment && !(0.0..=1.0).contains(&ub) {
        return None;
    }

    if ua == 0.0 && ub == 0.0 {
        return None;
    }

    Some(Vector2::new(a1.x + ua * b, a1.y + ua * d))
}

/// Segment-segment shorthand for [`line_intersect`]
pub fn segment_intersect(a1: Vector2, a2: Vector2, b1: Vector2, b2: Vector2) -> Option<Vector2> {
    line_intersect(a1, a2, b1, b2, true, true)
}

/// Every crossing of segment `point1 -> point2` with the closed edge loop
/// of `vertices`, in edge order
pub fn line_segment_vertices_intersect(point1: Vector2, point2: Vector2, vertices: &Vertices) -> Vec<Vector2> {
    let mut points = Vec::new();
    for i in 0..vertices.len() {
        if let Some(point) = segment_intersect(vertices[i], vertices.next_vertex(i), point1, point2) {
            points.push(point);
        }
    }
    points
}

/// Every crossing of segment `point1 -> point2` with the outline of `aabb`
pub fn line_segment_aabb_intersect(point1: Vector2, point2: Vector2, aabb: &Aabb) -> Vec<Vector2> {
    let corners = aabb.corners();
    let mut points = Vec::new();
    for i in 0..corners.len() {
        let next = corners[(i + 1) % corners.len()];
        if let Some(point) = segment_intersect(corners[i], next, point1, point2) {
            points.push(point);
        }
    }
    points
}

/// Crossings with a geometry's world outline, or with its AABB when
/// `use_aabb` is set
pub fn line_segment_geom_intersect(point1: Vector2, point2: Vector2, geom: &Geom, use_aabb: bool) -> Vec<Vector2> {
    if use_aabb {
        line_segment_aabb_intersect(point1, point2, geom.aabb())
    } else {
        line_segment_vertices_intersect(point1, point2, geom.world_vertices())
    }
}

/// Casts the segment through every geometry. Returns each hit geometry with
/// its crossings, in handle order.
pub fn line_segment_all_geoms_intersect(
    point1: Vector2,
    point2: Vector2,
    geoms: &GeomStorage<Geom>,
    use_aabb: bool,
) -> Vec<(GeomHandle, Vec<Vector2>)> {
    geoms
        .iter()
        .filter_map(|(handle, geom)| {
            let points = line_segment_geom_intersect(point1, point2, geom, use_aabb);
            (!points.is_empty()).then_some((handle, points))
        })
        .collect()
}
