use crate::collision::{Contact, ContactId, ContactList, Geom, GeomRef, NarrowPhase};
use crate::core::{GeomHandle, NarrowPhaseKind};
use crate::math::Vector2;
use crate::shapes::Vertices;

/// Overlaps smaller than this produce no contacts
const MIN_OVERLAP: f32 = 0.001;

/// Outcome of a separating-axis test between two convex polygons
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolygonCollisionResult {
    /// No separating axis was found
    pub intersect: bool,

    /// Axis of least overlap, pointing from the second polygon toward the
    /// first. Zero when the polygons are separated.
    pub axis: Vector2,

    /// Overlap along `axis`, as a positive depth
    pub overlap: f32,

    /// `axis * overlap`: moving the first polygon by this separates them
    pub minimum_translation_vector: Vector2,
}

/// Projects both polygons onto every edge normal of both. Returns as soon as
/// a separating axis is found.
pub fn polygon_collision(a: &Vertices, b: &Vertices) -> PolygonCollisionResult {
    let mut result = PolygonCollisionResult::default();
    if a.len() < 2 || b.len() < 2 {
        return result;
    }

    let mut min_interval = f32::INFINITY;
    let mut translation_axis = Vector2::ZERO;

    let edge_count = a.len() + b.len();
    for edge_index in 0..edge_count {
        let edge = if edge_index < a.len() {
            a.get_edge(edge_index)
        } else {
            b.get_edge(edge_index - a.len())
        };

        let axis = edge.perpendicular().normalize();
        if axis == Vector2::ZERO {
            continue;
        }

        let (min_a, max_a) = a.project_to_axis(axis);
        let (min_b, max_b) = b.project_to_axis(axis);

        let distance = interval_distance(min_a, max_a, min_b, max_b);
        if distance > 0.0 {
            return result;
        }

        let distance = distance.abs();
        if distance < min_interval {
            min_interval = distance;
            translation_axis = axis;
        }
    }

    if !min_interval.is_finite() {
        return result;
    }

    let d = a.get_centroid() - b.get_centroid();
    if d.dot(&translation_axis) < 0.0 {
        translation_axis = -translation_axis;
    }

    result.intersect = true;
    result.axis = translation_axis;
    result.overlap = min_interval;
    result.minimum_translation_vector = translation_axis * min_interval;
    result
}

/// Gap between two projected intervals; negative when they overlap
#[inline]
pub fn interval_distance(min_a: f32, max_a: f32, min_b: f32, max_b: f32) -> f32 {
    if min_a < min_b {
        min_b - max_a
    } else {
        min_a - max_b
    }
}

/// Separating-axis narrow phase for convex polygons.
///
/// Every contact of a pair shares the pair's normal and depth. Stateless, so
/// clones and removals need no bookkeeping.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sat;

impl Sat {
    pub fn new() -> Self {
        Self
    }

    /// Emits a contact for each vertex of `probe` strictly inside `target`
    fn push_contained(
        (probe_handle, probe): GeomRef<'_>,
        (target_handle, target): GeomRef<'_>,
        normal: Vector2,
        separation: f32,
        contacts: &mut ContactList,
        max_contacts: usize,
    ) {
        if probe.is_body_static() {
            return;
        }

        for (index, vertex) in probe.world_vertices().iter().enumerate() {
            if contacts.len() >= max_contacts {
                return;
            }
            if target.world_vertices().contains_point(*vertex) {
                contacts.push(Contact::new(
                    *vertex,
                    normal,
                    separation,
                    ContactId::new(probe_handle, index, target_handle),
                ));
            }
        }
    }
}

impl NarrowPhase for Sat {
    fn kind(&self) -> NarrowPhaseKind {
        NarrowPhaseKind::Sat
    }

    fn collide(&mut self, a: GeomRef<'_>, b: GeomRef<'_>, contacts: &mut ContactList, max_contacts: usize) {
        let result = polygon_collision(a.1.world_vertices(), b.1.world_vertices());
        if !result.intersect || result.overlap < MIN_OVERLAP {
            return;
        }

        // the translation points b -> a; contact normals point a -> b
        let normal = (-result.minimum_translation_vector).normalize();
        let separation = -result.overlap;

        Self::push_contained(a, b, normal, separation, contacts, max_contacts);
        Self::push_contained(b, a, normal, separation, contacts, max_contacts);
    }

    fn intersect(&mut self, _handle: GeomHandle, geom: &Geom, point: Vector2) -> bool {
        geom.world_vertices().contains_point(point)
    }
}
