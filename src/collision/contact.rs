use crate::core::GeomHandle;
use crate::math::Vector2;

/// Nearest-boundary information for a probed point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Feature {
    /// Nearest point on the boundary, or the probed point for grid lookups
    pub position: Vector2,

    /// Outward normal at that point
    pub normal: Vector2,

    /// Distance to the boundary; negative means inside
    pub distance: f32,
}

impl Feature {
    pub fn new(position: Vector2, normal: Vector2, distance: f32) -> Self {
        Self { position, normal, distance }
    }
}

/// Identifies a contact across steps so the solver can warm-start it: the
/// geometry whose vertex penetrated, that vertex, and the penetrated
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId {
    pub geom_a: GeomHandle,
    pub vertex_index: usize,
    pub geom_b: GeomHandle,
}

impl ContactId {
    pub fn new(geom_a: GeomHandle, vertex_index: usize, geom_b: GeomHandle) -> Self {
        Self { geom_a, vertex_index, geom_b }
    }
}

/// A single point of interpenetration between two geometries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// World position of the contact
    pub position: Vector2,

    /// World normal, pointing from the first geometry of the pair toward the
    /// second
    pub normal: Vector2,

    /// Penetration depth; negative means penetrating
    pub separation: f32,

    /// Stable id for matching contacts across steps
    pub id: ContactId,

    // Solver scratch. Always zero when the narrow phase creates a contact.
    pub normal_impulse: f32,
    pub tangent_impulse: f32,
    pub normal_impulse_bias: f32,
    pub mass_normal: f32,
    pub mass_tangent: f32,
    pub bounce_velocity: f32,
}

impl Contact {
    /// Creates a contact with zeroed solver scratch
    pub fn new(position: Vector2, normal: Vector2, separation: f32, id: ContactId) -> Self {
        Self {
            position,
            normal,
            separation,
            id,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
            normal_impulse_bias: 0.0,
            mass_normal: 0.0,
            mass_tangent: 0.0,
            bounce_velocity: 0.0,
        }
    }
}

/// Contacts produced for one pair in one step
pub type ContactList = Vec<Contact>;
