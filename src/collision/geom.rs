use std::cell::Cell;
use std::collections::HashSet;

use nalgebra as na;

use crate::bodies::Body;
use crate::collision::{CollisionCategories, ContactList, Feature, NarrowPhase, DEFAULT_COLLISION_GROUP};
use crate::core::{BodyHandle, GeomHandle};
use crate::math::{self, Aabb, Transform2, Vector2};
use crate::shapes::Vertices;

/// The fundamental collidable unit: a polygon outline bound to a body.
///
/// A geometry keeps its shape in local space and a world-space copy plus
/// AABB that follow the body. The world refreshes them once per step with
/// [`Geom::sync_from_body`], so they stay current for the broad phase.
#[derive(Debug, Clone)]
pub struct Geom {
    body: BodyHandle,

    // Snapshot of the owning body taken at the last sync
    body_static: bool,
    body_enabled: bool,

    local_vertices: Vertices,
    world_vertices: Vertices,
    aabb: Aabb,

    offset: Vector2,
    rotation_offset: f32,

    /// Shape-to-world transform: body pose composed with the local offset
    transform: Transform2,

    /// Memoised inverse of `transform`, cleared on every update
    inverse: Cell<Option<na::Isometry2<f32>>>,

    /// Distance grid cell size; 0 derives it from the shape's AABB
    collision_grid_size: f32,

    collision_categories: CollisionCategories,
    collides_with: CollisionCategories,
    collision_group: u32,
    collision_enabled: bool,
    collision_response_enabled: bool,
    is_sensor: bool,

    friction_coefficient: f32,
    restitution_coefficient: f32,

    ignored: HashSet<GeomHandle>,

    /// Free-form user data
    pub tag: u64,

    is_disposed: bool,
}

impl Geom {
    /// Creates a geometry on `body` with no offset. The outline is forced
    /// into counter-clockwise order and synced to the body's pose.
    pub fn new(body_handle: BodyHandle, body: &Body, vertices: Vertices, collision_grid_size: f32) -> Self {
        Self::with_offset(body_handle, body, vertices, Vector2::ZERO, 0.0, collision_grid_size)
    }

    /// Creates a geometry placed at `offset` and rotated by
    /// `rotation_offset` relative to its body.
    pub fn with_offset(
        body_handle: BodyHandle,
        body: &Body,
        vertices: Vertices,
        offset: Vector2,
        rotation_offset: f32,
        collision_grid_size: f32,
    ) -> Self {
        let mut geom = Self {
            body: body_handle,
            body_static: body.is_static(),
            body_enabled: body.is_enabled(),
            local_vertices: Vertices::new(),
            world_vertices: Vertices::new(),
            aabb: Aabb::default(),
            offset,
            rotation_offset,
            transform: Transform2::identity(),
            inverse: Cell::new(None),
            collision_grid_size,
            collision_categories: CollisionCategories::default(),
            collides_with: CollisionCategories::ALL,
            collision_group: DEFAULT_COLLISION_GROUP,
            collision_enabled: true,
            collision_response_enabled: true,
            is_sensor: false,
            friction_coefficient: 0.0,
            restitution_coefficient: 0.0,
            ignored: HashSet::new(),
            tag: 0,
            is_disposed: false,
        };

        geom.set_vertices(vertices);
        geom.sync_from_body(body);
        geom
    }

    /// Replaces the shape. The outline is forced counter-clockwise and both
    /// vertex sets and the AABB are reset to it; the next update moves them
    /// back into world space.
    pub fn set_vertices(&mut self, mut vertices: Vertices) {
        vertices.force_counter_clockwise_order();
        self.local_vertices = vertices.clone();
        self.world_vertices = vertices;
        self.aabb.update(&self.world_vertices);
    }

    /// Moves the geometry to another body and syncs to its pose
    pub fn set_body(&mut self, body_handle: BodyHandle, body: &Body) {
        self.body = body_handle;
        self.sync_from_body(body);
    }

    /// Pulls the body's pose and flags into this geometry
    pub fn sync_from_body(&mut self, body: &Body) {
        self.body_static = body.is_static();
        self.body_enabled = body.is_enabled();
        self.update(body.get_position(), body.get_rotation());
    }

    /// Recomputes world vertices and the AABB for the given body pose
    pub fn update(&mut self, position: Vector2, rotation: f32) {
        let body_transform = Transform2::new(position, rotation);
        let local = Transform2::new(self.offset, self.rotation_offset);
        self.transform = body_transform.combine(&local);
        self.inverse.set(None);

        let iso = self.transform.to_isometry();
        for (world, local) in self.world_vertices.iter_mut().zip(self.local_vertices.iter()) {
            *world = math::transform_point(&iso, *local);
        }

        self.aabb.update(&self.world_vertices);
    }

    /// Inverse of the current shape-to-world transform, computed on first
    /// use after each update
    pub fn inverse_transform(&self) -> na::Isometry2<f32> {
        if let Some(inverse) = self.inverse.get() {
            return inverse;
        }

        let inverse = self.transform.to_isometry().inverse();
        self.inverse.set(Some(inverse));
        inverse
    }

    /// Maps a world point into shape space
    pub fn transform_to_local(&self, point: Vector2) -> Vector2 {
        math::transform_point(&self.inverse_transform(), point)
    }

    /// Rotates a shape-space normal into world space
    pub fn transform_normal_to_world(&self, normal: Vector2) -> Vector2 {
        self.transform.transform_vector(normal)
    }

    /// Signed distance from a world point to the outline: positive outside,
    /// negative inside
    pub fn get_nearest_distance(&self, point: Vector2) -> f32 {
        self.world_vertices.get_nearest_distance(point)
    }

    /// Nearest feature of edge `edge_index` to a world point
    pub fn get_nearest_feature(&self, point: Vector2, edge_index: usize) -> Feature {
        self.world_vertices.get_nearest_feature(point, edge_index)
    }

    /// Exact point test: a cheap AABB check, then the narrow phase
    pub fn collide_point(&self, handle: GeomHandle, point: Vector2, narrow_phase: &mut dyn NarrowPhase) -> bool {
        self.aabb.contains(point) && narrow_phase.intersect(handle, self, point)
    }

    /// Exact shape test against `other`: AABB overlap, then at least one
    /// narrow-phase contact
    pub fn collide_geom(
        &self,
        handle: GeomHandle,
        other_handle: GeomHandle,
        other: &Geom,
        narrow_phase: &mut dyn NarrowPhase,
    ) -> bool {
        if !Aabb::intersect(&self.aabb, &other.aabb) {
            return false;
        }

        let mut contacts = ContactList::new();
        narrow_phase.collide((handle, self), (other_handle, other), &mut contacts, 1);
        !contacts.is_empty()
    }

    /// Stops this geometry from pairing with `other`
    pub fn ignore_collision_with(&mut self, other: GeomHandle) {
        self.ignored.insert(other);
    }

    /// Undoes [`Geom::ignore_collision_with`]
    pub fn restore_collision_with(&mut self, other: GeomHandle) {
        self.ignored.remove(&other);
    }

    pub fn is_geometry_ignored(&self, other: GeomHandle) -> bool {
        self.ignored.contains(&other)
    }

    /// A copy with the same shape, offsets and collision policy, without the
    /// ignore list or the disposed flag
    pub fn clone_geom(&self) -> Self {
        let mut clone = self.clone();
        clone.ignored.clear();
        clone.is_disposed = false;
        clone
    }

    /// Like [`Geom::clone_geom`], but attached to another body
    pub fn clone_onto(&self, body_handle: BodyHandle, body: &Body) -> Self {
        let mut clone = self.clone_geom();
        clone.set_body(body_handle, body);
        clone
    }

    /// Marks the geometry disposed. Returns false if it already was, so
    /// cleanup runs once.
    pub fn dispose(&mut self) -> bool {
        if self.is_disposed {
            return false;
        }
        self.is_disposed = true;
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.is_disposed
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn is_body_static(&self) -> bool {
        self.body_static
    }

    pub fn is_body_enabled(&self) -> bool {
        self.body_enabled
    }

    pub fn local_vertices(&self) -> &Vertices {
        &self.local_vertices
    }

    pub fn world_vertices(&self) -> &Vertices {
        &self.world_vertices
    }

    /// World-space bounding box as of the last update
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn transform(&self) -> Transform2 {
        self.transform
    }

    pub fn position(&self) -> Vector2 {
        self.transform.position
    }

    pub fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    pub fn rotation_offset(&self) -> f32 {
        self.rotation_offset
    }

    pub fn collision_grid_size(&self) -> f32 {
        self.collision_grid_size
    }

    pub fn set_collision_grid_size(&mut self, size: f32) {
        self.collision_grid_size = size;
    }

    pub fn collision_categories(&self) -> CollisionCategories {
        self.collision_categories
    }

    pub fn set_collision_categories(&mut self, categories: CollisionCategories) {
        self.collision_categories = categories;
    }

    pub fn collides_with(&self) -> CollisionCategories {
        self.collides_with
    }

    pub fn set_collides_with(&mut self, mask: CollisionCategories) {
        self.collides_with = mask;
    }

    pub fn collision_group(&self) -> u32 {
        self.collision_group
    }

    /// Geometries sharing a non-zero group never collide
    pub fn set_collision_group(&mut self, group: u32) {
        self.collision_group = group;
    }

    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    pub fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision_enabled = enabled;
    }

    pub fn collision_response_enabled(&self) -> bool {
        self.collision_response_enabled
    }

    pub fn set_collision_response_enabled(&mut self, enabled: bool) {
        self.collision_response_enabled = enabled;
    }

    pub fn is_sensor(&self) -> bool {
        self.is_sensor
    }

    /// Sensors detect overlap but their arbiters carry no response
    pub fn set_sensor(&mut self, is_sensor: bool) {
        self.is_sensor = is_sensor;
    }

    pub fn friction_coefficient(&self) -> f32 {
        self.friction_coefficient
    }

    pub fn set_friction_coefficient(&mut self, friction: f32) {
        self.friction_coefficient = friction;
    }

    pub fn restitution_coefficient(&self) -> f32 {
        self.restitution_coefficient
    }

    pub fn set_restitution_coefficient(&mut self, restitution: f32) {
        self.restitution_coefficient = restitution;
    }
}
