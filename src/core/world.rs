use std::collections::HashMap;

use tracing::{debug, trace};

use crate::bodies::Body;
use crate::collision::{
    new_broad_phase, new_narrow_phase, ray_helper, Arbiter, BroadPhase, BroadPhaseHandler, ContactList, Geom,
    GeomPair, NarrowPhase,
};
use crate::core::events::{CollisionEventType, GeomEvent, GeomEventType};
use crate::core::storage::Storage;
use crate::core::{
    BodyHandle, BodyStorage, BroadPhaseKind, CollisionEvent, EventQueue, GeomHandle, GeomStorage, NarrowPhaseKind,
    SimulationConfig,
};
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

/// Owns bodies, geometries and both collision phases, and runs the
/// detection pipeline one step at a time.
///
/// Removal and disposal of geometry is deferred to the start of the next
/// [`CollisionWorld::step`], so broad-phase state is only ever reconciled
/// between passes.
pub struct CollisionWorld {
    /// All bodies in the world
    bodies: BodyStorage<Body>,

    /// All geometries in the world
    geoms: GeomStorage<Geom>,

    /// Configuration for the pipeline
    config: SimulationConfig,

    broad_phase: Box<dyn BroadPhase>,
    narrow_phase: Box<dyn NarrowPhase>,

    /// Optional user veto for broad-phase pairs
    broad_phase_handler: Option<Box<BroadPhaseHandler<'static>>>,

    /// Geometries waiting to leave the world
    removed_geoms: Vec<GeomHandle>,
    disposed_geoms: Vec<GeomHandle>,

    /// This step's colliding pairs, sorted by pair
    arbiters: Vec<Arbiter>,

    /// Queue of pipeline events, drained by the caller
    events: EventQueue,
}

impl CollisionWorld {
    /// Creates a new world with default settings
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyStorage::new(),
            geoms: GeomStorage::new(),
            broad_phase: new_broad_phase(&config),
            narrow_phase: new_narrow_phase(&config),
            config,
            broad_phase_handler: None,
            removed_geoms: Vec::new(),
            disposed_geoms: Vec::new(),
            arbiters: Vec::new(),
            events: EventQueue::new(),
        }
    }

    /// Returns a reference to the configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Sets the per-pair contact cap used from the next step on
    pub fn set_max_contacts_to_detect(&mut self, max_contacts: usize) {
        self.config.max_contacts_to_detect = max_contacts;
    }

    pub fn broad_phase_kind(&self) -> BroadPhaseKind {
        self.broad_phase.kind()
    }

    pub fn narrow_phase_kind(&self) -> NarrowPhaseKind {
        self.narrow_phase.kind()
    }

    /// Replaces the broad phase and registers every live geometry with it
    pub fn set_broad_phase(&mut self, kind: BroadPhaseKind) {
        self.config.broad_phase = kind;
        self.broad_phase = new_broad_phase(&self.config);
        for (handle, geom) in self.geoms.iter() {
            self.broad_phase.add(handle, geom);
        }
    }

    /// Replaces the narrow phase and prepares every live geometry for it
    pub fn set_narrow_phase(&mut self, kind: NarrowPhaseKind) -> Result<()> {
        self.config.narrow_phase = kind;
        self.narrow_phase = new_narrow_phase(&self.config);
        for (handle, geom) in self.geoms.iter() {
            self.narrow_phase.prepare(handle, geom)?;
        }
        debug!(kind = ?kind, geoms = self.geoms.len(), "replaced narrow phase");
        Ok(())
    }

    /// Installs a callback that may veto any broad-phase pair
    pub fn set_broad_phase_handler<F>(&mut self, handler: F)
    where
        F: FnMut(GeomPair, &Geom, &Geom) -> bool + 'static,
    {
        self.broad_phase_handler = Some(Box::new(handler));
    }

    /// Removes the broad-phase callback
    pub fn clear_broad_phase_handler(&mut self) {
        self.broad_phase_handler = None;
    }

    /// Adds a body to the world and returns its handle
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.add(body);
        debug!(body = %handle, "added body");
        handle
    }

    /// Removes a body at once and queues removal of its geometries
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        self.bodies.get_body(handle)?;

        let attached: Vec<GeomHandle> = self.geoms_of_body(handle);
        for geom in attached {
            self.remove_geom(geom)?;
        }

        debug!(body = %handle, "removed body");
        self.bodies
            .remove(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Marks a body disposed. It and its geometries leave the world on the
    /// next step.
    pub fn dispose_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.bodies.get_body_mut(handle)?.dispose();
        Ok(())
    }

    /// Gets a reference to a body by its handle
    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a body by its handle. Pose changes reach
    /// the body's geometries on the next step.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_body_mut(handle)
    }

    /// Adds a geometry. Its body must be in the world. The narrow phase
    /// prepares it right away, so a distance grid that cannot be built is
    /// reported here.
    pub fn add_geom(&mut self, mut geom: Geom) -> Result<GeomHandle> {
        let body = self.bodies.get_body(geom.body())?;
        geom.sync_from_body(body);

        let handle = self.geoms.add(geom);
        self.prepare_or_roll_back(handle)?;

        let geom = self.geoms.get_geom(handle)?;
        self.broad_phase.add(handle, geom);

        self.events.add_geom_event(GeomEvent {
            event_type: GeomEventType::Added,
            geom: handle,
        });
        debug!(geom = %handle, body = %geom.body(), vertices = geom.local_vertices().len(), "added geom");
        Ok(handle)
    }

    /// Queues a geometry for removal at the start of the next step
    pub fn remove_geom(&mut self, handle: GeomHandle) -> Result<()> {
        self.geoms.get_geom(handle)?;
        if !self.removed_geoms.contains(&handle) && !self.disposed_geoms.contains(&handle) {
            self.removed_geoms.push(handle);
        }
        Ok(())
    }

    /// Disposes a geometry; it leaves the world at the start of the next
    /// step. Disposing twice is a no-op.
    pub fn dispose_geom(&mut self, handle: GeomHandle) -> Result<()> {
        if self.geoms.get_geom_mut(handle)?.dispose() {
            self.removed_geoms.retain(|&h| h != handle);
            self.disposed_geoms.push(handle);
        }
        Ok(())
    }

    /// Adds a copy of a geometry on the same body. The copy shares the
    /// original's distance grid.
    pub fn clone_geom(&mut self, handle: GeomHandle) -> Result<GeomHandle> {
        let clone = self.geoms.get_geom(handle)?.clone_geom();
        self.insert_clone(handle, clone)
    }

    /// Adds a copy of a geometry attached to another body
    pub fn clone_geom_onto(&mut self, handle: GeomHandle, body: BodyHandle) -> Result<GeomHandle> {
        let body_value = self.bodies.get_body(body)?;
        let clone = self.geoms.get_geom(handle)?.clone_onto(body, body_value);
        self.insert_clone(handle, clone)
    }

    fn insert_clone(&mut self, source: GeomHandle, clone: Geom) -> Result<GeomHandle> {
        let handle = self.geoms.add(clone);
        self.narrow_phase.copy(source, handle);
        self.prepare_or_roll_back(handle)?;

        let geom = self.geoms.get_geom(handle)?;
        self.broad_phase.add(handle, geom);

        self.events.add_geom_event(GeomEvent {
            event_type: GeomEventType::Added,
            geom: handle,
        });
        debug!(source = %source, geom = %handle, "cloned geom");
        Ok(handle)
    }

    /// Prepares a freshly stored geometry, dropping it again on failure
    fn prepare_or_roll_back(&mut self, handle: GeomHandle) -> Result<()> {
        let prepared = self.narrow_phase.prepare(handle, self.geoms.get_geom(handle)?);
        if prepared.is_err() {
            self.narrow_phase.remove(handle);
            self.geoms.remove(handle);
        }
        prepared
    }

    /// Moves a geometry to another body
    pub fn set_geom_body(&mut self, handle: GeomHandle, body: BodyHandle) -> Result<()> {
        let body_value = self.bodies.get_body(body)?;
        self.geoms.get_geom_mut(handle)?.set_body(body, body_value);
        Ok(())
    }

    /// Gets a reference to a geometry by its handle
    pub fn geom(&self, handle: GeomHandle) -> Result<&Geom> {
        self.geoms.get_geom(handle)
    }

    /// Gets a mutable reference to a geometry by its handle
    pub fn geom_mut(&mut self, handle: GeomHandle) -> Result<&mut Geom> {
        self.geoms.get_geom_mut(handle)
    }

    /// All live geometries in handle order
    pub fn geoms(&self) -> impl Iterator<Item = (GeomHandle, &Geom)> + '_ {
        self.geoms.iter()
    }

    /// All live bodies in handle order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    /// Geometries attached to `body`
    pub fn geoms_of_body(&self, body: BodyHandle) -> Vec<GeomHandle> {
        self.geoms
            .iter()
            .filter(|(_, geom)| geom.body() == body)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of geometries in the world
    pub fn geom_count(&self) -> usize {
        self.geoms.len()
    }

    /// Runs one detection step: reconcile removals, sync geometry to bodies,
    /// find candidate pairs, generate contacts and emit events.
    pub fn step(&mut self) {
        self.dispose_geoms_of_disposed_bodies();
        self.process_removals();
        self.sync_geoms();

        let pairs = self
            .broad_phase
            .update(&self.geoms, self.broad_phase_handler.as_deref_mut());

        let mut previous: HashMap<GeomPair, Arbiter> = std::mem::take(&mut self.arbiters)
            .into_iter()
            .map(|arbiter| (arbiter.pair, arbiter))
            .collect();

        let max_contacts = self.config.max_contacts_to_detect;
        let mut contact_total = 0;

        for pair in &pairs {
            let (Some(geom_a), Some(geom_b)) = (self.geoms.get(pair.geom_a), self.geoms.get(pair.geom_b)) else {
                continue;
            };

            let mut contacts = ContactList::new();
            self.narrow_phase
                .collide((pair.geom_a, geom_a), (pair.geom_b, geom_b), &mut contacts, max_contacts);
            if contacts.is_empty() {
                continue;
            }
            contact_total += contacts.len();

            let arbiter = match previous.remove(pair) {
                Some(mut arbiter) => {
                    arbiter.update(contacts);
                    arbiter
                }
                None => {
                    self.events.add_collision_event(CollisionEvent {
                        event_type: CollisionEventType::Begin,
                        pair: *pair,
                        contact_count: contacts.len(),
                    });
                    Arbiter::new(*pair, geom_a, geom_b, contacts)
                }
            };
            self.arbiters.push(arbiter);
        }

        let mut ended: Vec<GeomPair> = previous.into_keys().collect();
        ended.sort_unstable();
        for pair in ended {
            self.events.add_collision_event(CollisionEvent {
                event_type: CollisionEventType::End,
                pair,
                contact_count: 0,
            });
        }

        trace!(
            geoms = self.geoms.len(),
            pairs = pairs.len(),
            arbiters = self.arbiters.len(),
            contacts = contact_total,
            "collision step"
        );
    }

    fn dispose_geoms_of_disposed_bodies(&mut self) {
        let disposed: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_disposed())
            .map(|(handle, _)| handle)
            .collect();

        for body in disposed {
            for geom in self.geoms_of_body(body) {
                if let Ok(geom_value) = self.geoms.get_geom_mut(geom) {
                    if geom_value.dispose() {
                        self.removed_geoms.retain(|&h| h != geom);
                        self.disposed_geoms.push(geom);
                    }
                }
            }
            self.bodies.remove(body);
            debug!(body = %body, "disposed body");
        }
    }

    fn process_removals(&mut self) {
        let removed = std::mem::take(&mut self.removed_geoms);
        let disposed = std::mem::take(&mut self.disposed_geoms);
        if removed.is_empty() && disposed.is_empty() {
            return;
        }

        self.broad_phase.process_removed_geoms(&removed);
        self.broad_phase.process_disposed_geoms(&disposed);

        for (handles, event_type) in [(removed, GeomEventType::Removed), (disposed, GeomEventType::Disposed)] {
            for handle in handles {
                self.narrow_phase.remove(handle);
                if self.geoms.remove(handle).is_some() {
                    self.events.add_geom_event(GeomEvent { event_type, geom: handle });
                    debug!(geom = %handle, event = ?event_type, "geom left the world");
                }
            }
        }
    }

    fn sync_geoms(&mut self) {
        for (_, geom) in self.geoms.iter_mut() {
            if let Some(body) = self.bodies.get(geom.body()) {
                geom.sync_from_body(body);
            }
        }
    }

    /// Arbiters of the pairs that produced contacts in the last step
    pub fn arbiters(&self) -> &[Arbiter] {
        &self.arbiters
    }

    /// The arbiter of a pair, if it collided in the last step
    pub fn arbiter(&self, geom_a: GeomHandle, geom_b: GeomHandle) -> Option<&Arbiter> {
        let pair = GeomPair::new(geom_a, geom_b);
        self.arbiters.iter().find(|arbiter| arbiter.pair == pair)
    }

    /// First geometry, in handle order, containing a world point
    pub fn collide_point(&mut self, point: Vector2) -> Option<GeomHandle> {
        let narrow_phase = self.narrow_phase.as_mut();
        self.geoms
            .iter()
            .find(|(handle, geom)| geom.collide_point(*handle, point, &mut *narrow_phase))
            .map(|(handle, _)| handle)
    }

    /// Every geometry containing a world point
    pub fn collide_all(&mut self, point: Vector2) -> Vec<GeomHandle> {
        let narrow_phase = self.narrow_phase.as_mut();
        self.geoms
            .iter()
            .filter(|(handle, geom)| geom.collide_point(*handle, point, &mut *narrow_phase))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Whether a geometry contains a world point
    pub fn geom_contains_point(&mut self, handle: GeomHandle, point: Vector2) -> Result<bool> {
        let geom = self.geoms.get_geom(handle)?;
        Ok(geom.collide_point(handle, point, self.narrow_phase.as_mut()))
    }

    /// Whether two geometries currently produce at least one contact
    pub fn geoms_collide(&mut self, geom_a: GeomHandle, geom_b: GeomHandle) -> Result<bool> {
        let a = self.geoms.get_geom(geom_a)?;
        let b = self.geoms.get_geom(geom_b)?;
        Ok(a.collide_geom(geom_a, geom_b, b, self.narrow_phase.as_mut()))
    }

    /// Casts a segment through every geometry, returning each hit with its
    /// crossings. With `use_aabb` the bounding boxes stand in for the
    /// outlines.
    pub fn line_segment_intersect(
        &self,
        point1: Vector2,
        point2: Vector2,
        use_aabb: bool,
    ) -> Vec<(GeomHandle, Vec<Vector2>)> {
        ray_helper::line_segment_all_geoms_intersect(point1, point2, &self.geoms, use_aabb)
    }

    /// Returns a reference to the event queue
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Removes everything from the world
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.geoms.clear();
        self.broad_phase = new_broad_phase(&self.config);
        self.narrow_phase = new_narrow_phase(&self.config);
        self.removed_geoms.clear();
        self.disposed_geoms.clear();
        self.arbiters.clear();
        self.events.clear();
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::factory;

    fn world_with_boxes(positions: &[(f32, f32)]) -> (CollisionWorld, Vec<GeomHandle>) {
        let mut world = CollisionWorld::new();
        let mut handles = Vec::new();
        for &(x, y) in positions {
            let body = world.add_body(Body::new_dynamic(Vector2::new(x, y)));
            let geom = Geom::new(body, world.body(body).unwrap(), factory::rectangle(1.0, 1.0), 0.0);
            handles.push(world.add_geom(geom).unwrap());
        }
        (world, handles)
    }

    #[test]
    fn removal_is_deferred_to_step() {
        let (mut world, handles) = world_with_boxes(&[(0.0, 0.0), (0.5, 0.0)]);
        world.remove_geom(handles[1]).unwrap();
        assert_eq!(world.geom_count(), 2);

        world.step();
        assert_eq!(world.geom_count(), 1);
        assert!(world.geom(handles[1]).is_err());
        assert!(world.arbiters().is_empty());
    }

    #[test]
    fn dispose_is_idempotent() {
        let (mut world, handles) = world_with_boxes(&[(0.0, 0.0)]);
        world.dispose_geom(handles[0]).unwrap();
        world.dispose_geom(handles[0]).unwrap();
        world.step();

        let disposed = world.get_events().get_geom_events_of_type(GeomEventType::Disposed);
        assert_eq!(disposed.len(), 1);
    }

    #[test]
    fn stale_handles_are_errors() {
        let (mut world, handles) = world_with_boxes(&[(0.0, 0.0)]);
        world.remove_geom(handles[0]).unwrap();
        world.step();
        assert!(world.geom_mut(handles[0]).is_err());
        assert!(world.remove_geom(handles[0]).is_err());
    }

    #[test]
    fn disposing_a_body_disposes_its_geoms() {
        let (mut world, handles) = world_with_boxes(&[(0.0, 0.0), (5.0, 0.0)]);
        let body = world.geom(handles[0]).unwrap().body();
        world.dispose_body(body).unwrap();
        world.step();

        assert_eq!(world.body_count(), 1);
        assert_eq!(world.geom_count(), 1);
        assert!(world.geom(handles[1]).is_ok());
    }
}
