use crate::core::GeomHandle;
use crate::collision::GeomPair;
use std::collections::VecDeque;

/// Types of collision events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEventType {
    /// The pair produced contacts this step but not the previous one
    Begin,

    /// The pair produced contacts the previous step but not this one
    End,
}

/// A collision event between two geometries
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// The type of collision event
    pub event_type: CollisionEventType,

    /// The colliding pair, ordered by handle
    pub pair: GeomPair,

    /// Number of contacts this step (0 for `End`)
    pub contact_count: usize,
}

/// Types of geometry lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomEventType {
    /// A geometry has been added to the world
    Added,

    /// A geometry has been removed from the world
    Removed,

    /// A geometry has been disposed and its slot released
    Disposed,
}

/// An event related to a single geometry
#[derive(Debug, Clone, PartialEq)]
pub struct GeomEvent {
    /// The type of geometry event
    pub event_type: GeomEventType,

    /// The geometry that the event refers to
    pub geom: GeomHandle,
}

/// A queue of collision pipeline events
#[derive(Debug, Default)]
pub struct EventQueue {
    /// Collision events
    collision_events: VecDeque<CollisionEvent>,

    /// Geometry events
    geom_events: VecDeque<GeomEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collision event to the queue
    pub fn add_collision_event(&mut self, event: CollisionEvent) {
        self.collision_events.push_back(event);
    }

    /// Adds a geometry event to the queue
    pub fn add_geom_event(&mut self, event: GeomEvent) {
        self.geom_events.push_back(event);
    }

    /// Gets the next collision event from the queue
    pub fn next_collision_event(&mut self) -> Option<CollisionEvent> {
        self.collision_events.pop_front()
    }

    /// Gets the next geometry event from the queue
    pub fn next_geom_event(&mut self) -> Option<GeomEvent> {
        self.geom_events.pop_front()
    }

    /// Returns whether there are any collision events in the queue
    pub fn has_collision_events(&self) -> bool {
        !self.collision_events.is_empty()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty() && self.geom_events.is_empty()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.collision_events.clear();
        self.geom_events.clear();
    }

    /// Gets all collision events of a specific type
    pub fn get_collision_events_of_type(&self, event_type: CollisionEventType) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all collision events involving a specific geometry
    pub fn get_collision_events_for_geom(&self, geom: GeomHandle) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.pair.contains(geom))
            .collect()
    }

    /// Gets all geometry events of a specific type
    pub fn get_geom_events_of_type(&self, event_type: GeomEventType) -> Vec<&GeomEvent> {
        self.geom_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }
}
