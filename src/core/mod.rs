pub mod world;
pub mod config;
pub mod storage;
pub mod events;

pub use self::world::CollisionWorld;
pub use self::config::{SimulationConfig, BroadPhaseKind, NarrowPhaseKind};
pub use self::storage::{Arena, BodyStorage, GeomStorage, Handle, Storage};
pub use self::events::{EventQueue, CollisionEvent, CollisionEventType, GeomEvent, GeomEventType};

use std::fmt;

/// A unique identifier for a body in the collision world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

/// A unique identifier for a geometry in the collision world.
///
/// Handles order by slot index, then generation. Pair bookkeeping and
/// contact ids rely on that order being total and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeomHandle {
    index: u32,
    generation: u32,
}

impl Handle for BodyHandle {
    #[inline]
    fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    fn generation(&self) -> u32 {
        self.generation
    }
}

impl Handle for GeomHandle {
    #[inline]
    fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for GeomHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "geom#{}v{}", self.index, self.generation)
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "body#{}v{}", self.index, self.generation)
    }
}
