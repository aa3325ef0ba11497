mod collision_pair;
mod collision_filter;
mod contact;
mod geom;
mod arbiter;
mod broad_phase;
mod spatial_hash;
mod sweep_and_prune;
mod selective_sweep;
mod narrow_phase;
mod distance_grid;
mod sat;
pub mod ray_helper;

pub use self::collision_pair::GeomPair;
pub use self::collision_filter::{can_collide, categories_match, CollisionCategories, DEFAULT_COLLISION_GROUP};
pub use self::contact::{Contact, ContactId, ContactList, Feature};
pub use self::geom::Geom;
pub use self::arbiter::Arbiter;
pub use self::broad_phase::{new_broad_phase, BroadPhase, BroadPhaseHandler, BruteForceCollider};
pub use self::spatial_hash::SpatialHashCollider;
pub use self::sweep_and_prune::{SweepAndPruneCollider, SWEEP_TOLERANCE};
pub use self::selective_sweep::SelectiveSweepCollider;
pub use self::narrow_phase::{new_narrow_phase, GeomRef, NarrowPhase};
pub use self::distance_grid::{DistanceGrid, DistanceGridData};
pub use self::sat::{interval_distance, polygon_collision, PolygonCollisionResult, Sat};
