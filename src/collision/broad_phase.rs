use tracing::debug;

use crate::collision::{
    can_collide, Geom, GeomPair, GeomRef, SelectiveSweepCollider, SpatialHashCollider, SweepAndPruneCollider,
};
use crate::core::{BroadPhaseKind, GeomHandle, GeomStorage, SimulationConfig};
use crate::math::Aabb;

/// User callback offered every pair that passed all broad-phase filters.
/// Returning false vetoes the pair. Geometries come in pair order.
pub type BroadPhaseHandler<'a> = dyn FnMut(GeomPair, &Geom, &Geom) -> bool + 'a;

/// Trait for broad-phase collision detection algorithms.
///
/// Every implementation reports the same pairs for the same scene: the
/// pairs passing [`can_collide`] whose AABBs overlap, minus those the
/// handler vetoes. Sweep and prune widens each extent by a small tolerance.
pub trait BroadPhase {
    /// Which collider this is
    fn kind(&self) -> BroadPhaseKind;

    /// Registers a geometry that joined the world
    fn add(&mut self, _handle: GeomHandle, _geom: &Geom) {}

    /// Forgets geometries removed since the last step. Must run before
    /// their handles go stale.
    fn process_removed_geoms(&mut self, removed: &[GeomHandle]);

    /// Forgets geometries disposed since the last step
    fn process_disposed_geoms(&mut self, disposed: &[GeomHandle]) {
        self.process_removed_geoms(disposed);
    }

    /// Computes this step's candidate pairs, sorted by handle
    fn update(&mut self, geoms: &GeomStorage<Geom>, handler: Option<&mut BroadPhaseHandler<'_>>) -> Vec<GeomPair>;
}

/// Builds the collider selected by `config`
pub fn new_broad_phase(config: &SimulationConfig) -> Box<dyn BroadPhase> {
    debug!(kind = ?config.broad_phase, "creating broad phase");
    match config.broad_phase {
        BroadPhaseKind::BruteForce => Box::new(BruteForceCollider::new()),
        BroadPhaseKind::SpatialHash => Box::new(SpatialHashCollider::new(
            config.spatial_hash_cell_size,
            config.spatial_hash_auto_adjust,
        )),
        BroadPhaseKind::SweepAndPrune => Box::new(SweepAndPruneCollider::new()),
        BroadPhaseKind::SelectiveSweep => Box::new(SelectiveSweepCollider::new()),
    }
}

/// Applies the pair filters and then the handler to a pair whose bounds
/// are already known to overlap
pub(crate) fn accept_pair(
    (handle_a, a): GeomRef<'_>,
    (handle_b, b): GeomRef<'_>,
    handler: &mut Option<&mut BroadPhaseHandler<'_>>,
) -> Option<GeomPair> {
    if !can_collide(handle_a, a, handle_b, b) {
        return None;
    }

    let pair = GeomPair::new(handle_a, handle_b);
    if let Some(handler) = handler.as_deref_mut() {
        let (first, second) = if pair.geom_a == handle_a { (a, b) } else { (b, a) };
        if !handler(pair, first, second) {
            return None;
        }
    }

    Some(pair)
}

/// Tests every pair every step. The reference the other colliders are
/// checked against.
#[derive(Debug, Default, Clone)]
pub struct BruteForceCollider;

impl BruteForceCollider {
    pub fn new() -> Self {
        Self
    }
}

impl BroadPhase for BruteForceCollider {
    fn kind(&self) -> BroadPhaseKind {
        BroadPhaseKind::BruteForce
    }

    fn process_removed_geoms(&mut self, _removed: &[GeomHandle]) {}

    fn update(
        &mut self,
        geoms: &GeomStorage<Geom>,
        mut handler: Option<&mut BroadPhaseHandler<'_>>,
    ) -> Vec<GeomPair> {
        let entries: Vec<(GeomHandle, &Geom)> = geoms.iter().collect();
        let mut pairs = Vec::new();

        for i in 0..entries.len() {
            let (handle_a, geom_a) = entries[i];

            for &(handle_b, geom_b) in &entries[i + 1..] {
                if !Aabb::intersect(geom_a.aabb(), geom_b.aabb()) {
                    continue;
                }
                if let Some(pair) = accept_pair((handle_a, geom_a), (handle_b, geom_b), &mut handler) {
                    pairs.push(pair);
                }
            }
        }

        pairs.sort_unstable();
        pairs
    }
}
