use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::collision::broad_phase::accept_pair;
use crate::collision::{BroadPhase, BroadPhaseHandler, Geom, GeomPair};
use crate::core::{BroadPhaseKind, GeomHandle, GeomStorage, Storage};
use crate::math::Aabb;

/// Every extent is pushed outward by this much before sorting
pub const SWEEP_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// One end of a geometry's AABB projected on an axis
#[derive(Debug, Clone, Copy)]
struct Extent {
    geom: GeomHandle,
    value: f32,
    is_min: bool,
}

impl Extent {
    fn new(geom: GeomHandle, aabb: &Aabb, axis: Axis, is_min: bool) -> Self {
        let mut extent = Self {
            geom,
            value: 0.0,
            is_min,
        };
        extent.refresh(aabb, axis);
        extent
    }

    fn refresh(&mut self, aabb: &Aabb, axis: Axis) {
        let (min, max) = match axis {
            Axis::X => (aabb.min.x, aabb.max.x),
            Axis::Y => (aabb.min.y, aabb.max.y),
        };
        self.value = if self.is_min {
            min - SWEEP_TOLERANCE
        } else {
            max + SWEEP_TOLERANCE
        };
    }

    /// Sort order: by value, a min before a max at the same value so that
    /// touching intervals overlap
    #[inline]
    fn precedes(&self, other: &Extent) -> bool {
        self.value < other.value || (self.value == other.value && self.is_min && !other.is_min)
    }
}

/// Sorted extents on one axis and the pairs whose intervals overlap there
#[derive(Debug, Clone)]
struct ExtentList {
    axis: Axis,
    extents: Vec<Extent>,
    overlaps: HashSet<GeomPair>,
}

impl ExtentList {
    fn new(axis: Axis) -> Self {
        Self {
            axis,
            extents: Vec::new(),
            overlaps: HashSet::new(),
        }
    }

    fn refresh(&mut self, geoms: &GeomStorage<Geom>) {
        let axis = self.axis;
        for extent in self.extents.iter_mut() {
            if let Some(geom) = geoms.get(extent.geom) {
                extent.refresh(geom.aabb(), axis);
            }
        }
    }

    /// Insertion sort. The lists are nearly sorted from one step to the next,
    /// so this stays close to linear. Every swap of a min and a max of two
    /// geometries starts or ends their overlap on this axis; a pair that
    /// overlaps on both axes is a collision pair.
    fn sort(&mut self, other_axis: &HashSet<GeomPair>, collision_pairs: &mut BTreeSet<GeomPair>) {
        for i in 1..self.extents.len() {
            let mut j = i;
            while j > 0 && self.extents[j].precedes(&self.extents[j - 1]) {
                let moving = self.extents[j];
                let passed = self.extents[j - 1];

                if moving.geom != passed.geom {
                    let pair = GeomPair::new(moving.geom, passed.geom);
                    if moving.is_min && !passed.is_min {
                        self.overlaps.insert(pair);
                        if other_axis.contains(&pair) {
                            collision_pairs.insert(pair);
                        }
                    } else if !moving.is_min && passed.is_min {
                        self.overlaps.remove(&pair);
                        collision_pairs.remove(&pair);
                    }
                }

                self.extents.swap(j, j - 1);
                j -= 1;
            }
        }
    }

    /// Rebuilds `overlaps` with one pass over the sorted extents
    fn rediscover(&mut self) {
        self.overlaps.clear();
        let mut active: Vec<GeomHandle> = Vec::new();

        for extent in &self.extents {
            if extent.is_min {
                for &other in &active {
                    self.overlaps.insert(GeomPair::new(other, extent.geom));
                }
                active.push(extent.geom);
            } else if let Some(position) = active.iter().position(|&h| h == extent.geom) {
                active.swap_remove(position);
            }
        }
    }
}

/// Sweep and prune over both axes with persistent, incrementally sorted
/// extent lists.
///
/// Geometries must be registered with [`BroadPhase::add`]. Removal throws
/// away all overlap state and rebuilds it from the sorted lists.
#[derive(Debug, Clone)]
pub struct SweepAndPruneCollider {
    x_extents: ExtentList,
    y_extents: ExtentList,

    /// Pairs whose extents overlap on both axes
    collision_pairs: BTreeSet<GeomPair>,
}

impl SweepAndPruneCollider {
    pub fn new() -> Self {
        Self {
            x_extents: ExtentList::new(Axis::X),
            y_extents: ExtentList::new(Axis::Y),
            collision_pairs: BTreeSet::new(),
        }
    }

    /// Number of registered geometries
    pub fn len(&self) -> usize {
        self.x_extents.extents.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.x_extents.extents.is_empty()
    }

    /// Pairs whose widened bounds currently overlap, before filtering
    pub fn overlapping_pairs(&self) -> impl Iterator<Item = &GeomPair> + '_ {
        self.collision_pairs.iter()
    }

    fn sort_lists(&mut self) {
        self.x_extents.sort(&self.y_extents.overlaps, &mut self.collision_pairs);
        self.y_extents.sort(&self.x_extents.overlaps, &mut self.collision_pairs);
    }
}

impl Default for SweepAndPruneCollider {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadPhase for SweepAndPruneCollider {
    fn kind(&self) -> BroadPhaseKind {
        BroadPhaseKind::SweepAndPrune
    }

    fn add(&mut self, handle: GeomHandle, geom: &Geom) {
        let aabb = geom.aabb();
        for list in [&mut self.x_extents, &mut self.y_extents] {
            let axis = list.axis;
            list.extents.push(Extent::new(handle, aabb, axis, true));
            list.extents.push(Extent::new(handle, aabb, axis, false));
        }
        self.sort_lists();
    }

    fn process_removed_geoms(&mut self, removed: &[GeomHandle]) {
        if removed.is_empty() {
            return;
        }

        let removed: HashSet<GeomHandle> = removed.iter().copied().collect();
        for list in [&mut self.x_extents, &mut self.y_extents] {
            list.extents.retain(|extent| !removed.contains(&extent.geom));
            list.rediscover();
        }

        self.collision_pairs = self
            .x_extents
            .overlaps
            .intersection(&self.y_extents.overlaps)
            .copied()
            .collect();

        debug!(
            removed = removed.len(),
            pairs = self.collision_pairs.len(),
            "rebuilt sweep and prune overlaps"
        );
    }

    fn update(
        &mut self,
        geoms: &GeomStorage<Geom>,
        mut handler: Option<&mut BroadPhaseHandler<'_>>,
    ) -> Vec<GeomPair> {
        self.x_extents.refresh(geoms);
        self.y_extents.refresh(geoms);
        self.sort_lists();

        let mut pairs = Vec::new();
        for pair in &self.collision_pairs {
            let (Some(geom_a), Some(geom_b)) = (geoms.get(pair.geom_a), geoms.get(pair.geom_b)) else {
                continue;
            };
            if let Some(pair) = accept_pair((pair.geom_a, geom_a), (pair.geom_b, geom_b), &mut handler) {
                pairs.push(pair);
            }
        }

        pairs
    }
}
