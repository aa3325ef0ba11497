use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::collision::broad_phase::accept_pair;
use crate::collision::{BroadPhase, BroadPhaseHandler, Geom, GeomPair};
use crate::core::{BroadPhaseKind, GeomHandle, GeomStorage, Storage};
use crate::math::{Aabb, Vector2};

/// Uniform grid broad phase.
///
/// Buckets are rebuilt from scratch every update, so the collider keeps no
/// per-geometry state across steps. Only the cell size survives, and with
/// auto adjust on it tracks twice the mean AABB size of the scene.
#[derive(Debug, Clone)]
pub struct SpatialHashCollider {
    cell_size: f32,
    inv_cell_size: f32,
    auto_adjust_cell_size: bool,

    /// Cell key to the geometries overlapping it
    buckets: HashMap<(i32, i32), Vec<GeomHandle>>,

    /// Pairs already tested this update
    filter: HashSet<GeomPair>,
}

impl SpatialHashCollider {
    /// Creates a collider with the given starting cell size
    pub fn new(cell_size: f32, auto_adjust_cell_size: bool) -> Self {
        let mut collider = Self {
            cell_size: 1.0,
            inv_cell_size: 1.0,
            auto_adjust_cell_size,
            buckets: HashMap::new(),
            filter: HashSet::new(),
        };
        collider.set_cell_size(cell_size);
        collider
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Sets the cell size. Non-positive or non-finite sizes are ignored.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        if cell_size.is_finite() && cell_size > 0.0 {
            self.cell_size = cell_size;
            self.inv_cell_size = 1.0 / cell_size;
        }
    }

    pub fn auto_adjust_cell_size(&self) -> bool {
        self.auto_adjust_cell_size
    }

    pub fn set_auto_adjust_cell_size(&mut self, auto_adjust: bool) {
        self.auto_adjust_cell_size = auto_adjust;
    }

    #[inline]
    fn cell_of(&self, point: Vector2) -> (i32, i32) {
        (
            (point.x * self.inv_cell_size).floor() as i32,
            (point.y * self.inv_cell_size).floor() as i32,
        )
    }

    fn adjust_cell_size(&mut self, geoms: &GeomStorage<Geom>) {
        let (total, count) = geoms
            .iter()
            .fold((0.0f32, 0usize), |(total, count), (_, geom)| {
                let aabb = geom.aabb();
                (total + (aabb.width() + aabb.height()) * 0.5, count + 1)
            });

        if count == 0 {
            return;
        }

        let cell_size = 2.0 * total / count as f32;
        if cell_size != self.cell_size {
            debug!(from = self.cell_size, to = cell_size, "adjusted spatial hash cell size");
            self.set_cell_size(cell_size);
        }
    }

    /// Drops every geometry into each cell its AABB touches
    fn fill_hash(&mut self, geoms: &GeomStorage<Geom>) {
        for (handle, geom) in geoms.iter() {
            let (min_x, min_y) = self.cell_of(geom.aabb().min);
            let (max_x, max_y) = self.cell_of(geom.aabb().max);

            for x in min_x..=max_x {
                for y in min_y..=max_y {
                    self.buckets.entry((x, y)).or_default().push(handle);
                }
            }
        }
    }

    /// Tests the geometries sharing each bucket, each pair at most once
    fn run_hash(
        &mut self,
        geoms: &GeomStorage<Geom>,
        handler: &mut Option<&mut BroadPhaseHandler<'_>>,
    ) -> Vec<GeomPair> {
        let mut pairs = Vec::new();

        for bucket in self.buckets.values() {
            for (i, &handle_a) in bucket.iter().enumerate() {
                for &handle_b in &bucket[i + 1..] {
                    if !self.filter.insert(GeomPair::new(handle_a, handle_b)) {
                        continue;
                    }

                    let (Some(geom_a), Some(geom_b)) = (geoms.get(handle_a), geoms.get(handle_b)) else {
                        continue;
                    };

                    if !Aabb::intersect(geom_a.aabb(), geom_b.aabb()) {
                        continue;
                    }

                    if let Some(pair) = accept_pair((handle_a, geom_a), (handle_b, geom_b), handler) {
                        pairs.push(pair);
                    }
                }
            }
        }

        pairs
    }
}

impl Default for SpatialHashCollider {
    fn default() -> Self {
        Self::new(50.0, true)
    }
}

impl BroadPhase for SpatialHashCollider {
    fn kind(&self) -> BroadPhaseKind {
        BroadPhaseKind::SpatialHash
    }

    fn process_removed_geoms(&mut self, _removed: &[GeomHandle]) {}

    fn update(
        &mut self,
        geoms: &GeomStorage<Geom>,
        mut handler: Option<&mut BroadPhaseHandler<'_>>,
    ) -> Vec<GeomPair> {
        if self.auto_adjust_cell_size {
            self.adjust_cell_size(geoms);
        }

        self.fill_hash(geoms);
        let mut pairs = self.run_hash(geoms, &mut handler);

        self.buckets.clear();
        self.filter.clear();

        pairs.sort_unstable();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::Body;
    use crate::core::{BodyHandle, Handle};
    use crate::shapes::factory;
    use approx::assert_relative_eq;

    fn add_box(geoms: &mut GeomStorage<Geom>, body: u32, x: f32, y: f32, size: f32) -> GeomHandle {
        let body_value = Body::new_dynamic(Vector2::new(x, y));
        geoms.add(Geom::new(
            BodyHandle::from_raw_parts(body, 0),
            &body_value,
            factory::rectangle(size, size),
            0.0,
        ))
    }

    #[test]
    fn auto_adjust_tracks_average_size() {
        let mut geoms = GeomStorage::new();
        add_box(&mut geoms, 0, 0.0, 0.0, 2.0);
        add_box(&mut geoms, 1, 10.0, 0.0, 4.0);

        let mut collider = SpatialHashCollider::new(50.0, true);
        collider.update(&geoms, None);
        assert_relative_eq!(collider.cell_size(), 6.0);
    }

    #[test]
    fn pair_spanning_many_cells_is_reported_once() {
        let mut geoms = GeomStorage::new();
        let a = add_box(&mut geoms, 0, 0.0, 0.0, 10.0);
        let b = add_box(&mut geoms, 1, 1.0, 1.0, 10.0);

        let mut collider = SpatialHashCollider::new(1.0, false);
        let pairs = collider.update(&geoms, None);
        assert_eq!(pairs, vec![GeomPair::new(a, b)]);
    }

    #[test]
    fn ignores_invalid_cell_size() {
        let mut collider = SpatialHashCollider::new(2.0, false);
        collider.set_cell_size(0.0);
        assert_relative_eq!(collider.cell_size(), 2.0);
    }
}
