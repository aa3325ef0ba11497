use std::sync::Arc;

use tracing::{debug, warn};

use crate::collision::{Contact, ContactId, ContactList, Feature, Geom, GeomRef, NarrowPhase};
use crate::core::{GeomHandle, Handle, NarrowPhaseKind};
use crate::error::PhysicsError;
use crate::math::{lerp, Aabb, Vector2};
use crate::shapes::Vertices;
use crate::Result;

/// Signed distances sampled on a regular lattice over a shape's local AABB
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceGridData {
    aabb: Aabb,
    cell_size: f32,
    inv_cell_size: f32,
    columns: usize,
    rows: usize,
    /// Row-major, `rows * columns` entries; negative is inside
    nodes: Vec<f32>,
}

impl DistanceGridData {
    /// Samples `vertices` (in shape space) every `cell_size` units.
    ///
    /// The lattice is `ceil(width / cell_size) + 1` by
    /// `ceil(height / cell_size) + 1` nodes starting at the AABB minimum.
    pub fn build(vertices: &Vertices, cell_size: f32) -> Result<Self> {
        let aabb = Aabb::from_points(vertices).ok_or_else(|| {
            PhysicsError::InvalidParameter("cannot build a distance grid for an empty outline".into())
        })?;

        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "distance grid cell size must be positive, got {}",
                cell_size
            )));
        }

        let columns = (aabb.width() / cell_size).ceil() as usize + 1;
        let rows = (aabb.height() / cell_size).ceil() as usize + 1;

        let mut nodes = Vec::with_capacity(columns * rows);
        for y in 0..rows {
            for x in 0..columns {
                let point = aabb.min + Vector2::new(x as f32 * cell_size, y as f32 * cell_size);
                nodes.push(vertices.get_nearest_distance(point));
            }
        }

        Ok(Self {
            aabb,
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            columns,
            rows,
            nodes,
        })
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Lattice dimensions as `(columns, rows)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Sampled distance at lattice node `(x, y)`
    #[inline]
    pub fn node(&self, x: usize, y: usize) -> f32 {
        self.nodes[y * self.columns + x]
    }

    /// Looks up a shape-space point. Returns the interpolated feature only
    /// when the point is inside the shape.
    pub fn intersect(&self, point: Vector2) -> Option<Feature> {
        if !self.aabb.contains(point) || self.columns < 2 || self.rows < 2 {
            return None;
        }

        let x = (((point.x - self.aabb.min.x) * self.inv_cell_size).floor() as usize).min(self.columns - 2);
        let y = (((point.y - self.aabb.min.y) * self.inv_cell_size).floor() as usize).min(self.rows - 2);

        let bottom_left = self.node(x, y);
        let bottom_right = self.node(x + 1, y);
        let top_left = self.node(x, y + 1);
        let top_right = self.node(x + 1, y + 1);

        // no corner inside or on the boundary: nothing to find in this cell
        if bottom_left > 0.0 && bottom_right > 0.0 && top_left > 0.0 && top_right > 0.0 {
            return None;
        }

        let x_percent = (point.x - (self.aabb.min.x + x as f32 * self.cell_size)) * self.inv_cell_size;
        let y_percent = (point.y - (self.aabb.min.y + y as f32 * self.cell_size)) * self.inv_cell_size;

        let top = lerp(top_left, top_right, x_percent);
        let bottom = lerp(bottom_left, bottom_right, x_percent);
        let distance = lerp(bottom, top, y_percent);

        if distance >= 0.0 {
            return None;
        }

        let normal = Vector2::new(
            (1.0 - y_percent) * (bottom_right - bottom_left) + y_percent * (top_right - top_left),
            (1.0 - x_percent) * (top_left - bottom_left) + x_percent * (top_right - bottom_right),
        )
        .normalize();

        Some(Feature::new(point, normal, distance))
    }
}

#[derive(Debug, Clone)]
struct GridSlot {
    generation: u32,
    data: Arc<DistanceGridData>,
}

/// Narrow phase backed by precomputed signed distance grids.
///
/// Grids are cached per geometry, indexed by handle slot. Clones share the
/// grid of their source.
#[derive(Debug, Default)]
pub struct DistanceGrid {
    grids: Vec<Option<GridSlot>>,
    cell_size_factor: f32,
}

impl DistanceGrid {
    /// Creates an empty cache. `cell_size_factor` times a shape's shortest
    /// AABB side is the cell size used when a geometry does not set one.
    pub fn new(cell_size_factor: f32) -> Self {
        Self {
            grids: Vec::new(),
            cell_size_factor,
        }
    }

    /// The cached grid of a geometry, if any
    pub fn get(&self, handle: GeomHandle) -> Option<&Arc<DistanceGridData>> {
        match self.grids.get(handle.index() as usize) {
            Some(Some(slot)) if slot.generation == handle.generation() => Some(&slot.data),
            _ => None,
        }
    }

    /// Number of cached grids
    pub fn len(&self) -> usize {
        self.grids.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, handle: GeomHandle, data: Arc<DistanceGridData>) {
        let index = handle.index() as usize;
        if index >= self.grids.len() {
            self.grids.resize(index + 1, None);
        }
        self.grids[index] = Some(GridSlot {
            generation: handle.generation(),
            data,
        });
    }

    /// Samples and caches the grid of `geom` unless one already exists
    pub fn create_distance_grid(&mut self, handle: GeomHandle, geom: &Geom) -> Result<()> {
        if self.get(handle).is_some() {
            return Ok(());
        }

        let cell_size = if geom.collision_grid_size() > 0.0 {
            geom.collision_grid_size()
        } else {
            Aabb::from_points(geom.local_vertices())
                .map(|aabb| aabb.shortest_side() * self.cell_size_factor)
                .unwrap_or(0.0)
        };

        let data = DistanceGridData::build(geom.local_vertices(), cell_size)?;
        debug!(
            geom = %handle,
            cell_size,
            columns = data.columns,
            rows = data.rows,
            "created distance grid"
        );
        self.insert(handle, Arc::new(data));
        Ok(())
    }

    /// Drops the grid of a geometry
    pub fn remove_distance_grid(&mut self, handle: GeomHandle) {
        if self.get(handle).is_some() {
            self.grids[handle.index() as usize] = None;
            debug!(geom = %handle, "removed distance grid");
        }
    }

    /// Shares the grid of `from` with `to`
    pub fn copy_distance_grid(&mut self, from: GeomHandle, to: GeomHandle) {
        if let Some(data) = self.get(from).cloned() {
            self.insert(to, data);
            debug!(from = %from, to = %to, "copied distance grid");
        }
    }

    fn grid_for(&mut self, handle: GeomHandle, geom: &Geom) -> Option<Arc<DistanceGridData>> {
        if let Err(err) = self.create_distance_grid(handle, geom) {
            warn!(geom = %handle, error = %err, "skipping geometry without a distance grid");
            return None;
        }
        self.get(handle).cloned()
    }

    /// Probes every world vertex of `probe` against the grid of `target`.
    /// Contact normals are the target's outward normals, flipped when
    /// `flip` is set.
    fn probe_vertices(
        grid: &DistanceGridData,
        (probe_handle, probe): GeomRef<'_>,
        (target_handle, target): GeomRef<'_>,
        flip: bool,
        contacts: &mut ContactList,
        max_contacts: usize,
    ) {
        for (index, vertex) in probe.world_vertices().iter().enumerate() {
            if contacts.len() >= max_contacts {
                return;
            }

            let local = target.transform_to_local(*vertex);
            let Some(feature) = grid.intersect(local) else {
                continue;
            };

            let mut normal = target.transform_normal_to_world(feature.normal);
            if flip {
                normal = -normal;
            }

            contacts.push(Contact::new(
                *vertex,
                normal,
                feature.distance,
                ContactId::new(probe_handle, index, target_handle),
            ));
        }
    }
}

impl NarrowPhase for DistanceGrid {
    fn kind(&self) -> NarrowPhaseKind {
        NarrowPhaseKind::DistanceGrid
    }

    fn prepare(&mut self, handle: GeomHandle, geom: &Geom) -> Result<()> {
        self.create_distance_grid(handle, geom)
    }

    fn remove(&mut self, handle: GeomHandle) {
        self.remove_distance_grid(handle);
    }

    fn copy(&mut self, from: GeomHandle, to: GeomHandle) {
        self.copy_distance_grid(from, to);
    }

    fn collide(&mut self, a: GeomRef<'_>, b: GeomRef<'_>, contacts: &mut ContactList, max_contacts: usize) {
        let (Some(grid_a), Some(grid_b)) = (self.grid_for(a.0, a.1), self.grid_for(b.0, b.1)) else {
            return;
        };

        // vertices of b inside a: a's outward normal already points a -> b
        Self::probe_vertices(&grid_a, b, a, false, contacts, max_contacts);

        // vertices of a inside b: b's outward normal points b -> a, flip it
        Self::probe_vertices(&grid_b, a, b, true, contacts, max_contacts);
    }

    fn intersect(&mut self, handle: GeomHandle, geom: &Geom, point: Vector2) -> bool {
        match self.grid_for(handle, geom) {
            Some(grid) => grid.intersect(geom.transform_to_local(point)).is_some(),
            None => false,
        }
    }
}
