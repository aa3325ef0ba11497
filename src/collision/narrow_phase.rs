use crate::collision::{ContactList, DistanceGrid, Geom, Sat};
use crate::core::{GeomHandle, NarrowPhaseKind, SimulationConfig};
use crate::math::Vector2;
use crate::Result;

/// A geometry together with its handle
pub type GeomRef<'a> = (GeomHandle, &'a Geom);

/// Trait for narrow-phase strategies.
///
/// A strategy is owned by one world. Strategies that cache per-geometry data
/// are told about geometry lifetimes through `prepare`, `remove` and `copy`.
pub trait NarrowPhase {
    /// Which strategy this is
    fn kind(&self) -> NarrowPhaseKind;

    /// Called when a geometry joins the world
    fn prepare(&mut self, _handle: GeomHandle, _geom: &Geom) -> Result<()> {
        Ok(())
    }

    /// Called when a geometry leaves the world
    fn remove(&mut self, _handle: GeomHandle) {}

    /// Called when `to` was cloned from `from` and shares its local shape
    fn copy(&mut self, _from: GeomHandle, _to: GeomHandle) {}

    /// Appends the contacts between `a` and `b` to `contacts`, stopping once
    /// it holds `max_contacts` entries. Normals point from `a` toward `b`.
    fn collide(&mut self, a: GeomRef<'_>, b: GeomRef<'_>, contacts: &mut ContactList, max_contacts: usize);

    /// Returns whether a world point lies inside the geometry
    fn intersect(&mut self, handle: GeomHandle, geom: &Geom, point: Vector2) -> bool;
}

/// Builds the strategy selected by `config`
pub fn new_narrow_phase(config: &SimulationConfig) -> Box<dyn NarrowPhase> {
    match config.narrow_phase {
        NarrowPhaseKind::DistanceGrid => Box::new(DistanceGrid::new(config.grid_cell_size_factor)),
        NarrowPhaseKind::Sat => Box::new(Sat::new()),
    }
}
