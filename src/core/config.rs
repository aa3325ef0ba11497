#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Which broad-phase collider a world builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum BroadPhaseKind {
    /// O(n^2) reference scan
    BruteForce,

    /// Uniform grid buckets rebuilt every update
    SpatialHash,

    /// Persistent sorted extent lists with incremental re-sort
    SweepAndPrune,

    /// Single-axis sweep over the less clustered axis
    #[default]
    SelectiveSweep,
}

/// Which narrow-phase strategy a world builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum NarrowPhaseKind {
    /// Precomputed signed distance grids
    #[default]
    DistanceGrid,

    /// Runtime separating axis test
    Sat,
}

/// Configuration parameters for the collision pipeline
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// The narrow-phase strategy
    pub narrow_phase: NarrowPhaseKind,

    /// The broad-phase collider
    pub broad_phase: BroadPhaseKind,

    /// Maximum number of contacts collected per geometry pair
    pub max_contacts_to_detect: usize,

    /// Initial cell size of the spatial hash
    pub spatial_hash_cell_size: f32,

    /// Whether the spatial hash retunes its cell size every update
    pub spatial_hash_auto_adjust: bool,

    /// Distance grid cell size as a fraction of a shape's shortest AABB side,
    /// used when a geometry does not specify its own
    pub grid_cell_size_factor: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            narrow_phase: NarrowPhaseKind::default(),
            broad_phase: BroadPhaseKind::default(),
            max_contacts_to_detect: 10,
            spatial_hash_cell_size: 50.0,
            spatial_hash_auto_adjust: true,
            grid_cell_size_factor: 0.1,
        }
    }
}

impl SimulationConfig {
    /// Default configuration with the given strategies
    pub fn with_phases(broad_phase: BroadPhaseKind, narrow_phase: NarrowPhaseKind) -> Self {
        Self {
            broad_phase,
            narrow_phase,
            ..Self::default()
        }
    }
}
