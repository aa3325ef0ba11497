pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;

/// Re-export common types for easier usage
pub use crate::core::{
    BodyHandle, BroadPhaseKind, CollisionWorld, GeomHandle, NarrowPhaseKind, SimulationConfig,
};
pub use crate::bodies::{Body, BodyType};
pub use crate::collision::{
    Arbiter, BroadPhase, BroadPhaseHandler, CollisionCategories, Contact, ContactId, Geom, GeomPair, NarrowPhase,
};
pub use crate::shapes::Vertices;
pub use crate::math::{Aabb, Vector2};

/// Error types for the collision pipeline
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),
    }
}

/// Result type for collision pipeline operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
