mod vertices;
pub mod factory;

pub use self::vertices::Vertices;
