use crate::bodies::BodyType;
use crate::math::{Vector2, Transform2};

/// The body state the collision pipeline consumes.
///
/// Integration of velocities and forces happens outside this crate; the
/// owner writes the resulting pose here and the world pulls it into every
/// attached geometry on the next step.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// World position of the body origin
    position: Vector2,

    /// Counter-clockwise rotation in radians
    rotation: f32,

    /// Whether the body is static or dynamic
    body_type: BodyType,

    /// Disabled bodies take part in no pairs
    enabled: bool,

    /// Set once by [`Body::dispose`]
    is_disposed: bool,
}

impl Body {
    /// Creates a new body at the given pose
    pub fn new(position: Vector2, rotation: f32, body_type: BodyType) -> Self {
        Self {
            position,
            rotation,
            body_type,
            enabled: true,
            is_disposed: false,
        }
    }

    /// Creates a new dynamic body at the given position
    pub fn new_dynamic(position: Vector2) -> Self {
        Self::new(position, 0.0, BodyType::Dynamic)
    }

    /// Creates a new static body at the given position
    pub fn new_static(position: Vector2) -> Self {
        Self::new(position, 0.0, BodyType::Static)
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector2 {
        self.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Returns the body's rotation in radians
    pub fn get_rotation(&self) -> f32 {
        self.rotation
    }

    /// Sets the body's rotation in radians
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Returns the body's pose as a transform
    pub fn get_transform(&self) -> Transform2 {
        Transform2::new(self.position, self.rotation)
    }

    /// Returns the body type
    pub fn get_body_type(&self) -> BodyType {
        self.body_type
    }

    /// Changes the body type
    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
    }

    /// Convenience check for [`BodyType::Static`]
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_disposed(&self) -> bool {
        self.is_disposed
    }

    /// Marks the body disposed. The world disposes every geometry attached
    /// to it on the next step.
    pub fn dispose(&mut self) {
        self.is_disposed = true;
    }
}
