/// Type of body, determining whether it takes part in pair generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyType {
    /// Dynamic bodies move and collide with everything
    #[default]
    Dynamic,

    /// Static bodies never move; two static bodies never form a pair
    Static,
}
