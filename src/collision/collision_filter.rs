use bitflags::bitflags;

use crate::core::GeomHandle;
use crate::collision::Geom;

bitflags! {
    /// Category bits a geometry belongs to, and the mask of categories it
    /// collides with
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
    pub struct CollisionCategories: u32 {
        const CAT1  = 0x0000_0001;
        const CAT2  = 0x0000_0002;
        const CAT3  = 0x0000_0004;
        const CAT4  = 0x0000_0008;
        const CAT5  = 0x0000_0010;
        const CAT6  = 0x0000_0020;
        const CAT7  = 0x0000_0040;
        const CAT8  = 0x0000_0080;
        const CAT9  = 0x0000_0100;
        const CAT10 = 0x0000_0200;
        const CAT11 = 0x0000_0400;
        const CAT12 = 0x0000_0800;
        const CAT13 = 0x0000_1000;
        const CAT14 = 0x0000_2000;
        const CAT15 = 0x0000_4000;
        const CAT16 = 0x0000_8000;
        const CAT17 = 0x0001_0000;
        const CAT18 = 0x0002_0000;
        const CAT19 = 0x0004_0000;
        const CAT20 = 0x0008_0000;
        const CAT21 = 0x0010_0000;
        const CAT22 = 0x0020_0000;
        const CAT23 = 0x0040_0000;
        const CAT24 = 0x0080_0000;
        const CAT25 = 0x0100_0000;
        const CAT26 = 0x0200_0000;
        const CAT27 = 0x0400_0000;
        const CAT28 = 0x0800_0000;
        const CAT29 = 0x1000_0000;
        const CAT30 = 0x2000_0000;
        const CAT31 = 0x4000_0000;

        /// Every category
        const ALL   = 0x7FFF_FFFF;
    }
}

impl Default for CollisionCategories {
    fn default() -> Self {
        Self::CAT1
    }
}

/// The default collision group. Geometries in this group are never excluded
/// by group.
pub const DEFAULT_COLLISION_GROUP: u32 = 0;

/// Checks every rule that decides whether two geometries may form a
/// broad-phase pair, except AABB overlap:
///
/// 1. both bodies are enabled
/// 2. not both bodies are static
/// 3. the geometries are on different bodies
/// 4. they are not in the same non-default collision group
/// 5. both have collision enabled
/// 6. one's categories intersect the other's `collides_with` mask
/// 7. neither ignores the other
pub fn can_collide(handle_a: GeomHandle, a: &Geom, handle_b: GeomHandle, b: &Geom) -> bool {
    if !a.is_body_enabled() || !b.is_body_enabled() {
        return false;
    }

    if a.is_body_static() && b.is_body_static() {
        return false;
    }

    if a.body() == b.body() {
        return false;
    }

    let group = a.collision_group();
    if group != DEFAULT_COLLISION_GROUP && group == b.collision_group() {
        return false;
    }

    if !a.collision_enabled() || !b.collision_enabled() {
        return false;
    }

    if !categories_match(a, b) {
        return false;
    }

    !(a.is_geometry_ignored(handle_b) || b.is_geometry_ignored(handle_a))
}

/// Category/mask test: either side accepts the other's categories
#[inline]
pub fn categories_match(a: &Geom, b: &Geom) -> bool {
    a.collision_categories().intersects(b.collides_with())
        || b.collision_categories().intersects(a.collides_with())
}
