use crate::core::GeomHandle;

/// An unordered pair of geometries, stored with the smaller handle first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeomPair {
    /// The geometry with the smaller handle
    pub geom_a: GeomHandle,

    /// The geometry with the larger handle
    pub geom_b: GeomHandle,
}

impl GeomPair {
    /// Creates a new pair; argument order does not matter
    pub fn new(geom_a: GeomHandle, geom_b: GeomHandle) -> Self {
        // Always sort the handles to ensure consistent ordering
        if geom_a <= geom_b {
            Self { geom_a, geom_b }
        } else {
            Self { geom_a: geom_b, geom_b: geom_a }
        }
    }

    /// Checks if this pair contains the specified geometry
    pub fn contains(&self, geom: GeomHandle) -> bool {
        self.geom_a == geom || self.geom_b == geom
    }

    /// Returns the other geometry in the pair
    pub fn other(&self, geom: GeomHandle) -> Option<GeomHandle> {
        if self.geom_a == geom {
            Some(self.geom_b)
        } else if self.geom_b == geom {
            Some(self.geom_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Handle;

    #[test]
    fn pair_is_order_independent() {
        let a = GeomHandle::from_raw_parts(3, 0);
        let b = GeomHandle::from_raw_parts(1, 2);
        assert_eq!(GeomPair::new(a, b), GeomPair::new(b, a));
        assert_eq!(GeomPair::new(a, b).geom_a, b);
        assert_eq!(GeomPair::new(a, b).other(a), Some(b));
    }
}
