use std::cmp::Ordering;
use std::collections::HashSet;

use crate::collision::broad_phase::accept_pair;
use crate::collision::{BroadPhase, BroadPhaseHandler, Geom, GeomPair};
use crate::core::{BroadPhaseKind, GeomHandle, GeomStorage, Storage};
use crate::math::Vector2;

/// Cached bounds of one registered geometry
#[derive(Debug, Clone, Copy)]
struct Wrapper {
    geom: GeomHandle,
    min: Vector2,
    max: Vector2,
}

impl Wrapper {
    fn overlaps_x(&self, other: &Wrapper) -> bool {
        self.min.x <= other.max.x && other.min.x <= self.max.x
    }

    fn overlaps_y(&self, other: &Wrapper) -> bool {
        self.min.y <= other.max.y && other.min.y <= self.max.y
    }
}

/// Begin or end of a wrapper's interval on one axis
#[derive(Debug, Clone, Copy)]
struct Stub {
    wrapper: usize,
    value: f32,
    is_begin: bool,
}

fn stub_order(a: &Stub, b: &Stub) -> Ordering {
    a.value
        .total_cmp(&b.value)
        .then_with(|| b.is_begin.cmp(&a.is_begin))
}

/// Number of interval crossings met while walking sorted stubs: each begin
/// adds the count of intervals already open
fn crossing_count(stubs: &[Stub]) -> usize {
    let mut depth = 0usize;
    let mut count = 0usize;
    for stub in stubs {
        if stub.is_begin {
            count += depth;
            depth += 1;
        } else {
            depth = depth.saturating_sub(1);
        }
    }
    count
}

/// Single-axis sweep that picks, every update, the axis with fewer
/// crossings and checks the other axis per candidate.
///
/// Stub lists are fully re-sorted each update.
#[derive(Debug, Clone, Default)]
pub struct SelectiveSweepCollider {
    wrappers: Vec<Wrapper>,
    x_stubs: Vec<Stub>,
    y_stubs: Vec<Stub>,
}

impl SelectiveSweepCollider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered geometries
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    fn refresh(&mut self, geoms: &GeomStorage<Geom>) {
        self.x_stubs.clear();
        self.y_stubs.clear();

        for (index, wrapper) in self.wrappers.iter_mut().enumerate() {
            let Some(geom) = geoms.get(wrapper.geom) else {
                continue;
            };
            wrapper.min = geom.aabb().min;
            wrapper.max = geom.aabb().max;

            self.x_stubs.push(Stub { wrapper: index, value: wrapper.min.x, is_begin: true });
            self.x_stubs.push(Stub { wrapper: index, value: wrapper.max.x, is_begin: false });
            self.y_stubs.push(Stub { wrapper: index, value: wrapper.min.y, is_begin: true });
            self.y_stubs.push(Stub { wrapper: index, value: wrapper.max.y, is_begin: false });
        }

        self.x_stubs.sort_unstable_by(stub_order);
        self.y_stubs.sort_unstable_by(stub_order);
    }

    /// Whether sweeping x meets fewer candidate overlaps than sweeping y
    fn should_do_x(&self) -> bool {
        crossing_count(&self.x_stubs) < crossing_count(&self.y_stubs)
    }
}

impl BroadPhase for SelectiveSweepCollider {
    fn kind(&self) -> BroadPhaseKind {
        BroadPhaseKind::SelectiveSweep
    }

    fn add(&mut self, handle: GeomHandle, geom: &Geom) {
        self.wrappers.push(Wrapper {
            geom: handle,
            min: geom.aabb().min,
            max: geom.aabb().max,
        });
    }

    fn process_removed_geoms(&mut self, removed: &[GeomHandle]) {
        if removed.is_empty() {
            return;
        }
        let removed: HashSet<GeomHandle> = removed.iter().copied().collect();
        self.wrappers.retain(|wrapper| !removed.contains(&wrapper.geom));
    }

    fn update(
        &mut self,
        geoms: &GeomStorage<Geom>,
        mut handler: Option<&mut BroadPhaseHandler<'_>>,
    ) -> Vec<GeomPair> {
        self.refresh(geoms);

        let do_x = self.should_do_x();
        let stubs = if do_x { &self.x_stubs } else { &self.y_stubs };

        let mut active: Vec<usize> = Vec::new();
        let mut pairs = Vec::new();

        for stub in stubs {
            if !stub.is_begin {
                if let Some(position) = active.iter().position(|&w| w == stub.wrapper) {
                    active.remove(position);
                }
                continue;
            }

            let wrapper = &self.wrappers[stub.wrapper];
            for &other_index in &active {
                let other = &self.wrappers[other_index];
                let overlaps = if do_x {
                    wrapper.overlaps_y(other)
                } else {
                    wrapper.overlaps_x(other)
                };
                if !overlaps {
                    continue;
                }

                let (Some(geom_a), Some(geom_b)) = (geoms.get(other.geom), geoms.get(wrapper.geom)) else {
                    continue;
                };
                if let Some(pair) = accept_pair((other.geom, geom_a), (wrapper.geom, geom_b), &mut handler) {
                    pairs.push(pair);
                }
            }
            active.push(stub.wrapper);
        }

        pairs.sort_unstable();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(value: f32, is_begin: bool) -> Stub {
        Stub { wrapper: 0, value, is_begin }
    }

    #[test]
    fn crossing_count_measures_nesting() {
        // three intervals stacked on top of each other
        let nested = [
            stub(0.0, true),
            stub(0.0, true),
            stub(0.0, true),
            stub(1.0, false),
            stub(1.0, false),
            stub(1.0, false),
        ];
        assert_eq!(crossing_count(&nested), 3);

        // three disjoint intervals
        let spread = [
            stub(0.0, true),
            stub(1.0, false),
            stub(2.0, true),
            stub(3.0, false),
            stub(4.0, true),
            stub(5.0, false),
        ];
        assert_eq!(crossing_count(&spread), 0);
    }

    #[test]
    fn begin_sorts_before_end() {
        let mut stubs = vec![stub(1.0, false), stub(1.0, true), stub(0.5, true)];
        stubs.sort_by(stub_order);
        assert!(stubs[0].is_begin && stubs[0].value == 0.5);
        assert!(stubs[1].is_begin);
        assert!(!stubs[2].is_begin);
    }
}
