use std::sync::Arc;

use phys2d_engine::bodies::Body;
use phys2d_engine::collision::{
    new_narrow_phase, polygon_collision, ContactList, DistanceGrid, Geom, NarrowPhase, Sat,
};
use phys2d_engine::core::{BodyHandle, GeomHandle, Handle, NarrowPhaseKind, SimulationConfig};
use phys2d_engine::error::PhysicsError;
use phys2d_engine::math::Vector2;
use phys2d_engine::shapes::{factory, Vertices};
use approx::assert_relative_eq;

fn handle(index: u32) -> GeomHandle {
    GeomHandle::from_raw_parts(index, 0)
}

fn box_geom(body: Body) -> Geom {
    Geom::new(BodyHandle::from_raw_parts(0, 0), &body, factory::rectangle(1.0, 1.0), 0.0)
}

fn dynamic_box(x: f32, y: f32) -> Geom {
    box_geom(Body::new_dynamic(Vector2::new(x, y)))
}

fn strategies() -> Vec<Box<dyn NarrowPhase>> {
    vec![
        new_narrow_phase(&SimulationConfig::with_phases(Default::default(), NarrowPhaseKind::DistanceGrid)),
        new_narrow_phase(&SimulationConfig::with_phases(Default::default(), NarrowPhaseKind::Sat)),
    ]
}

#[test]
fn test_separated_geometry_yields_no_contacts() {
    let a = dynamic_box(0.0, 0.0);
    let b = dynamic_box(1.2, 0.0);

    for mut narrow_phase in strategies() {
        let mut contacts = ContactList::new();
        narrow_phase.collide((handle(0), &a), (handle(1), &b), &mut contacts, 10);
        assert!(contacts.is_empty(), "{:?}", narrow_phase.kind());
    }
}

#[test]
fn test_sat_reports_depth_along_least_overlap() {
    let a = dynamic_box(0.0, 0.0);
    let b = dynamic_box(0.5, 0.25);

    let result = polygon_collision(a.world_vertices(), b.world_vertices());
    assert!(result.intersect);
    assert_relative_eq!(result.overlap, 0.5, epsilon = 1e-5);
    assert_relative_eq!(result.axis.x, -1.0, epsilon = 1e-5);

    let mut sat = Sat::new();
    let mut contacts = ContactList::new();
    sat.collide((handle(0), &a), (handle(1), &b), &mut contacts, 10);

    // one corner of each box pokes into the other
    assert_eq!(contacts.len(), 2);
    for contact in &contacts {
        assert_relative_eq!(contact.separation, -0.5, epsilon = 1e-5);
        assert_relative_eq!(contact.normal.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(contact.normal.y, 0.0, epsilon = 1e-5);
    }
}

#[test]
fn test_sat_skips_vertices_of_static_geometry() {
    let ground = box_geom(Body::new_static(Vector2::new(0.0, 0.0)));
    let falling = dynamic_box(0.5, 0.25);

    let mut contacts = ContactList::new();
    Sat::new().collide((handle(0), &ground), (handle(1), &falling), &mut contacts, 10);

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].id.geom_a, handle(1));
    assert_relative_eq!(contacts[0].position.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(contacts[0].position.y, -0.25, epsilon = 1e-5);
}

#[test]
fn test_distance_grid_reports_penetrating_vertices() {
    let a = dynamic_box(0.0, 0.0);
    let b = dynamic_box(0.5, 0.25);

    let mut grid = DistanceGrid::new(0.1);
    let mut contacts = ContactList::new();
    grid.collide((handle(0), &a), (handle(1), &b), &mut contacts, 10);

    assert!(!contacts.is_empty());
    assert!(contacts.iter().all(|contact| contact.separation < 0.0));

    // b's corner at (0, -0.25) is a quarter unit above a's bottom edge
    let corner = contacts
        .iter()
        .find(|contact| contact.id.geom_a == handle(1) && contact.position.x.abs() < 1e-5)
        .unwrap();
    assert_relative_eq!(corner.position.y, -0.25, epsilon = 1e-5);
    assert_relative_eq!(corner.separation, -0.25, epsilon = 1e-3);
    assert_relative_eq!(corner.normal.y, -1.0, epsilon = 1e-3);

    // both grids were built lazily
    assert_eq!(grid.len(), 2);
}

#[test]
fn test_max_contacts_caps_output() {
    let a = dynamic_box(0.0, 0.0);
    let b = dynamic_box(0.1, 0.1);

    for mut narrow_phase in strategies() {
        let mut contacts = ContactList::new();
        narrow_phase.collide((handle(0), &a), (handle(1), &b), &mut contacts, 1);
        assert_eq!(contacts.len(), 1, "{:?}", narrow_phase.kind());
    }
}

#[test]
fn test_point_intersection() {
    let geom = dynamic_box(3.0, 3.0);

    for mut narrow_phase in strategies() {
        assert!(narrow_phase.intersect(handle(0), &geom, Vector2::new(3.2, 2.9)));
        assert!(!narrow_phase.intersect(handle(0), &geom, Vector2::new(0.0, 0.0)));
        assert!(!narrow_phase.intersect(handle(0), &geom, Vector2::new(3.7, 3.0)));
    }
}

#[test]
fn test_distance_grid_rejects_empty_outline() {
    let body = Body::new_dynamic(Vector2::ZERO);
    let empty = Geom::new(BodyHandle::from_raw_parts(0, 0), &body, Vertices::new(), 0.0);

    let mut grid = DistanceGrid::new(0.1);
    let err = grid.create_distance_grid(handle(0), &empty).unwrap_err();
    assert!(matches!(err, PhysicsError::InvalidParameter(_)));
    assert!(grid.is_empty());

    // lazy creation logs and moves on
    let other = dynamic_box(0.0, 0.0);
    let mut contacts = ContactList::new();
    grid.collide((handle(0), &empty), (handle(1), &other), &mut contacts, 10);
    assert!(contacts.is_empty());
}

#[test]
fn test_distance_grid_copy_and_remove() {
    let geom = dynamic_box(0.0, 0.0);
    let mut grid = DistanceGrid::new(0.1);
    grid.create_distance_grid(handle(0), &geom).unwrap();

    grid.copy_distance_grid(handle(0), handle(4));
    let source = grid.get(handle(0)).unwrap();
    let copy = grid.get(handle(4)).unwrap();
    assert!(Arc::ptr_eq(source, copy));

    grid.remove_distance_grid(handle(0));
    assert!(grid.get(handle(0)).is_none());
    assert!(grid.get(handle(4)).is_some());

    // a reused slot with a new generation does not see the old grid
    assert!(grid.get(GeomHandle::from_raw_parts(4, 1)).is_none());
}

#[test]
fn test_explicit_grid_size_wins() {
    let body = Body::new_dynamic(Vector2::ZERO);
    let geom = Geom::new(BodyHandle::from_raw_parts(0, 0), &body, factory::rectangle(2.0, 1.0), 0.3);

    let mut grid = DistanceGrid::new(0.1);
    grid.create_distance_grid(handle(0), &geom).unwrap();

    let data = grid.get(handle(0)).unwrap();
    assert_relative_eq!(data.cell_size(), 0.3);
    assert_eq!(data.dimensions(), (8, 5));
}
