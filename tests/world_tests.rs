use phys2d_engine::core::{CollisionEventType, GeomEventType};
use phys2d_engine::error::PhysicsError;
use phys2d_engine::math::Aabb;
use phys2d_engine::shapes::{factory, Vertices};
use phys2d_engine::{
    Body, BodyHandle, BroadPhaseKind, CollisionWorld, Geom, GeomHandle, GeomPair, NarrowPhaseKind,
    SimulationConfig, Vector2,
};
use approx::assert_relative_eq;

const BROAD_PHASES: [BroadPhaseKind; 4] = [
    BroadPhaseKind::BruteForce,
    BroadPhaseKind::SpatialHash,
    BroadPhaseKind::SweepAndPrune,
    BroadPhaseKind::SelectiveSweep,
];

const NARROW_PHASES: [NarrowPhaseKind; 2] = [NarrowPhaseKind::DistanceGrid, NarrowPhaseKind::Sat];

fn add_box(world: &mut CollisionWorld, body: Body, width: f32, height: f32) -> (BodyHandle, GeomHandle) {
    let body = world.add_body(body);
    let geom = Geom::new(body, world.body(body).unwrap(), factory::rectangle(width, height), 0.0);
    (body, world.add_geom(geom).unwrap())
}

fn dynamic_box(world: &mut CollisionWorld, x: f32, y: f32) -> (BodyHandle, GeomHandle) {
    add_box(world, Body::new_dynamic(Vector2::new(x, y)), 1.0, 1.0)
}

fn drain_collision_events(world: &mut CollisionWorld) -> Vec<(CollisionEventType, GeomPair)> {
    let mut events = Vec::new();
    while let Some(event) = world.get_events_mut().next_collision_event() {
        events.push((event.event_type, event.pair));
    }
    events
}

#[test]
fn test_box_falls_onto_ground_with_every_strategy() {
    const DT: f32 = 1.0 / 60.0;
    const GRAVITY: f32 = -9.8;

    for broad_phase in BROAD_PHASES {
        for narrow_phase in NARROW_PHASES {
            let mut world = CollisionWorld::with_config(SimulationConfig::with_phases(broad_phase, narrow_phase));

            // ground spans x in [-40, 40] with its top face at y = 0
            let (_, ground) = add_box(&mut world, Body::new_static(Vector2::new(0.0, -0.1)), 80.0, 0.2);
            // unit box resting half a unit above the ground
            let (falling_body, falling) = dynamic_box(&mut world, 0.0, 1.0);

            world.step();
            assert!(world.arbiters().is_empty());

            let mut velocity = 0.0;
            for _ in 0..200 {
                velocity += GRAVITY * DT;
                let body = world.body_mut(falling_body).unwrap();
                let position = body.get_position();
                body.set_position(Vector2::new(position.x, position.y + velocity * DT));

                world.step();
                if !world.arbiters().is_empty() {
                    break;
                }
            }

            let label = format!("{:?} / {:?}", broad_phase, narrow_phase);
            let ground_aabb = *world.geom(ground).unwrap().aabb();
            let falling_aabb = *world.geom(falling).unwrap().aabb();
            assert!(Aabb::intersect(&ground_aabb, &falling_aabb), "{}", label);

            let arbiter = world.arbiter(ground, falling).expect(&label);
            assert!(!arbiter.contacts.is_empty(), "{}", label);
            assert!(arbiter.contacts.iter().all(|contact| contact.separation <= 0.0), "{}", label);
            assert!(arbiter.max_penetration() > 0.0, "{}", label);

            let begins = world.get_events().get_collision_events_of_type(CollisionEventType::Begin);
            assert_eq!(begins.len(), 1, "{}", label);
            assert_eq!(begins[0].pair, GeomPair::new(ground, falling), "{}", label);
        }
    }
}

#[test]
fn test_begin_and_end_events() {
    let mut world = CollisionWorld::new();
    let (_, a) = dynamic_box(&mut world, 0.0, 0.0);
    let (body_b, b) = dynamic_box(&mut world, 3.0, 0.0);
    let pair = GeomPair::new(a, b);

    world.step();
    assert!(drain_collision_events(&mut world).is_empty());

    world.body_mut(body_b).unwrap().set_position(Vector2::new(0.6, 0.1));
    world.step();
    assert_eq!(drain_collision_events(&mut world), vec![(CollisionEventType::Begin, pair)]);

    // staying in contact is not a new event
    world.step();
    assert!(drain_collision_events(&mut world).is_empty());
    assert!(world.arbiter(b, a).is_some());

    world.body_mut(body_b).unwrap().set_position(Vector2::new(3.0, 0.0));
    world.step();
    assert_eq!(drain_collision_events(&mut world), vec![(CollisionEventType::End, pair)]);
    assert!(world.arbiters().is_empty());
}

#[test]
fn test_events_accumulate_until_drained() {
    let mut world = CollisionWorld::new();
    let (_, a) = dynamic_box(&mut world, 0.0, 0.0);
    let (_, b) = dynamic_box(&mut world, 0.5, 0.25);

    world.step();
    world.remove_geom(b).unwrap();
    world.step();

    let events = world.get_events();
    assert_eq!(events.get_geom_events_of_type(GeomEventType::Added).len(), 2);
    assert_eq!(events.get_geom_events_of_type(GeomEventType::Removed).len(), 1);
    assert_eq!(events.get_collision_events_for_geom(a).len(), 2);

    world.get_events_mut().clear();
    assert!(world.get_events().is_empty());
}

#[test]
fn test_arbiter_keeps_contact_ids_between_steps() {
    let mut world = CollisionWorld::with_config(SimulationConfig::with_phases(
        BroadPhaseKind::BruteForce,
        NarrowPhaseKind::Sat,
    ));
    let (_, a) = dynamic_box(&mut world, 0.0, 0.0);
    let (_, b) = dynamic_box(&mut world, 0.5, 0.25);

    world.step();
    let arbiter = world.arbiter(a, b).unwrap();
    let contact_count = arbiter.contact_count();
    assert!(contact_count > 0);

    let first = arbiter.contacts[0].id;
    world.step();

    let arbiter = world.arbiter(a, b).unwrap();
    assert_eq!(arbiter.contact_count(), contact_count);
    assert!(arbiter.contacts.iter().any(|contact| contact.id == first));
}

#[test]
fn test_handler_vetoes_pairs_in_world() {
    let mut world = CollisionWorld::new();
    dynamic_box(&mut world, 0.0, 0.0);
    dynamic_box(&mut world, 0.5, 0.25);

    world.set_broad_phase_handler(|_, _, _| false);
    world.step();
    assert!(world.arbiters().is_empty());

    world.clear_broad_phase_handler();
    world.step();
    assert_eq!(world.arbiters().len(), 1);
}

#[test]
fn test_switching_strategies_keeps_geometry() {
    let mut world = CollisionWorld::new();
    let (_, a) = dynamic_box(&mut world, 0.0, 0.0);
    let (_, b) = dynamic_box(&mut world, 0.5, 0.25);

    for broad_phase in BROAD_PHASES {
        for narrow_phase in NARROW_PHASES {
            world.set_broad_phase(broad_phase);
            world.set_narrow_phase(narrow_phase).unwrap();
            assert_eq!(world.broad_phase_kind(), broad_phase);
            assert_eq!(world.narrow_phase_kind(), narrow_phase);

            world.step();
            assert!(world.arbiter(a, b).is_some(), "{:?} / {:?}", broad_phase, narrow_phase);
        }
    }
}

#[test]
fn test_distance_grid_failure_is_reported_on_add() {
    let mut world = CollisionWorld::new();
    let body = world.add_body(Body::new_dynamic(Vector2::ZERO));
    let geom = Geom::new(body, world.body(body).unwrap(), Vertices::new(), 0.0);

    let err = world.add_geom(geom).unwrap_err();
    assert!(matches!(err, PhysicsError::InvalidParameter(_)));
    assert_eq!(world.geom_count(), 0);
    assert!(world.get_events().get_geom_events_of_type(GeomEventType::Added).is_empty());
}

#[test]
fn test_point_queries() {
    for narrow_phase in NARROW_PHASES {
        let mut world = CollisionWorld::with_config(SimulationConfig::with_phases(Default::default(), narrow_phase));
        let (_, a) = dynamic_box(&mut world, 0.0, 0.0);
        let (_, b) = dynamic_box(&mut world, 0.5, 0.25);
        let (_, c) = dynamic_box(&mut world, 10.0, 0.0);

        assert_eq!(world.collide_point(Vector2::new(-0.3, 0.0)), Some(a));
        assert_eq!(world.collide_point(Vector2::new(9.8, 0.2)), Some(c));
        assert_eq!(world.collide_point(Vector2::new(5.0, 0.0)), None);
        assert_eq!(world.collide_all(Vector2::new(0.25, 0.0)), vec![a, b]);

        assert!(world.geom_contains_point(b, Vector2::new(0.7, 0.0)).unwrap());
        assert!(world.geoms_collide(a, b).unwrap());
        assert!(!world.geoms_collide(a, c).unwrap());
    }
}

#[test]
fn test_line_segment_query() {
    let mut world = CollisionWorld::new();
    let (_, a) = dynamic_box(&mut world, 0.0, 0.0);
    dynamic_box(&mut world, 0.0, 5.0);

    let hits = world.line_segment_intersect(Vector2::new(-3.0, 0.0), Vector2::new(3.0, 0.0), false);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, a);

    let mut xs: Vec<f32> = hits[0].1.iter().map(|point| point.x).collect();
    xs.sort_by(|x, y| x.total_cmp(y));
    assert_eq!(xs.len(), 2);
    assert_relative_eq!(xs[0], -0.5, epsilon = 1e-5);
    assert_relative_eq!(xs[1], 0.5, epsilon = 1e-5);

    let aabb_hits = world.line_segment_intersect(Vector2::new(-3.0, 0.0), Vector2::new(3.0, 0.0), true);
    assert_eq!(aabb_hits.len(), 1);

    let misses = world.line_segment_intersect(Vector2::new(-3.0, 2.0), Vector2::new(3.0, 2.0), false);
    assert!(misses.is_empty());
}

#[test]
fn test_clones_and_body_removal() {
    let mut world = CollisionWorld::new();
    let (body_a, a) = dynamic_box(&mut world, 0.0, 0.0);

    // a clone on the same body never pairs with its source
    let twin = world.clone_geom(a).unwrap();
    world.step();
    assert!(world.arbiters().is_empty());

    let other_body = world.add_body(Body::new_dynamic(Vector2::new(0.5, 0.25)));
    let moved = world.clone_geom_onto(a, other_body).unwrap();
    world.step();
    assert!(world.arbiter(a, moved).is_some());
    assert!(world.arbiter(twin, moved).is_some());

    world.remove_body(body_a).unwrap();
    assert!(world.remove_body(body_a).is_err());
    world.step();

    assert_eq!(world.geom_count(), 1);
    assert!(world.geom(a).is_err());
    assert!(world.geom(twin).is_err());
    assert!(world.arbiters().is_empty());
}

#[test]
fn test_clear_empties_the_world() {
    let mut world = CollisionWorld::new();
    dynamic_box(&mut world, 0.0, 0.0);
    dynamic_box(&mut world, 0.5, 0.0);
    world.step();

    world.clear();
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.geom_count(), 0);
    assert!(world.arbiters().is_empty());
    assert!(world.get_events().is_empty());

    world.step();
    assert!(world.arbiters().is_empty());
}
