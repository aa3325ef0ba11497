//! Collision pipeline benchmarks.
//!
//! Run all:    cargo bench --bench broad_phase_bench
//! Filter:     cargo bench --bench broad_phase_bench -- broad_phase

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use phys2d_engine::bodies::Body;
use phys2d_engine::collision::{new_broad_phase, new_narrow_phase, ContactList, Geom};
use phys2d_engine::core::{
    BodyHandle, BodyStorage, BroadPhaseKind, GeomHandle, GeomStorage, Handle, NarrowPhaseKind, SimulationConfig,
    Storage,
};
use phys2d_engine::math::Vector2;
use phys2d_engine::shapes::factory;
use phys2d_engine::CollisionWorld;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BROAD_PHASES: [BroadPhaseKind; 4] = [
    BroadPhaseKind::BruteForce,
    BroadPhaseKind::SpatialHash,
    BroadPhaseKind::SweepAndPrune,
    BroadPhaseKind::SelectiveSweep,
];

/// `n` unit-ish boxes scattered over a square sized for roughly constant density
fn scattered_geoms(n: usize) -> GeomStorage<Geom> {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let extent = (n as f32).sqrt() * 3.0;
    let mut bodies: BodyStorage<Body> = BodyStorage::new();
    let mut geoms = GeomStorage::new();

    for _ in 0..n {
        let position = Vector2::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent));
        let body_handle = bodies.add(Body::new_dynamic(position));
        let body = bodies.get(body_handle).unwrap();
        let vertices = factory::rectangle(rng.gen_range(0.5..2.0), rng.gen_range(0.5..2.0));
        geoms.add(Geom::new(body_handle, body, vertices, 0.0));
    }

    geoms
}

// ---------------------------------------------------------------------------
// Broad phase
// ---------------------------------------------------------------------------

fn bench_broad_phase(c: &mut Criterion) {
    for kind in BROAD_PHASES {
        let mut group = c.benchmark_group(format!("broad_phase/{:?}", kind));
        for &n in &[100, 500, 1000] {
            let geoms = scattered_geoms(n);
            let mut collider = new_broad_phase(&SimulationConfig::with_phases(kind, NarrowPhaseKind::Sat));
            for (handle, geom) in geoms.iter() {
                collider.add(handle, geom);
            }

            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| black_box(collider.update(&geoms, None)));
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Narrow phase
// ---------------------------------------------------------------------------

fn bench_narrow_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("narrow_phase/box_box");
    let body_handle = BodyHandle::from_raw_parts(0, 0);
    let a = Geom::new(body_handle, &Body::new_dynamic(Vector2::ZERO), factory::rectangle(1.0, 1.0), 0.0);
    let b = Geom::new(
        body_handle,
        &Body::new_dynamic(Vector2::new(0.5, 0.25)),
        factory::rectangle(1.0, 1.0),
        0.0,
    );
    let (ha, hb) = (GeomHandle::from_raw_parts(0, 0), GeomHandle::from_raw_parts(1, 0));

    for kind in [NarrowPhaseKind::DistanceGrid, NarrowPhaseKind::Sat] {
        let mut narrow_phase =
            new_narrow_phase(&SimulationConfig::with_phases(Default::default(), kind));
        narrow_phase.prepare(ha, &a).unwrap();
        narrow_phase.prepare(hb, &b).unwrap();

        group.bench_function(format!("{:?}", kind), |bench| {
            bench.iter(|| {
                let mut contacts = ContactList::new();
                narrow_phase.collide((ha, &a), (hb, &b), &mut contacts, 10);
                black_box(contacts)
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Full step
// ---------------------------------------------------------------------------

fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world/step");
    for &n in &[100, 500] {
        let mut rng = StdRng::seed_from_u64(7);
        let extent = (n as f32).sqrt() * 3.0;
        let mut world = CollisionWorld::new();

        for _ in 0..n {
            let position = Vector2::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent));
            let body = world.add_body(Body::new_dynamic(position));
            let geom = Geom::new(body, world.body(body).unwrap(), factory::rectangle(1.0, 1.0), 0.0);
            world.add_geom(geom).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                world.step();
                world.get_events_mut().clear();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_broad_phase, bench_narrow_phase, bench_world_step);
criterion_main!(benches);
