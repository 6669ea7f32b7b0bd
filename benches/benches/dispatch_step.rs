// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use contact_world::{ColliderId, InstanceTrigger, World};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

struct Target {
    hits: u64,
}

fn owner() -> Rc<RefCell<Target>> {
    Rc::new(RefCell::new(Target { hits: 0 }))
}

/// `n` bodies scattered over a square sized so that each overlaps a few
/// neighbors, spread round-robin over `layers`.
fn populate(world: &mut World, rng: &mut Rng, n: usize, layers: &[usize]) -> Vec<ColliderId> {
    let side = (n as f64).sqrt() * 20.0;
    (0..n)
        .map(|i| {
            let center = Point::new(rng.range(0.0, side), rng.range(0.0, side));
            let layer = layers[i % layers.len()];
            if i % 3 == 0 {
                world.create_box(center, Vec2::new(8.0, 6.0), layer, owner()).unwrap()
            } else {
                world.create_circle(center, rng.range(4.0, 10.0), layer, owner()).unwrap()
            }
        })
        .collect()
}

fn subscribe(world: &mut World) {
    world.on_overlap(0, 1, |_| Ok(())).unwrap();
    world.on_enter(0, 2, |_| Ok(())).unwrap();
    world.on_exit(0, 2, |_| Ok(())).unwrap();
    world.on_overlap(1, 1, |_| Ok(())).unwrap();
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    for &n in &[64usize, 256, 1024] {
        group.throughput(Throughput::Elements((n * (n - 1) / 2) as u64));

        group.bench_function(format!("subscribed_n{n}"), |b| {
            let mut rng = Rng::new(0x5eed_0001);
            let mut world: World = World::new();
            subscribe(&mut world);
            let ids = populate(&mut world, &mut rng, n, &[0, 1, 2]);
            b.iter(|| {
                for &id in &ids {
                    if let Some(c) = world.collider(id) {
                        let jitter = Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0));
                        world.set_position(id, c.center + jitter);
                    }
                }
                black_box(world.process());
            });
        });

        group.bench_function(format!("gated_n{n}"), |b| {
            let mut rng = Rng::new(0x5eed_0002);
            let mut world: World = World::new();
            subscribe(&mut world);
            // Layers 3 and 4 have no handlers.
            populate(&mut world, &mut rng, n, &[3, 4]);
            b.iter(|| black_box(world.process()));
        });

        group.bench_function(format!("instance_n{n}"), |b| {
            let mut rng = Rng::new(0x5eed_0003);
            let mut world: World = World::new();
            let ids = populate(&mut world, &mut rng, n, &[0, 1, 2]);
            for &id in ids.iter().step_by(4) {
                world
                    .on_instance(
                        InstanceTrigger::Overlap,
                        2,
                        id,
                        contact_world::downcast::<Target>,
                        |t, _| {
                            t.hits += 1;
                            Ok(())
                        },
                    )
                    .unwrap();
            }
            b.iter(|| black_box(world.process()));
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let n = 256;
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("remove_and_recreate_n256", |b| {
        b.iter_batched(
            || {
                let mut rng = Rng::new(0x5eed_0004);
                let mut world: World = World::new();
                subscribe(&mut world);
                let ids = populate(&mut world, &mut rng, n, &[0, 1, 2]);
                world.process();
                (world, ids)
            },
            |(mut world, ids)| {
                for &id in &ids {
                    let c = world.collider(id).unwrap();
                    world.remove(id);
                    let _ = world.create_circle(c.center, 5.0, c.layer, owner());
                }
                black_box(world.process());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_process, bench_churn);
criterion_main!(benches);
