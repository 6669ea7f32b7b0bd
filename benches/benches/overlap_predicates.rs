// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use contact_shapes::{Body, Shape, bounds_overlap, overlaps};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
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
}

fn gen_bodies(count: usize, boxes: bool, circles: bool, seed: u64) -> Vec<Body> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|i| {
            let center = Point::new(rng.next_f64() * 200.0, rng.next_f64() * 200.0);
            let size = 5.0 + rng.next_f64() * 20.0;
            let as_box = match (boxes, circles) {
                (true, false) => true,
                (false, true) => false,
                _ => i % 2 == 0,
            };
            if as_box {
                Body::new(center, Shape::aabb(Vec2::new(size, size * 0.5)))
            } else {
                Body::new(center, Shape::circle(size))
            }
        })
        .collect()
}

fn bench_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_predicates");
    let count = 256;
    group.throughput(Throughput::Elements((count * count) as u64));

    for (name, boxes, circles) in [
        ("circle_circle", false, true),
        ("box_box", true, false),
        ("mixed", true, true),
    ] {
        let bodies = gen_bodies(count, boxes, circles, 0xC0FFEE);
        group.bench_function(format!("{name}_exact"), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for x in &bodies {
                    for y in &bodies {
                        hits += usize::from(overlaps(x, y));
                    }
                }
                black_box(hits)
            });
        });
        group.bench_function(format!("{name}_broad_then_exact"), |b| {
            let bounds: Vec<_> = bodies.iter().map(Body::bounding_box).collect();
            b.iter(|| {
                let mut hits = 0usize;
                for (x, bx) in bodies.iter().zip(&bounds) {
                    for (y, by) in bodies.iter().zip(&bounds) {
                        if bounds_overlap(bx, by) {
                            hits += usize::from(overlaps(x, y));
                        }
                    }
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_predicates);
criterion_main!(benches);
