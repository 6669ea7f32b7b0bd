// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for id stability, creation-order symmetry, and agreement
//! with the raw overlap predicates.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use contact_world::{Body, ColliderDesc, ColliderId, CollisionInfo, Shape, World};
use kurbo::{Point, Vec2};
use proptest::collection::vec;
use proptest::prelude::*;

fn unit() -> Rc<RefCell<()>> {
    Rc::new(RefCell::new(()))
}

#[derive(Clone, Debug)]
enum Op {
    Create(f64),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(-100.0..100.0f64).prop_map(Op::Create), (0usize..64).prop_map(Op::Remove)]
}

#[derive(Clone, Debug)]
struct Placement {
    center: (f64, f64),
    shape: Shape,
    layer: usize,
}

fn placement() -> impl Strategy<Value = Placement> {
    let shape = prop_oneof![
        (1.0..30.0f64).prop_map(Shape::circle),
        (1.0..30.0f64, 1.0..30.0f64).prop_map(|(w, h)| Shape::aabb(Vec2::new(w, h))),
    ];
    ((-60.0..60.0f64, -60.0..60.0f64), shape, 0usize..3)
        .prop_map(|(center, shape, layer)| Placement { center, shape, layer })
}

fn body(s: &Placement) -> Body {
    Body::new(Point::new(s.center.0, s.center.1), s.shape)
}

type EnterLog = Rc<RefCell<Vec<CollisionInfo>>>;

/// Build a world from `placements` in the given order; returns the world, the
/// id of each placement, and the log of enter records.
fn build(placements: &[Placement], order: &[usize]) -> (World<()>, Vec<ColliderId>, EnterLog) {
    let mut world = World::<()>::new();
    let entered: EnterLog = Rc::default();
    for a in 0..3 {
        for b in a..3 {
            let log = entered.clone();
            world
                .on_enter(a, b, move |info| {
                    log.borrow_mut().push(*info);
                    Ok(())
                })
                .unwrap();
        }
    }
    let mut ids = vec![ColliderId::from_raw(u32::MAX); placements.len()];
    for &i in order {
        let s = &placements[i];
        let desc = ColliderDesc::new(s.shape).at(body(s).center).on_layer(s.layer);
        ids[i] = world.create(desc, unit()).unwrap();
    }
    (world, ids, entered)
}

proptest! {
    #[test]
    fn ids_stay_stable_under_churn(ops in vec(op(), 1..200)) {
        let mut world = World::<()>::with_config(
            contact_world::WorldConfig::default().with_initial_capacity(4),
        )
        .unwrap();
        let mut live: BTreeMap<ColliderId, f64> = BTreeMap::new();
        let mut dead: Vec<ColliderId> = Vec::new();

        for op in ops {
            match op {
                Op::Create(x) => {
                    let id = world.create_circle(Point::new(x, 0.0), 1.0, 0, unit()).unwrap();
                    prop_assert!(!live.contains_key(&id), "id {id} handed out twice");
                    dead.retain(|d| *d != id);
                    live.insert(id, x);
                }
                Op::Remove(n) => {
                    if let Some(&id) = live.keys().nth(n % live.len().max(1)) {
                        world.remove(id);
                        live.remove(&id);
                        dead.push(id);
                    }
                }
            }
            prop_assert_eq!(world.len(), live.len());
            for (&id, &x) in &live {
                let c = world.collider(id);
                prop_assert_eq!(c.map(|c| c.center.x), Some(x));
            }
            for &id in &dead {
                prop_assert!(!world.is_valid(id));
            }
        }
    }

    #[test]
    fn enter_records_ignore_creation_order(placements in vec(placement(), 2..12)) {
        let forward: Vec<usize> = (0..placements.len()).collect();
        let backward: Vec<usize> = forward.iter().rev().copied().collect();

        let (mut w1, ids1, log1) = build(&placements, &forward);
        let (mut w2, ids2, log2) = build(&placements, &backward);
        w1.process();
        w2.process();

        // Map ids back to placement indices so the two runs are comparable.
        let normalize = |ids: &[ColliderId], log: &[CollisionInfo]| {
            let index = |id: ColliderId| ids.iter().position(|x| *x == id).unwrap();
            let mut out: Vec<_> = log
                .iter()
                .map(|i| {
                    let (a, b) = (index(i.id_a), index(i.id_b));
                    let pair = if i.layer_a == i.layer_b { (a.min(b), a.max(b)) } else { (a, b) };
                    (pair, i.layer_a, i.layer_b)
                })
                .collect();
            out.sort_unstable();
            out
        };
        let n1 = normalize(&ids1, &log1.borrow());
        let n2 = normalize(&ids2, &log2.borrow());
        prop_assert_eq!(&n1, &n2);
        for (_, la, lb) in &n1 {
            prop_assert!(la <= lb, "lower layer on the a side");
        }
    }

    #[test]
    fn tracked_pairs_match_predicates(placements in vec(placement(), 2..12)) {
        let order: Vec<usize> = (0..placements.len()).collect();
        let (mut world, ids, _) = build(&placements, &order);
        let report = world.process();
        prop_assert_eq!(report.pairs_gated, 0);

        let mut expected = 0;
        for i in 0..placements.len() {
            for j in (i + 1)..placements.len() {
                let hit = body(&placements[i]).overlaps(&body(&placements[j]));
                expected += usize::from(hit);
                prop_assert_eq!(world.is_overlapping(ids[i], ids[j]), hit);
            }
        }
        prop_assert_eq!(report.overlaps, expected);
        prop_assert_eq!(report.enters, expected);
    }

    #[test]
    fn every_enter_is_matched_by_one_exit(
        placements in vec(placement(), 2..10),
        steps in vec(vec((-20.0..20.0f64, -20.0..20.0f64), 10), 1..6),
    ) {
        let order: Vec<usize> = (0..placements.len()).collect();
        let (mut world, ids, entered) = build(&placements, &order);
        let exits = Rc::new(RefCell::new(0usize));
        for a in 0..3 {
            for b in a..3 {
                let e = exits.clone();
                world
                    .on_exit(a, b, move |_| {
                        *e.borrow_mut() += 1;
                        Ok(())
                    })
                    .unwrap();
            }
        }
        for deltas in &steps {
            for (i, &id) in ids.iter().enumerate() {
                let c = world.collider(id).unwrap();
                let (dx, dy) = deltas[i % deltas.len()];
                world.set_position(id, c.center + Vec2::new(dx, dy));
            }
            world.process();
        }
        for &id in &ids {
            world.remove(id);
        }
        prop_assert_eq!(entered.borrow().len(), *exits.borrow());
        prop_assert_eq!(world.snapshot().tracked_pairs, 0);
    }
}
