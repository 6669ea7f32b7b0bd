// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-step scan and the order handlers run in.
//!
//! For each step:
//!
//! 1. Every unordered pair of active colliders is visited once, lower slot
//!    first. Pairs on layers nobody listens to are skipped before any
//!    geometry. The rest go through a bounding-box reject, then the exact
//!    test.
//! 2. For an overlapping pair `(a, b)`: continuous handlers for
//!    `(layer(a), layer(b))`, then for `(layer(b), layer(a))` with the record
//!    swapped, then overlap instance handlers bound to `b` (probing `a`'s
//!    owner), then those bound to `a` (probing `b`'s owner).
//! 3. Pairs that started overlapping fire enter handlers, in ascending key
//!    order.
//! 4. Pairs that stopped overlapping fire exit handlers, in ascending key
//!    order, skipping pairs whose colliders no longer exist.

use contact_shapes::{bounds_overlap, overlaps};

use crate::handlers::{HandlerRegistry, PairPhase};
use crate::pairs::{PairKey, PairTracker};
use crate::report::StepReport;
use crate::store::ColliderStore;
use crate::types::{Collider, CollisionInfo, InstanceContact, InstanceTrigger};

/// Borrows of the world's parts that handler invocation needs.
pub(crate) struct Dispatcher<'a, O: ?Sized> {
    pub(crate) store: &'a ColliderStore<O>,
    pub(crate) registry: &'a mut HandlerRegistry<O>,
    pub(crate) report: &'a mut StepReport,
}

impl<O: ?Sized + 'static> Dispatcher<'_, O> {
    /// Run one step against `pairs`.
    pub(crate) fn step(&mut self, pairs: &mut PairTracker) {
        let store = self.store;
        let extent = store.extent();
        for i in 0..extent {
            let Some(a) = store.at(i).filter(|c| c.active) else {
                continue;
            };
            let a_bounds = a.body().bounding_box();
            for j in (i + 1)..extent {
                let Some(b) = store.at(j).filter(|c| c.active) else {
                    continue;
                };
                self.report.pairs_considered += 1;
                if !self.registry.matrix.is_interesting(a.layer, b.layer) {
                    self.report.pairs_gated += 1;
                    continue;
                }
                if !bounds_overlap(&a_bounds, &b.body().bounding_box()) {
                    self.report.broad_rejects += 1;
                    continue;
                }
                self.report.narrow_tests += 1;
                if !overlaps(&a.body(), &b.body()) {
                    continue;
                }
                self.report.overlaps += 1;
                pairs.record(PairKey::new(a.id, b.id));
                self.overlap(a, b);
            }
        }

        for key in pairs.entered() {
            if self.transition(key, PairPhase::Enter) {
                self.report.enters += 1;
            }
        }
        for key in pairs.exited() {
            if self.transition(key, PairPhase::Exit) {
                self.report.exits += 1;
            }
        }
        pairs.finish_step();
    }

    fn overlap(&mut self, a: &Collider, b: &Collider) {
        let info = CollisionInfo::between(a, b);
        self.registry.run_pair(PairPhase::Continuous, a.layer, b.layer, &info, self.report);
        self.registry.run_pair(
            PairPhase::Continuous,
            b.layer,
            a.layer,
            &info.swapped(),
            self.report,
        );
        self.instances(InstanceTrigger::Overlap, a, b);
    }

    /// Fire enter or exit handlers for one pair.
    ///
    /// The record puts the lower layer on the `a` side; on equal layers the
    /// lower id goes first. Returns `false` without firing anything if either
    /// collider no longer exists.
    pub(crate) fn transition(&mut self, key: PairKey, phase: PairPhase) -> bool {
        let store = self.store;
        let (lo, hi) = key.ids();
        let (Some(x), Some(y)) = (store.get(lo), store.get(hi)) else {
            log::trace!("skipping {phase:?} for {lo}/{hi}: collider gone");
            return false;
        };
        let (a, b) = if y.layer < x.layer { (y, x) } else { (x, y) };
        let info = CollisionInfo::between(a, b);
        self.registry.run_pair(phase, a.layer, b.layer, &info, self.report);
        let trigger = match phase {
            PairPhase::Enter => InstanceTrigger::Enter,
            PairPhase::Exit => InstanceTrigger::Exit,
            PairPhase::Continuous => InstanceTrigger::Overlap,
        };
        self.instances(trigger, a, b);
        true
    }

    /// Instance handlers in both orientations: bound to `b` first, then `a`.
    fn instances(&mut self, trigger: InstanceTrigger, a: &Collider, b: &Collider) {
        self.instance(trigger, b, a);
        self.instance(trigger, a, b);
    }

    fn instance(&mut self, trigger: InstanceTrigger, bound: &Collider, other: &Collider) {
        if !self.registry.matrix.has_instance_handlers(other.layer) {
            return;
        }
        let Some(owner) = self.store.owner(other.id) else {
            return;
        };
        let contact = InstanceContact {
            trigger,
            bound: bound.id,
            bound_layer: bound.layer,
            other: other.id,
            other_layer: other.layer,
        };
        self.registry.run_instance(owner, &contact, self.report);
    }
}
