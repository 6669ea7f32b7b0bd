// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler registry.
//!
//! Two families of handlers live here:
//!
//! - Layer-pair handlers, keyed by an ordered layer pair and a phase
//!   (continuous, enter, exit). They receive a [`CollisionInfo`].
//! - Instance handlers, bound to one collider id and watching one layer. When
//!   the bound collider meets a collider on the watched layer, the handler
//!   probes that collider's owner for a capability and runs only if the
//!   probe succeeds. They receive an [`InstanceContact`].
//!
//! Every mutation keeps the [`SubscriptionMatrix`] in step with the lists:
//! a cell flag is set iff the corresponding list is non-empty.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use crate::config::FaultPolicy;
use crate::error::{HandlerError, HandlerResult};
use crate::matrix::{SubscriptionMatrix, Subscriptions};
use crate::report::StepReport;
use crate::types::{ColliderId, CollisionInfo, InstanceContact, InstanceTrigger};

/// Handle to a registered handler, used to unregister it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler {}", self.0)
    }
}

/// Capability probe for worlds whose owners are `dyn Any`: succeeds when the
/// owner's concrete type is `T`.
///
/// ```
/// use contact_world::downcast;
/// use std::any::Any;
///
/// struct Slime { hp: u32 }
/// let mut owner: Box<dyn Any> = Box::new(Slime { hp: 3 });
/// assert_eq!(downcast::<Slime>(owner.as_mut()).map(|s| s.hp), Some(3));
/// assert!(downcast::<u8>(owner.as_mut()).is_none());
/// ```
pub fn downcast<'a, T: Any>(owner: &'a mut (dyn Any + 'static)) -> Option<&'a mut T> {
    owner.downcast_mut::<T>()
}

/// Phase a layer-pair handler runs in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PairPhase {
    Continuous,
    Enter,
    Exit,
}

impl PairPhase {
    fn flag(self) -> Subscriptions {
        match self {
            Self::Continuous => Subscriptions::CONTINUOUS,
            Self::Enter => Subscriptions::ENTER,
            Self::Exit => Subscriptions::EXIT,
        }
    }
}

struct PairEntry {
    id: HandlerId,
    f: Box<dyn FnMut(&CollisionInfo) -> HandlerResult>,
}

/// `Ok(false)` from `f` means the probe did not match and nothing ran.
struct InstanceEntry<O: ?Sized> {
    id: HandlerId,
    trigger: InstanceTrigger,
    f: Box<dyn FnMut(&mut O, &InstanceContact) -> Result<bool, HandlerError>>,
}

trait Entry {
    fn id(&self) -> HandlerId;
}

impl Entry for PairEntry {
    fn id(&self) -> HandlerId {
        self.id
    }
}

impl<O: ?Sized> Entry for InstanceEntry<O> {
    fn id(&self) -> HandlerId {
        self.id
    }
}

pub(crate) struct HandlerRegistry<O: ?Sized> {
    pub(crate) matrix: SubscriptionMatrix,
    continuous: Vec<Vec<PairEntry>>,
    enter: Vec<Vec<PairEntry>>,
    exit: Vec<Vec<PairEntry>>,
    /// Indexed by watched layer, then keyed by bound id.
    instance: Vec<BTreeMap<ColliderId, Vec<InstanceEntry<O>>>>,
    next_id: u64,
    policy: FaultPolicy,
}

impl<O: ?Sized> fmt::Debug for HandlerRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.len())
            .field("matrix", &self.matrix)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<O: ?Sized> HandlerRegistry<O> {
    /// Total registered handlers.
    pub(crate) fn len(&self) -> usize {
        let pairs: usize = self
            .continuous
            .iter()
            .chain(&self.enter)
            .chain(&self.exit)
            .map(Vec::len)
            .sum();
        let instances: usize = self
            .instance
            .iter()
            .flat_map(|map| map.values())
            .map(Vec::len)
            .sum();
        pairs + instances
    }
}

impl<O: ?Sized + 'static> HandlerRegistry<O> {
    pub(crate) fn new(max_layers: usize, policy: FaultPolicy) -> Self {
        let cells = max_layers * max_layers;
        let lists = || (0..cells).map(|_| Vec::new()).collect::<Vec<_>>();
        Self {
            matrix: SubscriptionMatrix::new(max_layers),
            continuous: lists(),
            enter: lists(),
            exit: lists(),
            instance: (0..max_layers).map(|_| BTreeMap::new()).collect(),
            next_id: 0,
            policy,
        }
    }

    fn issue_id(&mut self) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn cell(&self, a: usize, b: usize) -> usize {
        a * self.matrix.max_layers() + b
    }

    fn lists_mut(&mut self, phase: PairPhase) -> &mut Vec<Vec<PairEntry>> {
        match phase {
            PairPhase::Continuous => &mut self.continuous,
            PairPhase::Enter => &mut self.enter,
            PairPhase::Exit => &mut self.exit,
        }
    }

    /// Register a layer-pair handler. Layers must already be validated.
    ///
    /// Enter and exit handlers are stored under `(min, max)` of the pair.
    pub(crate) fn add_pair(
        &mut self,
        phase: PairPhase,
        a: usize,
        b: usize,
        f: Box<dyn FnMut(&CollisionInfo) -> HandlerResult>,
    ) -> HandlerId {
        let (a, b) = match phase {
            PairPhase::Continuous => (a, b),
            PairPhase::Enter | PairPhase::Exit => (a.min(b), a.max(b)),
        };
        let id = self.issue_id();
        let cell = self.cell(a, b);
        self.lists_mut(phase)[cell].push(PairEntry { id, f });
        self.matrix.set(a, b, phase.flag(), true);
        log::debug!("{id}: {phase:?} on layers ({a}, {b})");
        id
    }

    /// Register an instance handler: `probe` runs on the owner of a collider
    /// on `layer` that meets `bound`; `action` runs on whatever it returns.
    pub(crate) fn add_instance<C, F>(
        &mut self,
        trigger: InstanceTrigger,
        layer: usize,
        bound: ColliderId,
        probe: fn(&mut O) -> Option<&mut C>,
        mut action: F,
    ) -> HandlerId
    where
        C: ?Sized + 'static,
        F: FnMut(&mut C, &InstanceContact) -> HandlerResult + 'static,
    {
        let id = self.issue_id();
        let f: Box<dyn FnMut(&mut O, &InstanceContact) -> Result<bool, HandlerError>> =
            Box::new(move |owner, contact| match probe(owner) {
                Some(capability) => action(capability, contact).map(|()| true),
                None => Ok(false),
            });
        self.instance[layer].entry(bound).or_default().push(InstanceEntry { id, trigger, f });
        self.matrix.set_instance_layer(layer, true);
        log::debug!("{id}: instance {trigger:?} bound to {bound}, watching layer {layer}");
        id
    }

    /// Remove one handler. Returns whether it was found.
    pub(crate) fn remove(&mut self, id: HandlerId) -> bool {
        for phase in [PairPhase::Continuous, PairPhase::Enter, PairPhase::Exit] {
            let lists = self.lists_mut(phase);
            let found = lists
                .iter_mut()
                .enumerate()
                .find_map(|(cell, list)| {
                    let pos = list.iter().position(|e| e.id == id)?;
                    list.remove(pos);
                    Some(cell)
                });
            if let Some(cell) = found {
                self.refresh_cell(phase, cell);
                return true;
            }
        }
        for layer in 0..self.instance.len() {
            let map = &mut self.instance[layer];
            let found = map.iter_mut().find_map(|(&bound, list)| {
                let pos = list.iter().position(|e| e.id == id)?;
                list.remove(pos);
                Some(bound)
            });
            if let Some(bound) = found {
                self.prune_bound(layer, bound);
                return true;
            }
        }
        false
    }

    /// Remove every instance handler bound to `bound`, on any layer.
    pub(crate) fn remove_bound(&mut self, bound: ColliderId) -> usize {
        let mut removed = 0;
        for layer in 0..self.instance.len() {
            if let Some(list) = self.instance[layer].remove(&bound) {
                removed += list.len();
                self.refresh_layer(layer);
            }
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        for list in self
            .continuous
            .iter_mut()
            .chain(self.enter.iter_mut())
            .chain(self.exit.iter_mut())
        {
            list.clear();
        }
        for map in &mut self.instance {
            map.clear();
        }
        self.matrix.clear();
    }

    /// Run the layer-pair handlers registered for `(a, b)` in `phase`.
    ///
    /// For enter and exit, `(a, b)` must already be normalized.
    pub(crate) fn run_pair(
        &mut self,
        phase: PairPhase,
        a: usize,
        b: usize,
        info: &CollisionInfo,
        report: &mut StepReport,
    ) {
        if !self.matrix.get(a, b).contains(phase.flag()) {
            return;
        }
        let cell = self.cell(a, b);
        let policy = self.policy;
        let list = &mut self.lists_mut(phase)[cell];
        let pruned = run_entries(list, policy, report, info, |e| (e.f)(info).map(|()| true));
        if pruned {
            self.refresh_cell(phase, cell);
        }
    }

    /// Run the instance handlers bound to `contact.bound` that watch
    /// `contact.other_layer` and match `contact.trigger`, probing `owner`.
    pub(crate) fn run_instance(
        &mut self,
        owner: &RefCell<O>,
        contact: &InstanceContact,
        report: &mut StepReport,
    ) {
        let layer = contact.other_layer;
        if !self.matrix.has_instance_handlers(layer) {
            return;
        }
        let policy = self.policy;
        let Some(list) = self.instance[layer].get_mut(&contact.bound) else {
            return;
        };
        let pruned = run_entries(list, policy, report, contact, |e| {
            if e.trigger != contact.trigger {
                return Ok(false);
            }
            let Ok(mut guard) = owner.try_borrow_mut() else {
                return Err(HandlerError::OwnerBusy(contact.other));
            };
            (e.f)(&mut *guard, contact)
        });
        if pruned {
            self.prune_bound(layer, contact.bound);
        }
    }

    fn refresh_cell(&mut self, phase: PairPhase, cell: usize) {
        let n = self.matrix.max_layers();
        let on = !self.lists_mut(phase)[cell].is_empty();
        self.matrix.set(cell / n, cell % n, phase.flag(), on);
    }

    fn prune_bound(&mut self, layer: usize, bound: ColliderId) {
        if self.instance[layer].get(&bound).is_some_and(|list| list.is_empty()) {
            self.instance[layer].remove(&bound);
        }
        self.refresh_layer(layer);
    }

    fn refresh_layer(&mut self, layer: usize) {
        let on = !self.instance[layer].is_empty();
        self.matrix.set_instance_layer(layer, on);
    }
}

/// Call every entry in order, isolating failures.
///
/// `call` returns `Ok(true)` when a handler ran. Returns whether any entry was
/// unregistered under [`FaultPolicy::Unregister`].
fn run_entries<E: Entry>(
    entries: &mut Vec<E>,
    policy: FaultPolicy,
    report: &mut StepReport,
    context: &dyn fmt::Display,
    mut call: impl FnMut(&mut E) -> Result<bool, HandlerError>,
) -> bool {
    let mut pruned = false;
    let mut i = 0;
    while i < entries.len() {
        match call(&mut entries[i]) {
            Ok(ran) => {
                report.handler_calls += usize::from(ran);
                i += 1;
            }
            Err(err) => {
                let id = entries[i].id();
                report.handler_calls += 1;
                report.faults += 1;
                log::warn!("{id} failed on {context}: {err}");
                match policy {
                    FaultPolicy::Log => i += 1,
                    FaultPolicy::Unregister => {
                        entries.remove(i);
                        pruned = true;
                        log::debug!("{id} unregistered after failure");
                    }
                }
            }
        }
    }
    pruned
}
