// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`World`] facade.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;

use contact_shapes::Shape;
use kurbo::{Circle, Point, Rect, Vec2};

use crate::config::{MAX_LAYERS, WorldConfig};
use crate::dispatch::Dispatcher;
use crate::error::{Error, HandlerResult};
use crate::handlers::{HandlerId, HandlerRegistry, PairPhase};
use crate::matrix::SubscriptionMatrix;
use crate::pairs::{PairKey, PairTracker};
use crate::report::{DebugSnapshot, StepReport};
use crate::store::ColliderStore;
use crate::types::{
    Collider, ColliderDesc, ColliderId, CollisionInfo, Color, InstanceContact, InstanceTrigger,
};

/// A set of colliders, the handlers listening to them, and the overlap state
/// between steps.
///
/// `O` is the owner type: every collider carries an `Rc<RefCell<O>>` that
/// instance handlers probe for capabilities. It defaults to `dyn Any`, paired
/// with the [`downcast`](crate::downcast) probe; a game-specific trait object
/// works just as well.
///
/// Handlers are stored in the world and run while it is mutably borrowed, so
/// they cannot call back into it. Queue structural changes (removal, creation)
/// from handlers and apply them after [`World::process`] returns.
pub struct World<O: ?Sized = dyn Any> {
    config: WorldConfig,
    store: ColliderStore<O>,
    registry: HandlerRegistry<O>,
    pairs: PairTracker,
    /// Reused buffer for pairs dropped by forced exits.
    scratch: Vec<PairKey>,
}

impl<O: ?Sized> core::fmt::Debug for World<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("registry", &self.registry)
            .field("tracked_pairs", &self.pairs.len())
            .finish_non_exhaustive()
    }
}

impl<O: ?Sized + 'static> Default for World<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ?Sized + 'static> World<O> {
    /// A world with [`WorldConfig::default`].
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// A world with the given configuration.
    ///
    /// Fails with [`Error::TooManyLayers`] if `config.max_layers` exceeds
    /// [`MAX_LAYERS`].
    pub fn with_config(config: WorldConfig) -> Result<Self, Error> {
        if config.max_layers > MAX_LAYERS {
            return Err(Error::TooManyLayers(config.max_layers));
        }
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        Self {
            config,
            store: ColliderStore::with_capacity(config.effective_capacity()),
            registry: HandlerRegistry::new(config.max_layers, config.fault_policy),
            pairs: PairTracker::default(),
            scratch: Vec::new(),
        }
    }

    /// The configuration this world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of layers.
    pub fn max_layers(&self) -> usize {
        self.config.max_layers
    }

    fn check_layer(&self, layer: usize) -> Result<(), Error> {
        if layer < self.config.max_layers {
            Ok(())
        } else {
            Err(Error::InvalidLayer { layer, max_layers: self.config.max_layers })
        }
    }

    // --- colliders ---

    /// Create a collider from a description.
    ///
    /// Fails if the geometry is not strictly positive and finite, or the
    /// layer is out of range.
    pub fn create(
        &mut self,
        desc: ColliderDesc,
        owner: Rc<RefCell<O>>,
    ) -> Result<ColliderId, Error> {
        if !desc.shape.is_valid() {
            return Err(Error::InvalidGeometry(desc.shape));
        }
        self.check_layer(desc.layer)?;
        let collider = Collider {
            id: ColliderId::from_raw(0),
            layer: desc.layer,
            center: desc.center,
            shape: desc.shape,
            active: desc.active,
            color: desc.color,
        };
        let id = self.store.insert(collider, owner);
        log::debug!(
            "created {id}: {:?} on layer {} at {:?}",
            desc.shape.kind(),
            desc.layer,
            desc.center
        );
        Ok(id)
    }

    /// Create an active circle collider.
    pub fn create_circle(
        &mut self,
        center: Point,
        radius: f64,
        layer: usize,
        owner: Rc<RefCell<O>>,
    ) -> Result<ColliderId, Error> {
        self.create(ColliderDesc::circle(radius).at(center).on_layer(layer), owner)
    }

    /// Create an active axis-aligned box collider.
    pub fn create_box(
        &mut self,
        center: Point,
        half_extents: Vec2,
        layer: usize,
        owner: Rc<RefCell<O>>,
    ) -> Result<ColliderId, Error> {
        self.create(ColliderDesc::aabb(half_extents).at(center).on_layer(layer), owner)
    }

    /// Remove a collider.
    ///
    /// Exit handlers fire first for every pair it was overlapping. The id
    /// then becomes invalid and may be reused by a later creation. Instance
    /// handlers bound to the id stay registered; see
    /// [`unregister_bound`](Self::unregister_bound).
    pub fn remove(&mut self, id: ColliderId) {
        if !self.store.is_valid(id) {
            log::trace!("remove: stale {id}");
            return;
        }
        let exits = self.force_exits(id);
        self.store.remove(id);
        log::debug!("removed {id} ({exits} forced exits)");
    }

    /// Remove every collider without firing exit handlers.
    ///
    /// Handlers stay registered.
    pub fn remove_all(&mut self) {
        log::debug!("removing all {} colliders", self.store.len());
        self.store.clear();
        self.pairs.clear();
    }

    /// Enable or disable a collider.
    ///
    /// Disabling fires exit handlers for every pair it was overlapping.
    /// Enabling takes effect at the next [`process`](Self::process).
    pub fn set_active(&mut self, id: ColliderId, active: bool) {
        let Some(was_active) = self.store.get(id).map(|c| c.active) else {
            log::trace!("set_active: stale {id}");
            return;
        };
        if was_active && !active {
            self.force_exits(id);
        }
        if let Some(c) = self.store.get_mut(id) {
            c.active = active;
        }
    }

    /// Move a collider.
    pub fn set_position(&mut self, id: ColliderId, center: Point) {
        match self.store.get_mut(id) {
            Some(c) => c.center = center,
            None => log::trace!("set_position: stale {id}"),
        }
    }

    /// Change a circle's radius.
    ///
    /// Ignored for boxes and for radii that are not positive and finite.
    pub fn set_radius(&mut self, id: ColliderId, radius: f64) {
        self.reshape(id, Shape::circle(radius));
    }

    /// Change a box's half extents.
    ///
    /// Ignored for circles and for extents that are not positive and finite.
    pub fn set_half_extents(&mut self, id: ColliderId, half_extents: Vec2) {
        self.reshape(id, Shape::aabb(half_extents));
    }

    fn reshape(&mut self, id: ColliderId, shape: Shape) {
        let Some(c) = self.store.get_mut(id) else {
            log::trace!("reshape: stale {id}");
            return;
        };
        if c.shape.kind() != shape.kind() {
            log::trace!("reshape: {id} is a {:?}", c.shape.kind());
            return;
        }
        if !shape.is_valid() {
            log::trace!("reshape: rejected {shape:?} for {id}");
            return;
        }
        c.shape = shape;
    }

    /// Change a collider's debug color.
    pub fn set_color(&mut self, id: ColliderId, color: Color) {
        match self.store.get_mut(id) {
            Some(c) => c.color = color,
            None => log::trace!("set_color: stale {id}"),
        }
    }

    /// Exit every tracked pair involving `id`, leaving the collider in place.
    fn force_exits(&mut self, id: ColliderId) -> usize {
        let mut dropped = core::mem::take(&mut self.scratch);
        self.pairs.drain_involving(id, &mut dropped);
        let mut report = StepReport::default();
        let mut dispatcher = Dispatcher {
            store: &self.store,
            registry: &mut self.registry,
            report: &mut report,
        };
        for &key in &dropped {
            dispatcher.transition(key, PairPhase::Exit);
        }
        if report.faults > 0 {
            log::debug!("{} handler faults during forced exits of {id}", report.faults);
        }
        let count = dropped.len();
        dropped.clear();
        self.scratch = dropped;
        count
    }

    // --- queries ---

    /// Whether `id` refers to a live collider.
    pub fn is_valid(&self, id: ColliderId) -> bool {
        self.store.is_valid(id)
    }

    /// A copy of a collider's state.
    pub fn collider(&self, id: ColliderId) -> Option<Collider> {
        self.store.get(id).copied()
    }

    /// Circle enclosing a collider, for debug drawing.
    pub fn bounds(&self, id: ColliderId) -> Option<Circle> {
        self.store.get(id).map(|c| c.body().bounding_circle())
    }

    /// Axis-aligned bounding box of a collider.
    pub fn bounding_box(&self, id: ColliderId) -> Option<Rect> {
        self.store.get(id).map(|c| c.body().bounding_box())
    }

    /// The owner a collider was created with.
    pub fn owner(&self, id: ColliderId) -> Option<Rc<RefCell<O>>> {
        self.store.owner(id).cloned()
    }

    /// Whether `a` and `b` were overlapping at the end of the last step.
    ///
    /// Only pairs some handler listens to are tracked.
    pub fn is_overlapping(&self, a: ColliderId, b: ColliderId) -> bool {
        self.pairs.contains(PairKey::new(a, b))
    }

    /// Number of live colliders.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether there are no live colliders.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot capacity. Grows by doubling; growth never renumbers colliders.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Number of freed slots waiting for reuse.
    pub fn free_count(&self) -> usize {
        self.store.free_count()
    }

    /// Live colliders in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Collider> + '_ {
        self.store.iter()
    }

    /// The layer subscription matrix.
    pub fn subscriptions(&self) -> &SubscriptionMatrix {
        &self.registry.matrix
    }

    /// Summary for logging and debug overlays.
    pub fn snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            capacity: self.store.capacity(),
            live: self.store.len(),
            free: self.store.free_count(),
            active: self.store.iter().filter(|c| c.active).count(),
            tracked_pairs: self.pairs.len(),
            handlers: self.registry.len(),
            max_layers: self.config.max_layers,
            subscriptions: self.registry.matrix.iter().collect(),
            instance_layers: self.registry.matrix.instance_layers(),
        }
    }

    // --- handlers ---

    /// Run `handler` every step a collider on layer `a` overlaps one on
    /// layer `b`.
    ///
    /// The record's `a` side is the collider on layer `a`. When `a == b` the
    /// handler runs twice per overlapping pair, once per orientation.
    pub fn on_overlap<F>(&mut self, a: usize, b: usize, handler: F) -> Result<HandlerId, Error>
    where
        F: FnMut(&CollisionInfo) -> HandlerResult + 'static,
    {
        self.add_pair(PairPhase::Continuous, a, b, Box::new(handler))
    }

    /// Run `handler` once when colliders on layers `a` and `b` start
    /// overlapping.
    ///
    /// Registration is unordered: `(a, b)` and `(b, a)` are the same list.
    /// The record's `a` side is the lower layer.
    pub fn on_enter<F>(&mut self, a: usize, b: usize, handler: F) -> Result<HandlerId, Error>
    where
        F: FnMut(&CollisionInfo) -> HandlerResult + 'static,
    {
        self.add_pair(PairPhase::Enter, a, b, Box::new(handler))
    }

    /// Run `handler` once when colliders on layers `a` and `b` stop
    /// overlapping, or one of them is removed or disabled while overlapping.
    ///
    /// Registration is unordered, as for [`on_enter`](Self::on_enter).
    pub fn on_exit<F>(&mut self, a: usize, b: usize, handler: F) -> Result<HandlerId, Error>
    where
        F: FnMut(&CollisionInfo) -> HandlerResult + 'static,
    {
        self.add_pair(PairPhase::Exit, a, b, Box::new(handler))
    }

    fn add_pair(
        &mut self,
        phase: PairPhase,
        a: usize,
        b: usize,
        handler: Box<dyn FnMut(&CollisionInfo) -> HandlerResult>,
    ) -> Result<HandlerId, Error> {
        self.check_layer(a)?;
        self.check_layer(b)?;
        Ok(self.registry.add_pair(phase, a, b, handler))
    }

    /// Bind a handler to collider `bound` that reacts to colliders on
    /// `layer` whose owner has a capability.
    ///
    /// When `bound` meets a collider on `layer` (every overlapping step, or
    /// on enter or exit, per `trigger`), `probe` runs on that collider's
    /// owner. If it returns `Some`, `action` runs with the capability;
    /// otherwise nothing happens.
    ///
    /// The handler is keyed by id and stays registered when the collider is
    /// removed, so a later collider reusing the id inherits it. Use
    /// [`unregister_bound`](Self::unregister_bound) when removing colliders
    /// that have bound handlers.
    ///
    /// ```
    /// use contact_world::{downcast, InstanceTrigger, World};
    /// use kurbo::Point;
    /// use std::{cell::RefCell, rc::Rc};
    ///
    /// struct Slime { hp: u32 }
    /// const BULLETS: usize = 1;
    /// const ENEMIES: usize = 2;
    ///
    /// let mut world: World = World::new();
    /// let slime = Rc::new(RefCell::new(Slime { hp: 3 }));
    /// let bullet = world
    ///     .create_circle(Point::new(0.0, 0.0), 2.0, BULLETS, Rc::new(RefCell::new(())))
    ///     .unwrap();
    /// world
    ///     .create_circle(Point::new(3.0, 0.0), 5.0, ENEMIES, slime.clone())
    ///     .unwrap();
    ///
    /// world
    ///     .on_instance(InstanceTrigger::Enter, ENEMIES, bullet, downcast::<Slime>, |s, _| {
    ///         s.hp -= 1;
    ///         Ok(())
    ///     })
    ///     .unwrap();
    ///
    /// world.process();
    /// world.process();
    /// assert_eq!(slime.borrow().hp, 2);
    /// ```
    pub fn on_instance<C, F>(
        &mut self,
        trigger: InstanceTrigger,
        layer: usize,
        bound: ColliderId,
        probe: fn(&mut O) -> Option<&mut C>,
        action: F,
    ) -> Result<HandlerId, Error>
    where
        C: ?Sized + 'static,
        F: FnMut(&mut C, &InstanceContact) -> HandlerResult + 'static,
    {
        self.check_layer(layer)?;
        Ok(self.registry.add_instance(trigger, layer, bound, probe, action))
    }

    /// Unregister one handler. Returns whether it was registered.
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let found = self.registry.remove(id);
        if found {
            log::debug!("unregistered {id}");
        }
        found
    }

    /// Unregister every instance handler bound to `bound`. Returns how many
    /// were removed.
    pub fn unregister_bound(&mut self, bound: ColliderId) -> usize {
        self.registry.remove_bound(bound)
    }

    /// Unregister every handler.
    pub fn clear_handlers(&mut self) {
        self.registry.clear();
        log::debug!("cleared all handlers");
    }

    // --- stepping ---

    /// Detect overlaps and run handlers. Call once per tick, after moving
    /// colliders.
    pub fn process(&mut self) -> StepReport {
        let mut report = StepReport::default();
        Dispatcher {
            store: &self.store,
            registry: &mut self.registry,
            report: &mut report,
        }
        .step(&mut self.pairs);
        log::trace!("{report:?}");
        report
    }
}
