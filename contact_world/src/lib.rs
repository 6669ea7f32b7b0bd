// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contact World: layered overlap detection with enter/stay/exit dispatch.
//!
//! ## Overview
//!
//! A [`World`] holds circle and box colliders, each on one of up to 32
//! numbered layers. Every call to [`World::process`] tests the colliders
//! against each other and runs the handlers interested in what it finds:
//!
//! - **Layer-pair handlers** listen to an ordered or unordered pair of layers.
//!   [`World::on_overlap`] handlers run every step a pair overlaps;
//!   [`World::on_enter`] and [`World::on_exit`] handlers run once when an
//!   overlap starts and ends.
//! - **Instance handlers** ([`World::on_instance`]) are bound to one collider
//!   and watch one layer. When the bound collider meets a collider on that
//!   layer, the handler probes the other collider's *owner* for a capability
//!   and runs only if the owner has it.
//!
//! Removing or disabling a collider fires exit handlers for everything it
//! was overlapping before it goes away.
//!
//! ## Layer gating
//!
//! Pairs of colliders whose layers no handler listens to are skipped before
//! any geometry is computed. The [`StepReport`] returned by `process` counts
//! visited, gated, and tested pairs.
//!
//! ## Owners and capabilities
//!
//! Every collider carries an `Rc<RefCell<O>>` owner. With the default
//! `O = dyn Any`, probe with [`downcast`]. With your own trait object, probe
//! with an accessor method on the trait:
//!
//! ```
//! use contact_world::{InstanceTrigger, World};
//! use kurbo::Point;
//! use std::{cell::RefCell, rc::Rc};
//!
//! struct Health(u32);
//!
//! trait Actor {
//!     fn health(&mut self) -> Option<&mut Health> {
//!         None
//!     }
//! }
//!
//! struct Wall;
//! impl Actor for Wall {}
//!
//! struct Slime(Health);
//! impl Actor for Slime {
//!     fn health(&mut self) -> Option<&mut Health> {
//!         Some(&mut self.0)
//!     }
//! }
//!
//! let mut world: World<dyn Actor> = World::new();
//! let slime = Rc::new(RefCell::new(Slime(Health(3))));
//! let spikes = world
//!     .create_circle(Point::new(0.0, 0.0), 10.0, 0, Rc::new(RefCell::new(Wall)))
//!     .unwrap();
//! world.create_circle(Point::new(5.0, 0.0), 10.0, 1, slime.clone()).unwrap();
//! world.create_circle(Point::new(-5.0, 0.0), 10.0, 1, Rc::new(RefCell::new(Wall))).unwrap();
//!
//! world
//!     .on_instance(InstanceTrigger::Overlap, 1, spikes, Actor::health, |hp, _| {
//!         hp.0 -= 1;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! world.process();
//! world.process();
//! assert_eq!(slime.borrow().0 .0, 1, "two steps on the spikes; the wall has no health");
//! ```
//!
//! ## Ordering
//!
//! Within a step, pairs are visited by ascending id. For each overlapping
//! pair, continuous handlers run for both orientations, then instance
//! handlers. Enter handlers for all new pairs run after the scan, then exit
//! handlers for all ended pairs, each in ascending pair order. Enter and exit
//! records put the lower layer on the `a` side.
//!
//! ## Failures
//!
//! Handlers return [`HandlerResult`]. An error is logged with the `log`
//! crate, counted in the [`StepReport`], and, under
//! [`FaultPolicy::Unregister`], removes that handler. Other handlers still
//! run.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
mod dispatch;
pub mod error;
pub mod handlers;
pub mod matrix;
mod pairs;
pub mod report;
mod store;
pub mod types;
mod world;

pub use config::{FaultPolicy, MAX_LAYERS, WorldConfig};
pub use contact_shapes::{Body, Shape, ShapeKind};
pub use error::{Error, HandlerError, HandlerResult};
pub use handlers::{HandlerId, downcast};
pub use matrix::{SubscriptionMatrix, Subscriptions};
pub use pairs::PairKey;
pub use report::{DebugSnapshot, StepReport};
pub use types::{
    Collider, ColliderDesc, ColliderId, CollisionInfo, Color, InstanceContact, InstanceTrigger,
};
pub use world::World;
