// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forced exits: removing or deactivating a collider ends its contacts
//! right away instead of on the next step.
//!
//! Run:
//! - `cargo run -p contact_demos --example removal`

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use contact_world::{Error, World};
use kurbo::Point;

const SENSORS: usize = 0;
const CRATES: usize = 1;

fn owner<T: Any>(value: T) -> Rc<RefCell<dyn Any>> {
    Rc::new(RefCell::new(value))
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut world: World = World::new();
    world.on_enter(SENSORS, CRATES, |info| {
        log::info!("enter {info}");
        Ok(())
    })?;
    world.on_exit(SENSORS, CRATES, |info| {
        log::info!("exit  {info}");
        Ok(())
    })?;

    let sensor = world.create_circle(Point::ORIGIN, 20.0, SENSORS, owner("sensor"))?;
    let left = world.create_circle(Point::new(-15.0, 0.0), 10.0, CRATES, owner(1_u32))?;
    let right = world.create_circle(Point::new(15.0, 0.0), 10.0, CRATES, owner(2_u32))?;

    log::info!("step 1");
    world.process();

    log::info!("deactivate {left}");
    world.set_active(left, false);
    log::info!("remove {right}");
    world.remove(right);

    log::info!("step 2: nothing left to exit");
    let report = world.process();
    log::info!("{report:?}");

    log::info!("reactivate {left}");
    world.set_active(left, true);
    world.process();

    let reused = world.create_circle(Point::new(0.0, 15.0), 10.0, CRATES, owner(3_u32))?;
    log::info!("new crate reuses slot: {reused} (was {right})");
    world.process();

    log::info!("sensor still valid: {}", world.is_valid(sensor));
    log::info!("{}", world.snapshot());
    Ok(())
}
