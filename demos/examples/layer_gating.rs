// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer gating: pairs whose layers nobody listens to never reach the
//! narrow phase.
//!
//! The same crowd of colliders is stepped twice, first with no handlers and
//! then with a single overlap handler on one layer pair, and the step
//! reports are compared.
//!
//! Run:
//! - `cargo run -p contact_demos --example layer_gating`

use std::cell::RefCell;
use std::rc::Rc;

use contact_world::{Error, World};
use kurbo::{Point, Vec2};

const LAYERS: usize = 4;

fn populate(world: &mut World<()>) -> Result<(), Error> {
    for (i, layer) in (0..40_u32).zip((0..LAYERS).cycle()) {
        let x = f64::from(i % 8) * 14.0;
        let y = f64::from(i / 8) * 14.0;
        let owner = Rc::new(RefCell::new(()));
        if i % 2 == 0 {
            world.create_circle(Point::new(x, y), 9.0, layer, owner)?;
        } else {
            world.create_box(Point::new(x, y), Vec2::new(8.0, 8.0), layer, owner)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut world = World::<()>::new();
    populate(&mut world)?;

    let idle = world.process();
    log::info!("no handlers: {idle:?}");

    let hits = Rc::new(RefCell::new(0_usize));
    let h = hits.clone();
    world.on_overlap(0, 2, move |info| {
        log::debug!("{info}");
        *h.borrow_mut() += 1;
        Ok(())
    })?;

    let gated = world.process();
    log::info!("overlap handler on 0 -> 2: {gated:?}");
    log::info!(
        "{} of {} pairs skipped by the matrix; handler ran {} times",
        gated.pairs_gated,
        gated.pairs_considered,
        hits.borrow()
    );
    log::info!("{}", world.snapshot());
    Ok(())
}
