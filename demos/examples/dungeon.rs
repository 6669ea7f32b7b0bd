// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small dungeon: a player shoots bullets at slimes bouncing inside walls.
//!
//! Shows layer-pair handlers, per-bullet instance handlers that probe their
//! target for a `Health` capability, and the deferred command queue used to
//! change the world after a step.
//!
//! Run:
//! - `cargo run -p contact_demos --example dungeon`
//! - `RUST_LOG=debug cargo run -p contact_demos --example dungeon` to see the
//!   world's own lifecycle logging.

use std::cell::RefCell;
use std::rc::Rc;

use contact_world::{ColliderId, Error, InstanceTrigger, Shape, World, WorldConfig};
use kurbo::{Point, Vec2};

const PLAYER: usize = 0;
const WALLS: usize = 1;
const ENEMIES: usize = 2;
const BULLETS: usize = 3;

struct Health {
    hp: i32,
}

/// Everything that owns a collider.
trait Actor {
    fn name(&self) -> &str;

    fn health(&mut self) -> Option<&mut Health> {
        None
    }
}

struct Player {
    health: Health,
}

impl Actor for Player {
    fn name(&self) -> &str {
        "player"
    }

    fn health(&mut self) -> Option<&mut Health> {
        Some(&mut self.health)
    }
}

struct Slime {
    name: &'static str,
    health: Health,
}

impl Actor for Slime {
    fn name(&self) -> &str {
        self.name
    }

    fn health(&mut self) -> Option<&mut Health> {
        Some(&mut self.health)
    }
}

struct Wall;

impl Actor for Wall {
    fn name(&self) -> &str {
        "wall"
    }
}

struct Bullet;

impl Actor for Bullet {
    fn name(&self) -> &str {
        "bullet"
    }
}

/// Changes requested by handlers, applied after each step.
enum Command {
    Despawn(ColliderId),
    Bounce { slime: ColliderId, wall: ColliderId },
}

type Queue = Rc<RefCell<Vec<Command>>>;

struct Mover {
    id: ColliderId,
    velocity: Vec2,
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut world: World<dyn Actor> =
        World::with_config(WorldConfig::default().with_max_layers(4).with_initial_capacity(32))?;
    let queue: Queue = Rc::default();

    // Arena walls: top, bottom, left, right.
    for (center, half) in [
        (Point::new(200.0, 0.0), Vec2::new(200.0, 10.0)),
        (Point::new(200.0, 400.0), Vec2::new(200.0, 10.0)),
        (Point::new(0.0, 200.0), Vec2::new(10.0, 200.0)),
        (Point::new(400.0, 200.0), Vec2::new(10.0, 200.0)),
    ] {
        world.create_box(center, half, WALLS, Rc::new(RefCell::new(Wall)))?;
    }

    let player = Rc::new(RefCell::new(Player { health: Health { hp: 3 } }));
    let player_id = world.create_box(
        Point::new(200.0, 360.0),
        Vec2::new(12.0, 12.0),
        PLAYER,
        player.clone(),
    )?;

    let mut slimes = Vec::new();
    for (name, center, velocity, hp) in [
        ("green slime", Point::new(120.0, 80.0), Vec2::new(3.0, 0.0), 2),
        ("red slime", Point::new(300.0, 120.0), Vec2::new(-2.0, 4.0), 1),
    ] {
        let owner = Rc::new(RefCell::new(Slime { name, health: Health { hp } }));
        let id = world.create_circle(center, 16.0, ENEMIES, owner)?;
        slimes.push(Mover { id, velocity });
    }

    // Touching a slime hurts the player.
    let p = player.clone();
    world.on_enter(PLAYER, ENEMIES, move |info| {
        let mut player = p.borrow_mut();
        player.health.hp -= 1;
        log::info!("player touched {}; hp {}", info.id_b, player.health.hp);
        Ok(())
    })?;

    // Bullets stop at walls.
    let q = queue.clone();
    world.on_enter(BULLETS, WALLS, move |info| {
        // Lower layer first: WALLS is `a`, the bullet is `b`.
        q.borrow_mut().push(Command::Despawn(info.id_b));
        Ok(())
    })?;

    // Slimes bounce off walls.
    let q = queue.clone();
    world.on_enter(ENEMIES, WALLS, move |info| {
        q.borrow_mut().push(Command::Bounce { slime: info.id_b, wall: info.id_a });
        Ok(())
    })?;

    let mut bullets: Vec<Mover> = Vec::new();
    for tick in 0..240 {
        if tick % 20 == 0 {
            let muzzle = world.collider(player_id).map_or(Point::new(200.0, 360.0), |c| c.center);
            let center = muzzle - Vec2::new(0.0, 20.0);
            let id = world.create_circle(center, 4.0, BULLETS, Rc::new(RefCell::new(Bullet)))?;
            let q = queue.clone();
            world.on_instance(
                InstanceTrigger::Enter,
                ENEMIES,
                id,
                Actor::health,
                move |health, contact| {
                    health.hp -= 1;
                    log::info!("{} hit {}; hp {}", contact.bound, contact.other, health.hp);
                    let mut q = q.borrow_mut();
                    q.push(Command::Despawn(contact.bound));
                    if health.hp <= 0 {
                        q.push(Command::Despawn(contact.other));
                    }
                    Ok(())
                },
            )?;
            bullets.push(Mover { id, velocity: Vec2::new(0.0, -8.0) });
        }

        for m in slimes.iter().chain(&bullets) {
            if let Some(c) = world.collider(m.id) {
                world.set_position(m.id, c.center + m.velocity);
            }
        }

        let report = world.process();
        if report.enters + report.exits > 0 {
            log::debug!("tick {tick}: {report:?}");
        }

        let commands = std::mem::take(&mut *queue.borrow_mut());
        for command in commands {
            match command {
                Command::Despawn(id) => {
                    if let Some(owner) = world.owner(id) {
                        log::info!("tick {tick}: despawn {} {id}", owner.borrow().name());
                    }
                    world.unregister_bound(id);
                    world.remove(id);
                    slimes.retain(|m| m.id != id);
                    bullets.retain(|m| m.id != id);
                }
                Command::Bounce { slime, wall } => {
                    let Some(Shape::Box { half_extents }) = world.collider(wall).map(|c| c.shape)
                    else {
                        continue;
                    };
                    if let Some(m) = slimes.iter_mut().find(|m| m.id == slime) {
                        if half_extents.x > half_extents.y {
                            m.velocity.y = -m.velocity.y;
                        } else {
                            m.velocity.x = -m.velocity.x;
                        }
                    }
                }
            }
        }

        if player.borrow().health.hp <= 0 || slimes.is_empty() {
            log::info!("tick {tick}: game over");
            break;
        }
    }

    log::info!(
        "player hp {}, {} slimes left\n{}",
        player.borrow().health.hp,
        slimes.len(),
        world.snapshot()
    );
    Ok(())
}
