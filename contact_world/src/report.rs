// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-step counters and debug snapshots.

use alloc::vec::Vec;
use core::fmt;

use crate::matrix::Subscriptions;

/// Counters from one [`World::process`](crate::World::process) call.
///
/// Forced exits from [`World::remove`](crate::World::remove) and
/// [`World::set_active`](crate::World::set_active) happen outside a step and
/// are not counted here.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Unordered pairs of active colliders visited.
    pub pairs_considered: usize,
    /// Pairs skipped because no handler cares about their layers.
    pub pairs_gated: usize,
    /// Pairs whose bounding boxes did not touch.
    pub broad_rejects: usize,
    /// Exact shape tests run.
    pub narrow_tests: usize,
    /// Pairs found overlapping.
    pub overlaps: usize,
    /// Pairs that started overlapping this step.
    pub enters: usize,
    /// Pairs that stopped overlapping this step.
    pub exits: usize,
    /// Handler invocations, counting only instance handlers whose probe
    /// matched.
    pub handler_calls: usize,
    /// Handler invocations that returned an error.
    pub faults: usize,
}

/// Point-in-time summary of a world for logging and debug overlays.
///
/// Its `Display` form is a short multi-line table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugSnapshot {
    /// Slot capacity.
    pub capacity: usize,
    /// Live colliders.
    pub live: usize,
    /// Freed slots awaiting reuse.
    pub free: usize,
    /// Live colliders that are active.
    pub active: usize,
    /// Pairs overlapping as of the last step.
    pub tracked_pairs: usize,
    /// Registered handlers of every kind.
    pub handlers: usize,
    /// Configured layer count.
    pub max_layers: usize,
    /// Ordered layer pairs with at least one layer-pair handler.
    pub subscriptions: Vec<(usize, usize, Subscriptions)>,
    /// Bitmask of layers watched by instance handlers.
    pub instance_layers: u32,
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "colliders: {} live / {} active / {} free / {} capacity",
            self.live, self.active, self.free, self.capacity
        )?;
        writeln!(
            f,
            "pairs: {} tracked; handlers: {}",
            self.tracked_pairs, self.handlers
        )?;
        write!(f, "layers: {}", self.max_layers)?;
        for (a, b, subs) in &self.subscriptions {
            write!(f, "\n  {a} -> {b}:")?;
            for (name, flag) in [
                ("continuous", Subscriptions::CONTINUOUS),
                ("enter", Subscriptions::ENTER),
                ("exit", Subscriptions::EXIT),
            ] {
                if subs.contains(flag) {
                    write!(f, " {name}")?;
                }
            }
        }
        if self.instance_layers != 0 {
            write!(f, "\n  instance handlers on layers:")?;
            for layer in 0..self.max_layers {
                if self.instance_layers & (1 << layer) != 0 {
                    write!(f, " {layer}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn snapshot_display_lists_subscriptions() {
        let snap = DebugSnapshot {
            capacity: 16,
            live: 3,
            free: 1,
            active: 2,
            tracked_pairs: 1,
            handlers: 4,
            max_layers: 5,
            subscriptions: vec![(0, 2, Subscriptions::ENTER | Subscriptions::EXIT)],
            instance_layers: 0b1000,
        };
        let text = snap.to_string();
        assert!(text.starts_with("colliders: 3 live / 2 active / 1 free / 16 capacity"));
        assert!(text.contains("0 -> 2: enter exit"), "got:\n{text}");
        assert!(text.contains("instance handlers on layers: 3"), "got:\n{text}");
    }
}
