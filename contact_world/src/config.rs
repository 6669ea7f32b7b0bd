// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World configuration.

/// Upper bound on [`WorldConfig::max_layers`].
///
/// Per-layer flags are packed into a `u32`.
pub const MAX_LAYERS: usize = 32;

/// Slot count used when [`WorldConfig::initial_capacity`] is zero.
pub const FALLBACK_CAPACITY: usize = 16;

/// What to do with a handler after it returns an error.
///
/// In both cases the fault is logged, counted in the
/// [`StepReport`](crate::StepReport), and the remaining handlers still run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Keep the handler registered.
    #[default]
    Log,
    /// Unregister the handler after its first failure.
    Unregister,
}

/// Construction parameters for a [`World`](crate::World).
///
/// ```
/// use contact_world::{FaultPolicy, World, WorldConfig};
///
/// let config = WorldConfig::default()
///     .with_initial_capacity(64)
///     .with_max_layers(8)
///     .with_fault_policy(FaultPolicy::Unregister);
/// let world: World = World::with_config(config).unwrap();
/// assert_eq!(world.capacity(), 64);
/// assert_eq!(world.max_layers(), 8);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Number of collider slots reserved up front. Zero selects
    /// [`FALLBACK_CAPACITY`].
    pub initial_capacity: usize,
    /// Number of layers; at most [`MAX_LAYERS`].
    pub max_layers: usize,
    /// Handling of failing handlers.
    pub fault_policy: FaultPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { initial_capacity: 256, max_layers: 5, fault_policy: FaultPolicy::Log }
    }
}

impl WorldConfig {
    /// Set the initial slot capacity.
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the layer count.
    pub const fn with_max_layers(mut self, max_layers: usize) -> Self {
        self.max_layers = max_layers;
        self
    }

    /// Set the fault policy.
    pub const fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    pub(crate) const fn effective_capacity(&self) -> usize {
        if self.initial_capacity == 0 {
            FALLBACK_CAPACITY
        } else {
            self.initial_capacity
        }
    }
}
