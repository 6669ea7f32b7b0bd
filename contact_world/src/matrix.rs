// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer subscription matrix: which layer pairs anyone listens to.
//!
//! The dispatch loop asks [`SubscriptionMatrix::is_interesting`] before doing
//! any geometry for a pair, so pairs on layers without handlers cost one
//! lookup.

use alloc::vec;
use alloc::vec::Vec;

bitflags::bitflags! {
    /// Kinds of layer-pair handlers registered for one ordered layer pair.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Subscriptions: u8 {
        /// At least one handler runs every overlapping step.
        const CONTINUOUS = 0b0000_0001;
        /// At least one handler runs when an overlap starts.
        const ENTER      = 0b0000_0010;
        /// At least one handler runs when an overlap ends.
        const EXIT       = 0b0000_0100;
    }
}

/// Per ordered layer pair [`Subscriptions`], plus a per-layer bit for
/// "some instance handler watches this layer".
///
/// The instance bit is a conservative "maybe": it does not know which ids
/// the handlers are bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionMatrix {
    max_layers: usize,
    cells: Vec<Subscriptions>,
    instance_layers: u32,
}

impl SubscriptionMatrix {
    /// An empty matrix for `max_layers` layers (at most 32).
    pub(crate) fn new(max_layers: usize) -> Self {
        debug_assert!(max_layers <= crate::MAX_LAYERS, "layer count checked by World");
        Self {
            max_layers,
            cells: vec![Subscriptions::empty(); max_layers * max_layers],
            instance_layers: 0,
        }
    }

    /// Number of layers.
    pub fn max_layers(&self) -> usize {
        self.max_layers
    }

    /// Flags registered for the ordered pair `(a, b)`.
    ///
    /// Out-of-range layers have no subscriptions.
    pub fn get(&self, a: usize, b: usize) -> Subscriptions {
        self.cell(a, b).map(|i| self.cells[i]).unwrap_or_else(Subscriptions::empty)
    }

    /// Whether any instance handler watches `layer`.
    pub fn has_instance_handlers(&self, layer: usize) -> bool {
        layer < self.max_layers && self.instance_layers & (1 << layer) != 0
    }

    /// Bitmask of layers watched by instance handlers.
    pub fn instance_layers(&self) -> u32 {
        self.instance_layers
    }

    /// Whether a pair of colliders on layers `a` and `b` needs a geometry test.
    ///
    /// Symmetric in its arguments.
    #[inline]
    pub fn is_interesting(&self, a: usize, b: usize) -> bool {
        !(self.get(a, b) | self.get(b, a)).is_empty()
            || self.has_instance_handlers(a)
            || self.has_instance_handlers(b)
    }

    /// Non-empty cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Subscriptions)> + '_ {
        let n = self.max_layers;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(move |(i, s)| (i / n, i % n, *s))
    }

    pub(crate) fn set(&mut self, a: usize, b: usize, kind: Subscriptions, on: bool) {
        if let Some(i) = self.cell(a, b) {
            self.cells[i].set(kind, on);
        }
    }

    pub(crate) fn set_instance_layer(&mut self, layer: usize, on: bool) {
        if layer >= self.max_layers {
            return;
        }
        if on {
            self.instance_layers |= 1 << layer;
        } else {
            self.instance_layers &= !(1 << layer);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Subscriptions::empty());
        self.instance_layers = 0;
    }

    fn cell(&self, a: usize, b: usize) -> Option<usize> {
        (a < self.max_layers && b < self.max_layers).then(|| a * self.max_layers + b)
    }
}
