// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core value types: collider handles, collider snapshots, and the records
//! handed to handlers.

use core::fmt;

use contact_shapes::{Body, Shape, ShapeKind};
use kurbo::Point;

/// Handle to a collider in a [`World`](crate::World).
///
/// A handle is the index of the collider's slot. It stays the same for the
/// collider's whole life, including across capacity growth, and becomes
/// invalid once the collider is removed. After removal the same value may be
/// handed out again to a new collider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(u32);

impl ColliderId {
    /// Rebuild a handle from its raw value, e.g. one stored by a game script.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value of this handle.
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    #[allow(clippy::cast_possible_truncation, reason = "slot count is capped at u32::MAX")]
    pub(crate) const fn from_idx(idx: usize) -> Self {
        Self(idx as u32)
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cosmetic RGBA color carried by colliders for debug drawing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque white, the default collider color.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgba(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::rgba(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgba(0, 0, 255, 255);

    /// Build a color from its components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Read-only copy of a collider's state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collider {
    /// Handle of this collider.
    pub id: ColliderId,
    /// Layer the collider lives on.
    pub layer: usize,
    /// World-space center.
    pub center: Point,
    /// Geometry around the center. The kind never changes after creation.
    pub shape: Shape,
    /// Whether the collider takes part in detection.
    pub active: bool,
    /// Debug drawing color.
    pub color: Color,
}

impl Collider {
    /// The collider's geometry placed at its center.
    #[inline]
    pub fn body(&self) -> Body {
        Body::new(self.center, self.shape)
    }
}

/// Description of a collider to create with [`World::create`](crate::World::create).
///
/// ```
/// use contact_world::{ColliderDesc, Color};
/// use kurbo::{Point, Vec2};
///
/// let wall = ColliderDesc::aabb(Vec2::new(50.0, 10.0))
///     .at(Point::new(0.0, 200.0))
///     .on_layer(3)
///     .with_color(Color::BLUE)
///     .inactive();
/// assert!(!wall.active);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColliderDesc {
    /// Geometry.
    pub shape: Shape,
    /// Layer, validated against the world's layer count.
    pub layer: usize,
    /// Initial center.
    pub center: Point,
    /// Initial active state.
    pub active: bool,
    /// Debug drawing color.
    pub color: Color,
}

impl ColliderDesc {
    /// An active collider with the given shape at the origin on layer 0.
    pub const fn new(shape: Shape) -> Self {
        Self { shape, layer: 0, center: Point::ORIGIN, active: true, color: Color::WHITE }
    }

    /// A circle of the given radius.
    pub const fn circle(radius: f64) -> Self {
        Self::new(Shape::circle(radius))
    }

    /// An axis-aligned box with the given half extents.
    pub const fn aabb(half_extents: kurbo::Vec2) -> Self {
        Self::new(Shape::aabb(half_extents))
    }

    /// Set the center.
    pub const fn at(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    /// Set the layer.
    pub const fn on_layer(mut self, layer: usize) -> Self {
        self.layer = layer;
        self
    }

    /// Set the color.
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Create the collider inactive.
    pub const fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Record passed to layer-pair handlers.
///
/// For continuous handlers the `a` side belongs to the first layer of the
/// handler's registered pair. For enter and exit handlers the `a` side is the
/// lower layer, or the lower id when both share a layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollisionInfo {
    /// First collider.
    pub id_a: ColliderId,
    /// Second collider.
    pub id_b: ColliderId,
    /// Layer of the first collider.
    pub layer_a: usize,
    /// Layer of the second collider.
    pub layer_b: usize,
    /// Shape kind of the first collider.
    pub shape_a: ShapeKind,
    /// Shape kind of the second collider.
    pub shape_b: ShapeKind,
}

impl CollisionInfo {
    pub(crate) fn between(a: &Collider, b: &Collider) -> Self {
        Self {
            id_a: a.id,
            id_b: b.id,
            layer_a: a.layer,
            layer_b: b.layer,
            shape_a: a.shape.kind(),
            shape_b: b.shape.kind(),
        }
    }

    /// The same record with the two sides exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            id_a: self.id_b,
            id_b: self.id_a,
            layer_a: self.layer_b,
            layer_b: self.layer_a,
            shape_a: self.shape_b,
            shape_b: self.shape_a,
        }
    }
}

impl fmt::Display for CollisionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?} on layer {}) / {} ({:?} on layer {})",
            self.id_a, self.shape_a, self.layer_a, self.id_b, self.shape_b, self.layer_b
        )
    }
}

/// When an instance handler fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InstanceTrigger {
    /// Every step the two colliders overlap.
    Overlap,
    /// On the first step of an overlap.
    Enter,
    /// When an overlap ends, including forced ends from removal or
    /// deactivation.
    Exit,
}

/// Record passed to instance handlers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceContact {
    /// What caused this invocation.
    pub trigger: InstanceTrigger,
    /// The collider the handler is bound to.
    pub bound: ColliderId,
    /// Layer of the bound collider.
    pub bound_layer: usize,
    /// The collider whose owner was probed.
    pub other: ColliderId,
    /// Layer of the probed collider; the layer the handler watches.
    pub other_layer: usize,
}

impl fmt::Display for InstanceContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} of {} (layer {}) with {} (layer {})",
            self.trigger, self.bound, self.bound_layer, self.other, self.other_layer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[test]
    fn swapped_exchanges_every_field() {
        let info = CollisionInfo {
            id_a: ColliderId::from_raw(1),
            id_b: ColliderId::from_raw(7),
            layer_a: 0,
            layer_b: 3,
            shape_a: ShapeKind::Circle,
            shape_b: ShapeKind::Box,
        };
        let s = info.swapped();
        assert_eq!(s.id_a, ColliderId::from_raw(7));
        assert_eq!(s.layer_a, 3);
        assert_eq!(s.shape_a, ShapeKind::Box);
        assert_eq!(s.swapped(), info, "swapping twice is the identity");
    }

    #[test]
    fn desc_builder_sets_fields() {
        let d = ColliderDesc::aabb(Vec2::new(2.0, 3.0))
            .at(Point::new(1.0, 1.0))
            .on_layer(2)
            .with_color(Color::RED);
        assert_eq!(d.layer, 2);
        assert_eq!(d.center, Point::new(1.0, 1.0));
        assert_eq!(d.color, Color::RED);
        assert!(d.active, "descriptors start active");
    }

    #[test]
    fn id_display_and_raw() {
        let id = ColliderId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(alloc::format!("{id}"), "#42");
    }
}
