// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape and body types.

use kurbo::{Circle, Point, Rect, Vec2};

use crate::overlap;

/// The kind of a [`Shape`], without its extents.
///
/// A collider's kind never changes after creation, so this is what handlers
/// receive when they only need to know "circle or box".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A circle.
    Circle,
    /// An axis-aligned box.
    Box,
}

/// A collision shape, centered on its body's position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    /// A circle of the given radius.
    Circle {
        /// Circle radius; must be positive.
        radius: f64,
    },
    /// An axis-aligned box.
    Box {
        /// Half width (`x`) and half height (`y`); both must be positive.
        half_extents: Vec2,
    },
}

impl Shape {
    /// A circle with the given radius.
    pub const fn circle(radius: f64) -> Self {
        Self::Circle { radius }
    }

    /// An axis-aligned box with the given half extents.
    pub const fn aabb(half_extents: Vec2) -> Self {
        Self::Box { half_extents }
    }

    /// The kind of this shape.
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Box { .. } => ShapeKind::Box,
        }
    }

    /// Whether every extent is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Circle { radius } => positive(radius),
            Self::Box { half_extents } => positive(half_extents.x) && positive(half_extents.y),
        }
    }

    /// Half extents of the shape's axis-aligned bounding box.
    pub const fn half_extents(&self) -> Vec2 {
        match *self {
            Self::Circle { radius } => Vec2::new(radius, radius),
            Self::Box { half_extents } => half_extents,
        }
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// A shape placed in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
    /// World-space center.
    pub center: Point,
    /// Shape around the center.
    pub shape: Shape,
}

impl Body {
    /// Create a body from a center and a shape.
    pub const fn new(center: Point, shape: Shape) -> Self {
        Self { center, shape }
    }

    /// World-space axis-aligned bounding box.
    pub fn bounding_box(&self) -> Rect {
        let h = self.shape.half_extents();
        Rect::new(
            self.center.x - h.x,
            self.center.y - h.y,
            self.center.x + h.x,
            self.center.y + h.y,
        )
    }

    /// Smallest circle enclosing the body.
    ///
    /// For boxes this is the circumscribed circle; handy for debug drawing that
    /// only knows how to draw circles.
    pub fn bounding_circle(&self) -> Circle {
        let radius = match self.shape {
            Shape::Circle { radius } => radius,
            Shape::Box { half_extents } => half_extents.hypot(),
        };
        Circle::new(self.center, radius)
    }

    /// Exact overlap test against another body.
    ///
    /// Does not run the bounding-box reject first; see [`overlap::overlaps`].
    pub fn overlaps(&self, other: &Self) -> bool {
        overlap::overlaps(self, other)
    }
}
