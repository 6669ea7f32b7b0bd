// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contact Shapes: circles, axis-aligned boxes, and the overlap tests between them.
//!
//! This is the leaf building block of the Contact workspace.
//!
//! - [`Shape`] is a tagged union of a circle (radius) and an axis-aligned box (half extents).
//! - [`Body`] pairs a shape with a world-space center and answers bounding-box and overlap queries.
//! - The [`overlap`] module holds the raw predicates: circle/circle, box/box, circle/box,
//!   plus a cheap bounding-box reject.
//!
//! All predicates are pure, allocation-free, and avoid square roots by comparing
//! squared distances. Boundaries are inclusive: bodies that merely touch overlap.
//!
//! # Example
//!
//! ```rust
//! use contact_shapes::{Body, Shape};
//! use kurbo::{Point, Vec2};
//!
//! let wall = Body::new(Point::new(0.0, 0.0), Shape::aabb(Vec2::new(50.0, 50.0)));
//! let mut ball = Body::new(Point::new(60.0, 0.0), Shape::circle(20.0));
//!
//! // Closest point on the box is (50, 0), ten units from the ball's center.
//! assert!(wall.overlaps(&ball));
//!
//! ball.center = Point::new(80.0, 0.0);
//! assert!(!wall.overlaps(&ball));
//! ```
//!
//! ### Float semantics
//!
//! Inputs are assumed finite. A NaN coordinate never reports an overlap.
//!
//! This crate is `no_std`.

#![no_std]

pub mod overlap;
pub mod shape;

pub use overlap::{bounds_overlap, box_box, circle_box, circle_circle, overlaps};
pub use shape::{Body, Shape, ShapeKind};
