// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap predicates.
//!
//! Every predicate is inclusive at the boundary and compares squared
//! distances, so no square roots are taken. Comparisons are written so that a
//! NaN operand makes the predicate false.

use kurbo::{Point, Rect, Vec2};

use crate::shape::{Body, Shape};

/// Whether two axis-aligned rectangles overlap (edges touching counts).
///
/// This is the broad-phase reject run before the exact predicates.
#[inline]
pub fn bounds_overlap(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Circle against circle.
#[inline]
pub fn circle_circle(a: Point, ra: f64, b: Point, rb: f64) -> bool {
    let r = ra + rb;
    (a - b).hypot2() <= r * r
}

/// Axis-aligned box against axis-aligned box, by separation on each axis.
#[inline]
pub fn box_box(a: Point, ha: Vec2, b: Point, hb: Vec2) -> bool {
    let d = a - b;
    let reach = ha + hb;
    within(d.x, reach.x) && within(d.y, reach.y)
}

/// Circle against axis-aligned box.
///
/// Clamps the circle center into the box to find the closest point, then
/// compares the squared distance with the squared radius.
#[inline]
pub fn circle_box(c: Point, r: f64, b: Point, hb: Vec2) -> bool {
    // `max`/`min` rather than `clamp`, which panics on NaN bounds.
    let closest = Point::new(
        c.x.max(b.x - hb.x).min(b.x + hb.x),
        c.y.max(b.y - hb.y).min(b.y + hb.y),
    );
    (c - closest).hypot2() <= r * r
}

/// Exact overlap test between two bodies, dispatching on their shape kinds.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.center, ra, b.center, rb)
        }
        (Shape::Box { half_extents: ha }, Shape::Box { half_extents: hb }) => {
            box_box(a.center, ha, b.center, hb)
        }
        (Shape::Circle { radius }, Shape::Box { half_extents }) => {
            circle_box(a.center, radius, b.center, half_extents)
        }
        (Shape::Box { half_extents }, Shape::Circle { radius }) => {
            circle_box(b.center, radius, a.center, half_extents)
        }
    }
}

// |d| <= reach, without relying on `f64::abs` (not in `core`).
#[inline]
fn within(d: f64, reach: f64) -> bool {
    d <= reach && -d <= reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circles_touching_count_as_overlap() {
        assert!(circle_circle(Point::ZERO, 10.0, Point::new(20.0, 0.0), 10.0));
        assert!(!circle_circle(Point::ZERO, 10.0, Point::new(20.5, 0.0), 10.0));
    }

    #[test]
    fn diagonal_circles_use_euclidean_distance() {
        // Distance is sqrt(200) ≈ 14.14; radius sum 14 misses, 15 hits.
        let a = Point::ZERO;
        let b = Point::new(10.0, 10.0);
        assert!(!circle_circle(a, 7.0, b, 7.0));
        assert!(circle_circle(a, 7.5, b, 7.5));
    }

    #[test]
    fn boxes_separate_on_either_axis() {
        let h = Vec2::new(5.0, 5.0);
        assert!(box_box(Point::ZERO, h, Point::new(10.0, 0.0), h));
        assert!(!box_box(Point::ZERO, h, Point::new(10.1, 0.0), h));
        assert!(!box_box(Point::ZERO, h, Point::new(0.0, -10.1), h));
        assert!(box_box(Point::ZERO, h, Point::new(-9.0, 9.0), h));
    }

    #[test]
    fn circle_box_clamps_to_closest_point() {
        let b = Point::ZERO;
        let hb = Vec2::new(50.0, 50.0);
        assert!(circle_box(Point::new(60.0, 0.0), 20.0, b, hb));
        assert!(!circle_box(Point::new(80.0, 0.0), 20.0, b, hb));
        // Near a corner the bounding boxes overlap but the circle does not.
        assert!(!circle_box(Point::new(65.0, 65.0), 20.0, b, hb));
        // Circle center inside the box.
        assert!(circle_box(Point::new(10.0, 10.0), 1.0, b, hb));
    }

    #[test]
    fn corner_case_passes_broad_phase_but_fails_exact() {
        let ball = Body::new(Point::new(65.0, 65.0), Shape::circle(20.0));
        let wall = Body::new(Point::ZERO, Shape::aabb(Vec2::new(50.0, 50.0)));
        assert!(bounds_overlap(&ball.bounding_box(), &wall.bounding_box()));
        assert!(!overlaps(&ball, &wall));
    }

    #[test]
    fn bounds_overlap_is_inclusive_and_nan_safe() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(bounds_overlap(&a, &Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!bounds_overlap(&a, &Rect::new(10.5, 0.0, 20.0, 10.0)));
        assert!(!bounds_overlap(&a, &Rect::new(f64::NAN, 0.0, 5.0, 5.0)));
    }
}
