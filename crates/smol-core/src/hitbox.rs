//! Hit boxes: the shapes used purely for overlap testing.
//!
//! A `HitBox` is a small `Copy` value. Components hand out `&HitBox`, so the
//! only way to get a mutable one is to copy it, which never touches the
//! component's live shape.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Overlap-testing shape in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum HitBox {
    Circle { center: Point, radius: f64 },
    /// Axis-aligned box described by its center and half extents.
    Rect { center: Point, half_extents: Point },
}

impl HitBox {
    pub fn circle(center: Point, radius: f64) -> Self {
        HitBox::Circle {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn rect(center: Point, width: f64, height: f64) -> Self {
        HitBox::Rect {
            center,
            half_extents: Point::new(width.max(0.0) / 2.0, height.max(0.0) / 2.0),
        }
    }

    pub fn center(&self) -> Point {
        match *self {
            HitBox::Circle { center, .. } | HitBox::Rect { center, .. } => center,
        }
    }

    /// Move the shape by `delta`.
    pub fn translate(&mut self, delta: Point) {
        match self {
            HitBox::Circle { center, .. } | HitBox::Rect { center, .. } => *center += delta,
        }
    }

    /// Copy of this shape re-centered on `center`.
    pub fn centered_at(mut self, center: Point) -> Self {
        let delta = center - self.center();
        self.translate(delta);
        self
    }

    /// Overlap test. Shapes that exactly touch are colliding.
    pub fn is_colliding(&self, other: &HitBox) -> bool {
        match (*self, *other) {
            (
                HitBox::Circle { center: a, radius: ra },
                HitBox::Circle { center: b, radius: rb },
            ) => {
                let reach = ra + rb;
                a.distance_squared(b) <= reach * reach
            }
            (
                HitBox::Rect { center: a, half_extents: ha },
                HitBox::Rect { center: b, half_extents: hb },
            ) => {
                let gap = (a - b).abs();
                gap.x <= ha.x + hb.x && gap.y <= ha.y + hb.y
            }
            (
                HitBox::Circle { center, radius },
                HitBox::Rect { center: rc, half_extents },
            )
            | (
                HitBox::Rect { center: rc, half_extents },
                HitBox::Circle { center, radius },
            ) => {
                let closest = center.clamp(rc - half_extents, rc + half_extents);
                center.distance_squared(closest) <= radius * radius
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_circles_one_apart_collide() {
        let a = HitBox::circle(Point::new(0.0, 0.0), 1.0);
        let b = HitBox::circle(Point::new(1.0, 0.0), 1.0);
        assert!(a.is_colliding(&b));
        assert!(b.is_colliding(&a));
    }

    #[test]
    fn unit_circles_three_apart_do_not_collide() {
        let a = HitBox::circle(Point::new(0.0, 0.0), 1.0);
        let b = HitBox::circle(Point::new(3.0, 0.0), 1.0);
        assert!(!a.is_colliding(&b));
    }

    #[test]
    fn touching_circles_collide() {
        let a = HitBox::circle(Point::new(0.0, 0.0), 1.0);
        let b = HitBox::circle(Point::new(2.0, 0.0), 1.0);
        assert!(a.is_colliding(&b));
    }

    #[test]
    fn rects_overlap_on_both_axes_only() {
        let a = HitBox::rect(Point::new(0.0, 0.0), 4.0, 4.0);
        let b = HitBox::rect(Point::new(3.0, 3.0), 4.0, 4.0);
        let c = HitBox::rect(Point::new(3.0, 10.0), 4.0, 4.0);
        assert!(a.is_colliding(&b));
        assert!(!a.is_colliding(&c));
    }

    #[test]
    fn circle_against_rect_uses_closest_point() {
        let rect = HitBox::rect(Point::new(0.0, 0.0), 4.0, 4.0);
        // Corner of the rect is (2, 2); distance from (3, 3) is sqrt(2) ~ 1.41.
        let near = HitBox::circle(Point::new(3.0, 3.0), 1.5);
        let far = HitBox::circle(Point::new(3.0, 3.0), 1.0);
        assert!(rect.is_colliding(&near));
        assert!(near.is_colliding(&rect));
        assert!(!rect.is_colliding(&far));
    }

    #[test]
    fn copy_is_independent() {
        let live = HitBox::circle(Point::new(0.0, 0.0), 1.0);
        let mut copy = live;
        copy.translate(Point::new(100.0, 0.0));
        assert_eq!(live.center(), Point::new(0.0, 0.0));
        assert_eq!(copy.center(), Point::new(100.0, 0.0));
    }

    #[test]
    fn centered_at_moves_shape() {
        let rect = HitBox::rect(Point::new(1.0, 1.0), 2.0, 2.0).centered_at(Point::new(5.0, 6.0));
        assert_eq!(rect.center(), Point::new(5.0, 6.0));
    }
}
