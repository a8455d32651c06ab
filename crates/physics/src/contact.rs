//! Capsule contact checks
//!
//! Each link is treated as a capsule spanning two consecutive frame origins
//! with the model's link radius. Obstacles are spheres and the floor is the
//! plane `z = 0`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Static spherical obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec3,
    pub radius: f32,
}

impl Obstacle {
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// What a link touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactKind {
    /// Index into the simulation's obstacle list.
    Obstacle(usize),
    Floor,
}

/// A single penetration between a link capsule and the environment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Index of the link segment (segment `i` joins frame `i` and `i + 1`).
    pub link: usize,
    pub kind: ContactKind,
    /// Closest point on the link axis.
    pub point: Vec3,
    /// Penetration depth, always positive.
    pub depth: f32,
}

/// Closest point to `p` on the segment `[a, b]`.
#[must_use]
pub fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `p` to the segment `[a, b]`.
#[must_use]
pub fn segment_point_distance(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    closest_point_on_segment(a, b, p).distance(p)
}

/// Detect a link capsule overlapping an obstacle.
#[must_use]
pub fn detect_link_obstacle(
    link: usize,
    a: Vec3,
    b: Vec3,
    link_radius: f32,
    obstacle_index: usize,
    obstacle: &Obstacle,
) -> Option<Contact> {
    let point = closest_point_on_segment(a, b, obstacle.center);
    let depth = link_radius + obstacle.radius - point.distance(obstacle.center);
    (depth > 0.0).then_some(Contact {
        link,
        kind: ContactKind::Obstacle(obstacle_index),
        point,
        depth,
    })
}

/// Detect a link capsule dipping below the floor.
#[must_use]
pub fn detect_link_floor(link: usize, a: Vec3, b: Vec3, link_radius: f32) -> Option<Contact> {
    let point = if a.z <= b.z { a } else { b };
    let depth = link_radius - point.z;
    (depth > 0.0).then_some(Contact {
        link,
        kind: ContactKind::Floor,
        point,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let a = Vec3::ZERO;
        let b = Vec3::X;
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(2.0, 1.0, 0.0)), b);
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(-2.0, 1.0, 0.0)), a);
        assert!((segment_point_distance(a, b, Vec3::new(0.5, 1.0, 0.0)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_segment_uses_start() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(closest_point_on_segment(a, a, Vec3::ZERO), a);
    }

    #[test]
    fn obstacle_overlap_reports_depth() {
        let obstacle = Obstacle::new(Vec3::new(0.5, 0.1, 0.0), 0.1);
        let contact = detect_link_obstacle(3, Vec3::ZERO, Vec3::X, 0.05, 0, &obstacle).unwrap();
        assert_eq!(contact.kind, ContactKind::Obstacle(0));
        assert!((contact.depth - 0.05).abs() < 1e-6);

        let far = Obstacle::new(Vec3::new(0.5, 1.0, 0.0), 0.1);
        assert!(detect_link_obstacle(3, Vec3::ZERO, Vec3::X, 0.05, 0, &far).is_none());
    }
}
