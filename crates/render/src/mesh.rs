//! Triangle soup for the arm scene
//!
//! Everything is drawn as flat shaded boxes: each link capsule becomes a
//! square prism along its axis, obstacles and markers become cubes, and the
//! floor is a single quad. The output is a plain triangle list so the GPU
//! side needs no index buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use physics::ArmSim;

/// Vertices emitted per box (6 faces, 2 triangles each).
pub const BOX_VERTICES: usize = 36;
/// Vertices emitted for the floor quad.
pub const FLOOR_VERTICES: usize = 6;

const FLOOR_HALF_EXTENT: f32 = 1.2;
const MARKER_HALF_EXTENT: f32 = 0.025;

const FLOOR_COLOR: [f32; 3] = [0.25, 0.27, 0.3];
const LINK_COLORS: [[f32; 3]; 2] = [[0.92, 0.92, 0.9], [0.35, 0.37, 0.4]];
const OBSTACLE_COLOR: [f32; 3] = [0.85, 0.2, 0.2];
const MARKER_COLOR: [f32; 3] = [0.2, 0.85, 0.3];

/// Per-face brightness so boxes read as solids without lighting.
const FACE_SHADE: [f32; 3] = [0.7, 0.85, 1.0];

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    #[must_use]
    pub fn new(position: Vec3, color: [f32; 3]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

/// Build the full scene: floor, links, obstacles, markers.
#[must_use]
pub fn scene_vertices(sim: &ArmSim) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        FLOOR_VERTICES
            + BOX_VERTICES * (sim.data.link_points.len() + sim.obstacles.len() + sim.markers.len()),
    );
    push_floor(&mut vertices);

    let radius = sim.model.link_radius;
    for (link, a, b) in sim.link_segments() {
        push_prism(&mut vertices, a, b, radius, LINK_COLORS[link % 2]);
    }
    for obstacle in &sim.obstacles {
        push_cube(&mut vertices, obstacle.center, obstacle.radius, OBSTACLE_COLOR);
    }
    for marker in &sim.markers {
        push_cube(&mut vertices, *marker, MARKER_HALF_EXTENT, MARKER_COLOR);
    }
    vertices
}

fn push_floor(out: &mut Vec<Vertex>) {
    let e = FLOOR_HALF_EXTENT;
    let corners = [
        Vec3::new(-e, -e, 0.0),
        Vec3::new(e, -e, 0.0),
        Vec3::new(e, e, 0.0),
        Vec3::new(-e, e, 0.0),
    ];
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(Vertex::new(corners[i], FLOOR_COLOR));
    }
}

/// Square prism of half width `radius` spanning `a` to `b`. Zero length
/// segments (coincident joint frames) emit nothing.
pub fn push_prism(out: &mut Vec<Vertex>, a: Vec3, b: Vec3, radius: f32, color: [f32; 3]) {
    let Some(axis) = (b - a).try_normalize() else {
        return;
    };
    let helper = if axis.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
    let u = axis.cross(helper).normalize() * radius;
    let v = axis.cross(u);
    push_box(out, [a, b], u, v, color);
}

/// Axis aligned cube centred on `center`.
pub fn push_cube(out: &mut Vec<Vertex>, center: Vec3, half_extent: f32, color: [f32; 3]) {
    let ends = [
        center - Vec3::Z * half_extent,
        center + Vec3::Z * half_extent,
    ];
    push_box(out, ends, Vec3::X * half_extent, Vec3::Y * half_extent, color);
}

/// Emit the 12 triangles of the box whose corners are `end ± u ± v`.
///
/// Corner `i` uses bit 0 for the sign of `u`, bit 1 for `v` and bit 2 for
/// which end it sits on; each face collects the four corners sharing one bit.
fn push_box(out: &mut Vec<Vertex>, ends: [Vec3; 2], u: Vec3, v: Vec3, color: [f32; 3]) {
    let sign = |bit: usize| if bit == 0 { -1.0 } else { 1.0 };
    let corner = |i: usize| ends[(i >> 2) & 1] + u * sign(i & 1) + v * sign((i >> 1) & 1);

    for fixed in 0..3 {
        let shade = FACE_SHADE[fixed];
        let face_color = color.map(|c| c * shade);
        let (p, q) = match fixed {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        for side in 0..2 {
            let quad = [(0, 0), (1, 0), (1, 1), (0, 1)].map(|(bp, bq)| {
                corner((side << fixed) | (bp << p) | (bq << q))
            });
            for i in [0, 1, 2, 0, 2, 3] {
                out.push(Vertex::new(quad[i], face_color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::{ArmModel, Obstacle};

    #[test]
    fn cube_spans_its_half_extent() {
        let mut out = Vec::new();
        push_cube(&mut out, Vec3::new(1.0, 2.0, 3.0), 0.5, OBSTACLE_COLOR);
        assert_eq!(out.len(), BOX_VERTICES);
        for v in &out {
            let p = Vec3::from_array(v.position) - Vec3::new(1.0, 2.0, 3.0);
            assert!((p.abs().max_element() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn every_cube_corner_is_used() {
        let mut out = Vec::new();
        push_cube(&mut out, Vec3::ZERO, 1.0, OBSTACLE_COLOR);
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    let corner = Vec3::new(x, y, z).to_array();
                    assert!(out.iter().any(|v| v.position == corner), "{corner:?}");
                }
            }
        }
    }

    #[test]
    fn degenerate_prism_is_skipped() {
        let mut out = Vec::new();
        push_prism(&mut out, Vec3::ONE, Vec3::ONE, 0.1, LINK_COLORS[0]);
        assert!(out.is_empty());
    }

    #[test]
    fn prism_stays_within_radius_of_axis() {
        let mut out = Vec::new();
        let (a, b) = (Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        push_prism(&mut out, a, b, 0.1, LINK_COLORS[0]);
        assert_eq!(out.len(), BOX_VERTICES);
        for v in &out {
            let p = Vec3::from_array(v.position);
            let radial = Vec3::new(p.x, p.y, 0.0).length();
            assert!(radial <= 0.1 * 2f32.sqrt() + 1e-5);
        }
    }

    #[test]
    fn scene_contains_every_element() {
        let mut sim = ArmSim::new(ArmModel::panda())
            .with_obstacles(vec![Obstacle::new(Vec3::new(0.5, 0.0, 0.5), 0.05)]);
        sim.markers.push(Vec3::new(0.6, 0.0, 0.2));

        let segments = sim
            .link_segments()
            .filter(|(_, a, b)| a.distance(*b) > 1e-6)
            .count();
        let vertices = scene_vertices(&sim);
        assert_eq!(
            vertices.len(),
            FLOOR_VERTICES + BOX_VERTICES * (segments + 2)
        );
        assert!(vertices.iter().any(|v| v.color == OBSTACLE_COLOR));
        assert!(vertices.iter().any(|v| v.color == MARKER_COLOR));
    }
}
