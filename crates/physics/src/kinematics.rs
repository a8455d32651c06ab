//! # Forward Kinematics
//!
//! Converts joint positions into world-space frame origins. The base sits at
//! the world origin with z pointing up.

use glam::{Mat4, Vec3};

use crate::model::{ArmModel, DhLink};

/// Homogeneous transform of one modified DH row for joint angle `theta`.
fn link_transform(link: &DhLink, theta: f32) -> Mat4 {
    Mat4::from_rotation_x(link.alpha)
        * Mat4::from_translation(Vec3::new(link.a, 0.0, 0.0))
        * Mat4::from_rotation_z(theta)
        * Mat4::from_translation(Vec3::new(0.0, 0.0, link.d))
}

/// Compute the world positions of the base, every joint frame, the flange and
/// the tool centre point, in that order.
///
/// Missing joint values are treated as zero and extra values are ignored; the
/// simulation validates lengths before calling this.
#[must_use]
pub fn forward_kinematics(model: &ArmModel, qpos: &[f32]) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(model.num_points());
    let mut frame = Mat4::IDENTITY;
    points.push(frame.w_axis.truncate());

    for (i, link) in model.links.iter().enumerate() {
        let theta = qpos.get(i).copied().unwrap_or(0.0);
        frame *= link_transform(link, theta);
        points.push(frame.w_axis.truncate());
    }

    frame *= Mat4::from_translation(Vec3::new(0.0, 0.0, model.flange_offset));
    points.push(frame.w_axis.truncate());
    frame *= Mat4::from_translation(Vec3::new(0.0, 0.0, model.tcp_offset));
    points.push(frame.w_axis.truncate());

    points
}
