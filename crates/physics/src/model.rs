//! Static description of the arm.
//!
//! The kinematic chain uses the modified (Craig) Denavit-Hartenberg
//! convention: frame `i` is reached from frame `i - 1` by rotating `alpha`
//! about x, translating `a` along x, rotating the joint angle about z and
//! finally translating `d` along z.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// Number of actuated joints on the Panda.
pub const NUM_JOINTS: usize = 7;

/// One row of the modified Denavit-Hartenberg table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DhLink {
    /// Link length along the previous x axis (metres).
    pub a: f32,
    /// Link offset along the joint z axis (metres).
    pub d: f32,
    /// Link twist about the previous x axis (radians).
    pub alpha: f32,
}

impl DhLink {
    #[must_use]
    pub const fn new(a: f32, d: f32, alpha: f32) -> Self {
        Self { a, d, alpha }
    }
}

/// Position and velocity bounds of a single joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLimits {
    pub lower: f32,
    pub upper: f32,
    pub max_velocity: f32,
}

impl JointLimits {
    #[must_use]
    pub const fn new(lower: f32, upper: f32, max_velocity: f32) -> Self {
        Self {
            lower,
            upper,
            max_velocity,
        }
    }

    /// Clamp a joint position into `[lower, upper]`.
    #[must_use]
    pub fn clamp_position(&self, q: f32) -> f32 {
        q.clamp(self.lower, self.upper)
    }

    /// Clamp a joint velocity into `[-max_velocity, max_velocity]`.
    #[must_use]
    pub fn clamp_velocity(&self, v: f32) -> f32 {
        v.clamp(-self.max_velocity, self.max_velocity)
    }
}

/// Fixed structure of the arm.
#[derive(Clone, Debug, PartialEq)]
pub struct ArmModel {
    pub links: [DhLink; NUM_JOINTS],
    pub limits: [JointLimits; NUM_JOINTS],
    /// Distance from the last joint frame to the flange along z.
    pub flange_offset: f32,
    /// Distance from the flange to the tool centre point along z.
    pub tcp_offset: f32,
    /// Radius of the capsules used for contact checks.
    pub link_radius: f32,
    /// Resting configuration used when an episode starts.
    pub home: [f32; NUM_JOINTS],
}

impl ArmModel {
    /// Franka Emika Panda parameters.
    #[must_use]
    pub fn panda() -> Self {
        Self {
            links: [
                DhLink::new(0.0, 0.333, 0.0),
                DhLink::new(0.0, 0.0, -FRAC_PI_2),
                DhLink::new(0.0, 0.316, FRAC_PI_2),
                DhLink::new(0.0825, 0.0, FRAC_PI_2),
                DhLink::new(-0.0825, 0.384, -FRAC_PI_2),
                DhLink::new(0.0, 0.0, FRAC_PI_2),
                DhLink::new(0.088, 0.0, FRAC_PI_2),
            ],
            limits: [
                JointLimits::new(-2.8973, 2.8973, 2.175),
                JointLimits::new(-1.7628, 1.7628, 2.175),
                JointLimits::new(-2.8973, 2.8973, 2.175),
                JointLimits::new(-3.0718, -0.0698, 2.175),
                JointLimits::new(-2.8973, 2.8973, 2.61),
                JointLimits::new(-0.0175, 3.7525, 2.61),
                JointLimits::new(-2.8973, 2.8973, 2.61),
            ],
            flange_offset: 0.107,
            tcp_offset: 0.1034,
            link_radius: 0.05,
            home: [
                0.0,
                -FRAC_PI_4,
                0.0,
                -3.0 * FRAC_PI_4,
                0.0,
                FRAC_PI_2,
                FRAC_PI_4,
            ],
        }
    }

    /// Number of frame origins produced by forward kinematics: the base, one
    /// per joint, the flange and the tool centre point.
    #[must_use]
    pub const fn num_points(&self) -> usize {
        NUM_JOINTS + 3
    }

    #[must_use]
    pub fn velocity_limits(&self) -> [f32; NUM_JOINTS] {
        self.limits.map(|l| l.max_velocity)
    }
}

impl Default for ArmModel {
    fn default() -> Self {
        Self::panda()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_is_within_limits() {
        let model = ArmModel::panda();
        for (q, limit) in model.home.iter().zip(model.limits.iter()) {
            assert!(*q >= limit.lower && *q <= limit.upper, "{q} outside {limit:?}");
        }
    }

    #[test]
    fn clamps_respect_bounds() {
        let limit = JointLimits::new(-1.0, 0.5, 2.0);
        assert_eq!(limit.clamp_position(3.0), 0.5);
        assert_eq!(limit.clamp_position(-3.0), -1.0);
        assert_eq!(limit.clamp_velocity(-5.0), -2.0);
    }
}
