//! # Arm Simulation Core
//!
//! This module owns the mutable simulation state and advances it in fixed
//! time steps. Joints are velocity controlled: the command stored in
//! [`ArmData::ctrl`] is clamped to the joint velocity limits and integrated
//! with explicit Euler, after which positions are clamped to the joint range.

use glam::Vec3;

use crate::contact::{detect_link_floor, detect_link_obstacle, Contact, Obstacle};
use crate::error::PhysicsError;
use crate::kinematics::forward_kinematics;
use crate::model::{ArmModel, NUM_JOINTS};

/// Integration parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    /// Length of one integration substep in seconds.
    pub timestep: f32,
    /// Substeps performed by each call to [`ArmSim::step`].
    pub frame_skip: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            timestep: 0.002,
            frame_skip: 5,
        }
    }
}

/// Time varying state of the arm.
#[derive(Clone, Debug, PartialEq)]
pub struct ArmData {
    pub qpos: [f32; NUM_JOINTS],
    pub qvel: [f32; NUM_JOINTS],
    /// Joint velocity targets applied on the next step.
    pub ctrl: [f32; NUM_JOINTS],
    /// Simulated time in seconds since the last reset.
    pub time: f32,
    /// Frame origins from the last kinematics update.
    pub link_points: Vec<Vec3>,
}

/// Arm, obstacles and integration settings.
#[derive(Clone, Debug)]
pub struct ArmSim {
    pub model: ArmModel,
    pub data: ArmData,
    pub obstacles: Vec<Obstacle>,
    /// Points drawn by viewers but ignored by contact checks, such as goals.
    pub markers: Vec<Vec3>,
    pub params: SimParams,
}

impl ArmSim {
    /// Create a simulation with the arm resting at its home configuration.
    #[must_use]
    pub fn new(model: ArmModel) -> Self {
        let qpos = model.home;
        let link_points = forward_kinematics(&model, &qpos);
        Self {
            data: ArmData {
                qpos,
                qvel: [0.0; NUM_JOINTS],
                ctrl: [0.0; NUM_JOINTS],
                time: 0.0,
                link_points,
            },
            model,
            obstacles: Vec::new(),
            markers: Vec::new(),
            params: SimParams::default(),
        }
    }

    #[must_use]
    pub fn with_obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Replace the integration parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimestep`] when the timestep is not a
    /// positive finite number and [`PhysicsError::InvalidFrameSkip`] when
    /// `frame_skip` is zero.
    pub fn with_params(mut self, params: SimParams) -> Result<Self, PhysicsError> {
        if !params.timestep.is_finite() || params.timestep <= 0.0 {
            return Err(PhysicsError::InvalidTimestep(params.timestep));
        }
        if params.frame_skip == 0 {
            return Err(PhysicsError::InvalidFrameSkip);
        }
        self.params = params;
        Ok(self)
    }

    /// Put the arm at `qpos` (clamped to the joint range) with zero velocity
    /// and command, and rewind time.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DimensionMismatch`] if `qpos` does not have one
    /// value per joint.
    pub fn reset_to(&mut self, qpos: &[f32]) -> Result<(), PhysicsError> {
        check_len(qpos)?;
        for (i, (q, limit)) in qpos.iter().zip(self.model.limits.iter()).enumerate() {
            self.data.qpos[i] = limit.clamp_position(*q);
        }
        self.data.qvel = [0.0; NUM_JOINTS];
        self.data.ctrl = [0.0; NUM_JOINTS];
        self.data.time = 0.0;
        self.update_kinematics();
        Ok(())
    }

    /// Store joint velocity targets for the next step.
    ///
    /// # Errors
    ///
    /// Fails on a wrong number of values or any non-finite value; the stored
    /// command is left untouched in that case.
    pub fn set_ctrl(&mut self, ctrl: &[f32]) -> Result<(), PhysicsError> {
        check_len(ctrl)?;
        if let Some(index) = ctrl.iter().position(|v| !v.is_finite()) {
            return Err(PhysicsError::NonFiniteCommand { index });
        }
        self.data.ctrl.copy_from_slice(ctrl);
        Ok(())
    }

    /// Advance by `frame_skip` substeps.
    pub fn step(&mut self) {
        for _ in 0..self.params.frame_skip {
            self.substep(self.params.timestep);
        }
        self.update_kinematics();
        tracing::trace!(time = self.data.time, "arm step");
    }

    fn substep(&mut self, dt: f32) {
        let data = &mut self.data;
        for (i, limit) in self.model.limits.iter().enumerate() {
            let vel = limit.clamp_velocity(data.ctrl[i]);
            let target = data.qpos[i] + vel * dt;
            let at_limit = target <= limit.lower || target >= limit.upper;
            data.qvel[i] = if at_limit { 0.0 } else { vel };
            data.qpos[i] = limit.clamp_position(target);
        }
        data.time += dt;
    }

    /// Recompute the cached frame origins from `qpos`.
    pub fn update_kinematics(&mut self) {
        self.data.link_points = forward_kinematics(&self.model, &self.data.qpos);
    }

    /// Simulated seconds covered by one call to [`ArmSim::step`].
    #[must_use]
    pub fn frame_dt(&self) -> f32 {
        self.params.timestep * self.params.frame_skip as f32
    }

    /// Tool centre point in world coordinates.
    #[must_use]
    pub fn end_effector(&self) -> Vec3 {
        self.data.link_points.last().copied().unwrap_or(Vec3::ZERO)
    }

    /// Iterate over link segments as `(index, start, end)`.
    pub fn link_segments(&self) -> impl Iterator<Item = (usize, Vec3, Vec3)> + '_ {
        self.data
            .link_points
            .windows(2)
            .enumerate()
            .map(|(i, w)| (i, w[0], w[1]))
    }

    /// All current penetrations. The first segment stands on the floor and is
    /// never reported as a floor contact.
    #[must_use]
    pub fn contacts(&self) -> Vec<Contact> {
        let radius = self.model.link_radius;
        let mut contacts = Vec::new();
        for (link, a, b) in self.link_segments() {
            for (index, obstacle) in self.obstacles.iter().enumerate() {
                if let Some(contact) = detect_link_obstacle(link, a, b, radius, index, obstacle) {
                    contacts.push(contact);
                }
            }
            if link > 0 {
                if let Some(contact) = detect_link_floor(link, a, b, radius) {
                    contacts.push(contact);
                }
            }
        }
        contacts
    }

    #[must_use]
    pub fn in_collision(&self) -> bool {
        !self.contacts().is_empty()
    }
}

fn check_len(values: &[f32]) -> Result<(), PhysicsError> {
    if values.len() == NUM_JOINTS {
        Ok(())
    } else {
        Err(PhysicsError::DimensionMismatch {
            expected: NUM_JOINTS,
            got: values.len(),
        })
    }
}
