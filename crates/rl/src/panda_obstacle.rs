//! Reach-around-an-obstacle task for the Panda arm.
//!
//! Every episode places a goal for the tool centre point and a spherical
//! obstacle in front of the robot. Actions are normalised joint velocity
//! commands in `[-1, 1]`; they are scaled by [`PandaObstacleConfig::action_scale`]
//! and the joint velocity limits before reaching the simulator.
//!
//! The observation is a flat vector of
//! `qpos (7) | qvel (7) | tool position (3) | goal (3) | obstacle centre (3)`.

use physics::{ArmModel, ArmSim, Obstacle, SimParams, Vec3, NUM_JOINTS};
use serde::{Deserialize, Serialize};

use crate::env::{Env, Info, InfoValue, Step};
use crate::error::EnvError;
use crate::space::{BoxSpace, Space};

/// Length of the observation vector.
pub const OBS_DIM: usize = 2 * NUM_JOINTS + 9;

/// Bound used for the Cartesian parts of the observation space.
const WORKSPACE_EXTENT: f32 = 2.0;

/// Goal placements tried before falling back to a point under the obstacle.
const GOAL_ATTEMPTS: usize = 32;

/// Tunable task parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PandaObstacleConfig {
    /// Steps after which an episode is truncated.
    pub max_episode_steps: usize,
    /// Fraction of each joint's velocity limit reached at `|action| = 1`.
    pub action_scale: f32,
    /// Half width of the uniform noise added to the home pose on reset.
    pub init_noise: f32,
    /// Distance from the goal that counts as success (metres).
    pub goal_tolerance: f32,
    pub goal_low: Vec3,
    pub goal_high: Vec3,
    pub obstacle_low: Vec3,
    pub obstacle_high: Vec3,
    pub obstacle_radius: f32,
    pub distance_weight: f32,
    pub control_weight: f32,
    pub success_bonus: f32,
    pub collision_penalty: f32,
    /// Integration substep (seconds).
    pub timestep: f32,
    /// Substeps per environment step.
    pub frame_skip: usize,
}

impl Default for PandaObstacleConfig {
    fn default() -> Self {
        Self {
            max_episode_steps: 1000,
            action_scale: 0.5,
            init_noise: 0.05,
            goal_tolerance: 0.05,
            goal_low: Vec3::new(0.45, -0.25, 0.15),
            goal_high: Vec3::new(0.7, 0.25, 0.35),
            obstacle_low: Vec3::new(0.5, -0.15, 0.4),
            obstacle_high: Vec3::new(0.6, 0.15, 0.55),
            obstacle_radius: 0.06,
            distance_weight: 1.0,
            control_weight: 0.01,
            success_bonus: 10.0,
            collision_penalty: 10.0,
            timestep: 0.002,
            frame_skip: 5,
        }
    }
}

/// Seven joint arm that must bring its tool to a goal without touching an
/// obstacle or the floor.
#[derive(Debug)]
pub struct PandaObstacleEnv {
    config: PandaObstacleConfig,
    sim: ArmSim,
    goal: Vec3,
    rng: fastrand::Rng,
    action_space: BoxSpace,
    observation_space: BoxSpace,
    elapsed_steps: usize,
    needs_reset: bool,
    closed: bool,
}

impl PandaObstacleEnv {
    /// Build the environment. It must be [`reset`](Env::reset) before the
    /// first step.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Physics`] if the integration settings are invalid.
    pub fn new(config: PandaObstacleConfig) -> Result<Self, EnvError> {
        let model = ArmModel::panda();
        let observation_space = observation_space(&model);
        let sim = ArmSim::new(model).with_params(SimParams {
            timestep: config.timestep,
            frame_skip: config.frame_skip,
        })?;
        let goal = (config.goal_low + config.goal_high) * 0.5;

        Ok(Self {
            config,
            sim,
            goal,
            rng: fastrand::Rng::new(),
            action_space: BoxSpace::uniform(NUM_JOINTS, -1.0, 1.0),
            observation_space,
            elapsed_steps: 0,
            needs_reset: true,
            closed: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PandaObstacleConfig {
        &self.config
    }

    #[must_use]
    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    /// The obstacle of the current episode.
    #[must_use]
    pub fn obstacle(&self) -> Option<&Obstacle> {
        self.sim.obstacles.first()
    }

    #[must_use]
    pub fn elapsed_steps(&self) -> usize {
        self.elapsed_steps
    }

    /// Distance between the tool centre point and the goal.
    #[must_use]
    pub fn goal_distance(&self) -> f32 {
        self.sim.end_effector().distance(self.goal)
    }

    fn uniform(&self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.rng.f32()
    }

    fn sample_in(&self, low: Vec3, high: Vec3) -> Vec3 {
        Vec3::new(
            self.uniform(low.x, high.x),
            self.uniform(low.y, high.y),
            self.uniform(low.z, high.z),
        )
    }

    /// Pick a goal the tool can sit on without touching the obstacle.
    fn sample_goal(&self, obstacle: &Obstacle) -> Vec3 {
        let clearance =
            obstacle.radius + self.sim.model.link_radius + self.config.goal_tolerance;
        for _ in 0..GOAL_ATTEMPTS {
            let goal = self.sample_in(self.config.goal_low, self.config.goal_high);
            if goal.distance(obstacle.center) > clearance {
                return goal;
            }
        }
        tracing::debug!("goal sampling exhausted, placing goal below the obstacle");
        obstacle.center - Vec3::Z * (clearance + self.config.goal_tolerance)
    }

    fn observation(&self) -> Vec<f32> {
        let data = &self.sim.data;
        let tcp = self.sim.end_effector();
        let obstacle = self.obstacle().map_or(Vec3::ZERO, |o| o.center);

        let mut obs = Vec::with_capacity(OBS_DIM);
        obs.extend_from_slice(&data.qpos);
        obs.extend_from_slice(&data.qvel);
        obs.extend_from_slice(&tcp.to_array());
        obs.extend_from_slice(&self.goal.to_array());
        obs.extend_from_slice(&obstacle.to_array());
        obs
    }

    fn info(&self, distance: f32, success: bool, collision: bool) -> Info {
        let mut info = Info::new();
        info.insert("distance".to_string(), InfoValue::Float(distance));
        info.insert("success".to_string(), InfoValue::Bool(success));
        info.insert("collision".to_string(), InfoValue::Bool(collision));
        info.insert(
            "elapsed_steps".to_string(),
            InfoValue::Int(i64::try_from(self.elapsed_steps).unwrap_or(i64::MAX)),
        );
        info
    }
}

impl Env for PandaObstacleEnv {
    type Obs = Vec<f32>;
    type Action = Vec<f32>;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info), EnvError> {
        if self.closed {
            return Err(EnvError::Closed);
        }
        if let Some(seed) = seed {
            self.rng.seed(seed);
            self.action_space.seed(seed.wrapping_add(1));
        }

        let noise = self.config.init_noise;
        let mut qpos = self.sim.model.home;
        for q in &mut qpos {
            *q += self.uniform(-noise, noise);
        }
        self.sim.reset_to(&qpos)?;

        let obstacle = Obstacle::new(
            self.sample_in(self.config.obstacle_low, self.config.obstacle_high),
            self.config.obstacle_radius,
        );
        self.goal = self.sample_goal(&obstacle);
        self.sim.obstacles = vec![obstacle];
        self.sim.markers = vec![self.goal];

        self.elapsed_steps = 0;
        self.needs_reset = false;

        let distance = self.goal_distance();
        tracing::debug!(
            goal = ?self.goal,
            obstacle = ?obstacle.center,
            distance,
            "episode reset"
        );
        Ok((self.observation(), self.info(distance, false, false)))
    }

    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Obs>, EnvError> {
        if self.closed {
            return Err(EnvError::Closed);
        }
        if self.needs_reset {
            return Err(EnvError::NeedsReset);
        }
        if action.len() != NUM_JOINTS {
            return Err(EnvError::InvalidAction {
                expected: NUM_JOINTS,
                got: action.len(),
            });
        }

        let mut clipped = action.clone();
        self.action_space.clip(&mut clipped);
        let limits = self.sim.model.velocity_limits();
        let ctrl: Vec<f32> = clipped
            .iter()
            .zip(limits.iter())
            .map(|(a, limit)| a * limit * self.config.action_scale)
            .collect();
        self.sim.set_ctrl(&ctrl)?;
        self.sim.step();
        self.elapsed_steps += 1;

        let distance = self.goal_distance();
        let success = distance < self.config.goal_tolerance;
        let collision = self.sim.in_collision();
        let control_cost: f32 = clipped.iter().map(|a| a * a).sum();

        let mut reward = -self.config.distance_weight * distance
            - self.config.control_weight * control_cost;
        if success {
            reward += self.config.success_bonus;
        }
        if collision {
            reward -= self.config.collision_penalty;
        }

        let terminated = success || collision;
        let truncated = self.elapsed_steps >= self.config.max_episode_steps;
        self.needs_reset = terminated || truncated;

        Ok(Step {
            obs: self.observation(),
            reward,
            terminated,
            truncated,
            info: self.info(distance, success, collision),
        })
    }

    fn action_space(&mut self) -> &mut dyn Space<Self::Action> {
        &mut self.action_space
    }

    fn observation_space(&self) -> &dyn Space<Self::Obs> {
        &self.observation_space
    }

    fn physics(&self) -> &ArmSim {
        &self.sim
    }

    fn close(&mut self) {
        if !self.closed {
            tracing::debug!(elapsed_steps = self.elapsed_steps, "closing environment");
            self.closed = true;
        }
    }
}

fn observation_space(model: &ArmModel) -> BoxSpace {
    let mut low = Vec::with_capacity(OBS_DIM);
    let mut high = Vec::with_capacity(OBS_DIM);
    for limit in &model.limits {
        low.push(limit.lower);
        high.push(limit.upper);
    }
    for limit in &model.limits {
        low.push(-limit.max_velocity);
        high.push(limit.max_velocity);
    }
    low.resize(OBS_DIM, -WORKSPACE_EXTENT);
    high.resize(OBS_DIM, WORKSPACE_EXTENT);
    BoxSpace::new(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_layout_has_expected_size() {
        assert_eq!(OBS_DIM, 23);
        let space = observation_space(&ArmModel::panda());
        assert_eq!(space.shape(), vec![OBS_DIM]);
    }
}
