use std::collections::HashMap;
use std::fmt;

use physics::ArmSim;

use crate::error::EnvError;
use crate::space::Space;

/// Auxiliary values reported alongside observations.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoValue {
    Float(f32),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoValue::Float(v) => write!(f, "{v:.3}"),
            InfoValue::Int(v) => write!(f, "{v}"),
            InfoValue::Bool(v) => write!(f, "{v}"),
            InfoValue::Text(v) => f.write_str(v),
        }
    }
}

pub type Info = HashMap<String, InfoValue>;

/// Result of applying one action.
#[derive(Clone, Debug)]
pub struct Step<O> {
    pub obs: O,
    pub reward: f32,
    /// The task reached a terminal state (success or failure).
    pub terminated: bool,
    /// The episode was cut short by a limit outside the task, e.g. a time limit.
    pub truncated: bool,
    pub info: Info,
}

impl<O> Step<O> {
    /// Whether the episode is over for either reason.
    #[must_use]
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like OpenAI Gym. Besides the usual
/// reset/step pair an environment exposes the physics state it simulates so
/// a viewer can draw it.
pub trait Env {
    type Obs;
    type Action;

    /// Start a new episode. `Some(seed)` reseeds every random source of the
    /// environment, `None` continues the current random streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment was closed or the physics state
    /// could not be initialised.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info), EnvError>;

    /// Advance the environment by one action.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed actions, when no episode is running, or
    /// when the simulation rejects the resulting command.
    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Obs>, EnvError>;

    /// Space actions are drawn from. Mutable because sampling advances its RNG.
    fn action_space(&mut self) -> &mut dyn Space<Self::Action>;

    fn observation_space(&self) -> &dyn Space<Self::Obs>;

    /// Model and state of the underlying simulation.
    fn physics(&self) -> &ArmSim;

    /// Release any resources held by the environment. Calling it twice is
    /// harmless.
    fn close(&mut self) {}
}
