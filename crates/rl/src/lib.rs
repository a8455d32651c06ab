#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Arena RL
//!
//! Gym style environments on top of the [`physics`] arm simulator.
//!
//! The [`Env`] trait is the contract used by rollout drivers: an episode
//! starts with [`Env::reset`], every [`Env::step`] applies one action and
//! reports the observation, the reward and whether the episode terminated
//! (the task reached a terminal state) or was truncated (an external limit
//! such as a step budget ended it). Actions are usually drawn from
//! [`Env::action_space`], a seeded [`Space`].

pub mod env;
pub mod error;
pub mod panda_obstacle;
pub mod space;

pub use env::{Env, Info, InfoValue, Step};
pub use error::EnvError;
pub use panda_obstacle::{PandaObstacleConfig, PandaObstacleEnv};
pub use space::{BoxSpace, Space};
