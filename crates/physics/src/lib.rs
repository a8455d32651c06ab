#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Arena Physics
//!
//! A small kinematic simulator for a seven joint Franka Panda style arm
//! working next to spherical obstacles.
//!
//! The crate mirrors the usual model/data split of robotics simulators: an
//! [`ArmModel`] describes the fixed structure of the robot (its modified
//! Denavit-Hartenberg chain, joint limits and link thickness) while
//! [`ArmData`] holds everything that changes while the simulation runs.
//! [`ArmSim`] owns both together with the obstacle set and advances them in
//! fixed time steps.
//!
//! ## Key Components
//!
//! -   **Model:** [`ArmModel::panda`] builds the published Panda parameters.
//! -   **Kinematics:** [`forward_kinematics`] turns joint positions into the
//!     world positions of every joint frame, the flange and the tool centre
//!     point.
//! -   **Contacts:** [`ArmSim::contacts`] checks the link capsules against
//!     obstacles and the floor.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{ArmModel, ArmSim, Obstacle};
//! use glam::Vec3;
//!
//! let mut sim = ArmSim::new(ArmModel::panda())
//!     .with_obstacles(vec![Obstacle::new(Vec3::new(0.5, 0.0, 0.5), 0.05)]);
//! sim.set_ctrl(&[0.1; 7]).unwrap();
//! sim.step();
//! assert!(sim.data.time > 0.0);
//! ```

pub mod contact;
pub mod error;
pub mod kinematics;
pub mod model;
pub mod simulation;

pub use contact::{segment_point_distance, Contact, ContactKind, Obstacle};
pub use error::PhysicsError;
pub use kinematics::forward_kinematics;
pub use model::{ArmModel, DhLink, JointLimits, NUM_JOINTS};
pub use simulation::{ArmData, ArmSim, SimParams};

pub use glam::Vec3;
