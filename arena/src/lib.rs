//! # Arena
//!
//! Entry point for the Panda obstacle demo and home of the rollout driver.
//!
//! The workspace is split into three library crates tied together here:
//!
//! -   **[`physics`]:** kinematic simulator of a seven joint Panda arm with
//!     joint limits and capsule contacts against obstacles and the floor.
//! -   **[`rl`]:** the gym style [`rl::Env`] trait, action and observation
//!     spaces, and the `PandaObstacleEnv` reaching task.
//! -   **[`render`]:** the [`render::Viewer`] contract with a headless viewer
//!     and, behind the `window` feature, a `wgpu` window.
//!
//! [`driver::run`] plays random actions in an environment while a viewer
//! mirrors it, and [`app::run`] builds both from a [`config::DemoConfig`].

pub mod app;
pub mod config;
pub mod driver;

pub use physics;
pub use render;
pub use rl;
