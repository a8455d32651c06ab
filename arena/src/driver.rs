//! The rollout loop shared by the demo binary and the tests.
//!
//! [`run`] plays random actions in an environment for a fixed budget of
//! episodes and steps while a viewer mirrors the simulation. The viewer is
//! polled before every episode and every step; as soon as it reports that it
//! is no longer running no further step or reset happens.

use std::fmt;
use std::ops::{Deref, DerefMut};

use anyhow::{Context, Result};
use render::{Viewer, ViewerHandle};
use rl::Env;

/// Episode and step budget of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub max_episodes: usize,
    pub steps_per_episode: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_episodes: 4,
            steps_per_episode: 500,
        }
    }
}

/// What a run did, for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Episodes whose opening poll found the viewer running.
    pub episodes: usize,
    /// Successful `step` calls.
    pub steps: usize,
    /// `reset` calls made between episodes.
    pub resets: usize,
    /// The viewer reported not running before the budget was exhausted.
    pub stopped_by_viewer: bool,
}

/// One applied action and its outcome. Only lives long enough to be logged.
pub struct Transition<'a, O, A> {
    pub step: usize,
    pub obs: &'a O,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub action: &'a A,
}

impl<O, A: fmt::Debug> fmt::Display for Transition<'_, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {}, Reward: {:.3}, Terminated: {}, Truncated: {}, action: {:?}",
            self.step, self.reward, self.terminated, self.truncated, self.action
        )
    }
}

/// Closes the wrapped environment when dropped.
struct EnvGuard<'a, E: Env>(&'a mut E);

impl<E: Env> Deref for EnvGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.0
    }
}

impl<E: Env> DerefMut for EnvGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.0
    }
}

impl<E: Env> Drop for EnvGuard<'_, E> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Drive `env` with actions sampled from its action space.
///
/// Runs at most `cfg.max_episodes` episodes of at most
/// `cfg.steps_per_episode` steps, syncing the viewer after every step. An
/// episode ends early when the environment terminates or truncates, and the
/// next one starts from `env.reset(None)`. The environment is expected to be
/// reset already when the run begins.
///
/// The viewer handle is consumed and released first, then the environment
/// is closed, on every exit path including errors.
///
/// # Errors
///
/// Propagates the first error returned by the environment or the viewer.
pub fn run<E, V>(env: &mut E, viewer: ViewerHandle<V>, cfg: &RunConfig) -> Result<RunSummary>
where
    E: Env,
    E::Action: fmt::Debug,
    V: Viewer,
{
    let mut env = EnvGuard(env);
    // Locals drop in reverse order: the viewer is released before the env.
    let mut viewer = viewer;
    let mut summary = RunSummary::default();

    for episode in 0..cfg.max_episodes {
        if !viewer.is_running() {
            summary.stopped_by_viewer = true;
            break;
        }
        summary.episodes += 1;
        tracing::debug!(episode, "episode started");

        for step in 0..cfg.steps_per_episode {
            if !viewer.is_running() {
                break;
            }

            let action = env.action_space().sample();
            let outcome = env
                .step(&action)
                .with_context(|| format!("episode {episode}, step {step}"))?;
            summary.steps += 1;

            let transition = Transition {
                step,
                obs: &outcome.obs,
                reward: outcome.reward,
                terminated: outcome.terminated,
                truncated: outcome.truncated,
                action: &action,
            };
            tracing::info!("{transition}");

            viewer.sync(env.physics()).context("viewer sync failed")?;

            if outcome.terminated || outcome.truncated {
                break;
            }
        }

        if !viewer.is_running() {
            summary.stopped_by_viewer = true;
            break;
        }
        env.reset(None)
            .with_context(|| format!("reset after episode {episode}"))?;
        summary.resets += 1;
    }

    tracing::info!(
        episodes = summary.episodes,
        steps = summary.steps,
        resets = summary.resets,
        stopped_by_viewer = summary.stopped_by_viewer,
        "run finished"
    );
    Ok(summary)
}
