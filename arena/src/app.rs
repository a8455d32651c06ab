//! Wiring for the demo binary: environment, viewer and driver.

use anyhow::{Context, Result};
use rl::{Env, PandaObstacleEnv};

use crate::config::DemoConfig;
use crate::driver::{self, RunSummary};

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the environment and viewer described by `config` and run the demo.
///
/// # Errors
///
/// Returns any error from environment construction, viewer launch or the
/// rollout itself.
pub fn run(config: &DemoConfig) -> Result<RunSummary> {
    tracing::info!(
        episodes = config.run.max_episodes,
        steps = config.run.steps_per_episode,
        seed = config.run.seed,
        headless = config.viewer.headless,
        "starting panda obstacle demo"
    );

    let mut env =
        PandaObstacleEnv::new(config.env.clone()).context("failed to build environment")?;
    let (_obs, info) = env
        .reset(Some(config.run.seed))
        .context("initial reset failed")?;
    if let Some(distance) = info.get("distance") {
        tracing::debug!(%distance, goal = ?env.goal(), "initial state");
    }

    let viewer = match render::launch(&config.viewer, env.physics()) {
        Ok(viewer) => viewer,
        Err(e) => {
            env.close();
            return Err(e.context("failed to launch viewer"));
        }
    };

    let summary = driver::run(&mut env, viewer, &config.run.budget())?;
    tracing::info!(
        episodes = summary.episodes,
        steps = summary.steps,
        resets = summary.resets,
        "demo finished"
    );
    Ok(summary)
}
