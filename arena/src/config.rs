//! Demo configuration: an optional JSON file overridden by command line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use render::ViewerOptions;
use rl::PandaObstacleConfig;
use serde::{Deserialize, Serialize};

use crate::driver::RunConfig;

/// Random-action rollouts of the Panda obstacle task.
#[derive(Parser, Debug, Default)]
#[command(name = "panda_demo", version, about)]
pub struct Cli {
    /// JSON file with `run`, `env` and `viewer` sections.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Number of episodes to run.
    #[arg(long)]
    pub episodes: Option<usize>,
    /// Step budget of each episode.
    #[arg(long)]
    pub steps: Option<usize>,
    /// Seed for the first reset.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Run without opening a window.
    #[arg(long)]
    pub headless: bool,
    /// Stop the viewer after this many frames.
    #[arg(long)]
    pub max_frames: Option<u64>,
    /// Frame rate cap of the window (0 disables pacing).
    #[arg(long)]
    pub fps: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub max_episodes: usize,
    pub steps_per_episode: usize,
    pub seed: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        let budget = RunConfig::default();
        Self {
            max_episodes: budget.max_episodes,
            steps_per_episode: budget.steps_per_episode,
            seed: 0,
        }
    }
}

impl RunSettings {
    #[must_use]
    pub fn budget(&self) -> RunConfig {
        RunConfig {
            max_episodes: self.max_episodes,
            steps_per_episode: self.steps_per_episode,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub run: RunSettings,
    pub env: PandaObstacleConfig,
    pub viewer: ViewerOptions,
}

impl DemoConfig {
    /// Read a configuration file. Missing sections and fields take defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Build the configuration for a command line: the `--config` file (or
    /// defaults) with every given flag applied on top.
    ///
    /// # Errors
    ///
    /// Fails when the config file cannot be loaded.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli);
        Ok(config)
    }

    fn apply(&mut self, cli: &Cli) {
        if let Some(episodes) = cli.episodes {
            self.run.max_episodes = episodes;
        }
        if let Some(steps) = cli.steps {
            self.run.steps_per_episode = steps;
        }
        if let Some(seed) = cli.seed {
            self.run.seed = seed;
        }
        if cli.headless {
            self.viewer.headless = true;
        }
        if cli.max_frames.is_some() {
            self.viewer.max_frames = cli.max_frames;
        }
        if let Some(fps) = cli.fps {
            self.viewer.fps = (fps > 0.0).then_some(fps);
        }
    }
}
