//! # Panda demo
//!
//! Opens a viewer on the Panda obstacle task and plays random actions for a
//! few episodes. Pass `--headless` to run without a window.

use anyhow::Result;
use arena::config::{Cli, DemoConfig};
use clap::Parser;

fn main() -> Result<()> {
    arena::app::init_tracing();
    let cli = Cli::parse();
    let config = DemoConfig::from_cli(&cli)?;
    arena::app::run(&config)?;
    Ok(())
}
