use anyhow::Result;
use physics::{ArmSim, Vec3};

use crate::viewer::{Viewer, ViewerOptions};

/// Viewer without a display. It counts frames and logs where the tool is,
/// which makes runs observable on machines without a GPU.
#[derive(Debug)]
pub struct HeadlessViewer {
    frames: u64,
    max_frames: Option<u64>,
    log_every: u64,
    open: bool,
    last_tool: Vec3,
}

impl HeadlessViewer {
    #[must_use]
    pub fn new(options: &ViewerOptions, sim: &ArmSim) -> Self {
        tracing::info!(max_frames = ?options.max_frames, "launching headless viewer");
        Self {
            frames: 0,
            max_frames: options.max_frames,
            log_every: options.log_every,
            open: true,
            last_tool: sim.end_effector(),
        }
    }

    /// Frames synced so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Tool position seen on the last sync.
    #[must_use]
    pub fn last_tool(&self) -> Vec3 {
        self.last_tool
    }
}

impl Viewer for HeadlessViewer {
    fn is_running(&mut self) -> bool {
        self.open && self.max_frames.map_or(true, |max| self.frames < max)
    }

    fn sync(&mut self, sim: &ArmSim) -> Result<()> {
        self.frames += 1;
        self.last_tool = sim.end_effector();
        if self.log_every > 0 && self.frames % self.log_every == 0 {
            tracing::debug!(
                frame = self.frames,
                time = sim.data.time,
                tool = ?self.last_tool,
                "headless frame"
            );
        }
        Ok(())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            tracing::info!(frames = self.frames, "headless viewer closed");
        }
    }
}
