//! Viewer contract and the scoped handle that owns a viewer for a run.

use std::ops::{Deref, DerefMut};

use anyhow::Result;
use physics::ArmSim;
use serde::{Deserialize, Serialize};

/// A surface that displays the simulation and can be closed by the user.
pub trait Viewer {
    /// Poll for user input and report whether the viewer is still open.
    fn is_running(&mut self) -> bool;

    /// Push the current simulation state to the display.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame could not be presented.
    fn sync(&mut self, sim: &ArmSim) -> Result<()>;

    /// Release the display. Must be safe to call more than once.
    fn close(&mut self);
}

impl<V: Viewer + ?Sized> Viewer for Box<V> {
    fn is_running(&mut self) -> bool {
        (**self).is_running()
    }

    fn sync(&mut self, sim: &ArmSim) -> Result<()> {
        (**self).sync(sim)
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// Owns a viewer and closes it when dropped, whichever way the owner exits.
pub struct ViewerHandle<V: Viewer> {
    viewer: V,
}

impl<V: Viewer> ViewerHandle<V> {
    #[must_use]
    pub fn new(viewer: V) -> Self {
        Self { viewer }
    }
}

impl<V: Viewer> Deref for ViewerHandle<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.viewer
    }
}

impl<V: Viewer> DerefMut for ViewerHandle<V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.viewer
    }
}

impl<V: Viewer> Drop for ViewerHandle<V> {
    fn drop(&mut self) {
        self.viewer.close();
    }
}

/// How the viewer is opened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Skip the window even when the `window` feature is compiled in.
    pub headless: bool,
    /// Report the viewer as closed after this many synced frames.
    pub max_frames: Option<u64>,
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frame pacing for the window; `None` renders as fast as possible.
    pub fps: Option<f32>,
    /// Headless progress is logged every this many frames (0 disables).
    pub log_every: u64,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            headless: false,
            max_frames: None,
            title: "Panda Obstacle".to_string(),
            width: 1280,
            height: 720,
            fps: Some(60.0),
            log_every: 100,
        }
    }
}
