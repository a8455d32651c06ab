//! Visualisation for the arm simulator.
//!
//! A [`Viewer`] is polled and synced by whoever drives the simulation. Two
//! implementations exist: [`HeadlessViewer`], which only counts frames, and
//! `WindowViewer` (behind the `window` feature), which draws the scene with
//! `wgpu` in a `winit` window without taking over the event loop.

pub mod camera;
pub mod headless;
pub mod mesh;
pub mod viewer;
#[cfg(feature = "window")]
pub mod window;

use anyhow::Result;
use physics::ArmSim;

pub use camera::OrbitCamera;
pub use headless::HeadlessViewer;
pub use viewer::{Viewer, ViewerHandle, ViewerOptions};
#[cfg(feature = "window")]
pub use window::WindowViewer;

/// Open the viewer described by `options`, showing `sim` as its first frame.
///
/// The returned handle closes the viewer when it is dropped.
///
/// # Errors
///
/// Fails when a window was requested but could not be created.
pub fn launch(options: &ViewerOptions, sim: &ArmSim) -> Result<ViewerHandle<Box<dyn Viewer>>> {
    let viewer: Box<dyn Viewer> = if options.headless {
        Box::new(HeadlessViewer::new(options, sim))
    } else {
        open_window(options, sim)?
    };
    Ok(ViewerHandle::new(viewer))
}

#[cfg(feature = "window")]
fn open_window(options: &ViewerOptions, sim: &ArmSim) -> Result<Box<dyn Viewer>> {
    Ok(Box::new(WindowViewer::new(options, sim)?))
}

#[cfg(not(feature = "window"))]
#[allow(clippy::unnecessary_wraps)]
fn open_window(options: &ViewerOptions, sim: &ArmSim) -> Result<Box<dyn Viewer>> {
    tracing::warn!("built without the `window` feature, falling back to the headless viewer");
    Ok(Box::new(HeadlessViewer::new(options, sim)))
}
