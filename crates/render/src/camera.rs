//! Orbit camera for the arm viewer
//!
//! The world is z-up. The camera circles a target point at a fixed distance;
//! yaw turns around the z axis and pitch tilts above the horizon.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Keeps the camera from flipping over the poles.
const MAX_PITCH: f32 = 1.5;
const MIN_DISTANCE: f32 = 0.3;

/// Uniform buffer representation of the camera matrices used by the shaders.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Combined view projection matrix used by the vertex shader.
    pub view_proj: [[f32; 4]; 4],
}

/// Camera orbiting a fixed point.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Distance from the target.
    pub distance: f32,
    /// Rotation around the world z axis (radians).
    pub yaw: f32,
    /// Elevation above the horizontal plane (radians).
    pub pitch: f32,
    /// Aspect ratio of the render target.
    pub aspect: f32,
    /// Field of view in radians.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl OrbitCamera {
    /// Camera looking at the arm's workspace from the front right.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Vec3::new(0.3, 0.0, 0.4),
            distance: 2.2,
            yaw: -0.6,
            pitch: 0.45,
            aspect: aspect(width, height),
            fovy: 45.0f32.to_radians(),
            znear: 0.05,
            zfar: 50.0,
        }
    }

    /// Update aspect ratio when window is resized
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect(width, height);
    }

    /// Rotate around the target, clamping the elevation.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move towards (`factor < 1`) or away from the target.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).max(MIN_DISTANCE);
    }

    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target
            + Vec3::new(
                horizontal * self.yaw.cos(),
                horizontal * self.yaw.sin(),
                self.distance * self.pitch.sin(),
            )
    }

    /// Computes a view projection matrix from the camera parameters
    #[must_use]
    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Z);
        let proj = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    #[must_use]
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.build_view_projection_matrix().to_cols_array_2d(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn aspect(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_keeps_its_distance() {
        let mut camera = OrbitCamera::new(800, 600);
        camera.orbit(1.0, 0.2);
        assert!((camera.eye().distance(camera.target) - camera.distance).abs() < 1e-5);
    }

    #[test]
    fn pitch_and_zoom_are_clamped() {
        let mut camera = OrbitCamera::new(800, 600);
        camera.orbit(0.0, 10.0);
        assert!((camera.pitch - MAX_PITCH).abs() < 1e-6);
        camera.zoom(0.0);
        assert!((camera.distance - MIN_DISTANCE).abs() < 1e-6);
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let camera = OrbitCamera::new(800, 600);
        let clip = camera.build_view_projection_matrix() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn zero_height_window_does_not_divide_by_zero() {
        let camera = OrbitCamera::new(800, 0);
        assert!(camera.aspect.is_finite());
    }
}
