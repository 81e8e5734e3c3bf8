//! Rendering abstraction.
//!
//! This crate intentionally does not depend on a graphics backend.
//! Define traits that a renderer implementation would satisfy. Scene graph
//! construction, lights, ground mesh and shadows live behind the backend.

use tracing::{debug, trace};

use crate::{
    config::SceneConfig,
    math::{Mat4, Vec3},
    motion::Pose,
};

/// A minimal rendering API.
pub trait RenderBackend: Send {
    /// Called once before the first frame.
    fn setup_scene(&mut self, ground_size: f32, scene: &SceneConfig);
    fn resize(&mut self, width: u32, height: u32);
    fn begin_frame(&mut self);
    fn set_camera(&mut self, view: Mat4, eye: Vec3);
    fn draw_vehicle(&mut self, pose: Pose, ride_height: f32);
    fn end_frame(&mut self);
}

/// A no-op renderer useful for headless tests.
#[derive(Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn setup_scene(&mut self, _ground_size: f32, _scene: &SceneConfig) {}
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn begin_frame(&mut self) {}
    fn set_camera(&mut self, _view: Mat4, _eye: Vec3) {}
    fn draw_vehicle(&mut self, _pose: Pose, _ride_height: f32) {}
    fn end_frame(&mut self) {}
}

/// Headless renderer that reports each frame through `tracing`.
#[derive(Debug, Default)]
pub struct TraceRenderer {
    frames: u64,
    aspect: f32,
    eye: Vec3,
}

impl TraceRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }
}

impl RenderBackend for TraceRenderer {
    fn setup_scene(&mut self, ground_size: f32, scene: &SceneConfig) {
        debug!(
            ground_size,
            background = %format!("#{:06x}", scene.background),
            ambient = scene.ambient_intensity,
            directional = scene.directional_intensity,
            point = scene.point_intensity,
            "Scene ready"
        );
        self.resize(scene.viewport.0, scene.viewport.1);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
        debug!(width, height, aspect = self.aspect, "Viewport resized");
    }

    fn begin_frame(&mut self) {}

    fn set_camera(&mut self, _view: Mat4, eye: Vec3) {
        self.eye = eye;
    }

    fn draw_vehicle(&mut self, pose: Pose, ride_height: f32) {
        trace!(
            frame = self.frames,
            x = pose.x,
            y = ride_height,
            z = pose.z,
            yaw = pose.yaw,
            "Vehicle"
        );
    }

    fn end_frame(&mut self) {
        trace!(
            frame = self.frames,
            eye_x = self.eye.x,
            eye_y = self.eye.y,
            eye_z = self.eye.z,
            "Frame"
        );
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_renderer_counts_frames_and_tracks_aspect() {
        let mut r = TraceRenderer::default();
        r.setup_scene(100.0, &SceneConfig::default());
        assert!((r.aspect() - 1280.0 / 720.0).abs() < 1e-6);
        for _ in 0..3 {
            r.begin_frame();
            r.end_frame();
        }
        assert_eq!(r.frames(), 3);
        r.resize(800, 0);
        assert_eq!(r.aspect(), 800.0);
    }
}
