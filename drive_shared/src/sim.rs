//! Vehicle simulation context.
//!
//! Owns everything the frame loop mutates: key state, the vehicle slot, motion
//! tuning and the camera rig. All of it is touched from a single task, in this
//! order every frame:
//!
//! 1. motion update (only with a loaded vehicle)
//! 2. camera update (only with a loaded vehicle)
//! 3. render submission (always)

use tracing::{debug, error, info, trace};

use crate::{
    asset::VehicleModel,
    camera::{CameraMode, CameraRig, CameraState, OrbitCamera, OrbitInput},
    config::DriveConfig,
    input::KeyState,
    math::Vec3,
    motion::{self, MotionConfig, Pose},
    render::RenderBackend,
};

/// Lifecycle of the vehicle asset.
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleSlot {
    /// Model load still in flight.
    Loading,
    /// Model available; the pose is live.
    Ready { model_name: String, pose: Pose },
    /// Model failed to load. Permanent: there is no retry.
    Failed,
}

/// Per-process driving state.
pub struct VehicleSimulation {
    keys: KeyState,
    vehicle: VehicleSlot,
    motion: MotionConfig,
    rig: CameraRig,
    ride_height: f32,
    /// Frames on which the motion update actually ran.
    motion_frames: u64,
    /// Frames submitted to the renderer.
    rendered_frames: u64,
}

impl VehicleSimulation {
    pub fn new(cfg: &DriveConfig) -> Self {
        let rig = match cfg.camera {
            CameraMode::Follow => CameraRig::follow(
                cfg.follow_camera(),
                CameraState {
                    eye: cfg.camera_start,
                    target: Vec3::ZERO,
                },
            ),
            CameraMode::Orbit => {
                CameraRig::Orbit(OrbitCamera::looking_at(cfg.orbit_eye, Vec3::ZERO))
            }
        };
        Self::with_parts(cfg.motion(), rig, cfg.ride_height)
    }

    pub fn with_parts(motion: MotionConfig, rig: CameraRig, ride_height: f32) -> Self {
        Self {
            keys: KeyState::new(),
            vehicle: VehicleSlot::Loading,
            motion,
            rig,
            ride_height,
            motion_frames: 0,
            rendered_frames: 0,
        }
    }

    /// Applies a host key event. Returns `false` for keys that do not drive.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let known = self.keys.set_key(key, pressed);
        if !known {
            trace!(key, pressed, "Ignoring unbound key");
        }
        known
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// Forwards pointer input to the orbit rig. Ignored while following.
    pub fn orbit_input(&mut self, input: OrbitInput, viewport_height: f32) {
        if !self.rig.orbit_input(input, viewport_height) {
            debug!(?input, "Orbit input ignored by follow camera");
        }
    }

    /// Marks the vehicle loaded. The pose starts at the origin facing +Z.
    pub fn vehicle_loaded(&mut self, model: VehicleModel) {
        match self.vehicle {
            VehicleSlot::Loading => {
                info!(model = %model.name, bytes = model.bytes.len(), "Vehicle ready");
                self.vehicle = VehicleSlot::Ready {
                    model_name: model.name,
                    pose: Pose::default(),
                };
            }
            _ => debug!(model = %model.name, "Ignoring late vehicle load"),
        }
    }

    /// Records a load failure. The vehicle stays absent for the rest of the run.
    pub fn vehicle_failed(&mut self, err: &anyhow::Error) {
        error!(error = %format!("{err:#}"), "Error loading model");
        self.vehicle = VehicleSlot::Failed;
    }

    pub fn vehicle(&self) -> &VehicleSlot {
        &self.vehicle
    }

    pub fn pose(&self) -> Option<Pose> {
        match &self.vehicle {
            VehicleSlot::Ready { pose, .. } => Some(*pose),
            _ => None,
        }
    }

    pub fn camera(&self) -> CameraState {
        self.rig.state()
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.rig.mode()
    }

    pub fn motion_config(&self) -> &MotionConfig {
        &self.motion
    }

    pub fn ride_height(&self) -> f32 {
        self.ride_height
    }

    pub fn motion_frames(&self) -> u64 {
        self.motion_frames
    }

    pub fn rendered_frames(&self) -> u64 {
        self.rendered_frames
    }

    /// Runs one frame: motion, camera, then render.
    pub fn frame(&mut self, renderer: &mut dyn RenderBackend) {
        if let VehicleSlot::Ready { pose, .. } = &mut self.vehicle {
            let step = motion::step(*pose, &self.keys, &self.motion);
            if step.blocked {
                trace!(x = pose.x, z = pose.z, "Translation blocked at boundary");
            }
            *pose = step.pose;
            self.motion_frames += 1;
            self.rig.track(&step.pose, self.ride_height);
        }

        let camera = self.rig.state();
        renderer.begin_frame();
        renderer.set_camera(camera.view_matrix(), camera.eye);
        if let Some(pose) = self.pose() {
            renderer.draw_vehicle(pose, self.ride_height);
        }
        renderer.end_frame();
        self.rendered_frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::{
        config::SceneConfig,
        math::{Mat4, Vec3},
        render::NullRenderer,
    };

    #[derive(Default)]
    struct CountingRenderer {
        frames: u32,
        vehicles: u32,
        last_eye: Vec3,
    }

    impl RenderBackend for CountingRenderer {
        fn setup_scene(&mut self, _ground_size: f32, _scene: &SceneConfig) {}
        fn resize(&mut self, _width: u32, _height: u32) {}
        fn begin_frame(&mut self) {}
        fn set_camera(&mut self, _view: Mat4, eye: Vec3) {
            self.last_eye = eye;
        }
        fn draw_vehicle(&mut self, _pose: Pose, _ride_height: f32) {
            self.vehicles += 1;
        }
        fn end_frame(&mut self) {
            self.frames += 1;
        }
    }

    fn model() -> VehicleModel {
        VehicleModel {
            name: "car".to_string(),
            bytes: Bytes::from_static(b"glTF"),
        }
    }

    #[test]
    fn loading_vehicle_skips_motion_but_renders() {
        let mut sim = VehicleSimulation::new(&DriveConfig::default());
        let mut r = CountingRenderer::default();
        sim.set_key("w", true);
        sim.frame(&mut r);
        sim.frame(&mut r);
        assert_eq!(r.frames, 2);
        assert_eq!(r.vehicles, 0);
        assert_eq!(sim.motion_frames(), 0);
        assert_eq!(sim.camera().eye, Vec3::ZERO);
    }

    #[test]
    fn keys_held_before_load_apply_on_first_ready_frame() {
        let mut sim = VehicleSimulation::new(&DriveConfig::default());
        let mut r = CountingRenderer::default();
        sim.set_key("w", true);
        sim.frame(&mut r);
        sim.vehicle_loaded(model());
        sim.frame(&mut r);
        assert_eq!(sim.pose(), Some(Pose::new(0.0, 0.2, 0.0)));
        assert_eq!(r.vehicles, 1);
    }

    #[test]
    fn failure_is_permanent() {
        let mut sim = VehicleSimulation::new(&DriveConfig::default());
        sim.vehicle_failed(&anyhow::anyhow!("404"));
        sim.vehicle_loaded(model());
        sim.set_key("w", true);
        sim.frame(&mut NullRenderer);
        assert_eq!(sim.vehicle(), &VehicleSlot::Failed);
        assert_eq!(sim.motion_frames(), 0);
        assert_eq!(sim.rendered_frames(), 1);
        assert!(sim.pose().is_none());
    }

    #[test]
    fn follow_camera_trails_the_vehicle() {
        let mut sim = VehicleSimulation::new(&DriveConfig::default());
        let mut r = CountingRenderer::default();
        sim.vehicle_loaded(model());
        sim.frame(&mut r);
        let cam = sim.camera();
        assert_eq!(cam.target, Vec3::new(0.0, -1.8, 0.0));
        assert!(cam.eye.distance(Vec3::new(0.0, 0.52, -0.6)) < 1e-4);
        assert_eq!(r.last_eye, cam.eye);
    }

    #[test]
    fn unbound_keys_are_reported() {
        let mut sim = VehicleSimulation::new(&DriveConfig::default());
        assert!(sim.set_key("a", true));
        assert!(!sim.set_key("Shift", true));
        assert!(sim.keys().is_pressed("a"));
    }
}
