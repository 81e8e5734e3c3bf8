//! Camera policies.
//!
//! Two mutually exclusive rigs:
//! - **Follow**: eases toward a point fixed in the vehicle's local frame and
//!   always looks straight at the vehicle.
//! - **Orbit**: ignores the vehicle; pointer drag orbits, scroll zooms and
//!   pan slides a free target.

use std::f32::consts::{PI, TAU};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    math::{Mat4, Vec3},
    motion::Pose,
};

/// Which camera rig a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    #[default]
    Follow,
    Orbit,
}

impl FromStr for CameraMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "follow" => Ok(CameraMode::Follow),
            "orbit" => Ok(CameraMode::Orbit),
            other => anyhow::bail!("unknown camera mode '{other}' (expected follow or orbit)"),
        }
    }
}

/// Where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraState {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraState {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}

/// Smoothed chase camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    /// Desired eye position in the vehicle's local frame.
    pub offset: Vec3,
    /// Fraction of the remaining distance covered each frame.
    pub blend: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 7.0, -6.0),
            blend: 0.1,
        }
    }
}

impl FollowCamera {
    /// Eye position the camera is easing toward for this pose.
    pub fn desired_eye(&self, pose: &Pose, ride_height: f32) -> Vec3 {
        pose.world_transform(ride_height).transform_point(self.offset)
    }

    /// Moves `state` one frame closer to the chase point.
    ///
    /// Only the eye is smoothed. The look-at target snaps to the vehicle.
    pub fn update(&self, state: &mut CameraState, pose: &Pose, ride_height: f32) {
        let desired = self.desired_eye(pose, ride_height);
        state.eye = state.eye.lerp(desired, self.blend);
        state.target = pose.position(ride_height);
    }
}

/// Pointer input for the orbit rig, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitInput {
    /// Rotate around the target.
    Drag { dx: f32, dy: f32 },
    /// Scroll. Positive moves away from the target.
    Zoom { delta: f32 },
    /// Slide the target in the view plane.
    Pan { dx: f32, dy: f32 },
}

/// Free orbit camera described in spherical coordinates around `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Angle about +Y, 0 on +Z.
    pub azimuth: f32,
    /// Angle from +Y.
    pub polar: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub rotate_speed: f32,
    /// Multiplicative step per scroll notch.
    pub zoom_scale: f32,
}

const POLAR_EPS: f32 = 1e-4;

impl OrbitCamera {
    /// Orbit rig positioned at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.len().max(POLAR_EPS);
        let azimuth = offset.x.atan2(offset.z);
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        Self {
            target,
            radius,
            azimuth,
            polar: polar.clamp(POLAR_EPS, PI - POLAR_EPS),
            min_radius: 0.0,
            max_radius: f32::INFINITY,
            rotate_speed: 1.0,
            zoom_scale: 0.95,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.radius
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            eye: self.eye(),
            target: self.target,
        }
    }

    /// Applies one pointer event. `viewport_height` scales pixel deltas so a
    /// full-height drag is one full turn.
    pub fn apply(&mut self, input: OrbitInput, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        match input {
            OrbitInput::Drag { dx, dy } => {
                self.azimuth -= TAU * dx / height * self.rotate_speed;
                self.polar = (self.polar - TAU * dy / height * self.rotate_speed)
                    .clamp(POLAR_EPS, PI - POLAR_EPS);
            }
            OrbitInput::Zoom { delta } => {
                if delta > 0.0 {
                    self.radius /= self.zoom_scale;
                } else if delta < 0.0 {
                    self.radius *= self.zoom_scale;
                }
                self.radius = self.radius.clamp(self.min_radius, self.max_radius);
            }
            OrbitInput::Pan { dx, dy } => {
                let forward = (self.target - self.eye())
                    .try_normalize()
                    .unwrap_or(Vec3::Y);
                let right = forward
                    .cross(Vec3::Y)
                    .try_normalize()
                    .unwrap_or(Vec3::new(1.0, 0.0, 0.0));
                let up = right.cross(forward);
                let scale = self.radius / height;
                self.target = self.target + right * (-dx * scale) + up * (dy * scale);
            }
        }
    }
}

/// The active camera rig and its current state.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraRig {
    Follow {
        follow: FollowCamera,
        state: CameraState,
    },
    Orbit(OrbitCamera),
}

impl CameraRig {
    pub fn follow(follow: FollowCamera, start: CameraState) -> Self {
        CameraRig::Follow {
            follow,
            state: start,
        }
    }

    pub fn mode(&self) -> CameraMode {
        match self {
            CameraRig::Follow { .. } => CameraMode::Follow,
            CameraRig::Orbit(_) => CameraMode::Orbit,
        }
    }

    pub fn state(&self) -> CameraState {
        match self {
            CameraRig::Follow { state, .. } => *state,
            CameraRig::Orbit(orbit) => orbit.state(),
        }
    }

    /// Per-frame update for a loaded vehicle. Orbit ignores the pose.
    pub fn track(&mut self, pose: &Pose, ride_height: f32) {
        if let CameraRig::Follow { follow, state } = self {
            follow.update(state, pose, ride_height);
        }
    }

    /// Feeds pointer input to the orbit rig. Returns `false` when following.
    pub fn orbit_input(&mut self, input: OrbitInput, viewport_height: f32) -> bool {
        match self {
            CameraRig::Orbit(orbit) => {
                orbit.apply(input, viewport_height);
                true
            }
            CameraRig::Follow { .. } => false,
        }
    }
}
