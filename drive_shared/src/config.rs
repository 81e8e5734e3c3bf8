//! Configuration system.
//!
//! Loads driving configuration from JSON strings/files (file IO left to app).
//! Every field has a default, so a partial document (or `{}`) is valid.

use serde::{Deserialize, Serialize};

use crate::{
    camera::{CameraMode, FollowCamera},
    math::Vec3,
    motion::{boundary_for_ground, MotionConfig, MotionPolicy},
};

/// Root configuration for a driving session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Frame loop rate.
    #[serde(default = "default_frame_hz")]
    pub frame_hz: u32,
    /// Side length of the square ground plane.
    #[serde(default = "default_ground_size")]
    pub ground_size: f32,
    /// Distance kept between the boundary and the ground edge.
    #[serde(default = "default_boundary_margin")]
    pub boundary_margin: f32,
    /// Units per frame.
    #[serde(default = "default_linear_speed")]
    pub linear_speed: f32,
    /// Radians per frame.
    #[serde(default = "default_angular_speed")]
    pub angular_speed: f32,
    #[serde(default)]
    pub policy: MotionPolicy,
    #[serde(default)]
    pub camera: CameraMode,
    /// Chase point in the vehicle's local frame.
    #[serde(default = "default_follow_offset")]
    pub follow_offset: Vec3,
    /// Per-frame easing factor of the follow camera.
    #[serde(default = "default_follow_blend")]
    pub follow_blend: f32,
    /// Initial eye of the follow camera.
    #[serde(default)]
    pub camera_start: Vec3,
    /// Initial eye of the orbit camera, looking at the origin.
    #[serde(default = "default_orbit_eye")]
    pub orbit_eye: Vec3,
    /// Height the vehicle model sits at.
    #[serde(default = "default_ride_height")]
    pub ride_height: f32,
    /// Vehicle model, relative to `assets_dir`.
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default)]
    pub scene: SceneConfig,
}

/// Static scene settings handed to the renderer at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 0xRRGGBB.
    #[serde(default = "default_background")]
    pub background: u32,
    #[serde(default = "default_ambient")]
    pub ambient_intensity: f32,
    #[serde(default = "default_directional")]
    pub directional_intensity: f32,
    #[serde(default = "default_point")]
    pub point_intensity: f32,
    #[serde(default = "default_viewport")]
    pub viewport: (u32, u32),
}

fn default_frame_hz() -> u32 {
    60
}

fn default_ground_size() -> f32 {
    100.0
}

fn default_boundary_margin() -> f32 {
    1.0
}

fn default_linear_speed() -> f32 {
    0.2
}

fn default_angular_speed() -> f32 {
    0.05
}

fn default_follow_offset() -> Vec3 {
    FollowCamera::default().offset
}

fn default_follow_blend() -> f32 {
    FollowCamera::default().blend
}

fn default_orbit_eye() -> Vec3 {
    Vec3::new(0.0, 10.0, 15.0)
}

fn default_ride_height() -> f32 {
    -1.8
}

fn default_model_path() -> String {
    "car.glb".to_string()
}

fn default_assets_dir() -> String {
    ".".to_string()
}

fn default_background() -> u32 {
    0x010803
}

fn default_ambient() -> f32 {
    1.0
}

fn default_directional() -> f32 {
    2.0
}

fn default_point() -> f32 {
    2.0
}

fn default_viewport() -> (u32, u32) {
    (1280, 720)
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            ambient_intensity: default_ambient(),
            directional_intensity: default_directional(),
            point_intensity: default_point(),
            viewport: default_viewport(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            frame_hz: default_frame_hz(),
            ground_size: default_ground_size(),
            boundary_margin: default_boundary_margin(),
            linear_speed: default_linear_speed(),
            angular_speed: default_angular_speed(),
            policy: MotionPolicy::default(),
            camera: CameraMode::default(),
            follow_offset: default_follow_offset(),
            follow_blend: default_follow_blend(),
            camera_start: Vec3::ZERO,
            orbit_eye: default_orbit_eye(),
            ride_height: default_ride_height(),
            model_path: default_model_path(),
            assets_dir: default_assets_dir(),
            scene: SceneConfig::default(),
        }
    }
}

impl DriveConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn motion(&self) -> MotionConfig {
        MotionConfig {
            linear_speed: self.linear_speed,
            angular_speed: self.angular_speed,
            boundary: boundary_for_ground(self.ground_size, self.boundary_margin),
            policy: self.policy,
        }
    }

    pub fn follow_camera(&self) -> FollowCamera {
        FollowCamera {
            offset: self.follow_offset,
            blend: self.follow_blend,
        }
    }
}
