//! Vehicle motion.
//!
//! One frame of kinematic driving: read the key flags, build a candidate pose,
//! reject the translation if it leaves the square boundary, commit.
//!
//! Per-frame rules shared by every policy:
//! - Speeds are per frame, not per second. There is no interpolation.
//! - Translation uses the yaw from before this frame's rotation.
//! - The boundary test only ever discards translation; rotation always commits.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    input::{KeyState, LogicalKey},
    math::{Mat4, Vec3},
};

/// How the four keys combine into motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPolicy {
    /// Forward+backward cancel out. Steering only while moving, mirrored in
    /// reverse.
    #[default]
    CancelOnOpposite,
    /// Forward and backward applied one after the other. Steering while either
    /// is held, never mirrored.
    Additive,
    /// Forward only, no reverse. Steering on every frame.
    TurnAlways,
}

impl FromStr for MotionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "cancel_on_opposite" | "cancel" => Ok(MotionPolicy::CancelOnOpposite),
            "additive" => Ok(MotionPolicy::Additive),
            "turn_always" => Ok(MotionPolicy::TurnAlways),
            other => anyhow::bail!(
                "unknown motion policy '{other}' (expected cancel_on_opposite, additive or turn_always)"
            ),
        }
    }
}

/// Position on the ground plane plus heading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub z: f32,
    /// Radians about +Y. 0 faces +Z.
    pub yaw: f32,
}

impl Pose {
    pub const fn new(x: f32, z: f32, yaw: f32) -> Self {
        Self { x, z, yaw }
    }

    /// World-space position at the given ride height.
    pub fn position(&self, ride_height: f32) -> Vec3 {
        Vec3::new(self.x, ride_height, self.z)
    }

    /// World transform (translation + yaw) at the given ride height.
    pub fn world_transform(&self, ride_height: f32) -> Mat4 {
        Mat4::from_yaw_translation(self.yaw, self.position(ride_height))
    }

    pub fn within(&self, boundary: f32) -> bool {
        self.x.abs() <= boundary && self.z.abs() <= boundary
    }
}

/// Motion tuning. Immutable once the simulation is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Units per frame.
    pub linear_speed: f32,
    /// Radians per frame.
    pub angular_speed: f32,
    /// Maximum |x| and |z| a committed translation may reach.
    pub boundary: f32,
    pub policy: MotionPolicy,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            linear_speed: 0.2,
            angular_speed: 0.05,
            boundary: boundary_for_ground(100.0, 1.0),
            policy: MotionPolicy::default(),
        }
    }
}

/// Half the ground extent minus a margin.
pub fn boundary_for_ground(ground_size: f32, margin: f32) -> f32 {
    ground_size / 2.0 - margin
}

/// Result of one motion step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    pub pose: Pose,
    /// The candidate translation left the boundary and was discarded.
    pub blocked: bool,
}

/// Advances `pose` by one frame.
pub fn step(pose: Pose, keys: &KeyState, cfg: &MotionConfig) -> MotionStep {
    let forward = keys.pressed(LogicalKey::Forward);
    let backward = keys.pressed(LogicalKey::Backward);
    let left = keys.pressed(LogicalKey::Left);
    let right = keys.pressed(LogicalKey::Right);

    let dx = pose.yaw.sin() * cfg.linear_speed;
    let dz = pose.yaw.cos() * cfg.linear_speed;
    let mut new_x = pose.x;
    let mut new_z = pose.z;
    let mut yaw = pose.yaw;

    match cfg.policy {
        MotionPolicy::CancelOnOpposite => {
            let moving_forward = forward && !backward;
            let moving_backward = backward && !forward;
            if moving_forward {
                new_x += dx;
                new_z += dz;
            }
            if moving_backward {
                new_x -= dx;
                new_z -= dz;
            }
            if moving_forward || moving_backward {
                let turn = if moving_forward {
                    cfg.angular_speed
                } else {
                    -cfg.angular_speed
                };
                if left {
                    yaw += turn;
                }
                if right {
                    yaw -= turn;
                }
            }
        }
        MotionPolicy::Additive => {
            if forward {
                new_x += dx;
                new_z += dz;
            }
            if backward {
                new_x -= dx;
                new_z -= dz;
            }
            if forward || backward {
                if left {
                    yaw += cfg.angular_speed;
                }
                if right {
                    yaw -= cfg.angular_speed;
                }
            }
        }
        MotionPolicy::TurnAlways => {
            if forward {
                new_x += dx;
                new_z += dz;
            }
            if left {
                yaw += cfg.angular_speed;
            }
            if right {
                yaw -= cfg.angular_speed;
            }
        }
    }

    let candidate = Pose::new(new_x, new_z, yaw);
    let moved = new_x != pose.x || new_z != pose.z;
    if candidate.within(cfg.boundary) {
        MotionStep {
            pose: candidate,
            blocked: false,
        }
    } else {
        MotionStep {
            pose: Pose::new(pose.x, pose.z, yaw),
            blocked: moved,
        }
    }
}
