//! Client implementation.
//!
//! The client maintains:
//! - The vehicle simulation (keys, pose, camera)
//! - An input channel fed by the host (keys, pointer, resize)
//! - The one-shot hand-off from the startup model load
//! - The render backend
//!
//! Everything runs on one task. Each frame drains the input channel before
//! the simulation reads the keys, so all events sent before a frame are
//! visible to it.

use std::sync::Arc;

use drive_shared::{
    asset::{AssetLoader, VehicleModel},
    config::DriveConfig,
    render::RenderBackend,
    sim::{VehicleSimulation, VehicleSlot},
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::input::InputEvent;

type PendingLoad = oneshot::Receiver<anyhow::Result<VehicleModel>>;

/// High-level driving client.
pub struct DriveClient {
    pub sim: VehicleSimulation,
    renderer: Box<dyn RenderBackend>,
    input_rx: mpsc::Receiver<InputEvent>,
    pending_load: Option<PendingLoad>,
    viewport: (u32, u32),
    frame: u64,
}

impl DriveClient {
    /// Builds the client and starts loading the vehicle model in the background.
    ///
    /// Returns the sender side of the input channel. Must be called inside a
    /// Tokio runtime.
    pub fn new(
        cfg: &DriveConfig,
        mut renderer: Box<dyn RenderBackend>,
        loader: Arc<dyn AssetLoader>,
    ) -> (Self, mpsc::Sender<InputEvent>) {
        let (input_tx, input_rx) = mpsc::channel(256);
        let (load_tx, load_rx) = oneshot::channel();

        let model_path = cfg.model_path.clone();
        info!(model = %model_path, "Loading vehicle model");
        tokio::spawn(async move {
            let result = loader.load(&model_path).await;
            // The client may be gone already; nothing to report to then.
            let _ = load_tx.send(result);
        });

        renderer.setup_scene(cfg.ground_size, &cfg.scene);

        let client = Self {
            sim: VehicleSimulation::new(cfg),
            renderer,
            input_rx,
            pending_load: Some(load_rx),
            viewport: cfg.scene.viewport,
            frame: 0,
        };
        (client, input_tx)
    }

    /// Applies a finished model load, if any. Never blocks.
    pub fn poll_asset(&mut self) {
        let Some(rx) = self.pending_load.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(model)) => {
                self.sim.vehicle_loaded(model);
                self.pending_load = None;
            }
            Ok(Err(e)) => {
                self.sim.vehicle_failed(&e);
                self.pending_load = None;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                self.sim
                    .vehicle_failed(&anyhow::anyhow!("model load task ended without a result"));
                self.pending_load = None;
            }
        }
    }

    /// Waits for the model load to finish and applies it.
    pub async fn settle_asset(&mut self) {
        if let Some(rx) = self.pending_load.take() {
            match rx.await {
                Ok(Ok(model)) => self.sim.vehicle_loaded(model),
                Ok(Err(e)) => self.sim.vehicle_failed(&e),
                Err(_) => self
                    .sim
                    .vehicle_failed(&anyhow::anyhow!("model load task ended without a result")),
            }
        }
    }

    /// Applies every queued input event.
    pub fn drain_input(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.input_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Applies one host event immediately, bypassing the input channel.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => {
                self.sim.set_key(&key, true);
            }
            InputEvent::KeyReleased(key) => {
                self.sim.set_key(&key, false);
            }
            InputEvent::Orbit(input) => {
                self.sim.orbit_input(input, self.viewport.1 as f32);
            }
            InputEvent::Resize { width, height } => {
                debug!(width, height, "Resize");
                self.viewport = (width, height);
                self.renderer.resize(width, height);
            }
        }
    }

    /// Advances one frame: asset hand-off, input, simulation and render.
    pub fn run_frame(&mut self) {
        self.poll_asset();
        self.drain_input();
        self.sim.frame(self.renderer.as_mut());
        self.frame += 1;
    }

    /// Runs `n` frames back to back, without pacing.
    pub fn run_for_frames(&mut self, n: u64) {
        for _ in 0..n {
            self.run_frame();
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Human-readable status lines.
    pub fn status(&self) -> Vec<String> {
        let mut out = Vec::new();
        out.push(format!("Frame: {}", self.frame));
        match self.sim.vehicle() {
            VehicleSlot::Loading => out.push("Vehicle: loading".to_string()),
            VehicleSlot::Failed => out.push("Vehicle: failed to load".to_string()),
            VehicleSlot::Ready { model_name, pose } => {
                out.push(format!("Vehicle: {model_name}"));
                out.push(format!(
                    "Pose: x={:.3} z={:.3} yaw={:.3}",
                    pose.x, pose.z, pose.yaw
                ));
            }
        }
        let motion = self.sim.motion_config();
        out.push(format!(
            "Motion: {:?} speed={} turn={} boundary={}",
            motion.policy, motion.linear_speed, motion.angular_speed, motion.boundary
        ));
        out.push(format!("Ride height: {}", self.sim.ride_height()));
        out.push(format!("Keys: {:?}", self.sim.keys().flags()));
        let cam = self.sim.camera();
        out.push(format!(
            "Camera ({:?}): eye=({:.2}, {:.2}, {:.2})",
            self.sim.camera_mode(),
            cam.eye.x,
            cam.eye.y,
            cam.eye.z
        ));
        out.push(format!("Viewport: {}x{}", self.viewport.0, self.viewport.1));
        out
    }
}
