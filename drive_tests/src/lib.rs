//! Shared fixtures for the driving integration tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::bail;
use async_trait::async_trait;
use bytes::Bytes;
use drive_shared::{
    asset::{minimal_glb, AssetLoader, VehicleModel},
    config::SceneConfig,
    math::{Mat4, Vec3},
    motion::Pose,
    render::RenderBackend,
};

/// Installs a test-friendly subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Serves a valid in-memory model.
#[derive(Default)]
pub struct MemoryLoader {
    pub calls: AtomicUsize,
}

#[async_trait]
impl AssetLoader for MemoryLoader {
    async fn load(&self, path: &str) -> anyhow::Result<VehicleModel> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(VehicleModel {
            name: path.trim_end_matches(".glb").to_string(),
            bytes: Bytes::from(minimal_glb()),
        })
    }
}

/// Always fails, counting how often it was asked.
#[derive(Default)]
pub struct FailingLoader {
    pub calls: AtomicUsize,
}

#[async_trait]
impl AssetLoader for FailingLoader {
    async fn load(&self, path: &str) -> anyhow::Result<VehicleModel> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        bail!("no such model: {path}")
    }
}

/// What a `RecordingRenderer` saw.
#[derive(Debug, Default, Clone)]
pub struct RenderLog {
    pub scenes: usize,
    pub frames: usize,
    pub vehicles: Vec<Pose>,
    pub eyes: Vec<Vec3>,
    pub resizes: Vec<(u32, u32)>,
}

/// Renderer that records calls into a shared log.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub log: Arc<Mutex<RenderLog>>,
}

impl RecordingRenderer {
    pub fn snapshot(&self) -> RenderLog {
        self.log.lock().expect("render log poisoned").clone()
    }
}

impl RenderBackend for RecordingRenderer {
    fn setup_scene(&mut self, _ground_size: f32, _scene: &SceneConfig) {
        self.log.lock().expect("render log poisoned").scenes += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log
            .lock()
            .expect("render log poisoned")
            .resizes
            .push((width, height));
    }

    fn begin_frame(&mut self) {}

    fn set_camera(&mut self, _view: Mat4, eye: Vec3) {
        self.log.lock().expect("render log poisoned").eyes.push(eye);
    }

    fn draw_vehicle(&mut self, pose: Pose, _ride_height: f32) {
        self.log
            .lock()
            .expect("render log poisoned")
            .vehicles
            .push(pose);
    }

    fn end_frame(&mut self) {
        self.log.lock().expect("render log poisoned").frames += 1;
    }
}
