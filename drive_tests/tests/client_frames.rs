//! Frame loop integration: asset hand-off, input channel, camera and render.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use drive_client::input::InputEvent;
use drive_client::DriveClient;
use drive_shared::asset::FsAssetLoader;
use drive_shared::camera::{CameraMode, OrbitInput};
use drive_shared::config::DriveConfig;
use drive_shared::math::Vec3;
use drive_shared::motion::{MotionPolicy, Pose};
use drive_shared::sim::VehicleSlot;
use drive_tests::{init_tracing, FailingLoader, MemoryLoader, RecordingRenderer};

#[tokio::test]
async fn failed_load_never_runs_motion_but_keeps_rendering() -> anyhow::Result<()> {
    init_tracing();
    let loader = Arc::new(FailingLoader::default());
    let renderer = RecordingRenderer::default();
    let (mut client, input) = DriveClient::new(
        &DriveConfig::default(),
        Box::new(renderer.clone()),
        loader.clone(),
    );

    client.settle_asset().await;
    input.send(InputEvent::KeyPressed("w".into())).await?;
    client.run_for_frames(50);

    assert_eq!(client.sim.vehicle(), &VehicleSlot::Failed);
    assert_eq!(client.sim.motion_frames(), 0);
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);

    let log = renderer.snapshot();
    assert_eq!(log.frames, 50);
    assert!(log.vehicles.is_empty());
    // Camera never moved off its start.
    assert!(log.eyes.iter().all(|eye| *eye == Vec3::ZERO));
    Ok(())
}

#[tokio::test]
async fn missing_file_on_disk_degrades_to_no_vehicle() -> anyhow::Result<()> {
    init_tracing();
    let cfg = DriveConfig {
        model_path: "definitely_not_here.glb".into(),
        ..DriveConfig::default()
    };
    let loader = Arc::new(FsAssetLoader::new(std::env::temp_dir()));
    let (mut client, _input) =
        DriveClient::new(&cfg, Box::new(RecordingRenderer::default()), loader);

    client.settle_asset().await;
    client.run_for_frames(3);
    assert!(client.sim.pose().is_none());
    assert_eq!(client.sim.rendered_frames(), 3);
    Ok(())
}

#[tokio::test]
async fn frames_before_load_render_without_vehicle() -> anyhow::Result<()> {
    let renderer = RecordingRenderer::default();
    let (mut client, _input) = DriveClient::new(
        &DriveConfig::default(),
        Box::new(renderer.clone()),
        Arc::new(MemoryLoader::default()),
    );

    // Load task has not been polled yet on this single-threaded runtime.
    client.run_frame();
    assert_eq!(client.sim.vehicle(), &VehicleSlot::Loading);

    client.settle_asset().await;
    client.run_frame();
    assert!(client.sim.pose().is_some());

    let log = renderer.snapshot();
    assert_eq!(log.scenes, 1);
    assert_eq!(log.frames, 2);
    assert_eq!(log.vehicles.len(), 1);
    Ok(())
}

#[tokio::test]
async fn keys_sent_over_channel_drive_the_vehicle() -> anyhow::Result<()> {
    init_tracing();
    let (mut client, input) = DriveClient::new(
        &DriveConfig::default(),
        Box::new(RecordingRenderer::default()),
        Arc::new(MemoryLoader::default()),
    );
    client.settle_asset().await;

    input.send(InputEvent::KeyPressed("w".into())).await?;
    client.run_for_frames(5);
    let pose = client.sim.pose().expect("vehicle loaded");
    assert_eq!(pose.x, 0.0);
    assert!((pose.z - 1.0).abs() < 1e-5);

    // Press and release inside one frame: the release wins.
    input.send(InputEvent::KeyPressed("a".into())).await?;
    input.send(InputEvent::KeyReleased("a".into())).await?;
    input.send(InputEvent::KeyReleased("w".into())).await?;
    input.send(InputEvent::KeyPressed("W".into())).await?;
    client.run_frame();
    assert_eq!(client.sim.pose(), Some(pose));
    assert!(!client.sim.keys().any());
    Ok(())
}

#[tokio::test]
async fn release_survives_a_burst_larger_than_the_channel() -> anyhow::Result<()> {
    init_tracing();
    let (mut client, _input) = DriveClient::new(
        &DriveConfig::default(),
        Box::new(RecordingRenderer::default()),
        Arc::new(MemoryLoader::default()),
    );
    client.settle_asset().await;

    // More events between two frames than the input channel holds.
    client.apply(InputEvent::KeyPressed("w".into()));
    for i in 0..300 {
        let key = if i % 3 == 0 { "x" } else { "Shift" };
        client.apply(InputEvent::KeyPressed(key.into()));
        client.apply(InputEvent::KeyReleased(key.into()));
    }
    client.apply(InputEvent::KeyReleased("w".into()));
    client.run_for_frames(10);

    assert!(!client.sim.keys().any());
    assert_eq!(client.sim.pose(), Some(Pose::default()));
    assert_eq!(client.sim.motion_frames(), 10);
    Ok(())
}

#[tokio::test]
async fn follow_camera_chases_and_looks_at_vehicle() -> anyhow::Result<()> {
    let renderer = RecordingRenderer::default();
    let cfg = DriveConfig::default();
    let (mut client, input) =
        DriveClient::new(&cfg, Box::new(renderer.clone()), Arc::new(MemoryLoader::default()));
    client.settle_asset().await;

    input.send(InputEvent::KeyPressed("w".into())).await?;
    client.run_for_frames(200);

    let pose = client.sim.pose().expect("vehicle loaded");
    let cam = client.sim.camera();
    assert_eq!(cam.target, pose.position(cfg.ride_height));

    // Steady state lags the chase point by a constant distance.
    let desired = cfg.follow_camera().desired_eye(&pose, cfg.ride_height);
    let lag = cam.eye.distance(desired);
    assert!(lag > 0.0 && lag < 2.0, "lag {lag}");
    assert!(cam.eye.z < pose.z, "camera should trail the car");

    let log = renderer.snapshot();
    assert_eq!(log.eyes.last().copied(), Some(cam.eye));
    Ok(())
}

#[tokio::test]
async fn orbit_camera_ignores_vehicle_and_follows_pointer() -> anyhow::Result<()> {
    let cfg = DriveConfig {
        camera: CameraMode::Orbit,
        ..DriveConfig::default()
    };
    let (mut client, input) = DriveClient::new(
        &cfg,
        Box::new(RecordingRenderer::default()),
        Arc::new(MemoryLoader::default()),
    );
    client.settle_asset().await;

    let start = client.sim.camera();
    input.send(InputEvent::KeyPressed("w".into())).await?;
    client.run_for_frames(10);
    assert_eq!(client.sim.camera(), start);
    assert!(client.sim.pose().expect("vehicle loaded").z > 0.0);

    input
        .send(InputEvent::Orbit(OrbitInput::Drag { dx: 50.0, dy: 0.0 }))
        .await?;
    input
        .send(InputEvent::Orbit(OrbitInput::Zoom { delta: -1.0 }))
        .await?;
    client.run_frame();
    let moved = client.sim.camera();
    assert_ne!(moved.eye, start.eye);
    assert!(moved.eye.len() < start.eye.len());
    Ok(())
}

#[tokio::test]
async fn resize_reaches_renderer_only() -> anyhow::Result<()> {
    let renderer = RecordingRenderer::default();
    let (mut client, input) = DriveClient::new(
        &DriveConfig::default(),
        Box::new(renderer.clone()),
        Arc::new(MemoryLoader::default()),
    );
    client.settle_asset().await;
    client.run_frame();
    let pose = client.sim.pose();

    input
        .send(InputEvent::Resize {
            width: 640,
            height: 480,
        })
        .await?;
    client.run_frame();

    assert_eq!(client.viewport(), (640, 480));
    assert_eq!(renderer.snapshot().resizes, vec![(640, 480)]);
    assert_eq!(client.sim.pose(), pose);
    Ok(())
}

#[tokio::test]
async fn reverse_steering_depends_on_policy() -> anyhow::Result<()> {
    for (policy, expected_yaw) in [
        (MotionPolicy::CancelOnOpposite, -0.05),
        (MotionPolicy::Additive, 0.05),
        (MotionPolicy::TurnAlways, 0.05),
    ] {
        let cfg = DriveConfig {
            policy,
            ..DriveConfig::default()
        };
        let (mut client, input) = DriveClient::new(
            &cfg,
            Box::new(RecordingRenderer::default()),
            Arc::new(MemoryLoader::default()),
        );
        client.settle_asset().await;
        input.send(InputEvent::KeyPressed("s".into())).await?;
        input.send(InputEvent::KeyPressed("a".into())).await?;
        client.run_frame();

        let pose = client.sim.pose().expect("vehicle loaded");
        assert_eq!(pose.yaw, expected_yaw, "{policy:?}");
        let expected_z = if policy == MotionPolicy::TurnAlways {
            0.0
        } else {
            -0.2
        };
        assert_eq!(pose, Pose::new(0.0, expected_z, expected_yaw), "{policy:?}");
    }
    Ok(())
}

#[tokio::test]
async fn status_reports_pose() -> anyhow::Result<()> {
    let (mut client, _input) = DriveClient::new(
        &DriveConfig::default(),
        Box::new(RecordingRenderer::default()),
        Arc::new(MemoryLoader::default()),
    );
    let before = client.status().join("\n");
    assert!(before.contains("Vehicle: loading"));

    client.settle_asset().await;
    client.run_frame();
    let after = client.status().join("\n");
    assert!(after.contains("Vehicle: car"), "{after}");
    assert!(after.contains("Pose: x=0.000 z=0.000 yaw=0.000"), "{after}");
    assert!(after.contains("Motion: CancelOnOpposite"), "{after}");
    assert!(after.contains("boundary=49"), "{after}");
    assert!(after.contains("Ride height: -1.8"), "{after}");
    Ok(())
}
