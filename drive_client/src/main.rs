//! Standalone driving client.
//!
//! Usage:
//!   cargo run -p drive_client -- [--config drive.json] [--assets-dir assets]
//!       [--model car.glb] [--policy cancel_on_opposite|additive|turn_always]
//!       [--camera follow|orbit] [--frame-hz 60]
//!
//! Loads the vehicle model in the background and runs the frame loop with a
//! headless renderer that logs each frame at `trace` level.
//!
//! Console commands:
//!   down <key> / up <key>  - press or release w, a, s, d
//!   drag <dx> <dy>         - orbit camera drag
//!   zoom <delta>           - orbit camera scroll
//!   pan <dx> <dy>          - orbit camera pan
//!   resize <w> <h>         - viewport resize
//!   status                 - show client status
//!   quit                   - exit

use std::env;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use drive_client::args::parse_args;
use drive_client::client::DriveClient;
use drive_client::input::{parse_console_line, ConsoleCommand};
use drive_shared::asset::FsAssetLoader;
use drive_shared::render::TraceRenderer;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let cfg = parse_args(&args).context("parse arguments")?;
    let loader = Arc::new(FsAssetLoader::new(&cfg.assets_dir));
    info!(
        assets_dir = %loader.root().display(),
        model = %cfg.model_path,
        policy = ?cfg.policy,
        camera = ?cfg.camera,
        frame_hz = cfg.frame_hz,
        "Starting client"
    );

    // Console events are applied directly; the channel stays open for other hosts.
    let (mut client, _input_tx) =
        DriveClient::new(&cfg, Box::new(TraceRenderer::default()), loader);

    // Set up console input channel.
    let (console_tx, mut console_rx) = mpsc::channel::<ConsoleCommand>(32);

    // Spawn stdin reader thread.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("] ");
            let _ = stdout.flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_console_line(line) {
                Ok(cmd) => {
                    if console_tx.blocking_send(cmd).is_err() {
                        break;
                    }
                }
                Err(e) => println!("Error: {}", e),
            }
        }
    });

    println!("Client running. Type 'down w' to drive, 'status' for info, 'quit' to exit.");
    println!();

    let frame_interval = Duration::from_secs_f32(1.0 / cfg.frame_hz.max(1) as f32);
    let mut next_frame = tokio::time::Instant::now();

    loop {
        while let Ok(cmd) = console_rx.try_recv() {
            match cmd {
                ConsoleCommand::Status => {
                    for line in client.status() {
                        println!("{}", line);
                    }
                }
                ConsoleCommand::Quit => {
                    info!(frames = client.frame(), "Shutting down");
                    return Ok(());
                }
                ConsoleCommand::Input(event) => client.apply(event),
            }
        }

        client.run_frame();

        next_frame += frame_interval;
        tokio::time::sleep_until(next_frame).await;
    }
}
