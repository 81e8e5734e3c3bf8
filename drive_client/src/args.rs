//! Command-line overrides for [`DriveConfig`].

use anyhow::Context;
use drive_shared::config::DriveConfig;

/// Builds the client config from `args` (program name first).
///
/// `--config <path>` is read first wherever it appears; the other flags then
/// override its fields in order.
pub fn parse_args(args: &[String]) -> anyhow::Result<DriveConfig> {
    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => {
            let path = &args[i + 1];
            let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
            DriveConfig::from_json_str(&text).with_context(|| format!("parse {path}"))?
        }
        _ => DriveConfig::default(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => i += 2,
            "--assets-dir" if i + 1 < args.len() => {
                cfg.assets_dir = args[i + 1].clone();
                i += 2;
            }
            "--model" if i + 1 < args.len() => {
                cfg.model_path = args[i + 1].clone();
                i += 2;
            }
            "--policy" if i + 1 < args.len() => {
                cfg.policy = args[i + 1].parse()?;
                i += 2;
            }
            "--camera" if i + 1 < args.len() => {
                cfg.camera = args[i + 1].parse()?;
                i += 2;
            }
            "--frame-hz" if i + 1 < args.len() => {
                cfg.frame_hz = args[i + 1]
                    .parse()
                    .with_context(|| format!("bad --frame-hz '{}'", args[i + 1]))?;
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(cfg)
}
