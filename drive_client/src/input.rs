//! Input handling.
//!
//! In a real host this would integrate with windowing and raw keyboard/pointer
//! events. Here every host event becomes an `InputEvent` sent over a channel
//! into the frame loop, and the binary produces those events from console
//! lines.

use anyhow::{bail, Context};
use drive_shared::camera::OrbitInput;

/// A host event destined for the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyPressed(String),
    KeyReleased(String),
    Orbit(OrbitInput),
    Resize { width: u32, height: u32 },
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Input(InputEvent),
    Status,
    Quit,
}

fn arg<'a>(tokens: &[&'a str], idx: usize, usage: &str) -> anyhow::Result<&'a str> {
    match tokens.get(idx).copied() {
        Some(t) => Ok(t),
        None => bail!("usage: {usage}"),
    }
}

fn num<T: std::str::FromStr>(tokens: &[&str], idx: usize, usage: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = arg(tokens, idx, usage)?;
    raw.parse::<T>()
        .with_context(|| format!("bad number '{raw}' (usage: {usage})"))
}

/// Parses one console line.
///
/// Commands:
///   down <key> / up <key>  - press or release a key
///   drag <dx> <dy>         - orbit by a pointer drag
///   zoom <delta>           - scroll
///   pan <dx> <dy>          - pan the orbit target
///   resize <w> <h>         - viewport resize
///   status                 - print client status
///   quit                   - exit
pub fn parse_console_line(line: &str) -> anyhow::Result<ConsoleCommand> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&cmd) = tokens.first() else {
        bail!("empty command");
    };

    let command = match cmd {
        "down" => ConsoleCommand::Input(InputEvent::KeyPressed(
            arg(&tokens, 1, "down <key>")?.to_string(),
        )),
        "up" => ConsoleCommand::Input(InputEvent::KeyReleased(
            arg(&tokens, 1, "up <key>")?.to_string(),
        )),
        "drag" => ConsoleCommand::Input(InputEvent::Orbit(OrbitInput::Drag {
            dx: num(&tokens, 1, "drag <dx> <dy>")?,
            dy: num(&tokens, 2, "drag <dx> <dy>")?,
        })),
        "zoom" => ConsoleCommand::Input(InputEvent::Orbit(OrbitInput::Zoom {
            delta: num(&tokens, 1, "zoom <delta>")?,
        })),
        "pan" => ConsoleCommand::Input(InputEvent::Orbit(OrbitInput::Pan {
            dx: num(&tokens, 1, "pan <dx> <dy>")?,
            dy: num(&tokens, 2, "pan <dx> <dy>")?,
        })),
        "resize" => ConsoleCommand::Input(InputEvent::Resize {
            width: num(&tokens, 1, "resize <w> <h>")?,
            height: num(&tokens, 2, "resize <w> <h>")?,
        }),
        "status" => ConsoleCommand::Status,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => bail!("unknown command '{other}'"),
    };
    Ok(command)
}
