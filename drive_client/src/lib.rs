//! `drive_client`
//!
//! Client-side systems:
//! - Command-line config overrides
//! - Input channel and console command parsing
//! - Background vehicle model load with a per-frame hand-off
//! - Fixed-order frame loop (input, motion, camera, render)

pub mod args;
pub mod client;
pub mod input;

pub use client::DriveClient;
