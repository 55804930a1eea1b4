//! voicebridge-rs library crate
//!
//! This module exposes internal types for integration testing.
//! The main binary is in main.rs.

#[macro_use]
extern crate log;

pub mod bridge;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod device;
pub mod event;
pub mod net;
pub mod playback;
pub mod sources;
pub mod stdin;
pub mod watcher;
