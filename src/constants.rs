use std::time::Duration;

// Define some constants for the audio parameters
pub const SAMPLE_RATE: u32 = 24000; // 24 kHz synthesis output
pub const BIT_DEPTH: u16 = 16; // 16 bits per sample
pub const CHANNELS: u16 = 1; // Mono channel

/// Bytes per 16-bit PCM frame.
pub const BYTES_PER_SAMPLE: usize = (BIT_DEPTH / 8) as usize;

/// Samples requested from the bridge on each render tick.
pub const RENDER_CHUNK_SIZE: usize = 1024;

/// Default tick period for the poll-until-condition watcher.
pub const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);
