//! Host audio output device: a fixed-period render clock that drives a
//! [`FillSamples`] callback and publishes the rendered blocks.
//!
//! The clock runs on a dedicated OS thread so blocking transport reads never
//! stall the async runtime. Rendered 16-bit blocks go out on a watch channel
//! that sinks (see `net`) subscribe to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::bridge::FillSamples;
use crate::constants::{RENDER_CHUNK_SIZE, SAMPLE_RATE};
use crate::decoder;

/// Rendered sample blocks as published to output sinks.
pub type DeviceOutput = watch::Receiver<Vec<i16>>;

/// A software render clock standing in for a hardware output device.
///
/// One playback at a time: starting a new one tears the previous clock down
/// first. The callback is invoked every `chunk_size / SAMPLE_RATE` seconds
/// against an absolute schedule, so sleep jitter does not accumulate.
pub struct RenderDevice {
    tx: watch::Sender<Vec<i16>>,
    /// Keeps the watch channel open while no sink is subscribed yet.
    _keepalive: DeviceOutput,
    chunk_size: usize,
    active: Option<ActivePlayback>,
}

struct ActivePlayback {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl RenderDevice {
    pub fn new() -> Self {
        Self::with_chunk_size(RENDER_CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        Self {
            tx,
            _keepalive: rx,
            chunk_size,
            active: None,
        }
    }

    /// Subscribe an output sink to the rendered blocks.
    pub fn output(&self) -> DeviceOutput {
        self.tx.subscribe()
    }

    /// Start the render clock over `fill`.
    pub fn play(&mut self, fill: impl FillSamples + 'static) {
        self.stop();

        let stop = Arc::new(AtomicBool::new(false));
        let thread = spawn_render_clock(self.tx.clone(), self.chunk_size, fill, stop.clone());

        self.active = Some(ActivePlayback { stop, thread });
    }

    /// Stop the render clock and wait for the thread to wind down.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.stop.store(true, Ordering::Relaxed);
            if active.thread.join().is_err() {
                error!("Render clock thread panicked");
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }
}

impl Default for RenderDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RenderDevice {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_render_clock(
    tx: watch::Sender<Vec<i16>>,
    chunk_size: usize,
    mut fill: impl FillSamples + 'static,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let period = Duration::from_micros(
            ((chunk_size as f64 / SAMPLE_RATE as f64) * 1_000_000.0) as u64,
        );

        let started = Instant::now();
        let mut ticks: u32 = 0;
        let mut samples = vec![0.0f32; chunk_size];

        while !stop.load(Ordering::Relaxed) {
            fill.fill(&mut samples);

            let block: Vec<i16> = samples.iter().copied().map(decoder::quantize).collect();
            if tx.send(block).is_err() {
                break;
            }

            // Sleep until the next tick on the absolute schedule.
            ticks += 1;
            let deadline = started + period * ticks;
            if let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
                std::thread::sleep(remaining);
            }
        }
    })
}
