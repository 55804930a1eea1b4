//! Realtime playback bridge between a streaming audio source and the
//! render clock of an output device.
//!
//! The device calls [`FillSamples::fill`] on a fixed period. Each call pulls
//! bytes from the source, decodes them, and pads any shortfall with silence
//! so the device never observes an underrun fault. When the source reports
//! end-of-stream the bridge emits a one-time completion notice and renders
//! trailing silence forever.

use tokio::sync::mpsc;

use crate::constants::BYTES_PER_SAMPLE;
use crate::decoder;
use crate::sources::AudioStream;

/// Completion notices are tiny and at-most-once per handle, so a small bound
/// suffices. Overflow is dropped with a warning rather than blocking.
pub const NOTICE_CHANNEL_CAPACITY: usize = 4;

/// Playback lifecycle notifications, delivered from the render thread to the
/// session that owns the device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackNotice {
    /// First audio bytes have arrived from the source.
    Started,
    /// The source is exhausted; the device can be released.
    Finished,
}

/// Playback progress for one audio source handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No render callback has run yet.
    #[default]
    Idle,
    /// Bytes are flowing at the full requested rate.
    Streaming,
    /// A short read has been observed; the final partial frame is near.
    Draining,
    /// A zero read has been observed. Terminal; fills render silence only.
    Finished,
}

/// The audio-callback interface a host device drives.
///
/// The host invokes `fill` once per render period and plays back whatever the
/// implementation wrote. Implementations must populate the whole buffer and
/// must not block beyond the transport's bounded read latency.
pub trait FillSamples: Send {
    fn fill(&mut self, out: &mut [f32]);
}

/// Create the bounded notice channel between a bridge and its owning session.
pub fn notice_channel() -> (mpsc::Sender<PlaybackNotice>, mpsc::Receiver<PlaybackNotice>) {
    mpsc::channel(NOTICE_CHANNEL_CAPACITY)
}

/// Pull-driven bridge from one [`AudioStream`] to a sample-filling callback.
///
/// Consumes the stream handle; it is released when the bridge is dropped.
pub struct PlaybackBridge<S> {
    source: S,
    /// Scratch byte buffer reused across callback invocations.
    staging: Vec<u8>,
    state: PlaybackState,
    notices: mpsc::Sender<PlaybackNotice>,
}

impl<S: AudioStream> PlaybackBridge<S> {
    pub fn new(source: S, notices: mpsc::Sender<PlaybackNotice>) -> Self {
        Self {
            source,
            staging: Vec::new(),
            state: PlaybackState::Idle,
            notices,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Deliver a notice without ever blocking the render thread.
    fn notify(&self, notice: PlaybackNotice) {
        if let Err(e) = self.notices.try_send(notice) {
            warn!("Dropping playback notice, channel unavailable: {e}");
        }
    }
}

impl<S: AudioStream> FillSamples for PlaybackBridge<S> {
    fn fill(&mut self, out: &mut [f32]) {
        // Terminal state renders trailing silence without touching the
        // source again.
        if self.state == PlaybackState::Finished {
            out.fill(0.0);
            return;
        }

        let requested_bytes = out.len() * BYTES_PER_SAMPLE;
        self.staging.resize(requested_bytes, 0);

        let read_bytes = self.source.read(&mut self.staging[..requested_bytes]);

        let decoded = decoder::decode_into(&self.staging[..read_bytes], out);
        out[decoded..].fill(0.0);

        if read_bytes > 0 && self.state == PlaybackState::Idle {
            self.notify(PlaybackNotice::Started);
        }

        if read_bytes == 0 {
            self.state = PlaybackState::Finished;
            self.notify(PlaybackNotice::Finished);
        } else if read_bytes < requested_bytes {
            self.state = PlaybackState::Draining;
        } else if self.state != PlaybackState::Draining {
            self.state = PlaybackState::Streaming;
        }
    }
}
