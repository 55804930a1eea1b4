//! Streaming audio source abstraction for the playback pipeline.
//!
//! A source hands out raw synthesis bytes through a pull-based interface.
//! Production happens on the async runtime; consumption happens wherever the
//! owning consumer lives (the render thread or a bulk drain task).

pub mod synthesis;

use bytes::{Buf, Bytes};
use tokio::sync::mpsc;

/// Chunks buffered between the producing task and the consumer. At 24 kHz
/// mono this is comfortably more than one playback period of audio.
pub const CHUNK_CHANNEL_CAPACITY: usize = 32;

/// Trait for pull-based byte streams of synthesized audio.
///
/// `read` returns:
/// - the number of bytes written into `dest`, never more than `dest.len()`
/// - `0` once the stream has ended, and `0` on every call after that
///
/// A short read is not an error; only a zero read signals end-of-stream.
/// Blocking (e.g. on network I/O) is the transport's business. Exactly one
/// owner reads from a stream; ownership is moved into the consumer.
pub trait AudioStream: Send {
    /// Pull up to `dest.len()` bytes from the stream.
    fn read(&mut self, dest: &mut [u8]) -> usize;
}

/// Handle to one in-flight synthesis result.
///
/// Owns the receiving half of a bounded chunk channel fed by a background
/// transport task. Dropping the handle closes the channel, which the
/// producing task observes as a failed send and winds down on.
pub struct SpeechStream {
    rx: mpsc::Receiver<Bytes>,
    /// Unconsumed tail of the last chunk, carried over between reads.
    pending: Bytes,
    eos: bool,
}

impl SpeechStream {
    pub fn new(rx: mpsc::Receiver<Bytes>) -> Self {
        Self {
            rx,
            pending: Bytes::new(),
            eos: false,
        }
    }

    /// Create a connected producer/stream pair.
    pub fn channel() -> (mpsc::Sender<Bytes>, SpeechStream) {
        let (tx, rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
        (tx, SpeechStream::new(rx))
    }

    /// Whether end-of-stream has been observed.
    pub fn is_eos(&self) -> bool {
        self.eos
    }
}

impl AudioStream for SpeechStream {
    fn read(&mut self, dest: &mut [u8]) -> usize {
        if self.eos {
            return 0;
        }

        // Refill from the channel, skipping any empty chunks a producer may
        // have sent. A closed channel is the end-of-stream signal.
        while self.pending.is_empty() {
            match self.rx.blocking_recv() {
                Some(chunk) => self.pending = chunk,
                None => {
                    self.eos = true;
                    return 0;
                }
            }
        }

        let n = dest.len().min(self.pending.len());
        dest[..n].copy_from_slice(&self.pending[..n]);
        self.pending.advance(n);
        n
    }
}
