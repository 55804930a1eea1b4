//! Test infrastructure for voicebridge-rs integration tests.
//!
//! Provides a scripted synthesis backend, PCM payload builders, and event
//! collection helpers for testing the streaming playback pipeline without a
//! real synthesis service.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::broadcast::error::TryRecvError;

// Re-export key types from the main crate
pub use voicebridge_rs::bridge::{
    notice_channel, FillSamples, PlaybackBridge, PlaybackNotice, PlaybackState,
};
pub use voicebridge_rs::event::{Event, EventBus, Subscriber};
pub use voicebridge_rs::playback::SpeechAction;
pub use voicebridge_rs::sources::synthesis::{SpeechSynthesizer, SynthesisError};
pub use voicebridge_rs::sources::{AudioStream, SpeechStream};

/// How a [`MockSynthesizer`] resolves requests.
pub enum MockMode {
    /// Stream the payload in chunks of the given size.
    Payload { bytes: Vec<u8>, chunk_size: usize },
    /// Fail with a backend status code.
    Fail(u16),
    /// Fail as canceled.
    Canceled,
}

/// Synthesis backend double that streams a canned payload.
pub struct MockSynthesizer {
    mode: MockMode,
}

impl MockSynthesizer {
    pub fn with_payload(bytes: Vec<u8>, chunk_size: usize) -> Self {
        Self {
            mode: MockMode::Payload { bytes, chunk_size },
        }
    }

    pub fn failing(code: u16) -> Self {
        Self {
            mode: MockMode::Fail(code),
        }
    }

    pub fn canceled() -> Self {
        Self {
            mode: MockMode::Canceled,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<SpeechStream, SynthesisError> {
        match &self.mode {
            MockMode::Fail(code) => Err(SynthesisError::Backend(*code)),
            MockMode::Canceled => Err(SynthesisError::Canceled),
            MockMode::Payload { bytes, chunk_size } => {
                let chunks: Vec<Bytes> = bytes
                    .chunks(*chunk_size)
                    .map(Bytes::copy_from_slice)
                    .collect();

                let (tx, stream) = SpeechStream::channel();
                tokio::spawn(async move {
                    for chunk in chunks {
                        if tx.send(chunk).await.is_err() {
                            break;
                        }
                    }
                });

                Ok(stream)
            }
        }
    }
}

/// A PCM payload of `samples` frames all encoding the 16-bit value 0x4000
/// (0.5 as a float), distinguishable from padded silence.
pub fn half_scale_payload(samples: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples * 2);
    for _ in 0..samples {
        bytes.extend_from_slice(&[0x00, 0x40]);
    }
    bytes
}

/// Build a `SpeechStream` preloaded with the given chunks and then closed.
pub fn scripted_stream(chunks: Vec<Vec<u8>>) -> SpeechStream {
    let (tx, stream) = SpeechStream::channel();
    for chunk in chunks {
        tx.try_send(Bytes::from(chunk))
            .expect("scripted chunks must fit the channel");
    }
    stream
}

/// Collects all events from a subscriber within a timeout period.
/// Returns events in the order they were received.
pub async fn collect_events(subscriber: &mut Subscriber, timeout: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        match subscriber.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) => {
                if tokio::time::Instant::now() >= deadline {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Err(TryRecvError::Lagged(n)) => {
                eprintln!("Warning: subscriber lagged, missed {n} events");
            }
            Err(TryRecvError::Closed) => break,
        }
    }

    events
}

/// Waits for a specific type of event within a timeout.
pub async fn wait_for_event<F>(
    subscriber: &mut Subscriber,
    timeout: Duration,
    matches: F,
) -> Option<Event>
where
    F: Fn(&Event) -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        match subscriber.try_recv() {
            Ok(event) if matches(&event) => return Some(event),
            Ok(_) => continue,
            Err(TryRecvError::Empty) => {
                if tokio::time::Instant::now() >= deadline {
                    return None;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Closed) => return None,
        }
    }
}

/// Filters playback notices out of an event list.
pub fn filter_playback_events(events: &[Event]) -> Vec<&PlaybackNotice> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Playback(notice) => Some(notice),
            _ => None,
        })
        .collect()
}
