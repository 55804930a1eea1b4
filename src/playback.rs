//! Speech playback sessions and the bulk (clock-less) playback adapter.
//!
//! The session event loop owns the output device: it resolves speech
//! requests into streams, hands a bridge to the device, and releases the
//! device when the completion notice arrives. Notices produced on the render
//! thread reach this loop over the bounded notice channel and are republished
//! on the bus for anything else that cares.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::bridge::{notice_channel, PlaybackBridge, PlaybackNotice};
use crate::constants::{BIT_DEPTH, CHANNELS, SAMPLE_RATE};
use crate::decoder;
use crate::device::RenderDevice;
use crate::event::{Event, EventBus, Subscriber};
use crate::sources::synthesis::{SpeechSynthesizer, SynthesisError};
use crate::sources::{AudioStream, SpeechStream};

/// Read granularity for clock-less draining.
const DRAIN_READ_CHUNK: usize = 4096;

#[derive(Clone, Debug)]
pub enum SpeechAction {
    /// Synthesize and play the given text.
    Say { text: String },

    /// Tear down any active playback.
    Stop,
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("audio sink failure: {0}")]
    Sink(#[from] hound::Error),

    #[error("drain task failed: {0}")]
    Drain(#[from] tokio::task::JoinError),
}

pub fn init(bus: &EventBus, synthesizer: Arc<dyn SpeechSynthesizer>, device: RenderDevice) {
    handle_incoming_event_loop(bus.clone(), synthesizer, device);
}

fn handle_incoming_event_loop(
    bus: EventBus,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    mut device: RenderDevice,
) {
    tokio::spawn(async move {
        let mut subscriber = bus.subscribe();

        loop {
            let event = subscriber.recv().await;

            match event {
                Event::Speech(SpeechAction::Say { text }) => {
                    match synthesizer.synthesize(&text).await {
                        Ok(stream) => {
                            play_to_completion(&bus, &mut subscriber, &mut device, stream).await;
                        }
                        Err(e) => {
                            error!("Speech synthesis failed: {e}");
                        }
                    }
                }
                Event::Speech(SpeechAction::Stop) => {
                    device.stop();
                }
                _ => {}
            }
        }
    });
}

/// Run one stream on the device until its completion notice or a stop
/// request arrives, then release the device.
async fn play_to_completion(
    bus: &EventBus,
    subscriber: &mut Subscriber,
    device: &mut RenderDevice,
    stream: SpeechStream,
) {
    let (notice_tx, mut notices) = notice_channel();
    device.play(PlaybackBridge::new(stream, notice_tx));

    loop {
        tokio::select! {
            notice = notices.recv() => {
                let Some(notice) = notice else { break };

                let finished = notice == PlaybackNotice::Finished;
                bus.send(Event::Playback(notice));

                if finished {
                    break;
                }
            }
            event = subscriber.recv() => {
                match event {
                    Event::Speech(SpeechAction::Stop) => {
                        info!("Stopping active playback");
                        break;
                    }
                    Event::Speech(SpeechAction::Say { .. }) => {
                        // No queueing: one request plays at a time
                        debug!("Ignoring speech request while playback is active");
                    }
                    _ => {}
                }
            }
        }
    }

    device.stop();
}

/// Issue one synthesis request and drain the result to completion, blocking
/// on the stream itself rather than being driven by a render clock.
pub async fn drain_and_play(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
) -> Result<(), PlaybackError> {
    let stream = synthesizer.synthesize(text).await?;
    drain(stream).await?;
    Ok(())
}

/// Drain a stream to completion, returning all decoded samples.
///
/// Short reads are tolerated like the realtime path, but there is no
/// silence-padding obligation here: nothing downstream runs on a fixed
/// period.
pub async fn drain(stream: SpeechStream) -> Result<Vec<f32>, PlaybackError> {
    let samples = tokio::task::spawn_blocking(move || drain_blocking(stream)).await?;
    Ok(samples)
}

/// Drain a stream to completion into a wav file.
pub async fn drain_to_wav(stream: SpeechStream, path: PathBuf) -> Result<(), PlaybackError> {
    let samples = drain(stream).await?;

    let spec = hound::WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BIT_DEPTH,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in samples {
        writer.write_sample(decoder::quantize(sample))?;
    }
    writer.finalize()?;

    Ok(())
}

fn drain_blocking(mut stream: SpeechStream) -> Vec<f32> {
    let mut bytes = Vec::new();
    let mut chunk = [0u8; DRAIN_READ_CHUNK];

    loop {
        let n = stream.read(&mut chunk);
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
    }

    decoder::decode(&bytes)
}
