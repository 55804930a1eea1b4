//! Integration tests for the bulk playback adapter.
//!
//! The bulk path drains a stream to completion without a render clock, so
//! there is no silence padding; it just has to survive arbitrary chunking.

mod common;

use common::*;
use voicebridge_rs::playback::{drain, drain_and_play, drain_to_wav, PlaybackError};

/// Test drain returns every decoded sample across chunk boundaries.
#[tokio::test]
async fn test_drain_decodes_entire_stream() {
    let stream = scripted_stream(vec![
        half_scale_payload(50),
        half_scale_payload(50),
        half_scale_payload(2),
    ]);

    let samples = drain(stream).await.unwrap();

    assert_eq!(samples.len(), 102);
    assert!(samples.iter().all(|&s| s == 0.5));
}

/// Test frames split across chunk boundaries reassemble correctly.
#[tokio::test]
async fn test_drain_tolerates_single_byte_chunks() {
    // Each 16-bit frame arrives as two separate one-byte reads
    let chunks: Vec<Vec<u8>> = half_scale_payload(5).iter().map(|b| vec![*b]).collect();
    let stream = scripted_stream(chunks);

    let samples = drain(stream).await.unwrap();

    assert_eq!(samples, vec![0.5; 5]);
}

/// Test a dangling trailing byte at stream end is dropped without error.
#[tokio::test]
async fn test_drain_drops_trailing_odd_byte() {
    let mut tail = half_scale_payload(2);
    tail.push(0x7f);
    let stream = scripted_stream(vec![half_scale_payload(4), tail]);

    let samples = drain(stream).await.unwrap();

    assert_eq!(samples.len(), 6);
}

/// Test an immediately-exhausted stream drains to nothing.
#[tokio::test]
async fn test_drain_empty_stream() {
    let stream = scripted_stream(vec![]);

    let samples = drain(stream).await.unwrap();

    assert!(samples.is_empty());
}

/// Test drain_and_play completes a synthesis request end to end.
#[tokio::test]
async fn test_drain_and_play_completes() {
    let synthesizer = MockSynthesizer::with_payload(half_scale_payload(128), 32);

    drain_and_play(&synthesizer, "bulk playback").await.unwrap();
}

/// Test drain_and_play surfaces synthesis failures to the caller.
#[tokio::test]
async fn test_drain_and_play_propagates_synthesis_error() {
    let synthesizer = MockSynthesizer::failing(503);

    let result = drain_and_play(&synthesizer, "bulk playback").await;

    match result {
        Err(PlaybackError::Synthesis(SynthesisError::Backend(code))) => assert_eq!(code, 503),
        other => panic!("Expected backend synthesis error, got {other:?}"),
    }
}

/// Test drain_to_wav writes a readable wav file with the stream's samples.
#[tokio::test]
async fn test_drain_to_wav_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("speech.wav");

    let stream = scripted_stream(vec![half_scale_payload(100)]);
    drain_to_wav(stream, path.clone()).await.unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 24000);
    assert_eq!(spec.bits_per_sample, 16);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![16384; 100]);
}
