//! PCM frame decoding between the synthesis wire format and float samples.
//!
//! The synthesis backend emits raw interleaved 16-bit little-endian mono
//! frames. Decoding is pure and stateless so it can run on the render thread.

use byteorder::{LittleEndian, WriteBytesExt};
use itertools::Itertools;

use crate::constants::BYTES_PER_SAMPLE;

/// Scale factor between 16-bit integer amplitudes and normalized floats.
const PCM_SCALE: f32 = 32768.0;

/// Decode little-endian 16-bit mono frames into `out`, returning the number
/// of samples written.
///
/// Consumes at most `out.len() * 2` bytes. A trailing odd byte is not a whole
/// frame and is dropped; the source codec only produces one at stream end.
pub fn decode_into(bytes: &[u8], out: &mut [f32]) -> usize {
    let max_bytes = out.len() * BYTES_PER_SAMPLE;
    let bytes = &bytes[..bytes.len().min(max_bytes)];

    let mut written = 0;
    for (lo, hi) in bytes.iter().tuples() {
        out[written] = i16::from_le_bytes([*lo, *hi]) as f32 / PCM_SCALE;
        written += 1;
    }

    written
}

/// Decode an entire byte sequence into a freshly allocated sample vector.
pub fn decode(bytes: &[u8]) -> Vec<f32> {
    let mut out = vec![0.0; bytes.len() / BYTES_PER_SAMPLE];
    decode_into(bytes, &mut out);
    out
}

/// Quantize one normalized float sample back to its 16-bit amplitude.
pub fn quantize(sample: f32) -> i16 {
    (sample * PCM_SCALE)
        .round()
        .clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Encode normalized float samples back into little-endian 16-bit frames.
///
/// Inverse of [`decode`] up to rounding at the extremes.
pub fn encode(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);

    for &sample in samples {
        WriteBytesExt::write_i16::<LittleEndian>(&mut bytes, quantize(sample)).unwrap();
    }

    bytes
}
