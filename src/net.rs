use std::net::SocketAddr;

use anyhow::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use hound::{SampleFormat, WavSpec};

use crate::constants::{BIT_DEPTH, CHANNELS, SAMPLE_RATE};
use crate::device::DeviceOutput;

/// Serve the device output to TCP clients as an infinite WAV stream.
pub fn init(listen_addr: String, source: DeviceOutput) {
    tokio::spawn(async move {
        let listener = match TcpListener::bind(&listen_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind {listen_addr}: {e}");
                return;
            }
        };
        info!("Listening on {listen_addr}");

        loop {
            let result = accept(&listener, &source).await;

            match result {
                Ok(addr) => info!("Accepted connection from {addr}"),
                Err(e) => error!("Failed to accept connection: {e}"),
            }
        }
    });
}

async fn accept(listener: &TcpListener, source: &DeviceOutput) -> Result<SocketAddr> {
    let (mut stream, addr) = listener.accept().await?;

    let mut source = source.clone();

    tokio::spawn(async move {
        // The wav header lets players recognize the stream. Parameters match
        // the render device output (16-bit mono).
        let spec = WavSpec {
            channels: CHANNELS,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: BIT_DEPTH,
            sample_format: SampleFormat::Int,
        };

        let header = spec.into_header_for_infinite_file();
        if let Err(e) = stream.write_all(&header[..]).await {
            error!("Failed to write wav header: {e}");
            return;
        }

        loop {
            if source.changed().await.is_err() {
                // Device went away; nothing more to stream.
                break;
            }

            let samples = source.borrow_and_update().clone();
            let mut wav_data: Vec<u8> = Vec::with_capacity(samples.len() * 2);

            for sample in samples {
                WriteBytesExt::write_i16::<LittleEndian>(&mut wav_data, sample).unwrap();
            }

            if let Err(e) = stream.write_all(wav_data.as_slice()).await {
                error!("Failed to write samples: {e}");
                break;
            }
        }
    });

    Ok(addr)
}
