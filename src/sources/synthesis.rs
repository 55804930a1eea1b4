//! Speech synthesis backend client.
//!
//! Sends a markup payload to the synthesis REST endpoint and exposes the
//! chunked response body as a [`SpeechStream`]. The transfer runs on a
//! background task; mid-stream transport failures close the stream so
//! playback degrades to silence instead of erroring the consumer.

use async_trait::async_trait;
use futures::StreamExt;
use thiserror::Error;

use crate::config::SynthesisConfig;
use crate::sources::SpeechStream;

/// Raw PCM output requested from the backend: 24 kHz, 16-bit, mono.
const OUTPUT_FORMAT: &str = "raw-24khz-16bit-mono-pcm";

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("synthesis request was canceled")]
    Canceled,

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("synthesis backend returned status {0}")]
    Backend(u16),
}

/// A backend that resolves request text into a streaming audio source.
///
/// One-shot per request; retry policy is the caller's concern.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SpeechStream, SynthesisError>;
}

/// REST client for a speech synthesis service.
pub struct RestSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    voice: String,
    subscription_key: Option<String>,
}

impl RestSynthesizer {
    pub fn new(config: &SynthesisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.synthesis_endpoint.clone(),
            voice: config.synthesis_voice.clone(),
            subscription_key: config.synthesis_key.clone(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for RestSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SpeechStream, SynthesisError> {
        let mut request = self
            .client
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(ssml_payload(text, &self.voice));

        if let Some(key) = &self.subscription_key {
            request = request.header("Ocp-Apim-Subscription-Key", key.as_str());
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Backend(status.as_u16()));
        }

        let (tx, stream) = SpeechStream::channel();

        tokio::spawn(async move {
            let mut body = response.bytes_stream();

            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(chunk) => {
                        if tx.send(chunk).await.is_err() {
                            debug!("Synthesis consumer went away, abandoning transfer");
                            break;
                        }
                    }
                    Err(e) => {
                        // Degrades to end-of-stream on the consumer side.
                        warn!("Synthesis transfer failed mid-stream: {e}");
                        break;
                    }
                }
            }
        });

        Ok(stream)
    }
}

/// Render request text into the SSML payload the backend expects.
///
/// Wraps the text in voice and prosody elements tuned for the assistant
/// persona. Markup-significant characters in the text are escaped.
pub fn ssml_payload(text: &str, voice: &str) -> String {
    let text = escape_markup(text);
    format!(
        concat!(
            r#"<speak version="1.0" xml:lang="en-US">"#,
            r#"<voice xml:lang="en-US" name="{voice}" style="hopeful">"#,
            r#"<prosody rate="+10.00%" pitch="-5.00%" volume="+5.00%" contour="(5%, -61%) (48%, -6%)">"#,
            "{text}",
            r#"</prosody></voice></speak>"#
        ),
        voice = voice,
        text = text
    )
}

fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
