use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;

#[derive(Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
    /// Synthesis REST endpoint resolving markup payloads into raw PCM.
    pub synthesis_endpoint: String,

    /// Voice name passed through to the backend.
    pub synthesis_voice: String,

    /// Subscription key header value, if the backend requires one.
    pub synthesis_key: Option<String>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct NetConfig {
    /// Address the wav stream listener binds to.
    pub listen_addr: String,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(flatten)]
    pub synthesis: SynthesisConfig,

    #[serde(flatten)]
    pub net: NetConfig,
}

pub async fn load() -> Result<Config> {
    let config = read_to_string("Config.toml").await?;
    let config: Config = toml::from_str(&config)?;

    Ok(config)
}
