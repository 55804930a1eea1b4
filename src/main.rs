use std::sync::Arc;

use anyhow::Result;

use voicebridge_rs::device::RenderDevice;
use voicebridge_rs::event::{self, EventBus};
use voicebridge_rs::sources::synthesis::RestSynthesizer;
use voicebridge_rs::{config, net, playback, stdin};

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = config::load().await?;

    let bus = EventBus::new();
    event::debug(&bus);

    let synthesizer = Arc::new(RestSynthesizer::new(&config.synthesis));

    let device = RenderDevice::new();
    net::init(config.net.listen_addr.clone(), device.output());

    playback::init(&bus, synthesizer, device);
    stdin::init(&bus);

    tokio::signal::ctrl_c().await?;

    Ok(())
}
