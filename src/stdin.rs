use tokio::io::{AsyncBufReadExt, BufReader};

use crate::event::{Event, EventBus};
use crate::playback::SpeechAction;

/// Turn stdin lines into speech requests, for driving the sample by hand.
pub fn init(bus: &EventBus) {
    let bus = bus.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }

                    bus.send(Event::Speech(SpeechAction::Say {
                        text: text.to_string(),
                    }));
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });
}
