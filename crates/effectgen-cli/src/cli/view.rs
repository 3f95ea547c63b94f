use effectgen::{ControllerEvent, MediaKind};
use tokio::sync::broadcast::{self, error::RecvError};

/// Renders controller events as lines on the terminal.
pub struct ConsoleView {
    events: broadcast::Receiver<ControllerEvent>,
}

impl ConsoleView {
    pub const fn new(events: broadcast::Receiver<ControllerEvent>) -> Self {
        Self { events }
    }

    /// Prints every event until the controller is dropped.
    pub async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(event) => match render(&event) {
                    Some(line) if matches!(event, ControllerEvent::Failed { .. }) => {
                        eprintln!("{line}");
                    }
                    Some(line) => println!("{line}"),
                    None => {}
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Console view fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

fn render(event: &ControllerEvent) -> Option<String> {
    match event {
        ControllerEvent::PhaseChanged(phase) => {
            let status = phase.status_text();
            (!status.is_empty()).then_some(status)
        }
        // the phase line already carries the attempt
        ControllerEvent::Progress { .. } => None,
        ControllerEvent::AssetReady(asset) => Some(format!("Uploaded: {}", asset.remote_url)),
        ControllerEvent::Completed(result) => {
            let kind = match result.media_kind {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
            };
            Some(format!("Result ({kind}): {}", result.media_url))
        }
        ControllerEvent::Failed { message } => Some(format!("Error: {message}")),
        ControllerEvent::Reset => Some("Reset".to_owned()),
    }
}
