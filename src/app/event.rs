//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Bracketed paste lands in the input as one chunk.
    Paste(String),
    Resize,
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        let app_event = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(CtEvent::Key(k)) => AppEvent::Key(k),
                Ok(CtEvent::Paste(text)) => AppEvent::Paste(text),
                Ok(CtEvent::Resize(..)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(%err, "terminal read failed");
                    continue;
                }
            },
            // Nothing within tick_rate (or poll failed): keep the spinner moving.
            Ok(false) | Err(_) => AppEvent::Tick,
        };
        if tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });

    rx
}
