use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use tracing::{debug, warn};

/// Idle tick interval; bounds how late an expired key flash is cleared.
pub const TICK_RATE: Duration = Duration::from_millis(50);

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize,
}

/// Owns the single reader of the terminal event stream.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("fasttype-input".to_string())
            .spawn(move || {
                loop {
                    let event = match event::poll(tick_rate) {
                        Ok(true) => match event::read() {
                            Ok(Event::Key(key)) => Some(AppEvent::Key(key)),
                            Ok(Event::Resize(..)) => Some(AppEvent::Resize),
                            Ok(_) => None,
                            Err(e) => {
                                warn!(error = %e, "terminal read failed");
                                None
                            }
                        },
                        Ok(false) => Some(AppEvent::Tick),
                        Err(e) => {
                            warn!(error = %e, "terminal poll failed");
                            Some(AppEvent::Tick)
                        }
                    };
                    if let Some(event) = event {
                        if tx.send(event).is_err() {
                            debug!("event receiver gone, input thread exiting");
                            return;
                        }
                    }
                }
            })?;

        Ok(Self { rx })
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
