use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Input consumed by the app loop.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// No input arrived within the tick interval; time to poll background work.
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm events on a background thread.
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                // only presses; some terminals report releases too
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Scripted events, for driving the app without a terminal.
impl EventSource for Receiver<AppEvent> {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        Receiver::recv_timeout(self, timeout)
    }
}

/// Advances the application one event or tick at a time.
pub struct Runner<E: EventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on
    /// timeout.
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}
