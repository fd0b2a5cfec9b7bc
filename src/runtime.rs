use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the session host loop.
#[derive(Clone, Debug)]
pub enum UiEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEvents {
    rx: Receiver<UiEvent>,
}

impl CrosstermEvents {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(UiEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(UiEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEvents {
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit and headless integration tests
pub struct TestEvents {
    rx: Receiver<UiEvent>,
}

impl TestEvents {
    pub fn new(rx: Receiver<UiEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEvents {
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Event pump that yields the next input event, or Tick when the countdown
/// cadence elapses with no input. Keys therefore arrive immediately while
/// the session clock is charged at a steady interval.
pub struct EventLoop<E: EventSource> {
    event_source: E,
    tick_interval: Duration,
}

impl<E: EventSource> EventLoop<E> {
    pub fn new(event_source: E, tick_interval: Duration) -> Self {
        Self {
            event_source,
            tick_interval,
        }
    }

    pub fn next(&self) -> UiEvent {
        match self.event_source.recv_timeout(self.tick_interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => UiEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn next_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEvents::new(rx);
        let events = EventLoop::new(es, Duration::from_millis(1));

        match events.next() {
            UiEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn next_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(UiEvent::Resize).unwrap();
        let es = TestEvents::new(rx);
        let events = EventLoop::new(es, Duration::from_millis(10));

        match events.next() {
            UiEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn disconnected_source_degrades_to_ticks() {
        let (tx, rx) = mpsc::channel::<UiEvent>();
        drop(tx);
        let events = EventLoop::new(TestEvents::new(rx), Duration::from_millis(1));

        match events.next() {
            UiEvent::Tick => {}
            _ => panic!("expected Tick after disconnect"),
        }
    }
}
