use crate::question::Difficulty;

/// Cadence at which the event loop delivers ticks to the session.
pub const TICK_RATE_MS: u64 = 1000;

/// Per-question time budget in milliseconds.
///
/// Canonical mapping: easy 30s, medium 60s, hard 120s. Unknown difficulty
/// values are already normalized to Medium at parse time.
pub fn time_limit_ms(difficulty: Difficulty) -> u64 {
    match difficulty {
        Difficulty::Easy => 30_000,
        Difficulty::Medium => 60_000,
        Difficulty::Hard => 120_000,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerStatus {
    /// Countdown is live; carries the remaining milliseconds.
    Running(u64),
    /// The countdown just hit zero. Reported exactly once.
    Expired,
    /// Cancelled or already expired; ticks are ignored.
    Idle,
}

/// A single-question countdown advanced by the host's tick cadence.
///
/// The counter is exact milliseconds so nothing drifts across question
/// transitions; display code rounds up to whole seconds. Expiry is
/// edge-triggered: once `tick` has returned `Expired`, every later tick
/// returns `Idle`. `cancel` is synchronous and safe to call repeatedly,
/// including after natural expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining_ms: u64,
    finished: bool,
}

impl Countdown {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            remaining_ms: duration_ms,
            finished: false,
        }
    }

    /// A countdown that delivers nothing; used while no question is active.
    pub fn idle() -> Self {
        Self {
            remaining_ms: 0,
            finished: true,
        }
    }

    pub fn tick(&mut self, elapsed_ms: u64) -> TimerStatus {
        if self.finished {
            return TimerStatus::Idle;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.finished = true;
            TimerStatus::Expired
        } else {
            TimerStatus::Running(self.remaining_ms)
        }
    }

    /// Stop the countdown. No ticks or expiry are delivered afterwards.
    pub fn cancel(&mut self) {
        self.finished = true;
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
