//! Wall-clock driver for [`SessionTimer`].
//!
//! Elapsed milliseconds since the last anchor are converted into whole
//! one-second ticks; the sub-second remainder is carried forward, so a
//! throttled or late caller catches up without drift.

use serde::{Deserialize, Serialize};

use super::engine::SessionTimer;
use crate::events::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerClock {
    timer: SessionTimer,
    /// Epoch milliseconds of the last advance while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    /// Milliseconds elapsed but not yet turned into a tick.
    #[serde(default)]
    carry_ms: u64,
}

impl TimerClock {
    pub fn new(timer: SessionTimer) -> Self {
        Self {
            timer,
            last_tick_epoch_ms: None,
            carry_ms: 0,
        }
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.timer.start()?;
        self.last_tick_epoch_ms = Some(now_ms);
        Some(event)
    }

    /// Flush elapsed time, then pause. Returns every event produced.
    pub fn pause(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        events.extend(self.timer.pause());
        self.last_tick_epoch_ms = None;
        events
    }

    pub fn reset(&mut self) -> Event {
        self.last_tick_epoch_ms = None;
        self.carry_ms = 0;
        self.timer.reset()
    }

    /// Replay every whole second elapsed since the last advance.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Event> {
        let Some(last) = self.last_tick_epoch_ms else {
            return Vec::new();
        };
        if !self.timer.is_running() {
            self.last_tick_epoch_ms = None;
            return Vec::new();
        }

        let elapsed = now_ms.saturating_sub(last) + self.carry_ms;
        let ticks = elapsed / 1000;
        self.carry_ms = elapsed % 1000;
        self.last_tick_epoch_ms = Some(now_ms);

        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.timer.tick());
        }
        events
    }

    /// [`TimerClock::advance_to`] using the system clock.
    pub fn advance(&mut self) -> Vec<Event> {
        self.advance_to(now_ms())
    }

    /// Rebuild with new durations if they differ from the configured ones.
    /// The countdown restarts when they change.
    pub fn reconfigure(&mut self, focus_minutes: u32, break_minutes: u32) -> bool {
        if self.timer.focus_minutes() == focus_minutes.max(1)
            && self.timer.break_minutes() == break_minutes.max(1)
        {
            return false;
        }
        *self = Self::new(SessionTimer::new(focus_minutes, break_minutes));
        true
    }
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
