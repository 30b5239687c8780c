//! Focus/break countdown.
//!
//! The timer is a plain state machine advanced one second per `tick()`. It
//! has no notion of wall-clock time; see [`super::TimerClock`] for the
//! driver that turns elapsed milliseconds into ticks.
//!
//! ## State Transitions
//!
//! ```text
//! Focus(n) --tick--> Focus(n-1) ... Focus(0) --> Break(break_secs)
//! Break(n) --tick--> Break(n-1) ... Break(0) --> Focus(focus_secs)
//! ```
//!
//! The running flag is orthogonal: `start`/`pause` toggle it without
//! touching the remaining time, and a phase change keeps it as it was.

use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::Break => "Break",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    focus_minutes: u32,
    break_minutes: u32,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    /// Set once the current focus phase has reported its minutes.
    focus_reported: bool,
}

impl SessionTimer {
    /// Create a paused timer at the start of a focus phase.
    ///
    /// Durations below one minute are raised to one.
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        let focus_minutes = focus_minutes.max(1);
        let break_minutes = break_minutes.max(1);
        Self {
            focus_minutes,
            break_minutes,
            phase: Phase::Focus,
            remaining_secs: minutes_to_secs(focus_minutes),
            running: false,
            focus_reported: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Length of the current phase in seconds.
    pub fn phase_secs(&self) -> u64 {
        match self.phase {
            Phase::Focus => minutes_to_secs(self.focus_minutes),
            Phase::Break => minutes_to_secs(self.break_minutes),
        }
    }

    /// 0.0 ..= 100.0 progress through the current phase.
    pub fn progress_pct(&self) -> f64 {
        let total = self.phase_secs() as f64;
        (total - self.remaining_secs as f64) / total * 100.0
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        })
    }

    /// Back to a paused, full-length focus phase.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.enter(Phase::Focus);
        Event::TimerReset {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Advance one second. Does nothing while paused.
    ///
    /// Reaching zero in a focus phase yields `FocusCompleted` (once per
    /// phase) followed by `PhaseChanged`; reaching zero in a break yields
    /// only `PhaseChanged`.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        match self.phase {
            Phase::Focus => {
                if !self.focus_reported {
                    self.focus_reported = true;
                    events.push(Event::FocusCompleted {
                        minutes: self.focus_minutes,
                    });
                }
                self.enter(Phase::Break);
            }
            Phase::Break => self.enter(Phase::Focus),
        }
        events.push(Event::PhaseChanged {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        });
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.remaining_secs = self.phase_secs();
        if phase == Phase::Focus {
            self.focus_reported = false;
        }
    }
}

fn minutes_to_secs(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}
