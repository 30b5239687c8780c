use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Notable state changes reported by the stores and the session timer.
///
/// The front end decides how to celebrate them; the activity tracker
/// consumes `FocusCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskCompleted {
        task_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    GoalCompleted {
        goal_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    /// A focus phase ran down to zero. Emitted at most once per phase.
    FocusCompleted {
        minutes: u32,
    },
    PhaseChanged {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerReset {
        remaining_secs: u64,
    },
}

impl Event {
    /// Short human-readable line for terminal output.
    pub fn headline(&self) -> String {
        match self {
            Event::TaskCompleted { title, .. } => format!("Task complete: {title}"),
            Event::GoalCompleted { title, .. } => {
                format!("Mission complete! Goal achieved: {title}")
            }
            Event::FocusCompleted { minutes } => format!("Focus session done (+{minutes} min)"),
            Event::PhaseChanged { phase, .. } => format!("{} time", phase.label()),
            Event::TimerStarted { phase, .. } => format!("{} timer running", phase.label()),
            Event::TimerPaused { phase, .. } => format!("{} timer paused", phase.label()),
            Event::TimerReset { .. } => "Timer reset".to_string(),
        }
    }
}
