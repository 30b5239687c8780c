//! # FocusQuest Core Library
//!
//! Business logic for the FocusQuest productivity tracker: tasks organized by
//! productivity method, goals with milestones, a focus/break session timer
//! and a daily streak with an activity heatmap. The `focusquest` CLI is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: SQLite key-value table holding one JSON snapshot per
//!   record, plus TOML configuration
//! - **Stores**: [`TaskStore`], [`GoalStore`] and [`ActivityTracker`] own their
//!   records in memory and write them back after every mutation
//! - **Timer**: [`SessionTimer`] is a tick-driven state machine;
//!   [`TimerClock`] paces it from wall-clock time
//! - **Chat**: [`ChatClient`] for an external chat-completion endpoint
//!
//! [`App`] bundles the stores for one process.

pub mod app;
pub mod error;
pub mod events;
pub mod goal;
pub mod integrations;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::App;
pub use error::{ChatError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use goal::{Goal, GoalStore, Milestone};
pub use integrations::ChatClient;
pub use stats::{ActivityTracker, Heatmap, Stats, StreakTier};
pub use storage::{Config, Database, Preferences, RecordKey, Theme};
pub use task::{Method, MethodFilter, MethodKind, Priority, Quadrant, Task, TaskPatch, TaskStore, TimeBlock};
pub use timer::{Phase, SessionTimer, TimerClock};
