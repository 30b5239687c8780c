//! Streak and activity tracking.
//!
//! `Stats` is a single process-wide record. Streak arithmetic works on
//! calendar days (`NaiveDate`) supplied by the caller, never on elapsed
//! 24-hour periods, so a session at 23:59 followed by one at 00:01 counts as
//! two consecutive days.

pub mod heatmap;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::storage::{Database, RecordKey};

pub use heatmap::{Heatmap, HeatmapCell};

/// Accumulated focus statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub total_minutes: u64,
    #[serde(default)]
    pub streak: u32,
    /// Last calendar day with recorded activity. `None` until the first one.
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,
    /// Minutes per calendar day; only days with activity are present.
    #[serde(default)]
    pub activity_map: BTreeMap<NaiveDate, u32>,
    #[serde(default)]
    pub ai_queries: u64,
}

impl Stats {
    /// Advance the streak to `today`.
    ///
    /// Same day keeps the streak, the next day extends it, anything else
    /// (a gap, or a last-active date in the future) restarts it at 1.
    /// Calling it again on the same day changes nothing.
    pub fn update_streak(&mut self, today: NaiveDate) {
        let streak = match self.last_active_date {
            Some(last) => match (today - last).num_days() {
                0 => self.streak,
                1 => self.streak.saturating_add(1),
                _ => 1,
            },
            None => 1,
        };
        if streak != self.streak {
            tracing::info!(from = self.streak, to = streak, "streak changed");
        }
        self.streak = streak;
        self.last_active_date = Some(today);
    }

    /// Record a finished focus session of `minutes` on `today`.
    pub fn add_activity(&mut self, minutes: u32, today: NaiveDate) {
        self.update_streak(today);
        self.total_sessions += 1;
        self.total_minutes += u64::from(minutes);
        *self.activity_map.entry(today).or_insert(0) += minutes;
    }

    /// Record a successful chat reply; it counts toward the streak.
    pub fn record_chat_query(&mut self, today: NaiveDate) {
        self.update_streak(today);
        self.ai_queries += 1;
    }

    /// Minutes recorded on `day`.
    pub fn minutes_on(&self, day: NaiveDate) -> u32 {
        self.activity_map.get(&day).copied().unwrap_or(0)
    }

    /// Total focus time split into whole hours and remaining minutes.
    pub fn hours_and_minutes(&self) -> (u64, u64) {
        (self.total_minutes / 60, self.total_minutes % 60)
    }

    pub fn tier(&self) -> StreakTier {
        StreakTier::for_streak(self.streak)
    }
}

/// Coarse classification of a streak length, used for the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTier {
    NotStarted,
    Starting,
    OnFire,
    Unstoppable,
    Legendary,
}

impl StreakTier {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0 => StreakTier::NotStarted,
            1..=2 => StreakTier::Starting,
            3..=6 => StreakTier::OnFire,
            7..=29 => StreakTier::Unstoppable,
            _ => StreakTier::Legendary,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StreakTier::NotStarted => "Start your journey today!",
            StreakTier::Starting => "Great start! Keep it up!",
            StreakTier::OnFire => "You're on fire!",
            StreakTier::Unstoppable => "Amazing streak! You're unstoppable!",
            StreakTier::Legendary => "Legendary! You're a productivity master!",
        }
    }
}

/// Owns the `Stats` singleton and writes it back after every change.
pub struct ActivityTracker<'db> {
    db: &'db Database,
    stats: Stats,
}

impl<'db> ActivityTracker<'db> {
    /// Load stats from the database, or start from zero.
    pub fn load(db: &'db Database) -> Self {
        let stats = db.load_record(RecordKey::Stats);
        Self { db, stats }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Apply a focus-completion event. Other events are ignored.
    ///
    /// Returns `true` if the stats changed.
    pub fn handle_event(&mut self, event: &Event, today: NaiveDate) -> bool {
        match event {
            Event::FocusCompleted { minutes } => {
                self.add_activity(*minutes, today);
                true
            }
            _ => false,
        }
    }

    pub fn add_activity(&mut self, minutes: u32, today: NaiveDate) {
        self.stats.add_activity(minutes, today);
        tracing::debug!(
            minutes,
            total_sessions = self.stats.total_sessions,
            "activity recorded"
        );
        self.persist();
    }

    pub fn record_chat_query(&mut self, today: NaiveDate) {
        self.stats.record_chat_query(today);
        self.persist();
    }

    pub fn heatmap(&self, today: NaiveDate, days: u32) -> Heatmap {
        Heatmap::build(&self.stats.activity_map, today, days)
    }

    /// Write the snapshot, surfacing failures.
    pub fn flush(&self) -> Result<(), crate::error::DatabaseError> {
        self.db.save_record(RecordKey::Stats, &self.stats)
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to persist stats");
        }
    }
}
