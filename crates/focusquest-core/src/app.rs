//! Process-wide application state.
//!
//! One `App` is built per process from an open [`Database`]: every store
//! loads its record (or the default) on construction and writes it back on
//! each mutation. `flush` rewrites everything and reports failures, for use
//! at shutdown.

use chrono::NaiveDate;

use crate::error::{ChatError, Result};
use crate::events::Event;
use crate::goal::GoalStore;
use crate::integrations::ChatClient;
use crate::stats::ActivityTracker;
use crate::storage::{Database, Preferences, RecordKey, TimerConfig};
use crate::task::TaskStore;
use crate::timer::{SessionTimer, TimerClock};

pub struct App<'db> {
    db: &'db Database,
    pub tasks: TaskStore<'db>,
    pub goals: GoalStore<'db>,
    pub activity: ActivityTracker<'db>,
}

impl<'db> App<'db> {
    pub fn load(db: &'db Database) -> Self {
        Self {
            db,
            tasks: TaskStore::load(db),
            goals: GoalStore::load(db),
            activity: ActivityTracker::load(db),
        }
    }

    pub fn preferences(&self) -> Preferences<'db> {
        Preferences::new(self.db)
    }

    /// Feed timer events to the activity tracker. Returns how many focus
    /// sessions were recorded.
    pub fn handle_events(&mut self, events: &[Event], today: NaiveDate) -> usize {
        events
            .iter()
            .filter(|event| self.activity.handle_event(event, today))
            .count()
    }

    /// Ask the chat service; a successful reply is counted once, a failure
    /// leaves the stats untouched.
    pub async fn ask_chat(
        &mut self,
        client: &ChatClient,
        prompt: &str,
        document: Option<&str>,
        today: NaiveDate,
    ) -> Result<String, ChatError> {
        let reply = client.ask(prompt, document).await?;
        self.activity.record_chat_query(today);
        Ok(reply)
    }

    /// Saved timer, rebuilt if the configured durations changed.
    pub fn load_timer(&self, config: &TimerConfig) -> TimerClock {
        let mut clock = self
            .db
            .try_load_record::<TimerClock>(RecordKey::Timer)
            .unwrap_or_else(|| {
                TimerClock::new(SessionTimer::new(
                    config.focus_minutes,
                    config.break_minutes,
                ))
            });
        if clock.reconfigure(config.focus_minutes, config.break_minutes) {
            tracing::info!("timer durations changed, timer reset");
        }
        clock
    }

    pub fn save_timer(&self, clock: &TimerClock) -> Result<()> {
        self.db.save_record(RecordKey::Timer, clock)?;
        Ok(())
    }

    /// Rewrite every record held in memory.
    pub fn flush(&self) -> Result<()> {
        self.tasks.flush()?;
        self.goals.flush()?;
        self.activity.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn focus_event_updates_persisted_stats() {
        let db = Database::open_memory().unwrap();
        let today = Utc::now().date_naive();
        let mut app = App::load(&db);
        let recorded = app.handle_events(
            &[
                Event::FocusCompleted { minutes: 25 },
                Event::PhaseChanged {
                    phase: crate::timer::Phase::Break,
                    remaining_secs: 300,
                },
            ],
            today,
        );
        assert_eq!(recorded, 1);

        let reloaded = App::load(&db);
        assert_eq!(reloaded.activity.stats().total_sessions, 1);
        assert_eq!(reloaded.activity.stats().minutes_on(today), 25);
    }

    #[test]
    fn yesterday_streak_scenario() {
        let db = Database::open_memory().unwrap();
        let today = Utc::now().date_naive();
        let seeded = crate::stats::Stats {
            last_active_date: Some(today - Duration::days(1)),
            ..Default::default()
        };
        db.save_record(RecordKey::Stats, &seeded).unwrap();

        let mut app = App::load(&db);
        app.handle_events(&[Event::FocusCompleted { minutes: 25 }], today);
        let stats = app.activity.stats();
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_minutes, 25);
    }

    #[test]
    fn timer_round_trips_and_follows_config() {
        let db = Database::open_memory().unwrap();
        let app = App::load(&db);
        let config = TimerConfig::default();
        let mut clock = app.load_timer(&config);
        clock.start(0);
        app.save_timer(&clock).unwrap();

        assert!(app.load_timer(&config).timer().is_running());

        let longer = TimerConfig {
            focus_minutes: 50,
            break_minutes: 10,
        };
        let rebuilt = app.load_timer(&longer);
        assert!(!rebuilt.timer().is_running());
        assert_eq!(rebuilt.timer().remaining_secs(), 3000);
    }

    #[test]
    fn flush_writes_every_record() {
        let db = Database::open_memory().unwrap();
        App::load(&db).flush().unwrap();
        for key in [
            RecordKey::ActiveTasks,
            RecordKey::CompletedTasks,
            RecordKey::Goals,
            RecordKey::Stats,
        ] {
            assert!(db.kv_get(key.as_str()).unwrap().is_some(), "{key} missing");
        }
    }
}
