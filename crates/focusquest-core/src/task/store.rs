use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use super::{MethodFilter, Task, TaskPatch};
use crate::error::DatabaseError;
use crate::events::Event;
use crate::storage::{Database, RecordKey};

/// Counts shown next to the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    /// Same set as `filter(MethodFilter::All)`.
    pub active: usize,
    pub completed: usize,
    pub completed_today: usize,
    pub completed_this_week: usize,
}

/// Active and completed tasks, each mirrored to its own record.
///
/// Completing a task moves it to the completed partition rather than
/// deleting it; `restore` moves it back.
pub struct TaskStore<'db> {
    db: &'db Database,
    active: Vec<Task>,
    completed: Vec<Task>,
}

impl<'db> TaskStore<'db> {
    pub fn load(db: &'db Database) -> Self {
        Self {
            db,
            active: db.load_record(RecordKey::ActiveTasks),
            completed: db.load_record(RecordKey::CompletedTasks),
        }
    }

    pub fn active(&self) -> &[Task] {
        &self.active
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.active.iter().find(|t| t.id == id)
    }

    pub fn get_completed(&self, id: &str) -> Option<&Task> {
        self.completed.iter().find(|t| t.id == id)
    }

    /// Active tasks matching `filter`, in insertion order.
    pub fn filter(&self, filter: MethodFilter) -> Vec<&Task> {
        self.active
            .iter()
            .filter(|t| !t.completed && filter.matches(t))
            .collect()
    }

    /// Append a task. Ids are not checked for uniqueness.
    pub fn add(&mut self, task: Task) {
        tracing::debug!(task_id = %task.id, method = %task.method.kind(), "task added");
        self.active.push(task);
        self.persist();
    }

    /// Merge `patch` into the active task with `id`. Returns whether it existed.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> bool {
        let Some(task) = self.active.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        patch.apply(task);
        self.persist();
        true
    }

    /// Permanently remove an active task.
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = remove_by_id(&mut self.active, id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    /// Move a task to the completed partition, stamping `now`.
    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Option<Event> {
        let mut task = remove_by_id(&mut self.active, id)?;
        task.completed = true;
        task.completed_at = Some(now);
        tracing::info!(task_id = %task.id, "task completed");
        let event = Event::TaskCompleted {
            task_id: task.id.clone(),
            title: task.title.clone(),
            at: now,
        };
        self.completed.push(task);
        self.persist();
        Some(event)
    }

    /// Move a completed task back to the active list.
    pub fn restore(&mut self, id: &str) -> bool {
        let Some(mut task) = remove_by_id(&mut self.completed, id) else {
            return false;
        };
        task.completed = false;
        task.completed_at = None;
        self.active.push(task);
        self.persist();
        true
    }

    /// Permanently remove a completed task.
    pub fn delete_completed(&mut self, id: &str) -> bool {
        let removed = remove_by_id(&mut self.completed, id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    /// Tasks completed on calendar day `day` as observed in `tz`.
    pub fn completed_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> usize {
        self.completed
            .iter()
            .filter_map(|t| t.completed_at)
            .filter(|at| at.with_timezone(tz).date_naive() == day)
            .count()
    }

    /// Tasks completed at or after `cutoff`.
    pub fn completed_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.completed
            .iter()
            .filter_map(|t| t.completed_at)
            .filter(|at| *at >= cutoff)
            .count()
    }

    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TaskSummary {
        let tz = now.timezone();
        let now_utc = now.with_timezone(&Utc);
        TaskSummary {
            active: self.filter(MethodFilter::All).len(),
            completed: self.completed.len(),
            completed_today: self.completed_on(now.date_naive(), &tz),
            completed_this_week: self.completed_since(now_utc - Duration::days(7)),
        }
    }

    /// Write both partitions, surfacing the first failure.
    pub fn flush(&self) -> Result<(), DatabaseError> {
        self.db.save_record(RecordKey::ActiveTasks, &self.active)?;
        self.db.save_record(RecordKey::CompletedTasks, &self.completed)
    }

    fn persist(&self) {
        if let Err(e) = self.db.save_record(RecordKey::ActiveTasks, &self.active) {
            tracing::warn!(error = %e, "failed to persist active tasks");
        }
        if let Err(e) = self.db.save_record(RecordKey::CompletedTasks, &self.completed) {
            tracing::warn!(error = %e, "failed to persist completed tasks");
        }
    }
}

fn remove_by_id(tasks: &mut Vec<Task>, id: &str) -> Option<Task> {
    let index = tasks.iter().position(|t| t.id == id)?;
    Some(tasks.remove(index))
}
