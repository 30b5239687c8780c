use chrono::{DateTime, Utc};

use super::{retain_filled, Goal};
use crate::error::DatabaseError;
use crate::events::Event;
use crate::storage::{Database, RecordKey};

/// In-memory goal list mirrored to the database after every change.
pub struct GoalStore<'db> {
    db: &'db Database,
    goals: Vec<Goal>,
}

impl<'db> GoalStore<'db> {
    pub fn load(db: &'db Database) -> Self {
        let goals = db.load_record(RecordKey::Goals);
        Self { db, goals }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Append a goal, discarding milestones with blank text.
    pub fn add(&mut self, mut goal: Goal) -> &Goal {
        retain_filled(&mut goal.milestones);
        tracing::debug!(goal_id = %goal.id, milestones = goal.milestones.len(), "goal added");
        self.goals.push(goal);
        self.persist();
        let last = self.goals.len() - 1;
        &self.goals[last]
    }

    /// Flip a milestone. Returns `GoalCompleted` the first time every
    /// milestone of the goal is done.
    ///
    /// Unknown goal or milestone ids are ignored. A goal's completion
    /// timestamp is never cleared by later toggles.
    pub fn toggle_milestone(
        &mut self,
        goal_id: &str,
        milestone_id: &str,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        let goal = self.goals.iter_mut().find(|g| g.id == goal_id)?;
        let milestone = goal.milestones.iter_mut().find(|m| m.id == milestone_id)?;
        milestone.completed = !milestone.completed;

        let mut event = None;
        if goal.progress() >= 100.0 && goal.completed_at.is_none() {
            goal.completed_at = Some(now);
            tracing::info!(goal_id = %goal.id, "goal achieved");
            event = Some(Event::GoalCompleted {
                goal_id: goal.id.clone(),
                title: goal.title.clone(),
                at: now,
            });
        }
        self.persist();
        event
    }

    /// Permanently remove a goal. Returns whether it existed.
    pub fn delete(&mut self, goal_id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != goal_id);
        let removed = self.goals.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn flush(&self) -> Result<(), DatabaseError> {
        self.db.save_record(RecordKey::Goals, &self.goals)
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to persist goals");
        }
    }
}
