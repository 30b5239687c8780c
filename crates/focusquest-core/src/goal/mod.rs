//! Goals with milestone checklists.

mod store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use store::GoalStore;

/// An independently completable step of a goal (or goal-linked task).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Milestone {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Drop milestones whose text is empty or whitespace.
pub fn retain_filled(milestones: &mut Vec<Milestone>) {
    milestones.retain(|m| !m.is_blank());
}

/// Percentage of completed milestones; 0 when there are none.
pub fn milestone_progress(milestones: &[Milestone]) -> f64 {
    if milestones.is_empty() {
        return 0.0;
    }
    let done = milestones.iter().filter(|m| m.completed).count();
    done as f64 / milestones.len() as f64 * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
    /// Set once, when every milestone is first completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn new(
        title: impl Into<String>,
        deadline: NaiveDate,
        milestones: Vec<Milestone>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            deadline,
            milestones,
            created_at: now,
            completed_at: None,
        }
    }

    /// Progress in percent, 0.0..=100.0.
    pub fn progress(&self) -> f64 {
        milestone_progress(&self.milestones)
    }

    /// Progress rounded to a whole percent, as displayed.
    pub fn progress_pct(&self) -> u8 {
        self.progress().round() as u8
    }

    pub fn is_achieved(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Whole days until the deadline: 0 is due today, negative is overdue.
    pub fn days_until_deadline(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    pub fn deadline_label(&self, today: NaiveDate) -> String {
        match self.days_until_deadline(today) {
            d if d > 0 => format!("{d} days left"),
            0 => "Due today".to_string(),
            _ => "Overdue".to_string(),
        }
    }
}
