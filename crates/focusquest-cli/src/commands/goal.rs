use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use focusquest_core::storage::Database;
use focusquest_core::{Goal, GoalStore, Milestone, ValidationError};
use serde::Serialize;

use super::{not_found, print_json, today, CmdResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal with milestones
    Add {
        /// Goal title
        title: String,
        /// Deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: NaiveDate,
        /// Milestone text (repeatable)
        #[arg(long = "milestone")]
        milestones: Vec<String>,
    },
    /// List goals with progress
    List,
    /// Toggle a milestone's completion
    Toggle {
        /// Goal ID
        goal_id: String,
        /// Milestone ID
        milestone_id: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

#[derive(Serialize)]
struct GoalView<'a> {
    #[serde(flatten)]
    goal: &'a Goal,
    progress: u8,
    achieved: bool,
    deadline_label: String,
}

pub fn run(action: GoalAction) -> CmdResult {
    let db = Database::open()?;
    let mut store = GoalStore::load(&db);

    match action {
        GoalAction::Add {
            title,
            deadline,
            milestones,
        } => {
            let title = ValidationError::require_text("title", &title)?;
            let milestones = milestones.into_iter().map(Milestone::new).collect();
            let goal = store.add(Goal::new(title, deadline, milestones, Utc::now()));
            print_json(goal)?;
        }
        GoalAction::List => {
            let today = today();
            let views: Vec<_> = store
                .goals()
                .iter()
                .map(|goal| GoalView {
                    goal,
                    progress: goal.progress_pct(),
                    achieved: goal.is_achieved(),
                    deadline_label: goal.deadline_label(today),
                })
                .collect();
            print_json(&views)?;
        }
        GoalAction::Toggle {
            goal_id,
            milestone_id,
        } => {
            let exists = store
                .get(&goal_id)
                .is_some_and(|g| g.milestones.iter().any(|m| m.id == milestone_id));
            if !exists {
                not_found("milestone", &milestone_id);
            }
            if let Some(event) = store.toggle_milestone(&goal_id, &milestone_id, Utc::now()) {
                eprintln!("{}", event.headline());
            }
            if let Some(goal) = store.get(&goal_id) {
                print_json(goal)?;
            }
        }
        GoalAction::Delete { id } => {
            if !store.delete(&id) {
                not_found("goal", &id);
            }
            println!("Goal deleted: {id}");
        }
    }

    store.flush()?;
    Ok(())
}
