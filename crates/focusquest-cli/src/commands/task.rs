//! Task management commands for CLI.

use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Subcommand};
use focusquest_core::goal::Milestone;
use focusquest_core::storage::Database;
use focusquest_core::{
    Method, MethodFilter, MethodKind, Priority, Quadrant, Task, TaskPatch, TaskStore, TimeBlock,
    ValidationError,
};

use super::{not_found, print_json, CmdResult};

/// Method selection shared by `add` and `update`.
#[derive(Args, Debug, Default)]
pub struct MethodArgs {
    /// Organizational method (timed-focus, priority-quadrant, high-impact,
    /// time-block, goal-linked, none)
    #[arg(long)]
    method: Option<MethodKind>,
    /// Quadrant for priority-quadrant tasks (e.g. urgent-important)
    #[arg(long)]
    quadrant: Option<Quadrant>,
    /// Mark a high-impact task as one of the vital few
    #[arg(long)]
    high_impact: bool,
    /// Time block start, HH:MM
    #[arg(long)]
    block_start: Option<String>,
    /// Time block end, HH:MM
    #[arg(long)]
    block_end: Option<String>,
    /// Goal progress in percent, 0-100
    #[arg(long)]
    progress: Option<u8>,
    /// Milestone text (repeatable)
    #[arg(long = "milestone")]
    milestones: Vec<String>,
}

impl MethodArgs {
    fn build(self) -> Result<Option<Method>, Box<dyn std::error::Error>> {
        let Some(kind) = self.method else {
            return Ok(None);
        };
        let method = match kind {
            MethodKind::TimedFocus => Method::TimedFocus,
            MethodKind::PriorityQuadrant => Method::PriorityQuadrant {
                quadrant: self.quadrant.unwrap_or_default(),
            },
            MethodKind::HighImpact => Method::HighImpact {
                high_impact: self.high_impact,
            },
            MethodKind::TimeBlock => {
                let (Some(start), Some(end)) = (self.block_start, self.block_end) else {
                    return Err("time-block tasks need --block-start and --block-end".into());
                };
                Method::TimeBlock {
                    time_block: Some(TimeBlock::parse(&start, &end)?),
                }
            }
            MethodKind::GoalLinked => Method::GoalLinked {
                goal_progress: self.progress.unwrap_or(0),
                milestones: self.milestones.into_iter().map(Milestone::new).collect(),
            },
            MethodKind::Unstructured => Method::Unstructured,
        };
        Ok(Some(method.normalized()))
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Estimated minutes
        #[arg(long)]
        estimate: Option<u32>,
        #[command(flatten)]
        method: MethodArgs,
    },
    /// List active tasks
    List {
        /// Filter by method, or "all"
        #[arg(long, default_value = "all")]
        method: MethodFilter,
    },
    /// Update an active task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Remove the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
        /// New deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Remove the deadline
        #[arg(long, conflicts_with = "deadline")]
        clear_deadline: bool,
        /// New estimate in minutes
        #[arg(long)]
        estimate: Option<u32>,
        #[command(flatten)]
        method: MethodArgs,
    },
    /// Delete an active task
    Delete {
        /// Task ID
        id: String,
    },
    /// Mark a task complete
    Complete {
        /// Task ID
        id: String,
    },
    /// Move a completed task back to the active list
    Restore {
        /// Task ID
        id: String,
    },
    /// Permanently delete a completed task
    Purge {
        /// Task ID
        id: String,
    },
    /// List completed tasks
    Completed,
    /// Completion counts for today and the last seven days
    Summary,
}

pub fn run(action: TaskAction) -> CmdResult {
    let db = Database::open()?;
    let mut store = TaskStore::load(&db);

    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            deadline,
            estimate,
            method,
        } => {
            let title = ValidationError::require_text("title", &title)?;
            let mut task = Task::new(title, Utc::now()).with_priority(priority);
            task.description = description;
            task.deadline = deadline;
            task.estimated_minutes = estimate;
            if let Some(method) = method.build()? {
                task = task.with_method(method);
            }
            eprintln!("Task created: {}", task.id);
            print_json(&task)?;
            store.add(task);
        }
        TaskAction::List { method } => {
            print_json(&store.filter(method))?;
        }
        TaskAction::Update {
            id,
            title,
            description,
            clear_description,
            priority,
            deadline,
            clear_deadline,
            estimate,
            method,
        } => {
            let title = title
                .as_deref()
                .map(|t| ValidationError::require_text("title", t).map(str::to_string))
                .transpose()?;
            let patch = TaskPatch {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                priority,
                method: method.build()?,
                deadline: if clear_deadline {
                    Some(None)
                } else {
                    deadline.map(Some)
                },
                estimated_minutes: estimate.map(Some),
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            if !store.update(&id, patch) {
                not_found("task", &id);
            }
            if let Some(task) = store.get(&id) {
                print_json(task)?;
            }
        }
        TaskAction::Delete { id } => {
            if !store.delete(&id) {
                not_found("task", &id);
            }
            println!("Task deleted: {id}");
        }
        TaskAction::Complete { id } => match store.complete(&id, Utc::now()) {
            Some(event) => {
                eprintln!("{}", event.headline());
                print_json(&event)?;
            }
            None => not_found("task", &id),
        },
        TaskAction::Restore { id } => {
            if !store.restore(&id) {
                not_found("completed task", &id);
            }
            println!("Task restored: {id}");
        }
        TaskAction::Purge { id } => {
            if !store.delete_completed(&id) {
                not_found("completed task", &id);
            }
            println!("Task purged: {id}");
        }
        TaskAction::Completed => {
            print_json(store.completed())?;
        }
        TaskAction::Summary => {
            print_json(&store.summary(&Local::now()))?;
        }
    }

    store.flush()?;
    Ok(())
}
