//! Task records and their organizational methods.
//!
//! Each task is tagged with the productivity method it is organized by. The
//! fields that only make sense for one method live inside that method's
//! variant, so a plain task never carries a quadrant.
//!
//! Records exported by the browser app use blank strings for unset dates and
//! an empty `{start: "", end: ""}` time block. Those read back as absent
//! instead of failing the whole task list.

mod store;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;
use crate::goal::{milestone_progress, retain_filled, Milestone};

pub use store::{TaskStore, TaskSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Urgent/important quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    UrgentImportant,
    #[default]
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl Quadrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::UrgentImportant => "urgent-important",
            Quadrant::NotUrgentImportant => "not-urgent-important",
            Quadrant::UrgentNotImportant => "urgent-not-important",
            Quadrant::NotUrgentNotImportant => "not-urgent-not-important",
        }
    }
}

impl FromStr for Quadrant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent-important" => Ok(Quadrant::UrgentImportant),
            "not-urgent-important" => Ok(Quadrant::NotUrgentImportant),
            "urgent-not-important" => Ok(Quadrant::UrgentNotImportant),
            "not-urgent-not-important" => Ok(Quadrant::NotUrgentNotImportant),
            other => Err(format!("unknown quadrant: {other}")),
        }
    }
}

/// A time-of-day range reserved for a task.
///
/// Serialized as `HH:MM` strings. Deserialization goes through
/// [`TimeBlock::parse`], so a stored range can never end before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBlock {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeBlock {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse `HH:MM` bounds. `HH:MM:SS` is accepted as well.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        let parse = |field: &str, raw: &str| {
            NaiveTime::parse_from_str(raw, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
                .map_err(|e| ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: format!("'{raw}' is not HH:MM ({e})"),
                })
        };
        Self::new(parse("start", start)?, parse("end", end)?)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

impl Serialize for TimeBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TimeBlock", 2)?;
        state.serialize_field("start", &self.start.format("%H:%M").to_string())?;
        state.serialize_field("end", &self.end.format("%H:%M").to_string())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for TimeBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            start: String,
            end: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        TimeBlock::parse(raw.start.trim(), raw.end.trim()).map_err(serde::de::Error::custom)
    }
}

/// Reads a time block, treating a missing, blank or invalid one as absent.
fn lenient_time_block<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<TimeBlock>, D::Error> {
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value::<TimeBlock>(value) {
        Ok(block) => Ok(Some(block)),
        Err(e) => {
            tracing::debug!(error = %e, "dropping unusable time block");
            Ok(None)
        }
    }
}

/// Reads an optional value from its string form, mapping `""` to `None`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Organizational method plus the fields only that method uses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum Method {
    #[serde(rename = "timed-focus", alias = "pomodoro")]
    TimedFocus,
    #[serde(rename = "priority-quadrant", alias = "eisenhower")]
    PriorityQuadrant {
        #[serde(default, alias = "eisenhowerQuadrant")]
        quadrant: Quadrant,
    },
    #[serde(rename = "high-impact", alias = "pareto")]
    HighImpact {
        #[serde(rename = "highImpact", default, alias = "isPareto")]
        high_impact: bool,
    },
    #[serde(rename = "time-block", alias = "timeblock")]
    TimeBlock {
        /// `None` until a range has been chosen.
        #[serde(
            rename = "timeBlock",
            default,
            deserialize_with = "lenient_time_block",
            skip_serializing_if = "Option::is_none"
        )]
        time_block: Option<TimeBlock>,
    },
    #[serde(rename = "goal-linked", alias = "goal")]
    GoalLinked {
        /// Manually tracked progress, 0..=100.
        #[serde(rename = "goalProgress", default)]
        goal_progress: u8,
        #[serde(default, alias = "goalMilestones")]
        milestones: Vec<Milestone>,
    },
    #[default]
    #[serde(rename = "none")]
    Unstructured,
}

impl Method {
    pub fn kind(&self) -> MethodKind {
        match self {
            Method::TimedFocus => MethodKind::TimedFocus,
            Method::PriorityQuadrant { .. } => MethodKind::PriorityQuadrant,
            Method::HighImpact { .. } => MethodKind::HighImpact,
            Method::TimeBlock { .. } => MethodKind::TimeBlock,
            Method::GoalLinked { .. } => MethodKind::GoalLinked,
            Method::Unstructured => MethodKind::Unstructured,
        }
    }

    /// Clamp goal progress and drop blank milestones.
    pub fn normalized(self) -> Self {
        match self {
            Method::GoalLinked {
                goal_progress,
                mut milestones,
            } => {
                retain_filled(&mut milestones);
                Method::GoalLinked {
                    goal_progress: goal_progress.min(100),
                    milestones,
                }
            }
            other => other,
        }
    }
}

/// Fieldless discriminant of [`Method`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodKind {
    TimedFocus,
    PriorityQuadrant,
    HighImpact,
    TimeBlock,
    GoalLinked,
    #[serde(rename = "none")]
    Unstructured,
}

impl MethodKind {
    pub const ALL: [MethodKind; 6] = [
        MethodKind::TimedFocus,
        MethodKind::PriorityQuadrant,
        MethodKind::HighImpact,
        MethodKind::TimeBlock,
        MethodKind::GoalLinked,
        MethodKind::Unstructured,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::TimedFocus => "timed-focus",
            MethodKind::PriorityQuadrant => "priority-quadrant",
            MethodKind::HighImpact => "high-impact",
            MethodKind::TimeBlock => "time-block",
            MethodKind::GoalLinked => "goal-linked",
            MethodKind::Unstructured => "none",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MethodKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown method: {s}"))
    }
}

/// Display filter over active tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodFilter {
    #[default]
    All,
    Only(MethodKind),
}

impl MethodFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            MethodFilter::All => true,
            MethodFilter::Only(kind) => task.method.kind() == *kind,
        }
    }
}

impl FromStr for MethodFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(MethodFilter::All)
        } else {
            s.parse().map(MethodFilter::Only)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(flatten)]
    pub method: Method,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(
        default,
        alias = "estimatedDuration",
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_minutes: Option<u32>,
}

impl Task {
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            method: Method::default(),
            completed: false,
            created_at: now,
            completed_at: None,
            deadline: None,
            estimated_minutes: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method.normalized();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Milestone-derived progress for goal-linked tasks.
    pub fn milestone_progress(&self) -> Option<f64> {
        match &self.method {
            Method::GoalLinked { milestones, .. } => Some(milestone_progress(milestones)),
            _ => None,
        }
    }
}

/// Partial update for [`TaskStore::update`]. `None` leaves a field alone;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub method: Option<Method>,
    pub deadline: Option<Option<NaiveDate>>,
    pub estimated_minutes: Option<Option<u32>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(method) = self.method {
            task.method = method.normalized();
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(estimated) = self.estimated_minutes {
            task.estimated_minutes = estimated;
        }
    }
}
