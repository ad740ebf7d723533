use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;
use super::id::Id;

/// Task priority. Absence of an explicit token in quick capture means
/// [`Priority::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// How much energy a task demands (or, in a suggestion context, how much the
/// user has available).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Low,
    #[default]
    Medium,
    High,
}

impl Energy {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Rough t-shirt sizing for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TaskSize {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// The primary unit of work.
///
/// A task may reference a parent task and own an ordered list of subtask ids.
/// The linkage is bidirectional: `parent_task_id = P` iff `P.subtasks`
/// contains this task's id. The mutation engine is the only code allowed to
/// touch either side.
///
/// `project_id` and `category_ids` are weak references: deleting the target
/// entity scrubs them but never deletes the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub archived: bool,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<Id>,
    pub category_ids: Vec<Id>,
    pub parent_task_id: Option<Id>,
    pub subtasks: Vec<Id>,
    pub priority: Priority,
    pub energy_level: Energy,
    pub size: TaskSize,
    pub estimated_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Id::generate(),
            title: String::new(),
            description: String::new(),
            completed: false,
            archived: false,
            due_date: None,
            project_id: None,
            category_ids: Vec::new(),
            parent_task_id: None,
            subtasks: Vec::new(),
            priority: Priority::default(),
            energy_level: Energy::default(),
            size: TaskSize::default(),
            estimated_minutes: None,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl Task {
    /// Create a task with defaults filled and both timestamps set to `now`.
    #[must_use]
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// Number of direct subtasks. Used as the complexity proxy by the
    /// suggestion engine.
    #[must_use]
    pub fn subtask_count(&self) -> usize {
        self.subtasks.len()
    }

    /// Add a category reference if not already present (set semantics over
    /// an insertion-ordered vec).
    pub fn add_category(&mut self, category: Id) {
        if !self.category_ids.contains(&category) {
            self.category_ids.push(category);
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Energy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "energy level",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for TaskSize {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(ParseEnumError {
                expected: "size",
                got: s.to_string(),
            }),
        }
    }
}
