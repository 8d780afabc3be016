//! To-do task model as seen from the API boundary.
//!
//! The harness does not own these entities; the types exist so requests
//! can be built with the right shape and responses read back.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Server-generated task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an identifier returned by the API.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the `id` field of a JSON object.
    ///
    /// Numeric ids are accepted and kept in their decimal form.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value.get("id")? {
            serde_json::Value::String(s) if !s.is_empty() => Some(Self::new(s.as_str())),
            serde_json::Value::Number(n) => Some(Self::new(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Enumerated task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Work-related task
    Work,
    /// Personal task
    Personal,
    /// Shopping errand
    Shopping,
    /// Health and fitness
    Health,
    /// Anything else
    Other,
}

impl Category {
    /// Returns the wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion filter accepted by the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl StatusFilter {
    /// Returns the query-string value of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    /// Short title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Optional due date; serialized as `null` when absent
    pub due_date: Option<DateTime<Utc>>,
    /// Category
    pub category: Category,
}

impl NewTask {
    /// Creates a task payload.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<DateTime<Utc>>,
        category: Category,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date,
            category,
        }
    }
}

/// Partial update of a task's mutable fields.
///
/// Only the fields that are set are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl TaskUpdate {
    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}
