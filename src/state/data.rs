/// Shared data structures for the application state
///
/// These structs represent the flat record shapes that flow between the
/// backend gateways and the UI layer. The remote schema (suffixed `*_c`
/// fields, lookup objects) never leaks past the gateways.
use std::fmt;

use chrono::NaiveDate;
use serde_json::Value;

/// A single image in the slideshow sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Unique backend ID, immutable
    pub id: i64,
    /// Display URL
    pub url: String,
    /// Thumbnail URL; the gateway falls back to `url` when absent
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
}

/// A task row from the task table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: i64,
    /// Backend `Name` field
    pub display_name: String,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<LookupRef>,
    /// Free-text tags, comma separated
    pub tags: String,
}

impl TaskRecord {
    /// The name shown in lists: task name, display name, or a placeholder.
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.display_name.is_empty() {
            &self.display_name
        } else {
            "Untitled Task"
        }
    }
}

/// Reference to a record in another table (e.g. the task assignee).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRef {
    pub id: i64,
    pub name: String,
}

impl LookupRef {
    /// Lookup fields arrive either as a bare id or as `{Id, Name}`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(id) => Some(Self {
                id: id.as_i64()?,
                name: String::new(),
            }),
            Value::Object(map) => Some(Self {
                id: map.get("Id")?.as_i64()?,
                name: map
                    .get("Name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            }),
            _ => None,
        }
    }
}

/// Task workflow status. Wire values are the human-readable strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::OnHold,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::OnHold => "On Hold",
            TaskStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse a wire value; unknown strings fall back to the default so a
    /// schema drift on the backend never breaks the list view.
    pub fn from_wire(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .unwrap_or_default()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
