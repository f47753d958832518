/// Task form state
///
/// Backs the create/edit form on the tasks screen. Field values are held as
/// the raw strings the inputs produce; validation and date parsing happen
/// on submit. An edit form diffs itself against the record it was opened
/// from so updates only carry changed fields.
use chrono::NaiveDate;

use crate::backend::tasks::{TaskDraft, TaskPatch};
use crate::state::data::{TaskRecord, TaskStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub status: TaskStatus,
    /// Raw `YYYY-MM-DD` input; empty means no due date.
    pub due_date: String,
    pub tags: String,
}

impl TaskForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_record(record: &TaskRecord) -> Self {
        Self {
            name: record.name.clone(),
            display_name: record.display_name.clone(),
            description: record.description.clone(),
            status: record.status,
            due_date: record
                .due_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            tags: record.tags.clone(),
        }
    }

    /// A task needs some name before it can be saved.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() && self.display_name.trim().is_empty() {
            return Err("Please enter a task name".to_string());
        }

        if !self.due_date.trim().is_empty() && self.parsed_due_date().is_none() {
            return Err("Due date must be YYYY-MM-DD".to_string());
        }

        Ok(())
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.trim().to_string(),
            display_name: self.display_name.trim().to_string(),
            description: self.description.clone(),
            status: self.status,
            due_date: self.parsed_due_date(),
            tags: self.tags.clone(),
        }
    }

    /// Build the partial update against the record the form was opened
    /// from: only fields the user actually changed are set.
    pub fn patch_against(&self, original: &TaskRecord) -> TaskPatch {
        let mut patch = TaskPatch::default();

        if self.name != original.name {
            patch.name = Some(self.name.clone());
        }
        if self.display_name != original.display_name {
            patch.display_name = Some(self.display_name.clone());
        }
        if self.description != original.description {
            patch.description = Some(self.description.clone());
        }
        if self.status != original.status {
            patch.status = Some(self.status);
        }
        let due_date = self.parsed_due_date();
        if due_date != original.due_date {
            patch.due_date = Some(due_date);
        }
        if self.tags != original.tags {
            patch.tags = Some(self.tags.clone());
        }

        patch
    }

    fn parsed_due_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.due_date.trim(), DATE_FORMAT).ok()
    }
}
