use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::client::{
    fields, require_success, rows_from_data, single_result, BackendApi, OrderBy, PagingInfo,
    Query, WhereClause,
};
use super::error::{GatewayError, Result};
use crate::state::data::{LookupRef, TaskRecord, TaskStatus};

const TABLE: &str = "task_c";
const PAGE_LIMIT: u32 = 100;

const FIELDS: [&str; 8] = [
    "Id",
    "Name",
    "Tags",
    "name_c",
    "description_c",
    "status_c",
    "due_date_c",
    "assignee_c",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional server-side filters for `get_all`. The gateway never mutates
/// the filters it is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
}

/// Gateway for the task table.
#[derive(Clone)]
pub struct TaskGateway {
    api: Arc<dyn BackendApi>,
}

impl TaskGateway {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }

    /// Fetch tasks, newest first, optionally filtered by status.
    /// Zero rows is an empty list, not an error.
    pub async fn get_all(&self, filters: &TaskFilters) -> Result<Vec<TaskRecord>> {
        let filter = filters
            .status
            .map(|status| vec![WhereClause::equal_to("status_c", status.as_str())]);

        let query = Query {
            fields: fields(&FIELDS),
            order_by: vec![OrderBy::descending("CreatedOn")],
            filter,
            paging: PagingInfo {
                limit: PAGE_LIMIT,
                offset: 0,
            },
        };

        let envelope = self.api.fetch_records(TABLE, &query).await?;
        let rows = rows_from_data(envelope)?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            let row: TaskRow = serde_json::from_value(row)?;
            tasks.push(row.into_record());
        }

        Ok(tasks)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<TaskRecord> {
        let envelope = self
            .api
            .get_record_by_id(TABLE, id, &fields(&FIELDS))
            .await?;
        require_success(&envelope)?;

        let row = match envelope.data {
            Some(Value::Null) | None => return Err(GatewayError::NotFound { table: TABLE, id }),
            Some(row) => row,
        };

        let row: TaskRow = serde_json::from_value(row)?;
        Ok(row.into_record())
    }

    /// Persist a new task and return it with its assigned id.
    pub async fn create(&self, draft: &TaskDraft) -> Result<TaskRecord> {
        let envelope = self.api.create_record(TABLE, vec![draft.to_wire()]).await?;
        let result = single_result(envelope, TABLE, None)?;
        record_from_result(result.data)
    }

    /// Update only the fields present in the patch.
    pub async fn update(&self, id: i64, patch: &TaskPatch) -> Result<TaskRecord> {
        let envelope = self
            .api
            .update_record(TABLE, vec![patch.to_wire(id)])
            .await?;
        let result = single_result(envelope, TABLE, Some(id))?;
        record_from_result(result.data)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let envelope = self.api.delete_record(TABLE, vec![id]).await?;
        let result = single_result(envelope, TABLE, Some(id))?;
        Ok(result.success)
    }
}

fn record_from_result(data: Option<Value>) -> Result<TaskRecord> {
    let row = data
        .ok_or_else(|| GatewayError::Backend("backend returned no record data".to_string()))?;
    let row: TaskRow = serde_json::from_value(row)?;
    Ok(row.into_record())
}

/// Fields for a new task. Empty strings are dropped from the payload, the
/// way the remote schema expects absent optionals.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub tags: String,
}

impl TaskDraft {
    fn to_wire(&self) -> Value {
        let mut record = Map::new();

        if !self.name.is_empty() {
            record.insert("name_c".to_string(), json!(self.name));
        }
        let display_name = if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        };
        if !display_name.is_empty() {
            record.insert("Name".to_string(), json!(display_name));
        }
        if !self.description.is_empty() {
            record.insert("description_c".to_string(), json!(self.description));
        }
        record.insert("status_c".to_string(), json!(self.status.as_str()));
        if let Some(due_date) = self.due_date {
            record.insert(
                "due_date_c".to_string(),
                json!(due_date.format(DATE_FORMAT).to_string()),
            );
        }
        if !self.tags.is_empty() {
            record.insert("Tags".to_string(), json!(self.tags));
        }

        Value::Object(record)
    }
}

/// Partial update for a task; only set fields reach the wire.
///
/// `due_date` and `assignee` distinguish "leave alone" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<NaiveDate>>,
    pub assignee: Option<Option<i64>>,
    pub tags: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn to_wire(&self, id: i64) -> Value {
        let mut record = Map::new();
        record.insert("Id".to_string(), json!(id));

        if let Some(name) = &self.name {
            record.insert("name_c".to_string(), json!(name));
        }
        if let Some(display_name) = &self.display_name {
            record.insert("Name".to_string(), json!(display_name));
        }
        if let Some(description) = &self.description {
            record.insert("description_c".to_string(), json!(description));
        }
        if let Some(status) = self.status {
            record.insert("status_c".to_string(), json!(status.as_str()));
        }
        if let Some(due_date) = &self.due_date {
            let value = match due_date {
                Some(date) => json!(date.format(DATE_FORMAT).to_string()),
                None => Value::Null,
            };
            record.insert("due_date_c".to_string(), value);
        }
        if let Some(assignee) = &self.assignee {
            let value = match assignee {
                Some(id) => json!(id),
                None => Value::Null,
            };
            record.insert("assignee_c".to_string(), value);
        }
        if let Some(tags) = &self.tags {
            record.insert("Tags".to_string(), json!(tags));
        }

        Value::Object(record)
    }
}

/// Remote row shape for the task table.
#[derive(Debug, Default, Deserialize)]
struct TaskRow {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(default, rename = "Name")]
    display_name: Option<String>,
    #[serde(default, rename = "Tags")]
    tags: Option<String>,
    #[serde(default, rename = "name_c")]
    name: Option<String>,
    #[serde(default, rename = "description_c")]
    description: Option<String>,
    #[serde(default, rename = "status_c")]
    status: Option<String>,
    #[serde(default, rename = "due_date_c")]
    due_date: Option<String>,
    #[serde(default, rename = "assignee_c")]
    assignee: Option<Value>,
}

impl TaskRow {
    fn into_record(self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            display_name: self.display_name.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .map(TaskStatus::from_wire)
                .unwrap_or_default(),
            due_date: self
                .due_date
                .as_deref()
                .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()),
            assignee: self.assignee.as_ref().and_then(LookupRef::from_value),
            tags: self.tags.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    fn gateway(fake: FakeBackend) -> TaskGateway {
        TaskGateway::new(Arc::new(fake))
    }

    fn seeded() -> FakeBackend {
        let fake = FakeBackend::new();
        fake.seed(
            TABLE,
            vec![
                json!({
                    "Id": 1,
                    "Name": "Ship release",
                    "name_c": "Ship the release",
                    "description_c": "Cut and publish",
                    "status_c": "In Progress",
                    "due_date_c": "2025-04-01",
                    "assignee_c": {"Id": 3, "Name": "Dana"},
                    "Tags": "release,urgent",
                }),
                json!({
                    "Id": 2,
                    "name_c": "Write notes",
                    "status_c": "Completed",
                }),
            ],
        );
        fake
    }

    #[tokio::test]
    async fn test_get_all_maps_remote_fields() {
        let tasks = gateway(seeded()).get_all(&TaskFilters::default()).await.unwrap();

        assert_eq!(tasks.len(), 2);
        let first = &tasks[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.name, "Ship the release");
        assert_eq!(first.display_name, "Ship release");
        assert_eq!(first.status, TaskStatus::InProgress);
        assert_eq!(
            first.due_date,
            Some(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())
        );
        assert_eq!(
            first.assignee,
            Some(LookupRef {
                id: 3,
                name: "Dana".to_string()
            })
        );
        assert_eq!(first.tags, "release,urgent");

        let second = &tasks[1];
        assert_eq!(second.status, TaskStatus::Completed);
        assert!(second.due_date.is_none());
        assert!(second.assignee.is_none());
    }

    #[tokio::test]
    async fn test_status_filter_reaches_the_wire_and_filters() {
        let fake = seeded();
        let filters = TaskFilters {
            status: Some(TaskStatus::Completed),
        };

        let tasks = gateway(fake.clone()).get_all(&filters).await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 2);

        let query = fake.last_query(TABLE).unwrap();
        assert_eq!(query["where"][0]["FieldName"], "status_c");
        assert_eq!(query["where"][0]["Values"][0], "Completed");

        // The caller's filters are untouched.
        assert_eq!(filters.status, Some(TaskStatus::Completed));
    }

    #[tokio::test]
    async fn test_get_all_without_filter_omits_where() {
        let fake = seeded();
        gateway(fake.clone())
            .get_all(&TaskFilters::default())
            .await
            .unwrap();

        let query = fake.last_query(TABLE).unwrap();
        assert!(query.get("where").is_none());
    }

    #[tokio::test]
    async fn test_empty_backend_is_ok() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![]);

        let tasks = gateway(fake).get_all(&TaskFilters::default()).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let gateway = gateway(seeded());

        let task = gateway.get_by_id(1).await.unwrap();
        assert_eq!(task.name, "Ship the release");

        let error = gateway.get_by_id(42).await.unwrap_err();
        assert!(matches!(
            error,
            GatewayError::NotFound { table: "task_c", id: 42 }
        ));
    }

    #[tokio::test]
    async fn test_update_sends_only_patched_fields() {
        let fake = seeded();

        let patch = TaskPatch {
            status: Some(TaskStatus::OnHold),
            ..TaskPatch::default()
        };

        let updated = gateway(fake.clone()).update(1, &patch).await.unwrap();

        let sent = fake.last_update(TABLE).unwrap();
        let keys: Vec<&str> = sent.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"Id"));
        assert!(keys.contains(&"status_c"));

        assert_eq!(updated.status, TaskStatus::OnHold);
        // Untouched fields keep their stored values.
        assert_eq!(updated.name, "Ship the release");
        assert_eq!(updated.tags, "release,urgent");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let error = gateway(seeded())
            .update(99, &TaskPatch::default())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            GatewayError::NotFound { table: "task_c", id: 99 }
        ));
    }

    #[tokio::test]
    async fn test_create_drops_empty_optionals() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![]);

        let draft = TaskDraft {
            name: "New task".to_string(),
            ..TaskDraft::default()
        };

        assert!(draft.to_wire().get("description_c").is_none());
        assert!(draft.to_wire().get("Tags").is_none());
        // Display name falls back to the task name.
        assert_eq!(draft.to_wire()["Name"], "New task");

        let created = gateway(fake).create(&draft).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.name, "New task");
        assert_eq!(created.status, TaskStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_create_validation_failure() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![]);
        fake.fail_next_write("Name", "is required");

        let error = gateway(fake)
            .create(&TaskDraft::default())
            .await
            .unwrap_err();

        assert!(matches!(error, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let fake = seeded();
        assert!(gateway(fake.clone()).delete(1).await.unwrap());

        let error = gateway(fake).delete(1).await.unwrap_err();
        assert!(matches!(error, GatewayError::NotFound { id: 1, .. }));
    }

    #[test]
    fn test_patch_clears_due_date_with_null() {
        let patch = TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        };

        let wire = patch.to_wire(4);
        assert_eq!(wire["due_date_c"], Value::Null);
    }

    #[test]
    fn test_empty_patch_sends_only_the_id() {
        let patch = TaskPatch::default();
        assert!(patch.is_empty());

        let wire = patch.to_wire(9);
        assert_eq!(wire.as_object().unwrap().len(), 1);
        assert_eq!(wire["Id"], 9);
    }
}
