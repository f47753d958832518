//! In-memory `BackendApi` for tests.
//!
//! Holds tables of JSON rows behind a mutex, assigns ids on create, and can
//! be scripted to reject the next write with a field error. Queries and
//! update payloads are recorded so tests can assert on what went over the
//! wire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::client::{BackendApi, Envelope, FieldSpec, Query, RecordResult, WireFieldError};
use super::error::Result;

#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    next_id: i64,
    fail_next_write: Option<WireFieldError>,
    last_query: HashMap<String, Value>,
    last_update: HashMap<String, Value>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a table's rows. Each row is a JSON object with an `Id`.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id = rows
            .iter()
            .filter_map(|row| row.get("Id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        inner.tables.insert(table.to_string(), rows);
    }

    /// Reject the next create/update with a single field error.
    pub fn fail_next_write(&self, field: &str, message: &str) {
        self.inner.lock().unwrap().fail_next_write = Some(WireFieldError {
            field_label: field.to_string(),
            message: message.to_string(),
        });
    }

    /// The query most recently sent to `fetch_records` for a table.
    pub fn last_query(&self, table: &str) -> Option<Value> {
        self.inner.lock().unwrap().last_query.get(table).cloned()
    }

    /// The record payload most recently sent to `update_record` for a table.
    pub fn last_update(&self, table: &str) -> Option<Value> {
        self.inner.lock().unwrap().last_update.get(table).cloned()
    }

    fn ok_result(row: Value) -> RecordResult {
        RecordResult {
            success: true,
            data: Some(row),
            message: None,
            errors: None,
        }
    }

    fn failed_result(message: &str) -> RecordResult {
        RecordResult {
            success: false,
            data: None,
            message: Some(message.to_string()),
            errors: None,
        }
    }
}

fn matches_filter(row: &Value, query: &Query) -> bool {
    let Some(clauses) = &query.filter else {
        return true;
    };

    clauses.iter().all(|clause| {
        if clause.operator != "EqualTo" {
            return true;
        }
        let field_value = row.get(&clause.field_name).cloned().unwrap_or(Value::Null);
        clause.values.first() == Some(&field_value)
    })
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn fetch_records(&self, table: &str, query: &Query) -> Result<Envelope> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .last_query
            .insert(table.to_string(), serde_json::to_value(query)?);

        let rows: Vec<Value> = inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filter(row, query))
                    .take(query.paging.limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Envelope {
            success: true,
            data: Some(Value::Array(rows)),
            ..Envelope::default()
        })
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        _fields: &[FieldSpec],
    ) -> Result<Envelope> {
        let inner = self.inner.lock().unwrap();
        let row = inner
            .tables
            .get(table)
            .and_then(|rows| {
                rows.iter()
                    .find(|row| row.get("Id").and_then(Value::as_i64) == Some(id))
            })
            .cloned();

        Ok(Envelope {
            success: true,
            data: row,
            ..Envelope::default()
        })
    }

    async fn create_record(&self, table: &str, records: Vec<Value>) -> Result<Envelope> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_write.take() {
            return Ok(Envelope {
                success: true,
                results: Some(vec![RecordResult {
                    success: false,
                    errors: Some(vec![error]),
                    ..RecordResult::default()
                }]),
                ..Envelope::default()
            });
        }

        let mut results = Vec::new();
        for mut record in records {
            inner.next_id += 1;
            let id = inner.next_id;
            record
                .as_object_mut()
                .expect("create payloads are objects")
                .insert("Id".to_string(), json!(id));
            inner
                .tables
                .entry(table.to_string())
                .or_default()
                .push(record.clone());
            results.push(Self::ok_result(record));
        }

        Ok(Envelope {
            success: true,
            results: Some(results),
            ..Envelope::default()
        })
    }

    async fn update_record(&self, table: &str, records: Vec<Value>) -> Result<Envelope> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_write.take() {
            return Ok(Envelope {
                success: true,
                results: Some(vec![RecordResult {
                    success: false,
                    errors: Some(vec![error]),
                    ..RecordResult::default()
                }]),
                ..Envelope::default()
            });
        }

        let mut results = Vec::new();
        for record in records {
            inner
                .last_update
                .insert(table.to_string(), record.clone());

            let id = record.get("Id").and_then(Value::as_i64).unwrap_or(0);
            let updated = inner.tables.get_mut(table).and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("Id").and_then(Value::as_i64) == Some(id))
            });

            match updated {
                Some(row) => {
                    let target = row.as_object_mut().expect("seeded rows are objects");
                    for (key, value) in record.as_object().expect("update payloads are objects") {
                        target.insert(key.clone(), value.clone());
                    }
                    results.push(Self::ok_result(row.clone()));
                }
                None => {
                    results.push(Self::failed_result(&format!(
                        "Record with Id {id} not found"
                    )));
                }
            }
        }

        Ok(Envelope {
            success: true,
            results: Some(results),
            ..Envelope::default()
        })
    }

    async fn delete_record(&self, table: &str, record_ids: Vec<i64>) -> Result<Envelope> {
        let mut inner = self.inner.lock().unwrap();

        let mut results = Vec::new();
        for id in record_ids {
            let removed = inner
                .tables
                .get_mut(table)
                .map(|rows| {
                    let before = rows.len();
                    rows.retain(|row| row.get("Id").and_then(Value::as_i64) != Some(id));
                    rows.len() < before
                })
                .unwrap_or(false);

            if removed {
                results.push(Self::ok_result(Value::Null));
            } else {
                results.push(Self::failed_result(&format!(
                    "Record with Id {id} not found"
                )));
            }
        }

        Ok(Envelope {
            success: true,
            results: Some(results),
            ..Envelope::default()
        })
    }
}
