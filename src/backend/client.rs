use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{FieldError, GatewayError, Result};
use crate::config::Config;

/// A field selection entry: `{"field": {"Name": "..."}}` on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub field: FieldName,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Build a field selection list from plain names.
pub fn fields(names: &[&str]) -> Vec<FieldSpec> {
    names
        .iter()
        .map(|name| FieldSpec {
            field: FieldName {
                name: (*name).to_string(),
            },
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field_name: String,
    pub sorttype: String,
}

impl OrderBy {
    pub fn ascending(field: &str) -> Self {
        Self {
            field_name: field.to_string(),
            sorttype: "ASC".to_string(),
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field_name: field.to_string(),
            sorttype: "DESC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WhereClause {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: String,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
    #[serde(rename = "Include")]
    pub include: bool,
}

impl WhereClause {
    pub fn equal_to(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field_name: field.to_string(),
            operator: "EqualTo".to_string(),
            values: vec![value.into()],
            include: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

/// Parameters for a `fetch_records` call.
#[derive(Debug, Clone, Serialize)]
pub struct Query {
    pub fields: Vec<FieldSpec>,
    #[serde(rename = "orderBy", skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<WhereClause>>,
    #[serde(rename = "pagingInfo")]
    pub paging: PagingInfo,
}

/// Response envelope shared by every backend call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub results: Option<Vec<RecordResult>>,
}

/// Per-record outcome inside `results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<WireFieldError>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFieldError {
    pub field_label: String,
    pub message: String,
}

impl From<WireFieldError> for FieldError {
    fn from(error: WireFieldError) -> Self {
        FieldError {
            field: error.field_label,
            message: error.message,
        }
    }
}

/// The remote record backend.
///
/// Injected into the gateways so tests can substitute an in-memory fake.
/// All five operations are independent request/response pairs; none of them
/// is cancelable from the caller's side.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn fetch_records(&self, table: &str, query: &Query) -> Result<Envelope>;

    async fn get_record_by_id(&self, table: &str, id: i64, fields: &[FieldSpec])
        -> Result<Envelope>;

    async fn create_record(&self, table: &str, records: Vec<Value>) -> Result<Envelope>;

    async fn update_record(&self, table: &str, records: Vec<Value>) -> Result<Envelope>;

    async fn delete_record(&self, table: &str, record_ids: Vec<i64>) -> Result<Envelope>;
}

/// Fail on an envelope-level error (`success: false`).
pub(crate) fn require_success(envelope: &Envelope) -> Result<()> {
    if envelope.success {
        return Ok(());
    }

    Err(GatewayError::Backend(
        envelope
            .message
            .clone()
            .unwrap_or_else(|| "backend request failed".to_string()),
    ))
}

/// Extract the row array from a fetch envelope. A missing or null `data`
/// means zero matching rows, never an error.
pub(crate) fn rows_from_data(envelope: Envelope) -> Result<Vec<Value>> {
    require_success(&envelope)?;

    match envelope.data {
        Some(Value::Array(rows)) => Ok(rows),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(GatewayError::Backend(format!(
            "expected a row array, got {other}"
        ))),
    }
}

/// Extract the single record outcome from a write envelope, normalizing a
/// failed result into the error taxonomy.
pub(crate) fn single_result(
    envelope: Envelope,
    table: &'static str,
    id: Option<i64>,
) -> Result<RecordResult> {
    require_success(&envelope)?;

    let result = envelope
        .results
        .and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.remove(0))
            }
        })
        .ok_or_else(|| GatewayError::Backend("backend returned no record results".to_string()))?;

    if result.success {
        return Ok(result);
    }

    let errors = result
        .errors
        .unwrap_or_default()
        .into_iter()
        .map(FieldError::from)
        .collect();

    Err(GatewayError::from_failed_record(
        table,
        id,
        result.message,
        errors,
    ))
}

/// Production backend client speaking JSON over HTTPS.
///
/// Authenticates every request with the project id and public key from the
/// session config.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        let mut headers = header::HeaderMap::new();
        if let Ok(value) = header::HeaderValue::from_str(&config.project_id) {
            headers.insert("X-Project-Id", value);
        }
        if let Ok(value) = header::HeaderValue::from_str(&config.public_key) {
            headers.insert("X-Public-Key", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to construct HTTP client");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn table_url(&self, table: &str, suffix: &str) -> String {
        format!("{}/api/v1/tables/{}{}", self.base_url, table, suffix)
    }

    async fn read_envelope(&self, response: reqwest::Response) -> Result<Envelope> {
        let envelope = response.error_for_status()?.json::<Envelope>().await?;
        Ok(envelope)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn fetch_records(&self, table: &str, query: &Query) -> Result<Envelope> {
        let response = self
            .http
            .post(self.table_url(table, "/query"))
            .json(query)
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        fields: &[FieldSpec],
    ) -> Result<Envelope> {
        let response = self
            .http
            .post(self.table_url(table, &format!("/records/{id}")))
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn create_record(&self, table: &str, records: Vec<Value>) -> Result<Envelope> {
        let response = self
            .http
            .post(self.table_url(table, "/records"))
            .json(&serde_json::json!({ "records": records }))
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn update_record(&self, table: &str, records: Vec<Value>) -> Result<Envelope> {
        let response = self
            .http
            .patch(self.table_url(table, "/records"))
            .json(&serde_json::json!({ "records": records }))
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn delete_record(&self, table: &str, record_ids: Vec<i64>) -> Result<Envelope> {
        let response = self
            .http
            .delete(self.table_url(table, "/records"))
            .json(&serde_json::json!({ "RecordIds": record_ids }))
            .send()
            .await?;
        self.read_envelope(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_wire_shape() {
        let query = Query {
            fields: fields(&["Id", "title_c"]),
            order_by: vec![OrderBy::ascending("Id")],
            filter: Some(vec![WhereClause::equal_to("status_c", "Completed")]),
            paging: PagingInfo {
                limit: 50,
                offset: 0,
            },
        };

        let wire = serde_json::to_value(&query).unwrap();

        assert_eq!(wire["fields"][0]["field"]["Name"], "Id");
        assert_eq!(wire["orderBy"][0]["fieldName"], "Id");
        assert_eq!(wire["orderBy"][0]["sorttype"], "ASC");
        assert_eq!(wire["where"][0]["FieldName"], "status_c");
        assert_eq!(wire["where"][0]["Operator"], "EqualTo");
        assert_eq!(wire["where"][0]["Values"][0], "Completed");
        assert_eq!(wire["where"][0]["Include"], true);
        assert_eq!(wire["pagingInfo"]["limit"], 50);
    }

    #[test]
    fn test_filter_omitted_when_absent() {
        let query = Query {
            fields: fields(&["Id"]),
            order_by: vec![OrderBy::descending("CreatedOn")],
            filter: None,
            paging: PagingInfo {
                limit: 100,
                offset: 0,
            },
        };

        let wire = serde_json::to_value(&query).unwrap();
        assert!(wire.get("where").is_none());
    }

    #[test]
    fn test_rows_from_missing_data_is_empty() {
        let envelope = Envelope {
            success: true,
            ..Envelope::default()
        };

        assert!(rows_from_data(envelope).unwrap().is_empty());
    }

    #[test]
    fn test_rows_from_failed_envelope() {
        let envelope = Envelope {
            success: false,
            message: Some("table unavailable".to_string()),
            ..Envelope::default()
        };

        match rows_from_data(envelope) {
            Err(GatewayError::Backend(message)) => assert_eq!(message, "table unavailable"),
            other => panic!("expected Backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_single_result_normalizes_field_errors() {
        let envelope = Envelope {
            success: true,
            results: Some(vec![RecordResult {
                success: false,
                errors: Some(vec![WireFieldError {
                    field_label: "Name".to_string(),
                    message: "is required".to_string(),
                }]),
                ..RecordResult::default()
            }]),
            ..Envelope::default()
        };

        match single_result(envelope, "task_c", None) {
            Err(GatewayError::Validation(errors)) => {
                assert_eq!(errors.to_string(), "Name: is required");
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_single_result_without_results_is_backend_error() {
        let envelope = Envelope {
            success: true,
            ..Envelope::default()
        };

        assert!(matches!(
            single_result(envelope, "task_c", None),
            Err(GatewayError::Backend(_))
        ));
    }
}
