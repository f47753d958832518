use std::fmt;

use thiserror::Error;

/// A single field rejected by the backend, as reported in a per-record
/// result (`errors: [{fieldLabel, message}]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All rejected fields for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors surfaced by the backend gateways.
///
/// Every heterogeneous failure shape the backend can produce is normalized
/// into one of these variants; screens render them with `to_string()`.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The requested identifier does not exist in the given table.
    #[error("{table} record {id} not found")]
    NotFound { table: &'static str, id: i64 },

    /// The backend rejected one or more fields.
    #[error("{0}")]
    Validation(FieldErrors),

    /// The backend reported `success: false` without field detail.
    #[error("backend error: {0}")]
    Backend(String),

    /// The request itself failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response payload could not be decoded.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Normalize a failed per-record result into an error.
    ///
    /// Field errors always win over the free-form message. A message naming
    /// a missing record maps to `NotFound` when the caller addressed a
    /// specific identifier; everything else stays a plain backend error.
    pub fn from_failed_record(
        table: &'static str,
        id: Option<i64>,
        message: Option<String>,
        errors: Vec<FieldError>,
    ) -> Self {
        if !errors.is_empty() {
            return GatewayError::Validation(FieldErrors(errors));
        }

        let message = message.unwrap_or_else(|| "record operation failed".to_string());

        if let Some(id) = id {
            if message.to_lowercase().contains("not found") {
                return GatewayError::NotFound { table, id };
            }
        }

        GatewayError::Backend(message)
    }
}
