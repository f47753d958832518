use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::client::{
    fields, require_success, rows_from_data, single_result, BackendApi, OrderBy, PagingInfo, Query,
};
use super::error::{GatewayError, Result};
use crate::state::data::ImageRecord;

const TABLE: &str = "image_c";
const PAGE_LIMIT: u32 = 50;

const FIELDS: [&str; 9] = [
    "Id",
    "Name",
    "Tags",
    "url_c",
    "thumbnail_url_c",
    "title_c",
    "description_c",
    "width_c",
    "height_c",
];

const DEFAULT_WIDTH: u32 = 1920;
const DEFAULT_HEIGHT: u32 = 1080;

/// Gateway for the image table.
///
/// Translates between the flat `ImageRecord` shape and the remote schema
/// and normalizes backend failures into `GatewayError`.
#[derive(Clone)]
pub struct ImageGateway {
    api: Arc<dyn BackendApi>,
}

impl ImageGateway {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }

    /// Fetch the full ordered slideshow sequence (by Id ascending).
    /// Zero rows is an empty sequence, not an error.
    pub async fn get_all(&self) -> Result<Vec<ImageRecord>> {
        let query = Query {
            fields: fields(&FIELDS),
            order_by: vec![OrderBy::ascending("Id")],
            filter: None,
            paging: PagingInfo {
                limit: PAGE_LIMIT,
                offset: 0,
            },
        };

        let envelope = self.api.fetch_records(TABLE, &query).await?;
        let rows = rows_from_data(envelope)?;

        let mut images = Vec::with_capacity(rows.len());
        for row in rows {
            let row: ImageRow = serde_json::from_value(row)?;
            images.push(row.into_record());
        }

        Ok(images)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ImageRecord> {
        let envelope = self
            .api
            .get_record_by_id(TABLE, id, &fields(&FIELDS))
            .await?;
        require_success(&envelope)?;

        let row = match envelope.data {
            Some(Value::Null) | None => return Err(GatewayError::NotFound { table: TABLE, id }),
            Some(row) => row,
        };

        let row: ImageRow = serde_json::from_value(row)?;
        Ok(row.into_record())
    }

    /// Persist a new image and return it with its assigned id.
    pub async fn create(&self, draft: &ImageDraft) -> Result<ImageRecord> {
        let envelope = self.api.create_record(TABLE, vec![draft.to_wire()]).await?;
        let result = single_result(envelope, TABLE, None)?;
        record_from_result(result.data)
    }

    /// Update only the fields present in the patch.
    pub async fn update(&self, id: i64, patch: &ImagePatch) -> Result<ImageRecord> {
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

fn record_from_result(data: Option<Value>) -> Result<ImageRecord> {
    let row = data
        .ok_or_else(|| GatewayError::Backend("backend returned no record data".to_string()))?;
    let row: ImageRow = serde_json::from_value(row)?;
    Ok(row.into_record())
}

/// Fields for a new image.
#[derive(Debug, Clone, Default)]
pub struct ImageDraft {
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub title: String,
    pub description: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub tags: String,
}

impl ImageDraft {
    fn to_wire(&self) -> Value {
        let name = if self.title.is_empty() {
            "New Image"
        } else {
            &self.title
        };

        json!({
            "Name": name,
            "Tags": self.tags,
            "url_c": self.url,
            "thumbnail_url_c": self.thumbnail_url.clone().unwrap_or_else(|| self.url.clone()),
            "title_c": self.title,
            "description_c": self.description,
            "width_c": self.width.unwrap_or(DEFAULT_WIDTH),
            "height_c": self.height.unwrap_or(DEFAULT_HEIGHT),
        })
    }
}

/// Partial update for an image; only set fields reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePatch {
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub tags: Option<String>,
}

impl ImagePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn to_wire(&self, id: i64) -> Value {
        let mut record = Map::new();
        record.insert("Id".to_string(), json!(id));

        if let Some(url) = &self.url {
            record.insert("url_c".to_string(), json!(url));
        }
        if let Some(thumbnail_url) = &self.thumbnail_url {
            record.insert("thumbnail_url_c".to_string(), json!(thumbnail_url));
        }
        if let Some(title) = &self.title {
            record.insert("title_c".to_string(), json!(title));
        }
        if let Some(description) = &self.description {
            record.insert("description_c".to_string(), json!(description));
        }
        if let Some(width) = self.width {
            record.insert("width_c".to_string(), json!(width));
        }
        if let Some(height) = self.height {
            record.insert("height_c".to_string(), json!(height));
        }
        if let Some(tags) = &self.tags {
            record.insert("Tags".to_string(), json!(tags));
        }

        Value::Object(record)
    }
}

/// Remote row shape for the image table.
#[derive(Debug, Default, Deserialize)]
struct ImageRow {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(default, rename = "url_c")]
    url: Option<String>,
    #[serde(default, rename = "thumbnail_url_c")]
    thumbnail_url: Option<String>,
    #[serde(default, rename = "title_c")]
    title: Option<String>,
    #[serde(default, rename = "description_c")]
    description: Option<String>,
    #[serde(default, rename = "width_c")]
    width: Option<u32>,
    #[serde(default, rename = "height_c")]
    height: Option<u32>,
}

impl ImageRow {
    fn into_record(self) -> ImageRecord {
        let url = self.url.unwrap_or_default();
        // An empty thumbnail field falls back to the display URL.
        let thumbnail_url = match self.thumbnail_url {
            Some(thumb) if !thumb.is_empty() => thumb,
            _ => url.clone(),
        };

        ImageRecord {
            id: self.id,
            url,
            thumbnail_url,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    fn gateway(fake: FakeBackend) -> ImageGateway {
        ImageGateway::new(Arc::new(fake))
    }

    #[tokio::test]
    async fn test_get_all_maps_remote_fields() {
        let fake = FakeBackend::new();
        fake.seed(
            TABLE,
            vec![json!({
                "Id": 1,
                "url_c": "https://img.example/1.jpg",
                "thumbnail_url_c": "https://img.example/1-thumb.jpg",
                "title_c": "Dawn",
                "description_c": "First light",
                "width_c": 800,
                "height_c": 600,
            })],
        );

        let images = gateway(fake).get_all().await.unwrap();

        assert_eq!(
            images,
            vec![ImageRecord {
                id: 1,
                url: "https://img.example/1.jpg".to_string(),
                thumbnail_url: "https://img.example/1-thumb.jpg".to_string(),
                title: "Dawn".to_string(),
                description: "First light".to_string(),
                width: 800,
                height: 600,
            }]
        );
    }

    #[tokio::test]
    async fn test_defaults_and_thumbnail_fallback() {
        let fake = FakeBackend::new();
        fake.seed(
            TABLE,
            vec![json!({
                "Id": 2,
                "url_c": "https://img.example/2.jpg",
                "thumbnail_url_c": "",
            })],
        );

        let images = gateway(fake).get_all().await.unwrap();
        let image = &images[0];

        assert_eq!(image.thumbnail_url, image.url);
        assert_eq!(image.width, DEFAULT_WIDTH);
        assert_eq!(image.height, DEFAULT_HEIGHT);
        assert!(image.title.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_empty_backend_is_ok() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![]);

        let images = gateway(fake).get_all().await.unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![]);

        let error = gateway(fake).get_by_id(9).await.unwrap_err();
        assert!(matches!(
            error,
            GatewayError::NotFound { table: "image_c", id: 9 }
        ));
    }

    #[tokio::test]
    async fn test_update_sends_only_patched_fields() {
        let fake = FakeBackend::new();
        fake.seed(
            TABLE,
            vec![json!({
                "Id": 3,
                "url_c": "https://img.example/3.jpg",
                "title_c": "Old title",
                "description_c": "Unchanged",
            })],
        );

        let patch = ImagePatch {
            title: Some("New title".to_string()),
            ..ImagePatch::default()
        };

        let updated = gateway(fake.clone()).update(3, &patch).await.unwrap();

        let sent = fake.last_update(TABLE).unwrap();
        let keys: Vec<&str> = sent.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"Id"));
        assert!(keys.contains(&"title_c"));

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.description, "Unchanged");
    }

    #[tokio::test]
    async fn test_create_returns_assigned_id() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![]);

        let draft = ImageDraft {
            url: "https://img.example/new.jpg".to_string(),
            title: "Fresh".to_string(),
            ..ImageDraft::default()
        };

        let created = gateway(fake).create(&draft).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.title, "Fresh");
        assert_eq!(created.thumbnail_url, created.url);
    }

    #[tokio::test]
    async fn test_create_validation_failure() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![]);
        fake.fail_next_write("Url", "must be an absolute URL");

        let error = gateway(fake)
            .create(&ImageDraft::default())
            .await
            .unwrap_err();

        match error {
            GatewayError::Validation(errors) => {
                assert_eq!(errors.to_string(), "Url: must be an absolute URL");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_patch_sends_only_the_id() {
        let patch = ImagePatch::default();
        assert!(patch.is_empty());

        let wire = patch.to_wire(8);
        assert_eq!(wire.as_object().unwrap().len(), 1);
        assert_eq!(wire["Id"], 8);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![]);

        let error = gateway(fake).delete(11).await.unwrap_err();
        assert!(matches!(error, GatewayError::NotFound { id: 11, .. }));
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let fake = FakeBackend::new();
        fake.seed(TABLE, vec![json!({"Id": 5, "url_c": "https://img.example/5.jpg"})]);

        assert!(gateway(fake).delete(5).await.unwrap());
    }
}
