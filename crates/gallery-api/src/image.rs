//! Image records as exchanged with the gallery service
//!
//! Field names follow the service's JSON (`_id`, `imageKey`); Rust names are
//! snake_case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier of an image, unique within a collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "_id")]
    pub id: ImageId,

    /// Display position. Not necessarily contiguous; ties keep store order.
    pub order: i64,

    /// Absent titles never match a search
    #[serde(default)]
    pub title: Option<String>,

    #[serde(rename = "imageKey", default)]
    pub storage_key: String,

    #[serde(default)]
    pub url: String,
}

impl ImageRecord {
    pub fn new(id: impl Into<ImageId>, order: i64, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order,
            title: Some(title.into()),
            storage_key: String::new(),
            url: String::new(),
        }
    }

    /// The `(id, order)` pair sent when persisting a reorder
    pub fn to_order(&self) -> ImageOrder {
        ImageOrder {
            id: self.id.clone(),
            order: self.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOrder {
    #[serde(rename = "_id")]
    pub id: ImageId,
    pub order: i64,
}

/// Body of `GET /images`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListImagesResponse {
    pub images: Vec<ImageRecord>,
}

/// Body of `PUT /images`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub images: Vec<ImageOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_service_field_names() {
        let json = r#"{
            "_id": "65a1",
            "order": 3,
            "title": "Sunset",
            "imageKey": "uploads/65a1.png",
            "url": "https://cdn.example.com/65a1.png"
        }"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, ImageId::new("65a1"));
        assert_eq!(record.order, 3);
        assert_eq!(record.title.as_deref(), Some("Sunset"));
        assert_eq!(record.storage_key, "uploads/65a1.png");
    }

    #[test]
    fn test_missing_title_is_none() {
        let record: ImageRecord =
            serde_json::from_str(r#"{"_id": "x", "order": 1, "imageKey": "k", "url": "u"}"#)
                .unwrap();
        assert_eq!(record.title, None);
    }

    #[test]
    fn test_reorder_request_shape() {
        let request = ReorderRequest {
            images: vec![ImageRecord::new("a", 1, "A").to_order()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "images": [{ "_id": "a", "order": 1 }] }));
    }
}
