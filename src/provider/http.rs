//! HTTP Image Provider
//!
//! Fetches image metadata from the remote image-hosting API with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ImageProvider, ImageRecord};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Accepted response shapes: a bare array, or an object wrapping `resources`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FilesPayload {
    List(Vec<ImageRecord>),
    Resources { resources: Vec<ImageRecord> },
}

impl FilesPayload {
    fn into_records(self) -> Vec<ImageRecord> {
        match self {
            FilesPayload::List(records) => records,
            FilesPayload::Resources { resources } => resources,
        }
    }
}

/// Image provider backed by the remote `/files` listing endpoint.
pub struct HttpImageProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpImageProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("gallery-cache/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.image_api_url.clone(),
            config.image_api_key.clone(),
            Duration::from_secs(config.image_api_timeout),
        )
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.base_url)
    }
}

#[async_trait]
impl ImageProvider for HttpImageProvider {
    async fn fetch_by_tag(&self, tag: &str, limit: usize) -> Result<Vec<ImageRecord>> {
        let limit = limit.to_string();
        let mut request = self
            .client
            .get(self.files_url())
            .query(&[("tags", tag), ("limit", limit.as_str())]);

        if let Some(key) = &self.api_key {
            request = request.basic_auth(key, None::<&str>);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Provider(format!(
                "Image API returned HTTP {} for tag '{}'",
                status, tag
            )));
        }

        let bytes = response.bytes().await?;
        let records = parse_files_payload(&bytes)?;
        debug!("Image API returned {} records for tag '{}'", records.len(), tag);
        Ok(records)
    }
}

fn parse_files_payload(bytes: &[u8]) -> Result<Vec<ImageRecord>> {
    serde_json::from_slice::<FilesPayload>(bytes)
        .map(FilesPayload::into_records)
        .map_err(|e| CacheError::Provider(format!("Malformed image API payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let body = br#"[
            {"fileId": "a1", "width": 1200, "height": 800, "url": "https://img/a1.jpg"},
            {"fileId": "b2", "width": 640, "height": 480, "size": 20480}
        ]"#;

        let records = parse_files_payload(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a1");
        assert_eq!(records[0].url.as_deref(), Some("https://img/a1.jpg"));
        assert_eq!(records[1].extra.get("size"), Some(&serde_json::json!(20480)));
    }

    #[test]
    fn test_parse_resources_object() {
        let body = br#"{"resources": [{"public_id": "street/1", "width": 10, "height": 20}]}"#;

        let records = parse_files_payload(body).unwrap();
        assert_eq!(records, vec![ImageRecord::new("street/1", 10, 20)]);
    }

    #[test]
    fn test_parse_malformed_payload() {
        let result = parse_files_payload(br#"{"message": "rate limited"}"#);
        assert!(matches!(result, Err(CacheError::Provider(_))));

        let result = parse_files_payload(b"<html>");
        assert!(matches!(result, Err(CacheError::Provider(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = HttpImageProvider::new(
            "https://api.example.test/v1/",
            None,
            Duration::from_secs(5),
        );
        assert_eq!(provider.files_url(), "https://api.example.test/v1/files");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_error() {
        let provider =
            HttpImageProvider::new("http://127.0.0.1:9", None, Duration::from_millis(500));

        let result = provider.fetch_by_tag("street", 10).await;
        assert!(matches!(result, Err(CacheError::Http(_))));
    }
}
