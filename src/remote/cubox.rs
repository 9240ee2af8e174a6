//! Cubox third-party API client.
//!
//! Speaks the `/c/api/third-party/` endpoints with the account API key in the
//! `Authorization` header. Page-level failures surface as [`Error::Fetch`];
//! the engine treats those as fatal while per-card content fetches are
//! recovered as record-level failures.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ArticlePage, RemoteApi};
use crate::error::{Error, Result};
use crate::model::{Article, Cursor, Folder, SyncFilter};

/// Cards requested per page.
const PAGE_SIZE: usize = 50;

/// HTTP client for the Cubox third-party API.
pub struct CuboxClient {
    client: reqwest::Client,
    base: String,
    api_key: String,
}

impl CuboxClient {
    /// Create a client for the given service domain (e.g. `cubox.pro`).
    ///
    /// Accepts a bare domain or a full `https://` URL; trailing slashes are
    /// stripped.
    pub fn new(domain: &str, api_key: &str) -> Result<Self> {
        let domain = domain.trim().trim_end_matches('/');
        if domain.is_empty() {
            return Err(Error::Config("Cubox domain must not be empty".to_string()));
        }
        if api_key.trim().is_empty() {
            return Err(Error::Config("Cubox API key must not be empty".to_string()));
        }

        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };

        Ok(Self {
            client: reqwest::Client::new(),
            base,
            api_key: api_key.trim().to_string(),
        })
    }

    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base);
        debug!(%url, "cubox api request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Cubox request to {path} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "Cubox returned HTTP {} for {path}",
                response.status()
            )));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to parse Cubox response from {path}: {e}")))?;

        if envelope.code != 200 {
            return Err(Error::Fetch(format!(
                "Cubox error {} for {path}: {}",
                envelope.code,
                envelope.message.unwrap_or_default()
            )));
        }

        envelope
            .data
            .ok_or_else(|| Error::Fetch(format!("Cubox response from {path} had no data")))
    }
}

/// Common `{code, message, data}` response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct CardFilterRequest<'a> {
    last_card_id: Option<&'a str>,
    last_card_update_time: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_filter: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_annotated: Option<bool>,
    page_size: usize,
}

#[derive(Debug, Deserialize)]
struct CardPageDto {
    #[serde(default)]
    cards: Vec<Article>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Serialize)]
struct CardContentRequest<'a> {
    card_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CardContentDto {
    #[serde(default)]
    content: Option<String>,
}

impl RemoteApi for CuboxClient {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.post("/c/api/third-party/folder/list", &serde_json::json!({}))
            .await
    }

    async fn list_articles(&self, cursor: &Cursor, filter: &SyncFilter) -> Result<ArticlePage> {
        let request = CardFilterRequest {
            last_card_id: cursor.last_card_id.as_deref(),
            last_card_update_time: cursor.last_card_update_time.as_deref(),
            folder_filter: if filter.folder_ids.is_empty() {
                None
            } else {
                Some(&filter.folder_ids)
            },
            is_annotated: filter.only_annotated.then_some(true),
            page_size: PAGE_SIZE,
        };

        let page: CardPageDto = self.post("/c/api/third-party/card/filter", &request).await?;
        Ok(ArticlePage { articles: page.cards, has_more: page.has_more })
    }

    async fn fetch_content(&self, id: &str) -> Result<Option<String>> {
        let dto: CardContentDto = self
            .post("/c/api/third-party/card/content", &CardContentRequest { card_id: id })
            .await?;
        Ok(dto.content.filter(|content| !content.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_domain_and_key() {
        assert!(matches!(CuboxClient::new("  ", "key"), Err(Error::Config(_))));
        assert!(matches!(CuboxClient::new("cubox.pro", ""), Err(Error::Config(_))));
    }

    #[test]
    fn new_normalizes_domain() {
        let bare = CuboxClient::new("cubox.pro", "key").unwrap();
        assert_eq!(bare.base, "https://cubox.pro");

        let full = CuboxClient::new("https://cubox.cc/", "key").unwrap();
        assert_eq!(full.base, "https://cubox.cc");
    }

    #[test]
    fn card_page_deserializes() {
        let json = r#"{
            "code": 200,
            "data": {
                "cards": [
                    {"id": "c1", "title": "One", "update_time": "2025-06-01T10:00:00Z"},
                    {"id": "c2", "title": "Two", "update_time": "2025-06-01T11:00:00Z"}
                ],
                "has_more": true
            }
        }"#;

        let envelope: Envelope<CardPageDto> = serde_json::from_str(json).unwrap();
        let page = envelope.data.unwrap();
        assert_eq!(page.cards.len(), 2);
        assert!(page.has_more);
        assert_eq!(page.cards[0].id, "c1");
    }

    #[test]
    fn error_envelope_carries_message() {
        let json = r#"{"code": 401, "message": "invalid api key"}"#;
        let envelope: Envelope<CardPageDto> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.code, 401);
        assert_eq!(envelope.message.as_deref(), Some("invalid api key"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn filter_request_omits_empty_folder_filter() {
        let request = CardFilterRequest {
            last_card_id: None,
            last_card_update_time: None,
            folder_filter: None,
            is_annotated: None,
            page_size: PAGE_SIZE,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("folder_filter").is_none());
        assert!(json.get("is_annotated").is_none());
        assert_eq!(json["page_size"], 50);
    }
}
