//! Logseq HTTP server client.
//!
//! Talks to the Logseq desktop app's local HTTP API: every call is a
//! `POST /api` with a `{"method": "logseq.Editor.…", "args": […]}` envelope
//! and a bearer token. Responses are loosely-shaped JSON, so page and block
//! parsing tolerates both `block/…` keyword keys and camelCase keys.

use serde_json::{Value, json};
use tracing::debug;

use super::{BlockNode, DocumentStore, InsertOpts, PageRef};
use crate::error::{Error, Result};
use crate::model::{BlockDraft, Properties};

/// Client for the Logseq local HTTP server.
pub struct LogseqClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl LogseqClient {
    /// Create a client for the given endpoint (e.g. `http://127.0.0.1:12315`).
    pub fn new(endpoint: &str, token: &str) -> Result<Self> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(Error::Config("Logseq endpoint must not be empty".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            token: token.trim().to_string(),
        })
    }

    async fn invoke(&self, method: &str, args: Value) -> Result<Value> {
        debug!(method, "logseq api call");

        let response = self
            .client
            .post(format!("{}/api", self.endpoint))
            .bearer_auth(&self.token)
            .json(&json!({ "method": method, "args": args }))
            .send()
            .await
            .map_err(|e| Error::Store(format!("Logseq request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Store(format!(
                "Logseq returned HTTP {} for {method}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Store(format!("Failed to parse Logseq response for {method}: {e}")))
    }
}

/// Read a string under any of the given keys.
fn string_key(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(key))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Parse a page object from Logseq's loosely-shaped JSON.
fn parse_page(value: &Value) -> Option<PageRef> {
    let uuid = string_key(value, &["uuid", "block/uuid"])?;
    let name = string_key(value, &["originalName", "original-name", "block/original-name", "name"])?;

    let properties = value
        .get("properties")
        .or_else(|| value.get("block/properties"))
        .and_then(Value::as_object)
        .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Properties>())
        .unwrap_or_default();

    Some(PageRef { uuid, name, properties })
}

/// Parse a block object, skipping property drawers and other non-blocks.
fn parse_block(value: &Value) -> Option<BlockNode> {
    let uuid = string_key(value, &["uuid", "block/uuid"])?;
    let content = string_key(value, &["content", "block/content"]).unwrap_or_default();
    Some(BlockNode { uuid, content })
}

/// Escape a value for embedding in a datascript query string.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl DocumentStore for LogseqClient {
    async fn find_by_property(&self, key: &str, value: &str) -> Result<Vec<PageRef>> {
        let query = format!(
            "[:find (pull ?p [*]) :where [?p :block/properties ?props] \
             [(get ?props :{key}) ?v] [(= ?v \"{}\")]]",
            escape_query_value(value)
        );

        let result = self.invoke("logseq.DB.datascriptQuery", json!([query])).await?;
        let rows = result.as_array().cloned().unwrap_or_default();

        Ok(rows
            .iter()
            .filter_map(|row| row.as_array().and_then(|r| r.first()))
            .filter_map(parse_page)
            .collect())
    }

    async fn get_page(&self, name: &str) -> Result<Option<PageRef>> {
        let result = self.invoke("logseq.Editor.getPage", json!([name])).await?;
        Ok(parse_page(&result))
    }

    async fn create_page(&self, title: &str, properties: &Properties) -> Result<PageRef> {
        let result = self
            .invoke(
                "logseq.Editor.createPage",
                json!([title, properties, { "createFirstBlock": false, "redirect": false }]),
            )
            .await?;

        parse_page(&result)
            .ok_or_else(|| Error::Store(format!("Logseq did not return a page for {title}")))
    }

    async fn upsert_property(&self, page_uuid: &str, key: &str, value: &Value) -> Result<()> {
        self.invoke(
            "logseq.Editor.upsertBlockProperty",
            json!([page_uuid, key, value]),
        )
        .await?;
        Ok(())
    }

    async fn page_blocks(&self, name: &str) -> Result<Vec<BlockNode>> {
        let result = self.invoke("logseq.Editor.getPageBlocksTree", json!([name])).await?;
        let blocks = result.as_array().cloned().unwrap_or_default();
        Ok(blocks.iter().filter_map(parse_block).collect())
    }

    async fn remove_block(&self, uuid: &str) -> Result<()> {
        self.invoke("logseq.Editor.removeBlock", json!([uuid])).await?;
        Ok(())
    }

    async fn insert_block(&self, target: &str, content: &str, opts: InsertOpts) -> Result<BlockNode> {
        let result = self
            .invoke(
                "logseq.Editor.insertBlock",
                json!([target, content, {
                    "before": opts.before,
                    "sibling": opts.sibling,
                    "isPageBlock": opts.is_page_block,
                }]),
            )
            .await?;

        parse_block(&result)
            .ok_or_else(|| Error::Store(format!("Logseq did not return a block for {target}")))
    }

    async fn insert_batch(&self, parent_uuid: &str, blocks: &[BlockDraft], sibling: bool) -> Result<()> {
        self.invoke(
            "logseq.Editor.insertBatchBlock",
            json!([parent_uuid, blocks, { "sibling": sibling }]),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_endpoint() {
        assert!(matches!(LogseqClient::new("  ", "token"), Err(Error::Config(_))));
    }

    #[test]
    fn new_trims_trailing_slash() {
        let client = LogseqClient::new("http://127.0.0.1:12315/", "t").unwrap();
        assert_eq!(client.endpoint, "http://127.0.0.1:12315");
    }

    #[test]
    fn parse_page_handles_camel_case_and_keyword_keys() {
        let camel = json!({
            "uuid": "u1",
            "originalName": "My Page",
            "properties": { "cubox-id": "c1" }
        });
        let page = parse_page(&camel).unwrap();
        assert_eq!(page.name, "My Page");
        assert_eq!(page.properties["cubox-id"], "c1");

        let keyword = json!({
            "block/uuid": "u2",
            "block/original-name": "Other",
        });
        let page = parse_page(&keyword).unwrap();
        assert_eq!(page.uuid, "u2");
        assert!(page.properties.is_empty());
    }

    #[test]
    fn parse_page_rejects_non_pages() {
        assert!(parse_page(&Value::Null).is_none());
        assert!(parse_page(&json!({ "content": "not a page" })).is_none());
    }

    #[test]
    fn escape_query_value_escapes_quotes() {
        assert_eq!(escape_query_value(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_query_value(r"a\b"), r"a\\b");
    }
}
