//! Article-to-page mapping.
//!
//! Pure transforms from a Cubox [`Article`] to the local page projection:
//! title generation, property generation, and the block tree. Creation and
//! update share one mapping path ([`map_document`]); the update path passes
//! the existing page's identity so `cubox-id` survives body replacement.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::model::{Article, BlockDraft, DocumentDraft, Highlight, Properties, props};

/// Placeholder title when an article has none.
pub const UNTITLED: &str = "Untitled";

/// Maximum page title length, in characters.
const TITLE_MAX_CHARS: usize = 100;

/// Characters stripped from titles because they break page paths.
const FORBIDDEN_TITLE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Parse a timestamp in any of the shapes this tool reads back:
/// RFC 3339 from the Cubox API, or the `YYYY-MM-DD HH:MM` form this tool
/// itself writes into page properties.
pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

/// Format a timestamp as `YYYY-MM-DD HH:MM` (UTC).
///
/// Empty input stays empty; an unparseable timestamp is passed through
/// verbatim rather than dropped.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    parse_instant(raw).map_or_else(|| raw.to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

/// Derive the page title for an article.
///
/// Prefers the primary title, falls back to the extracted article title,
/// then to [`UNTITLED`]. Path-breaking characters are stripped (not
/// substituted), whitespace is collapsed, and the result is truncated to
/// 100 characters. Lossy by design; identity lives in `cubox-id`, not the
/// title.
#[must_use]
pub fn map_title(article: &Article) -> String {
    let raw = if !article.title.trim().is_empty() {
        article.title.as_str()
    } else if !article.article_title.trim().is_empty() {
        article.article_title.as_str()
    } else {
        UNTITLED
    };

    let stripped: String = raw.chars().filter(|c| !FORBIDDEN_TITLE_CHARS.contains(c)).collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(TITLE_MAX_CHARS).collect();

    if truncated.is_empty() { UNTITLED.to_string() } else { truncated }
}

/// Build the page property map for an article.
///
/// `identity_override` carries the existing page's `cubox-id` on the update
/// path so identity is preserved; the create path uses the article's own id.
/// The anchor page's name is appended to the tag list if absent.
#[must_use]
pub fn map_properties(
    article: &Article,
    anchor_tag: &str,
    identity_override: Option<&str>,
) -> Properties {
    let mut properties = Properties::new();
    properties.insert(
        props::CUBOX_ID.to_string(),
        Value::String(identity_override.unwrap_or(&article.id).to_string()),
    );
    properties.insert(props::CUBOX_URL.to_string(), Value::String(article.cubox_url.clone()));
    properties.insert(props::ORIGINAL_URL.to_string(), Value::String(article.url.clone()));
    properties.insert(props::DOMAIN.to_string(), Value::String(article.domain.clone()));
    properties.insert(props::TYPE.to_string(), Value::String(article.card_type.clone()));
    properties.insert(
        props::CREATED_AT.to_string(),
        Value::String(format_timestamp(&article.create_time)),
    );
    properties.insert(
        props::UPDATED_AT.to_string(),
        Value::String(format_timestamp(&article.update_time)),
    );

    let mut tags = article.tags.clone();
    if !tags.iter().any(|tag| tag == anchor_tag) {
        tags.push(anchor_tag.to_string());
    }
    properties.insert(
        props::TAGS.to_string(),
        Value::Array(tags.into_iter().map(Value::String).collect()),
    );

    properties
}

/// Build the block tree for an article.
///
/// A `## Content` section wrapping the body as a single child, then a
/// `## Highlights` section with one child per highlight. Absent sections
/// are omitted entirely, never emitted empty.
#[must_use]
pub fn map_blocks(article: &Article) -> Vec<BlockDraft> {
    let mut blocks = Vec::new();

    if let Some(content) = article.content.as_deref().filter(|c| !c.is_empty()) {
        blocks.push(BlockDraft::with_children("## Content", vec![BlockDraft::leaf(content)]));
    }

    if !article.highlights.is_empty() {
        let children = article.highlights.iter().map(highlight_block).collect();
        blocks.push(BlockDraft::with_children("## Highlights", children));
    }

    blocks
}

/// Render one highlight: quoted text, optional note, optional image,
/// trailing creation caption.
fn highlight_block(highlight: &Highlight) -> BlockDraft {
    let mut content = format!("> {}", highlight.text);

    if let Some(note) = highlight.note.as_deref().filter(|n| !n.is_empty()) {
        content.push_str(&format!("\n\n**Note:** {note}"));
    }

    if let Some(image_url) = highlight.image_url.as_deref().filter(|u| !u.is_empty()) {
        content.push_str(&format!("\n\n![]({image_url})"));
    }

    content.push_str(&format!("\n\n*Created: {}*", format_timestamp(&highlight.create_time)));

    BlockDraft::leaf(content)
}

/// Map an article to its full page projection.
#[must_use]
pub fn map_document(
    article: &Article,
    anchor_tag: &str,
    identity_override: Option<&str>,
) -> DocumentDraft {
    DocumentDraft {
        title: map_title(article),
        properties: map_properties(article, anchor_tag, identity_override),
        blocks: map_blocks(article),
    }
}
