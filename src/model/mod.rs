//! Data models for cubox-sync.
//!
//! This module contains the domain types shared between the remote API,
//! the document store, and the sync engine:
//! - [`Article`] / [`Highlight`] - remote content as Cubox returns it
//! - [`Folder`] - remote folder catalogue entry
//! - [`Cursor`] - pagination resumption state
//! - [`SyncFilter`] - resolved per-run fetch filter
//! - [`DocumentDraft`] / [`BlockDraft`] - the local page projection

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Page property keys written to Logseq.
///
/// `CUBOX_ID` is the identity property: it is the sole deduplication key,
/// set once on page creation and never altered by later updates.
pub mod props {
    pub const CUBOX_ID: &str = "cubox-id";
    pub const CUBOX_URL: &str = "cubox-url";
    pub const ORIGINAL_URL: &str = "original-url";
    pub const DOMAIN: &str = "domain";
    pub const TYPE: &str = "type";
    pub const CREATED_AT: &str = "created-at";
    pub const UPDATED_AT: &str = "updated-at";
    pub const TAGS: &str = "tags";
}

/// Property map for a Logseq page.
///
/// `BTreeMap` keeps serialization order deterministic.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// A saved article ("card") as returned by the Cubox API.
///
/// Immutable once fetched within a run, except for `content` which is
/// populated lazily by a per-card fetch when the card will actually be
/// written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Fallback title extracted from the article body.
    #[serde(default)]
    pub article_title: String,
    /// Canonical link back into Cubox.
    #[serde(default)]
    pub cubox_url: String,
    /// Original source URL.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(rename = "type", default)]
    pub card_type: String,
    #[serde(default)]
    pub create_time: String,
    #[serde(default)]
    pub update_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub folder_id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}

/// A highlight (annotation) on an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Highlight {
    pub text: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub create_time: String,
}

/// A folder in the Cubox account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// Fully-qualified name for nested folders, e.g. `Reading/Tech`.
    #[serde(default)]
    pub nested_name: String,
}

/// Pagination resumption state.
///
/// Advances to the last card of each fully-consumed page and is persisted
/// across runs so already-scanned cards are never re-fetched. Monotonic;
/// rewound only by the explicit `reset` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cursor {
    pub last_card_id: Option<String>,
    pub last_card_update_time: Option<String>,
}

impl Cursor {
    /// True if no page has ever been consumed.
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.last_card_id.is_none() && self.last_card_update_time.is_none()
    }

    /// Advance to the given article, which must be the last card of a
    /// fully-processed page.
    pub fn advance_to(&mut self, article: &Article) {
        self.last_card_id = Some(article.id.clone());
        self.last_card_update_time = Some(article.update_time.clone());
    }
}

/// Resolved per-run fetch filter.
///
/// Computed once per run from the configured folder names. An empty
/// `folder_ids` list means "all folders".
#[derive(Debug, Clone, Default)]
pub struct SyncFilter {
    pub folder_ids: Vec<String>,
    pub only_annotated: bool,
}

/// One block in a page body, with nested children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDraft {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockDraft>,
}

impl BlockDraft {
    /// A block with no children.
    #[must_use]
    pub fn leaf(content: impl Into<String>) -> Self {
        Self { content: content.into(), children: Vec::new() }
    }

    /// A block with the given children.
    #[must_use]
    pub fn with_children(content: impl Into<String>, children: Vec<BlockDraft>) -> Self {
        Self { content: content.into(), children }
    }
}

/// The fully-mapped local projection of an article, built in memory
/// before any write is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDraft {
    pub title: String,
    pub properties: Properties,
    pub blocks: Vec<BlockDraft>,
}
