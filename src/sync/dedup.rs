//! Create / skip / update decision.
//!
//! Compares the remote article's update time against the `updated-at`
//! property of the existing page, as instants. The asymmetric default is
//! deliberate: when staleness cannot be proven (either timestamp missing or
//! unparseable), the page is skipped rather than overwritten.

use serde_json::Value;

use super::mapper::parse_instant;
use crate::model::{Article, props};
use crate::store::PageRef;

/// The action to take for one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// No page carries this article's `cubox-id` yet.
    Create,
    /// The page is current, or staleness cannot be proven.
    Skip,
    /// The remote article is strictly newer than the page.
    Update,
}

/// Decide what to do with `article` given the page that matched its
/// `cubox-id`, if any.
#[must_use]
pub fn decide(article: &Article, existing: Option<&PageRef>) -> SyncAction {
    let Some(page) = existing else {
        return SyncAction::Create;
    };

    let local = page
        .properties
        .get(props::UPDATED_AT)
        .and_then(Value::as_str)
        .and_then(parse_instant);
    let remote = parse_instant(&article.update_time);

    match (local, remote) {
        (Some(local), Some(remote)) if remote > local => SyncAction::Update,
        _ => SyncAction::Skip,
    }
}
