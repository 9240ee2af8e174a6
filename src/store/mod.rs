//! Local document store.
//!
//! [`DocumentStore`] is the abstract contract over the host's page/block
//! primitives; the sync engine is pure orchestration logic over it.
//! [`logseq::LogseqClient`] is the production implementation over the Logseq
//! local HTTP server API.

mod logseq;

pub use logseq::LogseqClient;

use std::future::Future;

use crate::error::Result;
use crate::model::{BlockDraft, Properties};

/// A page handle with its properties as last read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRef {
    pub uuid: String,
    pub name: String,
    pub properties: Properties,
}

/// A top-level block handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub uuid: String,
    pub content: String,
}

/// Placement options for [`DocumentStore::insert_block`].
///
/// When the target is a page name, `before` chooses between prepending and
/// appending at page level. When the target is a block uuid, `sibling`
/// selects sibling vs child insertion and `before` chooses first vs last
/// position among the target's children (or before/after the target itself
/// for siblings).
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertOpts {
    pub before: bool,
    pub sibling: bool,
    pub is_page_block: bool,
}

/// Host document storage contract.
pub trait DocumentStore: Send + Sync {
    /// All pages whose properties contain `key = value`.
    ///
    /// Returns every match so the caller can enforce the single-identity
    /// invariant instead of silently picking one.
    fn find_by_property(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<PageRef>>> + Send;

    /// Look up a page by name.
    fn get_page(&self, name: &str) -> impl Future<Output = Result<Option<PageRef>>> + Send;

    /// Create a page with the given properties and no body.
    fn create_page(
        &self,
        title: &str,
        properties: &Properties,
    ) -> impl Future<Output = Result<PageRef>> + Send;

    /// Set one property on a page, replacing any previous value.
    fn upsert_property(
        &self,
        page_uuid: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Top-level blocks of a page, in document order.
    fn page_blocks(&self, name: &str) -> impl Future<Output = Result<Vec<BlockNode>>> + Send;

    /// Remove a block (and its children).
    fn remove_block(&self, uuid: &str) -> impl Future<Output = Result<()>> + Send;

    /// Insert a single block relative to a page name or block uuid.
    fn insert_block(
        &self,
        target: &str,
        content: &str,
        opts: InsertOpts,
    ) -> impl Future<Output = Result<BlockNode>> + Send;

    /// Insert a batch of blocks (with nested children) under a parent block.
    ///
    /// With `sibling` set the batch is inserted after the parent at the same
    /// level; otherwise it becomes the parent's children.
    fn insert_batch(
        &self,
        parent_uuid: &str,
        blocks: &[BlockDraft],
        sibling: bool,
    ) -> impl Future<Output = Result<()>> + Send;
}
