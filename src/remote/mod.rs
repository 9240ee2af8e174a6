//! Remote content API.
//!
//! [`RemoteApi`] is the abstract contract the sync engine consumes; transport
//! and wire schema are the implementation's concern. [`cubox::CuboxClient`]
//! is the production implementation over the Cubox third-party HTTP API.

mod cubox;

pub use cubox::CuboxClient;

use std::future::Future;

use crate::error::Result;
use crate::model::{Article, Cursor, Folder, SyncFilter};

/// One page of articles from the remote service.
///
/// Articles arrive in a stable order, so the last article of a page is a
/// valid resumption point for the next fetch.
#[derive(Debug, Clone, Default)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub has_more: bool,
}

/// Remote content service contract.
pub trait RemoteApi: Send + Sync {
    /// Fetch the full folder catalogue.
    fn list_folders(&self) -> impl Future<Output = Result<Vec<Folder>>> + Send;

    /// Fetch the next page of articles after `cursor`, applying `filter`.
    fn list_articles(
        &self,
        cursor: &Cursor,
        filter: &SyncFilter,
    ) -> impl Future<Output = Result<ArticlePage>> + Send;

    /// Fetch the full body content for one article.
    ///
    /// Returns `None` when the article has no body (e.g. bookmark-only cards).
    fn fetch_content(&self, id: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}
