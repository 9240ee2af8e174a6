//! Sync orchestration.
//!
//! [`SyncEngine`] drives one full run: resolve the folder filter, page
//! through the remote article list, decide create/update/skip per article,
//! and apply writes through the document store. Error handling is two-tier:
//! a failed page fetch aborts the run, a failed record is counted and the
//! run continues.
//!
//! The pagination cursor is checkpointed through the settings store after
//! each fully-processed page, so an aborted run resumes from the last page
//! boundary instead of the beginning.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{dedup, folders, linker, mapper};
use crate::config::{Settings, SettingsStore};
use crate::error::{Error, Result};
use crate::model::{Article, Cursor, DocumentDraft, Properties, SyncFilter};
use crate::remote::RemoteApi;
use crate::store::{DocumentStore, InsertOpts, PageRef};

/// Receives human-readable progress messages during a run.
pub trait ProgressSink: Sync {
    fn notify(&self, message: &str);
}

/// Discards all progress messages.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn notify(&self, _message: &str) {}
}

/// Cooperative cancellation flag, checked between records.
///
/// Cancelling mid-page stops the run without advancing the cursor, so the
/// interrupted page is re-scanned on the next run. Already-applied writes
/// are not rolled back; re-scanning them is a skip, not a duplicate.
#[derive(Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters and final cursor for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncOutcome {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Ids of the records that failed, for log correlation.
    pub failed_ids: Vec<String>,
    pub cursor: Cursor,
}

impl SyncOutcome {
    /// Records that resulted in a write.
    #[must_use]
    pub fn synced(&self) -> usize {
        self.created + self.updated
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped + self.failed
    }
}

/// How one record was resolved.
enum Applied {
    Created,
    Updated,
    Skipped,
}

/// A fully-prepared write for one article. The draft is complete in memory
/// before the first store call, so a mapping failure never leaves a
/// half-written page behind.
enum WriteIntent {
    Create(DocumentDraft),
    Replace { page: PageRef, draft: DocumentDraft },
}

/// One-shot sync run over injected collaborators.
pub struct SyncEngine<'a, R, S, C> {
    remote: &'a R,
    store: &'a S,
    settings_store: &'a C,
    progress: &'a dyn ProgressSink,
    cancel: Option<&'a CancelFlag>,
}

impl<'a, R, S, C> SyncEngine<'a, R, S, C>
where
    R: RemoteApi,
    S: DocumentStore,
    C: SettingsStore,
{
    pub fn new(remote: &'a R, store: &'a S, settings_store: &'a C) -> Self {
        Self { remote, store, settings_store, progress: &NullSink, cancel: None }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: &'a CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelFlag::is_cancelled)
    }

    /// Run one sync pass.
    ///
    /// # Errors
    ///
    /// Fails fast on configuration problems (unresolvable folder filter) and
    /// on page-fetch failures. Per-record failures are absorbed into the
    /// outcome's `failed` counters instead.
    pub async fn run(&self, settings: &Settings) -> Result<SyncOutcome> {
        let mut settings = settings.clone();
        let mut outcome = SyncOutcome { cursor: settings.cursor.clone(), ..SyncOutcome::default() };

        self.ensure_anchor_page(&settings.target_page_name).await?;

        // Unresolvable folder config aborts before any article is fetched.
        let folder_ids = folders::resolve(self.remote, &settings.folder_names()).await?;
        let filter = SyncFilter { folder_ids, only_annotated: settings.only_annotated };

        info!(
            resuming = !settings.cursor.is_start(),
            only_annotated = filter.only_annotated,
            folders = filter.folder_ids.len(),
            "starting sync"
        );

        'pages: loop {
            if self.cancelled() {
                info!("sync cancelled");
                break;
            }

            let page = self.remote.list_articles(&settings.cursor, &filter).await?;
            if page.articles.is_empty() {
                break;
            }
            debug!(count = page.articles.len(), has_more = page.has_more, "fetched page");

            for article in &page.articles {
                if self.cancelled() {
                    info!("sync cancelled mid-page, cursor not advanced");
                    break 'pages;
                }

                match self.process(article, &settings).await {
                    Ok(Applied::Created) => outcome.created += 1,
                    Ok(Applied::Updated) => outcome.updated += 1,
                    Ok(Applied::Skipped) => outcome.skipped += 1,
                    Err(err) => {
                        warn!(id = %article.id, error = %err, "record failed, continuing");
                        self.progress.notify(&format!("Failed {}: {err}", article.id));
                        outcome.failed += 1;
                        outcome.failed_ids.push(article.id.clone());
                    }
                }
            }

            // Page fully processed: checkpoint the cursor so a later abort
            // resumes here.
            if let Some(last) = page.articles.last() {
                settings.cursor.advance_to(last);
                outcome.cursor = settings.cursor.clone();
                self.settings_store.save(&settings)?;
            }

            if !page.has_more {
                break;
            }
        }

        info!(
            created = outcome.created,
            updated = outcome.updated,
            skipped = outcome.skipped,
            failed = outcome.failed,
            "sync finished"
        );
        Ok(outcome)
    }

    /// The anchor page must exist before any article links to it.
    async fn ensure_anchor_page(&self, name: &str) -> Result<()> {
        if self.store.get_page(name).await?.is_none() {
            debug!(name, "creating anchor page");
            self.store.create_page(name, &Properties::new()).await?;
        }
        Ok(())
    }

    /// Decide and apply one record.
    async fn process(&self, article: &Article, settings: &Settings) -> Result<Applied> {
        let matches = self.store.find_by_property(crate::model::props::CUBOX_ID, &article.id).await?;
        if matches.len() > 1 {
            return Err(Error::DuplicateIdentity { id: article.id.clone(), count: matches.len() });
        }
        let existing = matches.first();

        match dedup::decide(article, existing) {
            dedup::SyncAction::Skip => {
                debug!(id = %article.id, "up to date, skipping");
                return Ok(Applied::Skipped);
            }
            dedup::SyncAction::Create | dedup::SyncAction::Update => {}
        }

        // Bodies are fetched lazily, only for records that will be written.
        let mut article = article.clone();
        if article.content.is_none() {
            article.content = self.remote.fetch_content(&article.id).await?;
        }

        let identity = existing.and_then(|page| {
            page.properties.get(crate::model::props::CUBOX_ID).and_then(serde_json::Value::as_str)
        });
        let draft = mapper::map_document(&article, &settings.target_page_name, identity);

        let intent = match existing {
            None => WriteIntent::Create(draft),
            Some(page) => WriteIntent::Replace { page: page.clone(), draft },
        };
        self.apply(intent, settings).await
    }

    async fn apply(&self, intent: WriteIntent, settings: &Settings) -> Result<Applied> {
        match intent {
            WriteIntent::Create(draft) => {
                let page = self.store.create_page(&draft.title, &draft.properties).await?;
                self.write_blocks(&page.name, &draft.blocks).await?;
                linker::publish(self.store, &page.name, &settings.target_page_name).await?;
                self.progress.notify(&format!("Created {}", page.name));
                Ok(Applied::Created)
            }
            WriteIntent::Replace { page, draft } => {
                for (key, value) in &draft.properties {
                    self.store.upsert_property(&page.uuid, key, value).await?;
                }
                for block in self.store.page_blocks(&page.name).await? {
                    self.store.remove_block(&block.uuid).await?;
                }
                self.write_blocks(&page.name, &draft.blocks).await?;
                self.progress.notify(&format!("Updated {}", page.name));
                Ok(Applied::Updated)
            }
        }
    }

    /// Write a block tree onto an empty page: one page-level insert for the
    /// head block, then its children, then the remaining top-level blocks as
    /// the head's siblings.
    async fn write_blocks(&self, page_name: &str, blocks: &[crate::model::BlockDraft]) -> Result<()> {
        let Some((first, rest)) = blocks.split_first() else {
            return Ok(());
        };

        let head = self
            .store
            .insert_block(
                page_name,
                &first.content,
                InsertOpts { before: false, sibling: false, is_page_block: true },
            )
            .await?;

        if !first.children.is_empty() {
            self.store.insert_batch(&head.uuid, &first.children, false).await?;
        }
        if !rest.is_empty() {
            self.store.insert_batch(&head.uuid, rest, true).await?;
        }

        Ok(())
    }
}
