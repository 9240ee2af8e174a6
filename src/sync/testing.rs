//! In-memory fakes for the remote API, the document store, and settings
//! persistence. Shared by the unit tests across the sync modules.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::config::{Settings, SettingsStore};
use crate::error::{Error, Result};
use crate::model::{Article, BlockDraft, Cursor, Folder, Properties, SyncFilter};
use crate::remote::{ArticlePage, RemoteApi};
use crate::store::{BlockNode, DocumentStore, InsertOpts, PageRef};

/// Scripted remote API: serves queued pages front to back.
pub(crate) struct StubRemote {
    folders: Vec<Folder>,
    pages: Mutex<VecDeque<ArticlePage>>,
    bodies: HashMap<String, String>,
    fail_content: HashSet<String>,
    fail_page_fetch_at: Option<usize>,
    pub page_fetches: AtomicUsize,
    pub content_fetches: AtomicUsize,
    pub last_filter: Mutex<Option<SyncFilter>>,
    pub last_cursor: Mutex<Option<Cursor>>,
}

impl StubRemote {
    pub fn new() -> Self {
        Self {
            folders: Vec::new(),
            pages: Mutex::new(VecDeque::new()),
            bodies: HashMap::new(),
            fail_content: HashSet::new(),
            fail_page_fetch_at: None,
            page_fetches: AtomicUsize::new(0),
            content_fetches: AtomicUsize::new(0),
            last_filter: Mutex::new(None),
            last_cursor: Mutex::new(None),
        }
    }

    pub fn with_folders(mut self, folders: Vec<Folder>) -> Self {
        self.folders = folders;
        self
    }

    pub fn with_page(self, articles: Vec<Article>, has_more: bool) -> Self {
        self.pages.lock().unwrap().push_back(ArticlePage { articles, has_more });
        self
    }

    pub fn with_body(mut self, id: &str, content: &str) -> Self {
        self.bodies.insert(id.to_string(), content.to_string());
        self
    }

    /// Make `fetch_content` fail for the given article id.
    pub fn failing_content(mut self, id: &str) -> Self {
        self.fail_content.insert(id.to_string());
        self
    }

    /// Make the nth page fetch (1-based) fail.
    pub fn failing_page_fetch_at(mut self, n: usize) -> Self {
        self.fail_page_fetch_at = Some(n);
        self
    }
}

impl RemoteApi for StubRemote {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        Ok(self.folders.clone())
    }

    async fn list_articles(&self, cursor: &Cursor, filter: &SyncFilter) -> Result<ArticlePage> {
        let fetch = self.page_fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_page_fetch_at == Some(fetch) {
            return Err(Error::Fetch("scripted page failure".to_string()));
        }

        *self.last_cursor.lock().unwrap() = Some(cursor.clone());
        *self.last_filter.lock().unwrap() = Some(filter.clone());

        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn fetch_content(&self, id: &str) -> Result<Option<String>> {
        self.content_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_content.contains(id) {
            return Err(Error::Store(format!("scripted content failure for {id}")));
        }
        Ok(self.bodies.get(id).cloned())
    }
}

#[derive(Clone)]
struct MemBlock {
    uuid: String,
    content: String,
    children: Vec<MemBlock>,
}

struct MemPage {
    uuid: String,
    name: String,
    properties: Properties,
    blocks: Vec<MemBlock>,
}

#[derive(Default)]
struct State {
    pages: Vec<MemPage>,
    next_uuid: usize,
}

impl State {
    fn fresh_uuid(&mut self) -> String {
        self.next_uuid += 1;
        format!("uuid-{}", self.next_uuid)
    }

    fn blocks_from_drafts(&mut self, drafts: &[BlockDraft]) -> Vec<MemBlock> {
        drafts
            .iter()
            .map(|draft| {
                let uuid = self.fresh_uuid();
                MemBlock {
                    uuid,
                    content: draft.content.clone(),
                    children: self.blocks_from_drafts(&draft.children),
                }
            })
            .collect()
    }
}

fn block_to_draft(block: &MemBlock) -> BlockDraft {
    BlockDraft {
        content: block.content.clone(),
        children: block.children.iter().map(block_to_draft).collect(),
    }
}

fn remove_in(blocks: &mut Vec<MemBlock>, uuid: &str) -> bool {
    if let Some(i) = blocks.iter().position(|b| b.uuid == uuid) {
        blocks.remove(i);
        return true;
    }
    blocks.iter_mut().any(|b| remove_in(&mut b.children, uuid))
}

fn find_mut<'a>(blocks: &'a mut [MemBlock], uuid: &str) -> Option<&'a mut MemBlock> {
    for block in blocks.iter_mut() {
        if block.uuid == uuid {
            return Some(block);
        }
        if let Some(found) = find_mut(&mut block.children, uuid) {
            return Some(found);
        }
    }
    None
}

/// Insert `new` next to the block with `uuid`, anywhere in the tree.
fn insert_siblings(blocks: &mut Vec<MemBlock>, uuid: &str, new: &[MemBlock], before: bool) -> bool {
    if let Some(i) = blocks.iter().position(|b| b.uuid == uuid) {
        let at = if before { i } else { i + 1 };
        for (offset, block) in new.iter().cloned().enumerate() {
            blocks.insert(at + offset, block);
        }
        return true;
    }
    blocks
        .iter_mut()
        .any(|b| insert_siblings(&mut b.children, uuid, new, before))
}

/// In-memory [`DocumentStore`].
pub(crate) struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()) }
    }

    /// Create a page with plain top-level blocks and no properties.
    pub fn seed_page(&self, name: &str, block_contents: &[&str]) {
        self.seed_page_with_props(name, Properties::new(), block_contents);
    }

    pub fn seed_page_with_props(&self, name: &str, properties: Properties, block_contents: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let uuid = state.fresh_uuid();
        let blocks = block_contents
            .iter()
            .map(|content| {
                let uuid = state.fresh_uuid();
                MemBlock { uuid, content: (*content).to_string(), children: Vec::new() }
            })
            .collect();
        state.pages.push(MemPage { uuid, name: name.to_string(), properties, blocks });
    }

    pub fn page(&self, name: &str) -> Option<PageRef> {
        let state = self.state.lock().unwrap();
        state.pages.iter().find(|p| p.name == name).map(|p| PageRef {
            uuid: p.uuid.clone(),
            name: p.name.clone(),
            properties: p.properties.clone(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.state.lock().unwrap().pages.len()
    }

    /// Full block tree of a page, as drafts for easy comparison.
    pub fn block_tree(&self, name: &str) -> Vec<BlockDraft> {
        let state = self.state.lock().unwrap();
        state
            .pages
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.blocks.iter().map(block_to_draft).collect())
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryStore {
    async fn find_by_property(&self, key: &str, value: &str) -> Result<Vec<PageRef>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .pages
            .iter()
            .filter(|p| p.properties.get(key).and_then(Value::as_str) == Some(value))
            .map(|p| PageRef {
                uuid: p.uuid.clone(),
                name: p.name.clone(),
                properties: p.properties.clone(),
            })
            .collect())
    }

    async fn get_page(&self, name: &str) -> Result<Option<PageRef>> {
        Ok(self.page(name))
    }

    async fn create_page(&self, title: &str, properties: &Properties) -> Result<PageRef> {
        let mut state = self.state.lock().unwrap();
        let uuid = state.fresh_uuid();
        state.pages.push(MemPage {
            uuid: uuid.clone(),
            name: title.to_string(),
            properties: properties.clone(),
            blocks: Vec::new(),
        });
        Ok(PageRef { uuid, name: title.to_string(), properties: properties.clone() })
    }

    async fn upsert_property(&self, page_uuid: &str, key: &str, value: &Value) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let page = state
            .pages
            .iter_mut()
            .find(|p| p.uuid == page_uuid)
            .ok_or_else(|| Error::Store(format!("no page with uuid {page_uuid}")))?;
        page.properties.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn page_blocks(&self, name: &str) -> Result<Vec<BlockNode>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .pages
            .iter()
            .find(|p| p.name == name)
            .map(|p| {
                p.blocks
                    .iter()
                    .map(|b| BlockNode { uuid: b.uuid.clone(), content: b.content.clone() })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn remove_block(&self, uuid: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        for page in &mut state.pages {
            if remove_in(&mut page.blocks, uuid) {
                return Ok(());
            }
        }
        Ok(())
    }

    async fn insert_block(&self, target: &str, content: &str, opts: InsertOpts) -> Result<BlockNode> {
        let mut state = self.state.lock().unwrap();
        let uuid = state.fresh_uuid();
        let block = MemBlock { uuid: uuid.clone(), content: content.to_string(), children: Vec::new() };
        let node = BlockNode { uuid, content: content.to_string() };

        // Page-level insertion by page name.
        if let Some(page) = state.pages.iter_mut().find(|p| p.name == target) {
            if opts.before {
                page.blocks.insert(0, block);
            } else {
                page.blocks.push(block);
            }
            return Ok(node);
        }

        // Block-level insertion by uuid.
        if opts.sibling {
            for page in &mut state.pages {
                if insert_siblings(&mut page.blocks, target, std::slice::from_ref(&block), opts.before) {
                    return Ok(node);
                }
            }
        } else {
            for page in &mut state.pages {
                if let Some(parent) = find_mut(&mut page.blocks, target) {
                    if opts.before {
                        parent.children.insert(0, block);
                    } else {
                        parent.children.push(block);
                    }
                    return Ok(node);
                }
            }
        }

        Err(Error::Store(format!("no insert target {target}")))
    }

    async fn insert_batch(&self, parent_uuid: &str, blocks: &[BlockDraft], sibling: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let new = state.blocks_from_drafts(blocks);

        if sibling {
            for page in &mut state.pages {
                if insert_siblings(&mut page.blocks, parent_uuid, &new, false) {
                    return Ok(());
                }
            }
        } else {
            for page in &mut state.pages {
                if let Some(parent) = find_mut(&mut page.blocks, parent_uuid) {
                    parent.children.extend(new);
                    return Ok(());
                }
            }
        }

        Err(Error::Store(format!("no batch parent {parent_uuid}")))
    }
}

/// Settings store that records every save for inspection.
pub(crate) struct RecordingSettingsStore {
    initial: Settings,
    pub saved: Mutex<Vec<Settings>>,
}

impl RecordingSettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self { initial, saved: Mutex::new(Vec::new()) }
    }

    pub fn saved_cursors(&self) -> Vec<Cursor> {
        self.saved.lock().unwrap().iter().map(|s| s.cursor.clone()).collect()
    }
}

impl SettingsStore for RecordingSettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.initial.clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        self.saved.lock().unwrap().push(settings.clone());
        Ok(())
    }
}
