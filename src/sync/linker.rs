//! Recent-articles link publishing.
//!
//! After a page is created it is linked from a "Recent Articles" section on
//! the anchor page. New links are inserted as the section's first child, so
//! the section reads in reverse-chronological order. Only the create path
//! calls this; updates never re-link.

use tracing::debug;

use crate::error::Result;
use crate::store::{DocumentStore, InsertOpts};

/// Heading content of the section links are collected under.
pub const RECENT_SECTION: &str = "## Recent Articles";

/// Link `page_title` from the anchor page's recent-articles section,
/// creating the section if it does not exist yet.
///
/// The section goes above any existing anchor content, or becomes the first
/// block of an empty anchor page.
pub async fn publish<S: DocumentStore>(store: &S, page_title: &str, anchor: &str) -> Result<()> {
    let Some(parent) = store.get_page(anchor).await? else {
        debug!(anchor, "anchor page missing, skipping link");
        return Ok(());
    };

    let blocks = store.page_blocks(&parent.name).await?;
    let section_uuid = match blocks.iter().find(|b| b.content.contains("Recent Articles")) {
        Some(section) => section.uuid.clone(),
        None => {
            let opts = InsertOpts {
                before: !blocks.is_empty(),
                sibling: false,
                is_page_block: true,
            };
            store.insert_block(&parent.name, RECENT_SECTION, opts).await?.uuid
        }
    };

    store
        .insert_block(
            &section_uuid,
            &format!("[[{page_title}]]"),
            InsertOpts { before: true, sibling: false, is_page_block: false },
        )
        .await?;

    Ok(())
}
