//! Sync pipeline.
//!
//! The pipeline is split into small, separately-testable pieces:
//! - [`mapper`] - pure article-to-page transforms (title, properties, blocks)
//! - [`dedup`] - the create/skip/update decision
//! - [`folders`] - folder name to folder id resolution
//! - [`linker`] - recent-articles links on the anchor page
//! - [`engine`] - the orchestrator that drives a full run
//!
//! Everything upstream of [`engine::SyncEngine`] is pure; all I/O goes
//! through the [`crate::remote::RemoteApi`] and [`crate::store::DocumentStore`]
//! traits, which is what makes the engine testable against in-memory fakes.

pub mod dedup;
pub mod engine;
pub mod folders;
pub mod linker;
pub mod mapper;

#[cfg(test)]
pub(crate) mod testing;

pub use dedup::SyncAction;
pub use engine::{CancelFlag, NullSink, ProgressSink, SyncEngine, SyncOutcome};
