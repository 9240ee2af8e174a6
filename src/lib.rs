//! cubox-sync - sync Cubox articles into a Logseq graph
//!
//! This crate provides the core functionality for the `cubox-sync` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Article, Highlight, Folder, Cursor, drafts)
//! - [`remote`] - Cubox HTTP API client behind the [`remote::RemoteApi`] trait
//! - [`store`] - Logseq HTTP API client behind the [`store::DocumentStore`] trait
//! - [`sync`] - Mapping, deduplication, and the sync engine
//! - [`config`] - Settings and their persistence
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod store;
pub mod sync;

pub use error::{Error, Result};

/// Process-wide re-entrancy guard for the sync command.
///
/// Two interleaved runs would race on the cursor checkpoint, so the second
/// one is rejected up front. Avoids threading a guard handle through every
/// command signature.
pub static SYNC_IN_PROGRESS: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);
