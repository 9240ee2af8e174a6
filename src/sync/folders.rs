//! Folder name resolution.
//!
//! Maps user-supplied folder display names to Cubox folder IDs using one
//! catalogue fetch. Unmatched names are dropped with a warning; a non-empty
//! request that resolves to nothing is a hard configuration error, raised
//! before any article page is fetched.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::remote::RemoteApi;

/// Resolve folder display names to folder IDs.
///
/// Names match the plain name or the fully-qualified nested name,
/// case-insensitively, after trimming.
///
/// # Errors
///
/// Returns [`Error::FoldersNotFound`] when `names` is non-empty but nothing
/// resolved; an empty filter would otherwise silently mean "all folders".
pub async fn resolve<R: RemoteApi>(remote: &R, names: &[String]) -> Result<Vec<String>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let folders = remote.list_folders().await?;
    debug!(count = folders.len(), "fetched folder catalogue");

    let mut ids = Vec::new();
    for name in names {
        let needle = name.trim().to_lowercase();
        let matched = folders.iter().find(|folder| {
            folder.name.to_lowercase() == needle || folder.nested_name.to_lowercase() == needle
        });

        match matched {
            Some(folder) => {
                debug!(name, id = %folder.id, "resolved folder");
                ids.push(folder.id.clone());
            }
            None => warn!(name, "folder not found, dropping from filter"),
        }
    }

    if ids.is_empty() {
        return Err(Error::FoldersNotFound { names: names.join(", ") });
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Folder;
    use crate::sync::testing::StubRemote;

    fn catalogue() -> Vec<Folder> {
        vec![
            Folder { id: "f1".into(), name: "Reading".into(), nested_name: "Reading".into() },
            Folder { id: "f2".into(), name: "Rust".into(), nested_name: "Tech/Rust".into() },
        ]
    }

    #[tokio::test]
    async fn matches_plain_and_nested_names_case_insensitively() {
        let remote = StubRemote::new().with_folders(catalogue());

        let ids = resolve(&remote, &["reading".into(), "tech/rust".into()]).await.unwrap();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[tokio::test]
    async fn empty_request_resolves_to_no_filter() {
        let remote = StubRemote::new();
        let ids = resolve(&remote, &[]).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn unmatched_names_are_dropped() {
        let remote = StubRemote::new().with_folders(catalogue());

        let ids = resolve(&remote, &["Reading".into(), "Nonexistent".into()]).await.unwrap();
        assert_eq!(ids, vec!["f1"]);
    }

    #[tokio::test]
    async fn nothing_resolved_is_a_hard_error() {
        let remote = StubRemote::new().with_folders(catalogue());

        let err = resolve(&remote, &["Nonexistent".into()]).await.unwrap_err();
        assert!(matches!(err, Error::FoldersNotFound { .. }));
    }
}
