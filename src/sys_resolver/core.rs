//! Case-insensitive lookup of one child name inside one directory.

use std::{
    fs::Metadata,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::fs;
use tracing::debug;

use crate::error::ResolveError;
use crate::sys_resolver::cache::{Listing, ListingCache};

/// What a resolved child must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    /// Anything that is not a directory.
    File,
}

impl EntryKind {
    pub fn matches(self, meta: &Metadata) -> bool {
        match self {
            EntryKind::Directory => meta.is_dir(),
            EntryKind::File => !meta.is_dir(),
        }
    }
}

pub struct Resolver {
    cache: Arc<dyn ListingCache>,
}

impl Resolver {
    pub fn new(cache: Arc<dyn ListingCache>) -> Self {
        Self { cache }
    }

    /// The listing cache, for inspection.
    pub fn cache(&self) -> &Arc<dyn ListingCache> {
        &self.cache
    }

    /// Find the child of `dir` whose name equals `query` ignoring case and
    /// whose type matches `kind`.
    ///
    /// `dir` must be a directory that was itself resolved (or is the root).
    /// Returns `Ok(None)` when nothing matches. Only the first case-insensitive
    /// match in sorted order is considered; if it has the wrong type the
    /// answer is `Ok(None)`, even if a later name would also match.
    pub async fn resolve(
        &self,
        dir: &Path,
        query: &str,
        kind: EntryKind,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let children = self.listing(dir).await?;

        let Some(name) = children
            .iter()
            .find(|child| child.to_str().is_some_and(|c| eq_fold(c, query)))
        else {
            return Ok(None);
        };

        let candidate = dir.join(name);
        let meta = fs::metadata(&candidate)
            .await
            .map_err(|e| ResolveError::io(&candidate, e))?;

        if kind.matches(&meta) {
            Ok(Some(candidate))
        } else {
            debug!(path = %candidate.display(), ?kind, "case match has wrong type");
            Ok(None)
        }
    }

    async fn listing(&self, dir: &Path) -> Result<Listing, ResolveError> {
        let key = cache_key(dir);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let fresh = read_sorted_names(dir).await?;
        self.cache.insert(key, Arc::clone(&fresh));
        Ok(fresh)
    }
}

/// Cache key for a directory: the whole path, lower-cased. Earlier segments
/// were matched case-insensitively too, so two requests can reach the same
/// directory through differently-cased paths.
pub fn cache_key(dir: &Path) -> String {
    dir.to_string_lossy().to_lowercase()
}

/// Case-insensitive equality over Unicode lower-case mappings.
pub fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Read every child name of `dir` and sort them bytewise.
/// Directory iteration order is never relied on.
pub async fn read_sorted_names(dir: &Path) -> Result<Listing, ResolveError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| ResolveError::io(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ResolveError::io(dir, e))?
    {
        names.push(entry.file_name());
    }
    names.sort();
    Ok(names.into())
}
