//! Pure path-mapping logic: request path → real file under the root. No hyper types here.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::error::ServeError;
use crate::sys_resolver::core::{EntryKind, Resolver};

/// Served when the request names a directory (ends in `/`).
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// A canonicalized request, split into the directories to descend through and
/// the file to serve from the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    pub dirs: Vec<String>,
    pub file: String,
}

impl RequestPath {
    /// Decode and canonicalize a raw URI path.
    ///
    /// `.` and `..` are collapsed and can never climb above the root; empty
    /// segments are dropped. A trailing `/` (or the bare root) selects
    /// [`DEFAULT_DOCUMENT`].
    pub fn parse(uri_path: &str) -> Self {
        let decoded = urlencoding::decode_binary(uri_path.as_bytes());
        let decoded = String::from_utf8_lossy(&decoded);

        let mut segments: Vec<&str> = Vec::new();
        for seg in decoded.split('/') {
            match seg {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }

        let names_directory = decoded.ends_with('/') || segments.is_empty();
        let file = if names_directory {
            DEFAULT_DOCUMENT.to_string()
        } else {
            // Non-empty: checked above.
            segments.pop().unwrap_or(DEFAULT_DOCUMENT).to_string()
        };

        Self {
            dirs: segments.into_iter().map(str::to_string).collect(),
            file,
        }
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dir in &self.dirs {
            write!(f, "/{dir}")?;
        }
        write!(f, "/{}", self.file)
    }
}

/// Walk `request` down from `root`, one case-insensitive segment at a time.
///
/// Every directory segment must resolve to a directory and the last segment
/// to a non-directory. Only names read back from directory listings are ever
/// joined onto the path, so the result always lies under `root`.
pub async fn resolve_request_path(
    resolver: &Resolver,
    root: &Path,
    request: &RequestPath,
) -> Result<PathBuf, ServeError> {
    let mut resolved = root.to_path_buf();
    for segment in &request.dirs {
        resolved = resolve_step(resolver, &resolved, segment, EntryKind::Directory).await?;
    }
    resolve_step(resolver, &resolved, &request.file, EntryKind::File).await
}

async fn resolve_step(
    resolver: &Resolver,
    dir: &Path,
    segment: &str,
    kind: EntryKind,
) -> Result<PathBuf, ServeError> {
    resolver
        .resolve(dir, segment, kind)
        .await?
        .ok_or_else(|| ServeError::NotFound {
            path: dir.join(segment),
        })
}
