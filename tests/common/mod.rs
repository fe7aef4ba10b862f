#![allow(dead_code, clippy::unwrap_used)]

use std::{
    io,
    path::Path,
    sync::{Arc, Mutex},
};

use caseless_host::sys_core::core::{ServerState, handle};
use hyper::{Body, Method, Request, StatusCode, body::Bytes};

/// Build a tree under `root`. Entries ending in `/` are directories; every
/// other entry is a file whose contents are its own relative path.
pub fn build_tree(root: &Path, entries: &[&str]) {
    for entry in entries {
        let path = root.join(entry.trim_end_matches('/'));
        if entry.ends_with('/') {
            std::fs::create_dir_all(&path).unwrap();
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, entry.as_bytes()).unwrap();
        }
    }
}

pub fn state(root: &Path, cache_size: usize, quiet: bool) -> Arc<ServerState> {
    Arc::new(ServerState::new(root.to_path_buf(), cache_size, quiet))
}

pub async fn request(state: &Arc<ServerState>, method: Method, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = handle(Arc::clone(state), req).await.unwrap();
    let status = resp.status();
    let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    (status, body)
}

pub async fn get(state: &Arc<ServerState>, uri: &str) -> (StatusCode, Bytes) {
    request(state, Method::GET, uri).await
}

/// Whether the filesystem under `dir` keeps names that differ only in case apart.
pub fn is_case_sensitive(dir: &Path) -> bool {
    let probe = dir.join("case_probe");
    std::fs::write(&probe, "").unwrap();
    let sensitive = !dir.join("CASE_PROBE").exists();
    std::fs::remove_file(&probe).unwrap();
    sensitive
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route this thread's events into the capture until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).lines().map(str::to_string).collect()
    }

    /// Captured lines carrying `tag`, e.g. `"[404]"`.
    pub fn tagged(&self, tag: &str) -> Vec<String> {
        self.lines().into_iter().filter(|l| l.contains(tag)).collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
