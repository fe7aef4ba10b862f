use hyper::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// A filesystem fault hit while resolving one path segment.
///
/// "No such child" is not an error at this level; the resolver reports it as
/// `Ok(None)`.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The path this error occurred at.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}

/// Outcome of walking a whole request path that did not end in a file.
#[derive(Error, Debug)]
pub enum ServeError {
    // 404
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    // 500
    #[error(transparent)]
    Fault(#[from] ResolveError),
}

impl ServeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Fault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Anything that stops the server from starting, or brings it down.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("root {} does not exist: {source}", path.display())]
    RootMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("root {} is not a directory", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("invalid listen address {0:?}")]
    InvalidAddress(String),

    #[error("failed to bind: {0}")]
    Bind(#[source] hyper::Error),

    #[error("server error: {0}")]
    Serve(#[source] hyper::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
