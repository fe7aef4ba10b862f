//! HTTP glue: serve whatever `core::resolve_request_path` gives us.

use std::{io, path::Path, time::Instant};

use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use crate::error::{ResolveError, ServeError};
use crate::sys_core::core::ServerState;
use crate::sys_statichost::core::{RequestPath, resolve_request_path};

/// Resolve the request path case-insensitively under the root and serve the file.
///
/// Always answers: 200 with the file, 404 if resolution fails, 500 on any
/// filesystem fault. Failures are logged even in quiet mode.
pub async fn handler_static(state: &ServerState, req: Request<Body>) -> Response<Body> {
    let start = Instant::now();
    let head_only = req.method() == Method::HEAD;
    let request = RequestPath::parse(req.uri().path());

    let resolved = match resolve_request_path(&state.resolver, &state.root, &request).await {
        Ok(path) => path,
        Err(e) => {
            match &e {
                ServeError::NotFound { .. } => {
                    let requested = state.root.join(request.to_string().trim_start_matches('/'));
                    warn!("[404] {} ({:?})", requested.display(), start.elapsed());
                }
                ServeError::Fault(fault) => {
                    error!("[500] {} ({:?})", fault, start.elapsed());
                }
            }
            return respond_status(e.status_code());
        }
    };

    match serve_file(&resolved, head_only).await {
        Ok(resp) => {
            if !state.quiet {
                info!("[200] {} ({:?})", resolved.display(), start.elapsed());
            }
            resp
        }
        Err(e) => {
            // The file was there at stat time; it went away or became unreadable since.
            let fault = ResolveError::io(&resolved, e);
            error!("[500] {} ({:?})", fault, start.elapsed());
            respond_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Stream the file at an already-verified `path`. With `head_only` the body is
/// left empty but the headers are the same.
pub async fn serve_file(path: &Path, head_only: bool) -> io::Result<Response<Body>> {
    let file = File::open(path).await?;
    let len = file.metadata().await?.len();
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let body = if head_only {
        Body::empty()
    } else {
        Body::wrap_stream(ReaderStream::new(file))
    };

    Response::builder()
        .header(CONTENT_TYPE, mime.as_ref())
        .header(CONTENT_LENGTH, len)
        .body(body)
        .map_err(io::Error::other)
}

pub fn respond_status(code: StatusCode) -> Response<Body> {
    let msg = format!(
        "{} {}",
        code.as_u16(),
        code.canonical_reason().unwrap_or_default()
    );
    let mut r = Response::new(Body::from(msg));
    *r.status_mut() = code;
    r
}
