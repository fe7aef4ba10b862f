//! Server wiring: the shared state, the hyper service and the accept loop.

use std::{convert::Infallible, path::PathBuf, sync::Arc};

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use tracing::{info, warn};

use crate::error::StartupError;
use crate::sys_config::core::Config;
use crate::sys_resolver::cache::build_listing_cache;
use crate::sys_resolver::core::Resolver;
use crate::sys_statichost::handlers::handler_static;

/// Everything a request needs. Built once at startup and shared by every
/// connection for the life of the process.
pub struct ServerState {
    /// Absolute path of the served directory.
    pub root: PathBuf,
    pub resolver: Resolver,
    /// Suppress the log line for successful requests.
    pub quiet: bool,
}

impl ServerState {
    pub fn new(root: PathBuf, cache_size: usize, quiet: bool) -> Self {
        Self {
            root,
            resolver: Resolver::new(build_listing_cache(cache_size)),
            quiet,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.root.clone(), config.cache_size, config.quiet)
    }
}

pub async fn handle(
    state: Arc<ServerState>,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    Ok(handler_static(&state, req).await)
}

/// Bind `config.address` and serve until Ctrl-C.
pub async fn run_server(config: Config) -> Result<(), StartupError> {
    let state = Arc::new(ServerState::from_config(&config));
    let cache_capacity = state.resolver.cache().capacity();

    let make_svc = make_service_fn(move |_conn| {
        let state = Arc::clone(&state);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| handle(Arc::clone(&state), req)))
        }
    });

    let server = Server::try_bind(&config.address)
        .map_err(StartupError::Bind)?
        .serve(make_svc);

    info!(
        "serving {} on {} with {}-item cache",
        config.root.display(),
        server.local_addr(),
        cache_capacity
    );

    server
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a handler we just serve until killed.
        warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
