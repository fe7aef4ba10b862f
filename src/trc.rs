//! Tracing configuration and initialization.

use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

use crate::error::StartupError;

/// Checked before `RUST_LOG`.
pub const LOG_ENV: &str = "CASELESS_HOST_LOG";

pub struct Trc {
    env_filter: EnvFilter,
}

impl Default for Trc {
    fn default() -> Self {
        let env_filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));
        Self { env_filter }
    }
}

impl Trc {
    pub fn init(self) -> Result<(), StartupError> {
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter)
            .with_target(false)
            .finish()
            .try_init()
            .map_err(|e| StartupError::Logging(e.to_string()))
    }
}
