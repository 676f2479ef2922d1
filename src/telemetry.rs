// src/telemetry.rs
use tracing_subscriber::EnvFilter;

use crate::error::{ForumError, Result};

/// Installs the global fmt subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| ForumError::config(format!("bad log filter {default_filter:?}: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| ForumError::config(format!("tracing already initialized: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        // the first call may lose against another test's subscriber
        let _ = init_tracing("debug");
        assert!(matches!(init_tracing("debug"), Err(ForumError::Config(_))));
    }
}
