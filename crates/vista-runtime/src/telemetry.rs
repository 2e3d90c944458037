//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries and test harnesses
//! that want them printed call [`init_tracing`] once at startup.

use tracing_subscriber::EnvFilter;
use vista_core::{VistaError, VistaResult};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "vista=info";

/// Output format of the log subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. Fails if a global subscriber is
/// already installed.
pub fn init_tracing(format: LogFormat) -> VistaResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| VistaError::InvalidConfig(format!("tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_installs_once() {
        assert!(init_tracing(LogFormat::Json).is_ok());
        tracing::info!(target: "vista_runtime", "subscriber installed");

        let err = init_tracing(LogFormat::Text).unwrap_err();
        assert_eq!(err.kind(), "invalid_config");
    }
}
