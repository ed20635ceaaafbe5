//! Tracing setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Build the log filter: `RUST_LOG` wins, otherwise the configured level
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.trim().to_lowercase()))
}

/// Handle to the installed filter, so the level can change once the
/// configuration is known.
#[derive(Clone)]
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    pub fn set_level(&self, level: &str) {
        if let Err(err) = self.filter.reload(filter(level)) {
            tracing::debug!(%err, "Log level not changed");
        }
    }
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean.
pub fn init(default_level: &str) -> LogHandle {
    let (filter_layer, handle) = reload::Layer::new(filter(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    LogHandle { filter: handle }
}
