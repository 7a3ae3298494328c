//! Logger initialization.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "bootstrap=debug,validation=warn").
/// When unset, `RUST_LOG` is honored, then `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter : Option<String>,
    pub write_style : env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter : None,
            write_style : env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    #[inline] pub fn env_filter(mut self, filter : impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    value_builder! { write_style, env_logger::WriteStyle }
}

static INIT : Once = Once::new();

fn builder(config : LoggingConfig) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = config.env_filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }

    builder.write_style(config.write_style);
    builder
}

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(config : LoggingConfig) {
    INIT.call_once(|| {
        // Another logger may already be installed, e.g. by a test harness.
        if builder(config).try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
