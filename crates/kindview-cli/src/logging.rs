//! Logging setup for the kindview binary
//!
//! Console output goes to stderr so that rendered tables on stdout stay
//! clean for piping. When enabled, a JSON copy of every event is written to a
//! daily-rotated file for bug reports. `RUST_LOG` overrides the default filter.

use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where log files should be written
    pub log_dir: PathBuf,

    /// Whether to enable JSON output to files (for bug reports)
    pub enable_json_logs: bool,

    /// Whether to enable console output on stderr
    pub enable_console_logs: bool,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Default log level filter
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: crate::settings::log_dir(),
            enable_json_logs: true,
            enable_console_logs: true,
            include_location: cfg!(debug_assertions),
            default_filter: "info,kindview_core=debug,kindview_client=debug,kindview_storage=debug,kindview_cli=debug".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Warnings on the console, JSON logs for bug reports
    pub fn production() -> Self {
        Self {
            log_dir: crate::settings::log_dir(),
            enable_json_logs: true,
            enable_console_logs: true,
            include_location: false,
            default_filter: "warn,kindview_client=info".to_string(),
        }
    }

    /// Verbose console output
    pub fn development() -> Self {
        Self::default()
    }

    /// Console only, no files
    pub fn testing() -> Self {
        Self {
            log_dir: std::env::temp_dir().join("kindview-tests"),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: true,
            default_filter: "debug".to_string(),
        }
    }

    /// `-v` on the command line: everything at debug
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.default_filter = "debug".to_string();
        }
        self
    }

    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.enable_json_logs = enabled;
        self
    }
}

/// Turn file logging off when the log directory cannot be created
fn ensure_log_dir(mut config: LoggingConfig) -> (LoggingConfig, Option<std::io::Error>) {
    if !config.enable_json_logs {
        return (config, None);
    }
    match std::fs::create_dir_all(&config.log_dir) {
        Ok(()) => (config, None),
        Err(err) => {
            config.enable_json_logs = false;
            (config, Some(err))
        }
    }
}

/// Install the global subscriber.
///
/// An unusable log directory falls back to console-only logging with a
/// warning.
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let (config, log_dir_error) = ensure_log_dir(config);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers = Vec::new();

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .with_filter(env_filter.clone())
            .boxed();

        layers.push(console_layer);
    }

    if config.enable_json_logs {
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "kindview.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // The guard flushes on drop and must outlive every log call
        std::mem::forget(guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();

        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    if let Some(err) = log_dir_error {
        tracing::warn!(
            log_dir = %config.log_dir.display(),
            error = %err,
            "cannot create log directory, logging to console only"
        );
    }

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        console_enabled = config.enable_console_logs,
        "logging initialized"
    );

    Ok(())
}

/// Development preset in debug builds, production otherwise
pub fn default_config() -> LoggingConfig {
    if cfg!(debug_assertions) {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert!(config.enable_json_logs);
        assert!(!config.include_location);
        assert!(config.default_filter.starts_with("warn"));
    }

    #[test]
    fn test_testing_config_writes_no_files() {
        let config = LoggingConfig::testing();
        assert!(!config.enable_json_logs);
        assert!(config.enable_console_logs);
    }

    #[test]
    fn test_unusable_log_dir_disables_file_logs() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let mut config = LoggingConfig::production();
        config.log_dir = blocker.join("logs");
        let (config, err) = ensure_log_dir(config);

        assert!(err.is_some());
        assert!(!config.enable_json_logs);
        assert!(config.enable_console_logs);
    }

    #[test]
    fn test_log_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LoggingConfig::production();
        config.log_dir = dir.path().join("nested").join("logs");
        let (config, err) = ensure_log_dir(config);

        assert!(err.is_none());
        assert!(config.enable_json_logs);
        assert!(config.log_dir.is_dir());
    }

    #[test]
    fn test_verbose_raises_filter() {
        let config = LoggingConfig::production().with_verbose(true);
        assert_eq!(config.default_filter, "debug");

        let config = LoggingConfig::production().with_verbose(false);
        assert_ne!(config.default_filter, "debug");
    }
}
