//! Logging initialization for signup.
//!
//! Wizard mode: logs to `{logging.dir}/signup-{datetime}.log`
//! Server and CLI mode: logs to stderr

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Flushes buffered log lines when dropped; keep alive for the whole run
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set in wizard mode with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Log file name for a run started now
pub fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("signup-{}.log", timestamp)
}

/// Effective filter directive: `--debug` beats config, `RUST_LOG` beats both
fn filter_directive(config: &Config, debug_override: bool, rust_log: Option<String>) -> String {
    let level = if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    rust_log.filter(|v| !v.trim().is_empty()).unwrap_or(level)
}

/// Initialize logging based on mode and configuration.
///
/// The terminal owns stdout and stderr while the wizard runs, so wizard mode
/// writes to a file unless `logging.to_file` is off.
pub fn init_logging(
    config: &Config,
    is_wizard_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let filter = tracing_subscriber::EnvFilter::new(filter_directive(
        config,
        debug_override,
        std::env::var("RUST_LOG").ok(),
    ));

    if is_wizard_mode && config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

        let log_filename = log_file_name();
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.logging.dir = temp_dir.path().join("logs").to_string_lossy().to_string();
        config
    }

    #[test]
    fn test_logs_path_inside_configured_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let logs_dir = config.logs_path();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(temp_dir.path()));
    }

    #[test]
    fn test_log_file_name_format() {
        let name = log_file_name();
        assert!(name.starts_with("signup-"));
        assert!(name.ends_with("Z.log"));
        // signup- + YYYYmmddTHHMMSSZ + .log
        assert_eq!(name.len(), "signup-".len() + 16 + ".log".len());
    }

    #[test]
    fn test_filter_directive_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        assert_eq!(filter_directive(&config, false, None), "info");
        assert_eq!(filter_directive(&config, true, None), "debug");
        assert_eq!(
            filter_directive(&config, true, Some("signup=trace".to_string())),
            "signup=trace"
        );
        assert_eq!(filter_directive(&config, false, Some(" ".to_string())), "info");
    }

    #[test]
    fn test_wizard_mode_with_file_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.logging.to_file = false;

        // Even in wizard mode, if to_file is false, no log file is created
        let is_wizard_mode = true;
        assert!(!(is_wizard_mode && config.logging.to_file));
    }
}
