//! Logging infrastructure for startup-layers.
//!
//! Every `log::info!()` etc. (and the category macros below) is routed to a
//! debug log file in the system temp directory:
//! `/tmp/startup_layers_debug.log` on Unix, `%TEMP%\startup_layers_debug.log`
//! on Windows. The editor's console is not touched, so a noisy level never
//! floods the host UI.
//!
//! Level precedence: `--log-level` CLI flag, then `RUST_LOG`, then the
//! `log_level` settings field. When `RUST_LOG` is set, records are also
//! mirrored to stderr.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Debug log file location.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("startup_layers_debug.log")
}

struct FileLogger {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn level_from_env() -> Option<log::LevelFilter> {
    let value = std::env::var("RUST_LOG").ok()?;
    // Only the global level is honoured; module filters are ignored.
    let global = value.split(',').find(|part| !part.contains('='))?;
    global.trim().parse().ok()
}

/// Install the file logger.
///
/// `cli_level` wins over `RUST_LOG`, which wins over `configured`. Calling
/// this more than once only adjusts the level.
pub fn init_log_bridge(
    cli_level: Option<log::LevelFilter>,
    configured: log::LevelFilter,
) -> log::LevelFilter {
    let env_level = level_from_env();
    let level = cli_level.or(env_level).unwrap_or(configured);

    let logger = LOGGER.get_or_init(|| {
        // Silently fall back to no file if the temp dir is not writable.
        let file = if level == log::LevelFilter::Off {
            None
        } else {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path())
                .ok()
        };
        FileLogger {
            file: Mutex::new(file),
            mirror_stderr: env_level.is_some(),
        }
    });

    if log::set_logger(logger).is_ok() {
        log::info!(
            "startup-layers {} logging started (level={:?})",
            crate::VERSION,
            level
        );
    }
    log::set_max_level(level);
    level
}

// Convenience macros for categorised logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        ::log::error!(target: $category, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        ::log::info!(target: $category, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        ::log::debug!(target: $category, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        ::log::trace!(target: $category, $($arg)*)
    };
}
