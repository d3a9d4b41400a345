use serde::{Deserialize, Serialize};

/// Log level for the debug log file.
///
/// `RUST_LOG` and the `--log-level` CLI flag take precedence over this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Where the layout actions are placed in the host's menu bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPlacement {
    /// Menu that receives the actions (e.g. "File")
    #[serde(default = "crate::defaults::menu")]
    pub menu: String,

    /// Existing action the block is inserted before (e.g. "Close")
    #[serde(default = "crate::defaults::menu_anchor")]
    pub before: String,
}

impl Default for MenuPlacement {
    fn default() -> Self {
        Self {
            menu: crate::defaults::menu(),
            before: crate::defaults::menu_anchor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_to_filter() {
        assert_eq!(LogLevel::Off.to_level_filter(), log::LevelFilter::Off);
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }
}
