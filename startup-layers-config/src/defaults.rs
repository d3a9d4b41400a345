//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields.

use std::path::PathBuf;

/// Menu that hosts the layout actions.
pub fn menu() -> String {
    "File".to_string()
}

/// Action the layout block is inserted before.
pub fn menu_anchor() -> String {
    "Close".to_string()
}

/// Root directory that contains `storage/startup_layers`.
///
/// Mirrors the editor's own settings directory so layouts sit next to the
/// editor's extension folder.
pub fn storage_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tiled")
}
