//! Configuration system for startup-layers.
//!
//! This crate provides:
//!
//! - The user settings file (`Config`) with defaults and atomic saving
//! - Storage directory layout and fixed file names
//! - Layout naming rules: reserved built-in names and file-name sanitizing

pub mod config;
pub mod defaults;
pub mod error;
pub mod naming;
mod types;

// Re-export main types for convenience
pub use config::{Config, storage_dir_under};
pub use error::ConfigError;
pub use naming::{
    BLANK_LAYOUT, CONFIG_EXTENSION, DEFAULT_IMAGES_LAYOUT, DEFAULT_LAYOUT, MAX_LAYOUT_NAME_BYTES,
    ONE_OBJECT_LAYER_LAYOUT, OPTIONS_FILE_NAME, RESERVED_LAYOUT_NAMES, STORAGE_SUBDIR,
    config_file_name, is_reserved_layout_name, layout_name_from_file_name, sanitize_layout_name,
};
pub use types::{LogLevel, MenuPlacement};
