//! Storage directory for layouts
//!
//! Layouts live in `<root>/storage/startup_layers/` as `<name>.config` files
//! next to `options.ini`, which holds the name of the selected layout.
//! The two built-in layouts ("default", "default images") are bundled into
//! the binary and never touch the directory.

use crate::error::{LayoutError, Result};
use crate::layer::LayerSnapshot;
use crate::layer::codec::encode_layout;
use startup_layers_config::{
    BLANK_LAYOUT, Config, DEFAULT_IMAGES_LAYOUT, DEFAULT_LAYOUT, ONE_OBJECT_LAYER_LAYOUT,
    OPTIONS_FILE_NAME, config_file_name, is_reserved_layout_name, layout_name_from_file_name,
};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DEFAULT_LAYOUT_TEXT: &str = include_str!("../assets/default.config");
const DEFAULT_IMAGES_LAYOUT_TEXT: &str = include_str!("../assets/default images.config");

/// Bundled text of a built-in layout. The empty name stands for "default".
pub fn builtin_layout(name: &str) -> Option<&'static str> {
    match name {
        "" | DEFAULT_LAYOUT => Some(DEFAULT_LAYOUT_TEXT),
        DEFAULT_IMAGES_LAYOUT => Some(DEFAULT_IMAGES_LAYOUT_TEXT),
        _ => None,
    }
}

/// Write `contents` next to `path` and rename it into place.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents).map_err(|e| LayoutError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| LayoutError::io(path, e))
}

/// The on-disk catalog of layouts plus the selection pointer.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    dir: PathBuf,
}

impl LayoutStore {
    /// Store rooted at `dir` (the `startup_layers` directory itself).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at the location configured in the settings file.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.storage_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn options_path(&self) -> PathBuf {
        self.dir.join(OPTIONS_FILE_NAME)
    }

    pub fn config_path(&self, name: &str) -> PathBuf {
        self.dir.join(config_file_name(name))
    }

    /// Names of the user layouts on disk, sorted.
    ///
    /// Only regular `*.config` files count. Files named after a built-in are
    /// ignored; the bundled version always wins.
    pub fn list_config_names(&self) -> Result<BTreeSet<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(LayoutError::io(&self.dir, e)),
        };

        let mut names = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| LayoutError::io(&self.dir, e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                log::warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
                continue;
            };
            match layout_name_from_file_name(file_name) {
                Some(name) if is_reserved_layout_name(name) => {
                    crate::debug_info!("STORE", "Ignoring stored copy of built-in {:?}", name);
                }
                Some(name) => {
                    names.insert(name.to_string());
                }
                None => {}
            }
        }
        Ok(names)
    }

    /// Name of the selected layout. An absent or empty pointer reads as
    /// "default".
    pub fn read_selection(&self) -> Result<String> {
        let path = self.options_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(DEFAULT_LAYOUT.to_string()),
            Err(e) => return Err(LayoutError::io(path, e)),
        };
        let name = contents.trim_end_matches(['\r', '\n']);
        if name.is_empty() {
            Ok(DEFAULT_LAYOUT.to_string())
        } else {
            Ok(name.to_string())
        }
    }

    pub fn write_selection(&self, name: &str) -> Result<()> {
        write_atomic(&self.options_path(), name)?;
        crate::debug_log!("STORE", "Selection pointer set to {:?}", name);
        Ok(())
    }

    /// Create the storage directory and, on first run (no `options.ini`),
    /// select "default" and seed the starter layouts that are missing.
    ///
    /// Returns whether seeding ran.
    pub fn ensure_builtins(&self) -> Result<bool> {
        fs::create_dir_all(&self.dir).map_err(|e| LayoutError::io(&self.dir, e))?;

        if self.options_path().exists() {
            return Ok(false);
        }

        self.write_selection(DEFAULT_LAYOUT)?;

        if !self.contains(BLANK_LAYOUT) {
            self.write_layout(BLANK_LAYOUT, "")?;
        }
        if !self.contains(ONE_OBJECT_LAYER_LAYOUT) {
            let one_layer = LayerSnapshot {
                selected: true,
                ..LayerSnapshot::default()
            };
            self.write_layout(ONE_OBJECT_LAYER_LAYOUT, &encode_layout(&[one_layer])?)?;
        }

        log::info!("Seeded starter layouts in {:?}", self.dir);
        Ok(true)
    }

    /// Text of a layout. Built-in names resolve to the bundled text.
    pub fn read_layout(&self, name: &str) -> Result<String> {
        if let Some(text) = builtin_layout(name) {
            return Ok(text.to_string());
        }
        let path = self.config_path(name);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LayoutError::NotFound(name.to_string()),
            _ => LayoutError::io(path, e),
        })
    }

    /// Write `<name>.config`, replacing any previous content.
    pub fn write_layout(&self, name: &str, text: &str) -> Result<()> {
        if is_reserved_layout_name(name) {
            return Err(LayoutError::ReservedName(name.to_string()));
        }
        let path = self.config_path(name);
        write_atomic(&path, text)?;
        log::info!("Wrote layout {:?} to {:?}", name, path);
        Ok(())
    }

    /// Remove `<name>.config`. Returns `false` if there was no such file.
    pub fn remove_layout(&self, name: &str) -> Result<bool> {
        if is_reserved_layout_name(name) {
            return Err(LayoutError::ReservedName(name.to_string()));
        }
        let path = self.config_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed layout file {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LayoutError::io(path, e)),
        }
    }

    /// Whether a layout of that name exists, bundled or on disk.
    pub fn contains(&self, name: &str) -> bool {
        is_reserved_layout_name(name) || self.config_path(name).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::codec::parse_layout;
    use tempfile::tempdir;

    #[test]
    fn test_builtins_parse() {
        for name in [DEFAULT_LAYOUT, DEFAULT_IMAGES_LAYOUT] {
            let text = builtin_layout(name).unwrap();
            assert!(!parse_layout(text).unwrap().is_empty(), "{name}");
        }
        assert_eq!(builtin_layout(""), builtin_layout(DEFAULT_LAYOUT));
        assert_eq!(builtin_layout("blank"), None);
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let temp = tempdir().unwrap();
        let store = LayoutStore::new(temp.path().join("absent"));
        assert!(store.list_config_names().unwrap().is_empty());
        assert_eq!(store.read_selection().unwrap(), DEFAULT_LAYOUT);
    }

    #[test]
    fn test_list_filters_files() {
        let temp = tempdir().unwrap();
        let store = LayoutStore::new(temp.path());
        fs::write(temp.path().join("combat.config"), "").unwrap();
        fs::write(temp.path().join("default.config"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::write(temp.path().join(OPTIONS_FILE_NAME), "combat").unwrap();
        fs::create_dir(temp.path().join("folder.config")).unwrap();

        let names: Vec<_> = store.list_config_names().unwrap().into_iter().collect();
        assert_eq!(names, vec!["combat"]);
    }

    #[test]
    fn test_selection_trims_line_endings() {
        let temp = tempdir().unwrap();
        let store = LayoutStore::new(temp.path());
        fs::write(store.options_path(), "combat\r\n").unwrap();
        assert_eq!(store.read_selection().unwrap(), "combat");

        fs::write(store.options_path(), "").unwrap();
        assert_eq!(store.read_selection().unwrap(), DEFAULT_LAYOUT);

        store.write_selection("town").unwrap();
        assert_eq!(fs::read_to_string(store.options_path()).unwrap(), "town");
        assert!(!temp.path().join("options.ini.tmp").exists());
    }

    #[test]
    fn test_read_layout_missing_is_not_found() {
        let temp = tempdir().unwrap();
        let store = LayoutStore::new(temp.path());
        assert!(matches!(
            store.read_layout("ghost"),
            Err(LayoutError::NotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_remove_reports_absent_file() {
        let temp = tempdir().unwrap();
        let store = LayoutStore::new(temp.path());
        store.write_layout("combat", "").unwrap();
        assert!(store.contains("combat"));
        assert!(store.remove_layout("combat").unwrap());
        assert!(!store.remove_layout("combat").unwrap());
        assert!(!store.contains("combat"));
    }
}
