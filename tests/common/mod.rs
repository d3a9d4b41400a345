//! Shared integration test helpers for startup-layers.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::TestContext;
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use startup_layers::host::memory::{MemoryHost, MemoryLayer};
use startup_layers::host::{LiveLayer, PropertyValue};
use startup_layers::layer::{DEPTH_PROPERTY, LayerKind};
use startup_layers::{LayoutStore, StartupLayers};
use startup_layers_config::MenuPlacement;
use tempfile::TempDir;

/// A started extension over a temporary storage directory.
///
/// The `TempDir` is kept alive as long as the context.
pub struct TestContext {
    pub temp_dir: TempDir,
    pub host: MemoryHost,
    pub plugin: StartupLayers,
}

impl TestContext {
    /// Start on an empty storage directory.
    pub fn new() -> Self {
        Self::with_storage(|_| {})
    }

    /// Start after `prepare` has populated the storage directory.
    pub fn with_storage(prepare: impl FnOnce(&LayoutStore)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = LayoutStore::new(temp_dir.path().join("storage").join("startup_layers"));
        std::fs::create_dir_all(store.dir()).expect("Failed to create storage dir");
        prepare(&store);

        let mut host = MemoryHost::new();
        host.seed_menu("File", &["New", "Open", "Close", "Quit"]);
        let plugin = StartupLayers::start(store, MenuPlacement::default(), &mut host)
            .expect("Failed to start");
        Self {
            temp_dir,
            host,
            plugin,
        }
    }

    pub fn store(&self) -> &LayoutStore {
        self.plugin.store()
    }

    pub fn read_file(&self, file_name: &str) -> String {
        std::fs::read_to_string(self.store().dir().join(file_name))
            .unwrap_or_else(|e| panic!("Failed to read {file_name}: {e}"))
    }
}

/// A layer of `kind` with the given name, selection and depth.
pub fn layer(kind: LayerKind, name: &str, selected: bool, depth: f64) -> MemoryLayer {
    let mut layer = MemoryLayer::named(kind, name);
    layer.set_selected(selected);
    layer.set_property(DEPTH_PROPERTY, PropertyValue::Float(depth));
    layer
}
