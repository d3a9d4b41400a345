//! The startup-layers extension as seen by the editor.
//!
//! [`StartupLayers`] is created once when the editor loads the extension.
//! It owns the storage, the registry of named layouts and the menu state,
//! and exposes one method per user action and per consumed host event.
//!
//! Every user-facing failure goes through [`StartupLayers::report`], which
//! picks the host feedback for each [`LayoutError`] variant.

use crate::error::{LayoutError, Result};
use crate::host::{EditorHost, MapDocument};
use crate::layer::{LayerKind, LayerSnapshot};
use crate::layer::codec::{capture_layout, decode_layout};
use crate::menu::{ABOUT_ACTION, ActionId, MenuAction, MenuManager};
use crate::registry::{LayoutEntry, LayoutRegistry};
use crate::store::LayoutStore;
use crate::unique_id::UniqueIdGenerator;
use startup_layers_config::{
    BLANK_LAYOUT, Config, DEFAULT_IMAGES_LAYOUT, DEFAULT_LAYOUT, MenuPlacement,
    ONE_OBJECT_LAYER_LAYOUT, OPTIONS_FILE_NAME, config_file_name, is_reserved_layout_name,
    sanitize_layout_name,
};

const DIALOG_TITLE: &str = "Startup layers";

/// Width of the `=` rules framing the about text in the console.
const ABOUT_RULE_WIDTH: usize = 123;

/// Selection restore for a freshly loaded document.
///
/// The editor re-selects a layer on its own after a map is created, so the
/// recorded selection is applied on the next selection-changed notification.
/// Connect it with [`crate::events::Signal::connect_once`].
#[derive(Debug, Clone)]
pub struct ReselectLayers {
    snapshots: Vec<LayerSnapshot>,
    /// Live position of the first materialized snapshot.
    base: usize,
}

impl ReselectLayers {
    /// Live positions of the snapshots recorded as selected. Group records
    /// were never inserted, so they do not take a position.
    pub fn target_positions(&self) -> Vec<usize> {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.kind != LayerKind::GroupLayer)
            .enumerate()
            .filter(|(_, snapshot)| snapshot.selected)
            .map(|(offset, _)| self.base + offset)
            .collect()
    }

    /// Snapshots of the load this value belongs to.
    pub fn snapshots(&self) -> &[LayerSnapshot] {
        &self.snapshots
    }

    /// Clear the selection, then select the recorded layers.
    pub fn apply<D: MapDocument>(self, doc: &mut D) {
        let count = doc.layer_count();
        let targets: Vec<usize> = self
            .target_positions()
            .into_iter()
            .filter(|position| *position < count)
            .collect();

        doc.set_selected_layers(&[]);
        if !targets.is_empty() {
            doc.set_selected_layers(&targets);
        }
        crate::debug_log!("RESELECT", "Restored selection {:?}", targets);
    }
}

/// Extension state for one editor session.
pub struct StartupLayers {
    store: LayoutStore,
    registry: LayoutRegistry,
    menu: MenuManager,
    ids: UniqueIdGenerator,
}

impl StartupLayers {
    /// Start with the storage location and menu placement from `config`.
    pub fn from_config<H: EditorHost>(config: &Config, host: &mut H) -> Result<Self> {
        Self::start(LayoutStore::from_config(config), config.menu.clone(), host)
    }

    /// Bootstrap the storage directory, register every known layout, build
    /// the menu and check the selected layout.
    pub fn start<H: EditorHost>(
        store: LayoutStore,
        placement: MenuPlacement,
        host: &mut H,
    ) -> Result<Self> {
        crate::debug_info!("STARTUP", "Starting with storage {:?}", store.dir());
        store.ensure_builtins()?;

        let mut plugin = Self {
            store,
            registry: LayoutRegistry::new(),
            menu: MenuManager::new(placement),
            ids: UniqueIdGenerator::new(),
        };

        let stored = plugin.store.list_config_names()?;
        host.log(&format!(
            "Found startup layers configs: {}",
            stored.iter().cloned().collect::<Vec<_>>().join(", ")
        ));

        let mut layouts = Vec::new();
        for name in [DEFAULT_LAYOUT, DEFAULT_IMAGES_LAYOUT]
            .into_iter()
            .chain(stored.iter().map(String::as_str))
        {
            let entry = LayoutEntry::new(name, &plugin.ids.next());
            layouts.push((entry.action_spec(), name.to_string()));
            plugin.registry.register(entry)?;
        }
        plugin.menu.install(host, &layouts);
        // Save stays disabled until the editor reports an active document.
        host.set_action_enabled(&MenuManager::save_action_id(), false);

        let selection = plugin.store.read_selection()?;
        if plugin.registry.contains(&selection) {
            plugin.registry.switch_to(&selection)?;
            plugin.sync_checked(host);
        } else {
            plugin.warn(
                host,
                &format!("Can't find \"{selection}\", switched to \"{DEFAULT_LAYOUT}\""),
            );
            plugin.switch_layout(DEFAULT_LAYOUT, host)?;
        }

        plugin.registry.log_all();
        Ok(plugin)
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Name of the checked layout.
    pub fn selected_layout(&self) -> Option<&str> {
        self.registry.checked().map(|entry| entry.name.as_str())
    }

    /// Run the menu action registered as `id`.
    ///
    /// Returns `false` if `id` is not one of ours. Failures are reported to
    /// the host and not returned.
    pub fn trigger<D, H>(&mut self, id: &ActionId, doc: Option<&D>, host: &mut H) -> bool
    where
        D: MapDocument,
        H: EditorHost,
    {
        let Some(action) = self.menu.resolve(id).cloned() else {
            return false;
        };
        crate::debug_info!("MENU", "Triggered {:?}", action);

        let result = match action {
            MenuAction::SaveLayout => match doc {
                Some(doc) => self.save_current_layout(doc, host).map(|_| ()),
                None => {
                    log::warn!("Save triggered without an active map, ignoring");
                    Ok(())
                }
            },
            MenuAction::DeleteSelectedLayout => self.delete_selected_layout(host),
            MenuAction::About => {
                self.about(host);
                Ok(())
            }
            MenuAction::SelectLayout(name) => self.switch_layout(&name, host),
        };
        if let Err(err) = result {
            self.report(err, host);
        }
        true
    }

    /// Save the layers of `doc` under a name chosen by the user and make it
    /// the selected layout. Returns the saved name.
    pub fn save_current_layout<D, H>(&mut self, doc: &D, host: &mut H) -> Result<String>
    where
        D: MapDocument,
        H: EditorHost,
    {
        let selection = self.store.read_selection()?;
        let initial = if is_reserved_layout_name(&selection) {
            ""
        } else {
            selection.as_str()
        };

        let clear_selection = host.confirm(
            "Mark all layers in layout as \"not selected\" ?",
            "Remove selection ?",
        );
        let raw = host
            .prompt("Name your layout", initial, "Name")
            .ok_or(LayoutError::UserCancelled)?;

        let name = sanitize_layout_name(&raw);
        if is_reserved_layout_name(&name) {
            return Err(LayoutError::ReservedName(name));
        }
        if name.is_empty() {
            return Err(LayoutError::UserCancelled);
        }

        if self.store.contains(&name)
            && !host.confirm(
                &format!("\"{name}\" already exists. Do you want to overwrite it ?"),
                "Overwrite ?",
            )
        {
            return Err(LayoutError::UserCancelled);
        }

        let text = capture_layout(doc, |snapshot| {
            if clear_selection {
                snapshot.selected = false;
            }
        })?;
        self.store.write_layout(&name, &text)?;

        if !self.registry.contains(&name) {
            self.add_layout_entry(&name, host)?;
        }
        self.switch_layout(&name, host)?;

        host.log(&format!("Saved layout \"{name}\""));
        Ok(name)
    }

    /// Delete the selected layout's file and menu entry, then fall back to
    /// "default".
    pub fn delete_selected_layout<H: EditorHost>(&mut self, host: &mut H) -> Result<()> {
        let selection = self.store.read_selection()?;
        if is_reserved_layout_name(&selection) {
            return Err(LayoutError::ReservedName(selection));
        }

        let question = format!(
            "This will permanently delete \"{}\" file.",
            config_file_name(&selection)
        );
        if !host.confirm(&question, "Are you sure ?") {
            return Err(LayoutError::UserCancelled);
        }

        self.delete_layout(&selection, host)
    }

    /// Delete a user layout without asking. If it was the selected layout,
    /// "default" becomes selected.
    pub fn delete_layout<H: EditorHost>(&mut self, name: &str, host: &mut H) -> Result<()> {
        if is_reserved_layout_name(name) {
            return Err(LayoutError::ReservedName(name.to_string()));
        }
        let was_selected = self.selected_layout() == Some(name);

        let entry = self.registry.delete(name, &self.store)?;
        self.menu.retire(host, &entry.action);
        host.log(&format!("Deleted layout \"{name}\""));

        if was_selected || self.store.read_selection()? == name {
            self.switch_layout(DEFAULT_LAYOUT, host)?;
        }
        Ok(())
    }

    /// Make `name` the layout applied to new maps.
    pub fn switch_layout<H: EditorHost>(&mut self, name: &str, host: &mut H) -> Result<()> {
        self.registry.switch_to(name)?;
        self.store.write_selection(name)?;
        self.sync_checked(host);
        host.log(&format!("Switched to layout \"{name}\""));
        Ok(())
    }

    /// Show where layouts are stored. The text is mirrored to the console
    /// and returned.
    pub fn about<H: EditorHost>(&self, host: &mut H) -> String {
        let message = format!(
            "Startup layers {version}\n\
             Configuration files are stored in \"{dir}\".\n\
             Deleting \"{options}\" and creating a new map restores the starter \
             layouts (\"{blank}\" and \"{one}\") if they were deleted.\n\n\
             This message is also printed to the console.",
            version = crate::VERSION,
            dir = self.store.dir().display(),
            options = OPTIONS_FILE_NAME,
            blank = BLANK_LAYOUT,
            one = ONE_OBJECT_LAYER_LAYOUT,
        );
        let rule = "=".repeat(ABOUT_RULE_WIDTH);
        let framed = format!("{rule}\n{message}\n{rule}");
        log::info!("{framed}");
        host.log(&framed);
        host.alert(&message, ABOUT_ACTION);
        message
    }

    /// Enable Save only while a document is active.
    pub fn on_active_document_changed<H: EditorHost>(&self, has_document: bool, host: &mut H) {
        crate::debug_log!("EVENTS", "Active document changed, present: {}", has_document);
        host.set_action_enabled(&MenuManager::save_action_id(), has_document);
    }

    /// Build the selected layout inside a freshly created document.
    ///
    /// The layout is inserted above the editor's placeholder layer, which is
    /// then removed. The returned value restores the recorded selection and
    /// should be run once, on the document's next selection change.
    pub fn on_document_created<D, H>(&mut self, doc: &mut D, host: &mut H) -> Result<ReselectLayers>
    where
        D: MapDocument,
        H: EditorHost,
    {
        if self.store.ensure_builtins()? {
            self.register_new_layouts(host)?;
            self.switch_layout(DEFAULT_LAYOUT, host)?;
        }

        let selection = self.store.read_selection()?;
        let text = match self.store.read_layout(&selection) {
            Ok(text) => text,
            Err(LayoutError::NotFound(name)) => {
                self.warn(
                    host,
                    &format!("Can't find \"{name}\", switched to \"{DEFAULT_LAYOUT}\""),
                );
                self.switch_layout(DEFAULT_LAYOUT, host)?;
                self.store.read_layout(DEFAULT_LAYOUT)?
            }
            Err(err) => return Err(err),
        };

        let initial = doc.layer_count();
        let snapshots = decode_layout(doc, &text, initial)?;
        let removed = initial > 0 && doc.remove_layer_at(0).is_some();
        let base = if removed { initial - 1 } else { initial };

        crate::debug_info!(
            "EVENTS",
            "New map built from {:?}: {} records, placeholder removed: {}",
            selection,
            snapshots.len(),
            removed
        );
        Ok(ReselectLayers { snapshots, base })
    }

    /// Turn an error into host feedback.
    pub fn report<H: EditorHost>(&mut self, err: LayoutError, host: &mut H) {
        match err {
            LayoutError::UserCancelled => {
                crate::debug_log!("EVENTS", "Operation cancelled");
            }
            err @ LayoutError::ReservedName(_) => {
                let message = err.to_string();
                log::warn!("{message}");
                host.alert(&message, DIALOG_TITLE);
            }
            LayoutError::NotFound(name) => {
                self.warn(
                    host,
                    &format!("Can't find \"{name}\", switched to \"{DEFAULT_LAYOUT}\""),
                );
                if let Err(fallback) = self.switch_layout(DEFAULT_LAYOUT, host) {
                    log::error!("Falling back to {DEFAULT_LAYOUT:?} failed: {fallback}");
                    host.alert(&fallback.to_string(), DIALOG_TITLE);
                }
            }
            other => {
                let message = other.to_string();
                log::error!("{message}");
                host.alert(&message, DIALOG_TITLE);
            }
        }
    }

    fn warn<H: EditorHost>(&self, host: &mut H, message: &str) {
        log::warn!("{message}");
        host.warn(message);
    }

    fn sync_checked<H: EditorHost>(&self, host: &mut H) {
        for entry in self.registry.entries_ordered() {
            host.set_action_checked(&entry.action, entry.checked);
        }
    }

    fn add_layout_entry<H: EditorHost>(&mut self, name: &str, host: &mut H) -> Result<()> {
        let entry = LayoutEntry::new(name, &self.ids.next());
        let spec = entry.action_spec();
        self.registry.register(entry)?;
        self.menu.add_layout(host, &spec, name);
        Ok(())
    }

    /// Add menu entries for stored layouts that appeared since startup.
    fn register_new_layouts<H: EditorHost>(&mut self, host: &mut H) -> Result<()> {
        for name in self.store.list_config_names()? {
            if !self.registry.contains(&name) {
                self.add_layout_entry(&name, host)?;
            }
        }
        Ok(())
    }
}
