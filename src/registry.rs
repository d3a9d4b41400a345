//! Named layout registry.
//!
//! One [`LayoutEntry`] per layout shown in the menu. The registry keeps the
//! entries in registration order and guarantees that at most one of them is
//! checked; [`LayoutRegistry::switch_to`] is the only way to change that.

use crate::error::{LayoutError, Result};
use crate::menu::{ActionId, ActionSpec, layout_action_name, layout_label};
use crate::store::LayoutStore;
use startup_layers_config::is_reserved_layout_name;
use std::collections::HashMap;

/// A layout as it appears in the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub name: String,
    pub label: String,
    pub action: ActionId,
    pub checked: bool,
}

impl LayoutEntry {
    /// Entry for `name` with the action suffix `unique`.
    pub fn new(name: &str, unique: &str) -> Self {
        Self {
            name: name.to_string(),
            label: layout_label(name),
            action: ActionId::new(layout_action_name(name, unique)),
            checked: false,
        }
    }

    /// Checkable menu action for this entry.
    pub fn action_spec(&self) -> ActionSpec {
        ActionSpec {
            id: self.action.clone(),
            label: self.label.clone(),
            checkable: true,
        }
    }
}

/// All known layouts, by name.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    /// All entries indexed by layout name
    entries: HashMap<String, LayoutEntry>,

    /// Layout names in registration order
    order: Vec<String>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, unchecked.
    pub fn register(&mut self, mut entry: LayoutEntry) -> Result<()> {
        if self.entries.contains_key(&entry.name) {
            return Err(LayoutError::DuplicateName(entry.name));
        }
        entry.checked = false;
        self.order.push(entry.name.clone());
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Check `name` and uncheck everything else.
    pub fn switch_to(&mut self, name: &str) -> Result<&LayoutEntry> {
        if !self.entries.contains_key(name) {
            return Err(LayoutError::NotFound(name.to_string()));
        }
        for entry in self.entries.values_mut() {
            entry.checked = entry.name == name;
        }
        crate::debug_log!("REGISTRY", "Switched to {:?}", name);
        self.entries
            .get(name)
            .ok_or_else(|| LayoutError::NotFound(name.to_string()))
    }

    /// Delete the backing file of `name`, then forget the entry.
    ///
    /// A file that is already gone counts as removed (with a warning). If
    /// the removal fails the registry is left untouched.
    pub fn delete(&mut self, name: &str, store: &LayoutStore) -> Result<LayoutEntry> {
        if !self.entries.contains_key(name) {
            return Err(LayoutError::NotFound(name.to_string()));
        }
        if is_reserved_layout_name(name) {
            return Err(LayoutError::ReservedName(name.to_string()));
        }

        if !store.remove_layout(name)? {
            log::warn!(
                "Layout file {:?} was already gone, removing the entry anyway",
                store.config_path(name)
            );
        }

        self.order.retain(|n| n != name);
        self.entries
            .remove(name)
            .ok_or_else(|| LayoutError::NotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&LayoutEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn find_by_action(&self, action: &ActionId) -> Option<&LayoutEntry> {
        self.entries.values().find(|entry| &entry.action == action)
    }

    /// The checked entry, if any.
    pub fn checked(&self) -> Option<&LayoutEntry> {
        self.entries.values().find(|entry| entry.checked)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn entries_ordered(&self) -> Vec<&LayoutEntry> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name))
            .collect()
    }

    /// `(name, checked)` pairs in registration order.
    pub fn list_all(&self) -> Vec<(String, bool)> {
        self.entries_ordered()
            .into_iter()
            .map(|entry| (entry.name.clone(), entry.checked))
            .collect()
    }

    /// Dump every entry to the log.
    pub fn log_all(&self) {
        log::info!("{} registered layouts", self.len());
        for entry in self.entries_ordered() {
            log::info!(
                "  {} {:?} (action {}, label {:?})",
                if entry.checked { "[x]" } else { "[ ]" },
                entry.name,
                entry.action,
                entry.label
            );
        }
    }
}
