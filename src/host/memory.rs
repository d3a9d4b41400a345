//! In-memory editor host.
//!
//! A complete, dependency-free implementation of the host traits. The CLI
//! uses it to decode layouts outside the editor, and the tests use it to
//! script dialog answers and inspect every host call afterwards.

use super::{EditorHost, LiveLayer, MapDocument, PropertyValue};
use crate::error::{LayoutError, Result};
use crate::events::Signal;
use crate::layer::{Color, LayerKind};
use crate::menu::{ActionId, ActionSpec, MenuItem};
use std::collections::{HashMap, VecDeque};

/// Upper bound on chained selection notifications in one flush.
const MAX_EVENT_ROUNDS: usize = 16;

/// Name the editor gives the layer of a freshly created map.
pub const PLACEHOLDER_LAYER_NAME: &str = "Tile Layer 1";

/// A layer held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryLayer {
    /// Tile, image, object, group.
    predicates: [bool; 4],
    name: String,
    opacity: f64,
    tint_color: Color,
    visible: bool,
    locked: bool,
    selected: bool,
    properties: HashMap<String, PropertyValue>,
}

impl MemoryLayer {
    /// A layer reporting arbitrary kind predicates, for exercising hosts
    /// that misreport a layer's kind.
    pub fn with_predicates(name: &str, predicates: [bool; 4]) -> Self {
        Self {
            predicates,
            name: name.to_string(),
            opacity: 1.0,
            tint_color: Color::WHITE,
            visible: true,
            locked: false,
            selected: false,
            properties: HashMap::new(),
        }
    }

    /// A named layer of `kind`.
    pub fn named(kind: LayerKind, name: &str) -> Self {
        let mut layer = Self::new_of_kind(kind);
        layer.name = name.to_string();
        layer
    }
}

impl LiveLayer for MemoryLayer {
    fn new_of_kind(kind: LayerKind) -> Self {
        let predicates = match kind {
            LayerKind::TileLayer => [true, false, false, false],
            LayerKind::ImageLayer => [false, true, false, false],
            LayerKind::ObjectLayer => [false, false, true, false],
            LayerKind::GroupLayer => [false, false, false, true],
        };
        Self::with_predicates("", predicates)
    }

    fn is_tile_layer(&self) -> bool {
        self.predicates[0]
    }

    fn is_image_layer(&self) -> bool {
        self.predicates[1]
    }

    fn is_object_layer(&self) -> bool {
        self.predicates[2]
    }

    fn is_group_layer(&self) -> bool {
        self.predicates[3]
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    fn tint_color(&self) -> Color {
        self.tint_color
    }

    fn set_tint_color(&mut self, color: Color) {
        self.tint_color = color;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        self.properties.get(key).cloned()
    }

    fn set_property(&mut self, key: &str, value: PropertyValue) {
        self.properties.insert(key.to_string(), value);
    }
}

/// A map document held in memory. The selection is the set of layers whose
/// `selected` flag is set.
#[derive(Debug, Default)]
pub struct MemoryMap {
    layers: Vec<MemoryLayer>,
    selection_dirty: bool,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map as the editor creates it: one tile layer, not selected.
    pub fn with_placeholder() -> Self {
        Self::from_layers(vec![MemoryLayer::named(
            LayerKind::TileLayer,
            PLACEHOLDER_LAYER_NAME,
        )])
    }

    pub fn from_layers(layers: Vec<MemoryLayer>) -> Self {
        Self {
            layers,
            selection_dirty: false,
        }
    }

    pub fn layers(&self) -> &[MemoryLayer] {
        &self.layers
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut MemoryLayer> {
        self.layers.get_mut(index)
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name.as_str()).collect()
    }

    /// Indices of the selected layers, bottom to top.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| layer.selected)
            .map(|(index, _)| index)
            .collect()
    }

    /// Whether the selection may have changed since the last call.
    pub fn take_selection_dirty(&mut self) -> bool {
        std::mem::take(&mut self.selection_dirty)
    }
}

impl MapDocument for MemoryMap {
    type Layer = MemoryLayer;

    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_at(&self, index: usize) -> Option<&MemoryLayer> {
        self.layers.get(index)
    }

    fn insert_layer_at(&mut self, index: usize, layer: MemoryLayer) -> Result<()> {
        if index > self.layers.len() {
            return Err(LayoutError::Host(format!(
                "cannot insert layer {:?} at {index}, the map has {} layers",
                layer.name,
                self.layers.len()
            )));
        }
        self.layers.insert(index, layer);
        self.selection_dirty = true;
        Ok(())
    }

    fn remove_layer_at(&mut self, index: usize) -> Option<MemoryLayer> {
        if index >= self.layers.len() {
            return None;
        }
        self.selection_dirty = true;
        Some(self.layers.remove(index))
    }

    fn set_selected_layers(&mut self, indices: &[usize]) {
        for (index, layer) in self.layers.iter_mut().enumerate() {
            layer.selected = indices.contains(&index);
        }
        self.selection_dirty = true;
    }
}

/// A map document plus its selection-changed notification.
#[derive(Default)]
pub struct MemoryDocument {
    pub map: MemoryMap,
    pub selection_changed: Signal<MemoryMap>,
}

impl MemoryDocument {
    pub fn new(map: MemoryMap) -> Self {
        Self {
            map,
            selection_changed: Signal::new(),
        }
    }

    /// Deliver pending selection-changed notifications, including the ones
    /// raised by the handlers themselves. Returns the number delivered.
    pub fn flush_events(&mut self) -> usize {
        let mut delivered = 0;
        while delivered < MAX_EVENT_ROUNDS && self.map.take_selection_dirty() {
            self.selection_changed.emit(&mut self.map);
            delivered += 1;
        }
        delivered
    }
}

/// State of one registered action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAction {
    pub spec: ActionSpec,
    pub enabled: bool,
    pub checked: bool,
}

/// Dialog kinds recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Confirm(String),
    Prompt { label: String, initial: String },
    Alert(String),
}

/// Editor host with scripted dialog answers.
///
/// Unscripted confirms answer "no" and unscripted prompts are dismissed.
#[derive(Debug, Default)]
pub struct MemoryHost {
    confirm_answers: VecDeque<bool>,
    prompt_answers: VecDeque<Option<String>>,
    pub dialogs: Vec<Dialog>,
    pub console: Vec<String>,
    pub warnings: Vec<String>,
    actions: HashMap<ActionId, RegisteredAction>,
    menus: HashMap<String, Vec<MenuItem>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer of the next confirm dialog.
    pub fn answer_confirm(&mut self, yes: bool) -> &mut Self {
        self.confirm_answers.push_back(yes);
        self
    }

    /// Queue the answer of the next prompt; `None` dismisses it.
    pub fn answer_prompt(&mut self, text: Option<&str>) -> &mut Self {
        self.prompt_answers.push_back(text.map(str::to_string));
        self
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.dialogs
            .iter()
            .filter_map(|dialog| match dialog {
                Dialog::Alert(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn action(&self, id: &ActionId) -> Option<&RegisteredAction> {
        self.actions.get(id)
    }

    pub fn menu(&self, menu: &str) -> &[MenuItem] {
        self.menus.get(menu).map(Vec::as_slice).unwrap_or_default()
    }

    /// Labels of the actions in `menu`, in menu order. Separators are `"-"`.
    pub fn menu_labels(&self, menu: &str) -> Vec<String> {
        self.menu(menu)
            .iter()
            .map(|item| match item {
                MenuItem::Separator => "-".to_string(),
                MenuItem::Action(id) => self
                    .actions
                    .get(id)
                    .map(|action| action.spec.label.clone())
                    .unwrap_or_else(|| id.to_string()),
            })
            .collect()
    }

    /// Labels of every checked action, sorted.
    pub fn checked_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .actions
            .values()
            .filter(|action| action.checked)
            .map(|action| action.spec.label.clone())
            .collect();
        labels.sort();
        labels
    }

    /// Add an existing entry to `menu`, as the editor's own items would be.
    pub fn seed_menu(&mut self, menu: &str, entries: &[&str]) {
        let items = self.menus.entry(menu.to_string()).or_default();
        for entry in entries {
            let spec = ActionSpec {
                id: ActionId::new(*entry),
                label: entry.to_string(),
                checkable: false,
            };
            items.push(MenuItem::Action(spec.id.clone()));
            self.actions.insert(
                spec.id.clone(),
                RegisteredAction {
                    spec,
                    enabled: true,
                    checked: false,
                },
            );
        }
    }
}

impl EditorHost for MemoryHost {
    fn confirm(&mut self, text: &str, _title: &str) -> bool {
        self.dialogs.push(Dialog::Confirm(text.to_string()));
        self.confirm_answers.pop_front().unwrap_or(false)
    }

    fn prompt(&mut self, label: &str, initial: &str, _title: &str) -> Option<String> {
        self.dialogs.push(Dialog::Prompt {
            label: label.to_string(),
            initial: initial.to_string(),
        });
        self.prompt_answers.pop_front().flatten()
    }

    fn alert(&mut self, text: &str, _title: &str) {
        self.dialogs.push(Dialog::Alert(text.to_string()));
    }

    fn log(&mut self, message: &str) {
        self.console.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn register_action(&mut self, action: &ActionSpec) {
        self.actions.insert(
            action.id.clone(),
            RegisteredAction {
                spec: action.clone(),
                enabled: true,
                checked: false,
            },
        );
    }

    fn set_action_enabled(&mut self, id: &ActionId, enabled: bool) {
        if let Some(action) = self.actions.get_mut(id) {
            action.enabled = enabled;
        }
    }

    fn set_action_checked(&mut self, id: &ActionId, checked: bool) {
        if let Some(action) = self.actions.get_mut(id).filter(|a| a.spec.checkable) {
            action.checked = checked;
        }
    }

    fn retire_action(&mut self, id: &ActionId) {
        self.actions.remove(id);
        for items in self.menus.values_mut() {
            items.retain(|item| !matches!(item, MenuItem::Action(existing) if existing == id));
        }
    }

    fn extend_menu(&mut self, menu: &str, before: &str, items: &[MenuItem]) {
        let entries = self.menus.entry(menu.to_string()).or_default();
        let anchor = entries
            .iter()
            .position(|item| matches!(item, MenuItem::Action(id) if id.as_str() == before));
        match anchor {
            Some(position) => {
                for (offset, item) in items.iter().enumerate() {
                    entries.insert(position + offset, item.clone());
                }
            }
            None => entries.extend_from_slice(items),
        }
    }
}
