//! Contracts between startup-layers and the editor that hosts it.
//!
//! The editor owns the live map document, its layer objects, dialogs, the
//! console and the menu bar. These traits describe exactly what this crate
//! needs from each of them, so the layout engine and the orchestration can
//! be driven by a real editor binding, by the terminal host of the CLI, or
//! by the in-memory host in [`memory`] that the tests use.

pub mod memory;

use crate::error::Result;
use crate::layer::{Color, LayerKind};
use crate::menu::{ActionId, ActionSpec, MenuItem};

/// Value of a custom layer property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    /// Numeric value of the property, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(v) => Some(*v as f64),
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Bool(_) | PropertyValue::String(_) => None,
        }
    }
}

/// A layer object in the editor's live layer tree.
///
/// Exactly one of the four kind predicates is expected to be `true`.
pub trait LiveLayer: Sized {
    /// Create a fresh, detached layer of `kind`.
    ///
    /// Never called with [`LayerKind::GroupLayer`]; group layers are not
    /// persisted.
    fn new_of_kind(kind: LayerKind) -> Self;

    fn is_tile_layer(&self) -> bool;
    fn is_image_layer(&self) -> bool;
    fn is_object_layer(&self) -> bool;
    fn is_group_layer(&self) -> bool;

    fn name(&self) -> &str;
    fn set_name(&mut self, name: &str);

    /// Opacity in `0.0..=1.0`
    fn opacity(&self) -> f64;
    fn set_opacity(&mut self, opacity: f64);

    fn tint_color(&self) -> Color;
    fn set_tint_color(&mut self, color: Color);

    fn visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn locked(&self) -> bool;
    fn set_locked(&mut self, locked: bool);

    fn selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);

    /// Custom property attached to the layer, if set.
    fn property(&self, key: &str) -> Option<PropertyValue>;
    fn set_property(&mut self, key: &str, value: PropertyValue);
}

/// The live map document: an ordered stack of layers, index 0 at the bottom.
pub trait MapDocument {
    type Layer: LiveLayer;

    fn layer_count(&self) -> usize;

    fn layer_at(&self, index: usize) -> Option<&Self::Layer>;

    /// Insert `layer` so that it ends up at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::Host`] when the editor refuses the
    /// insertion (e.g. `index` past the end of the stack).
    fn insert_layer_at(&mut self, index: usize, layer: Self::Layer) -> Result<()>;

    /// Remove and return the layer at `index`.
    fn remove_layer_at(&mut self, index: usize) -> Option<Self::Layer>;

    /// Replace the editor's layer selection. An empty slice clears it.
    fn set_selected_layers(&mut self, indices: &[usize]);
}

/// Dialogs, console and menu bar of the editor.
pub trait EditorHost {
    /// Yes/no question. `false` when declined or dismissed.
    fn confirm(&mut self, text: &str, title: &str) -> bool;

    /// Text input. `None` when dismissed.
    fn prompt(&mut self, label: &str, initial: &str, title: &str) -> Option<String>;

    /// Blocking message box.
    fn alert(&mut self, text: &str, title: &str);

    /// Line in the editor's console.
    fn log(&mut self, message: &str);

    /// Warning line in the editor's console.
    fn warn(&mut self, message: &str);

    /// Make an action known to the editor. Must precede any other call
    /// naming the same id.
    fn register_action(&mut self, action: &ActionSpec);

    fn set_action_enabled(&mut self, id: &ActionId, enabled: bool);

    fn set_action_checked(&mut self, id: &ActionId, checked: bool);

    /// Take an action out of service. Editors that cannot unregister actions
    /// disable and relabel it instead.
    fn retire_action(&mut self, id: &ActionId);

    /// Insert `items`, in order, into `menu` directly before the existing
    /// entry `before` (appended when `before` is absent).
    fn extend_menu(&mut self, menu: &str, before: &str, items: &[MenuItem]);
}
