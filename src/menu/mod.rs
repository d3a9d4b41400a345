//! Menu integration for startup-layers
//!
//! The extension adds one block to a host menu (by default "File", above
//! "Close"):
//!
//! ```text
//! ----------------------------
//! Save current layers layout
//! layout - default            (checkable, one per known layout)
//! layout - default images
//! layout - ...
//! Delete selected layout
//! About startup layers
//! ----------------------------
//! ```
//!
//! Layouts saved later are inserted directly above "Delete selected layout".

mod actions;

pub use actions::{
    ABOUT_ACTION, DELETE_LAYOUT_ACTION, LAYOUT_LABEL_PREFIX, MenuAction, SAVE_LAYOUT_ACTION,
    layout_action_name, layout_label,
};

use crate::host::EditorHost;
use startup_layers_config::MenuPlacement;
use std::collections::HashMap;
use std::fmt;

/// Name under which an action is registered with the editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        ActionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the editor needs to register an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub id: ActionId,
    pub label: String,
    pub checkable: bool,
}

impl ActionSpec {
    fn plain(name: &str) -> Self {
        ActionSpec {
            id: ActionId::new(name),
            label: name.to_string(),
            checkable: false,
        }
    }
}

/// One element of a menu extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action(ActionId),
    Separator,
}

/// Tracks which registered action id triggers which [`MenuAction`].
pub struct MenuManager {
    placement: MenuPlacement,
    /// Mapping from action ids to actions
    action_map: HashMap<ActionId, MenuAction>,
}

impl MenuManager {
    pub fn new(placement: MenuPlacement) -> Self {
        Self {
            placement,
            action_map: HashMap::new(),
        }
    }

    /// Register the static actions plus the given layout entries and insert
    /// the whole block into the configured menu.
    pub fn install<H: EditorHost>(&mut self, host: &mut H, layouts: &[(ActionSpec, String)]) {
        let save = ActionSpec::plain(SAVE_LAYOUT_ACTION);
        let delete = ActionSpec::plain(DELETE_LAYOUT_ACTION);
        let about = ActionSpec::plain(ABOUT_ACTION);

        let mut items = vec![MenuItem::Separator];

        host.register_action(&save);
        self.action_map.insert(save.id.clone(), MenuAction::SaveLayout);
        items.push(MenuItem::Action(save.id));

        for (spec, name) in layouts {
            host.register_action(spec);
            self.action_map
                .insert(spec.id.clone(), MenuAction::SelectLayout(name.clone()));
            items.push(MenuItem::Action(spec.id.clone()));
        }

        host.register_action(&delete);
        self.action_map
            .insert(delete.id.clone(), MenuAction::DeleteSelectedLayout);
        items.push(MenuItem::Action(delete.id));

        host.register_action(&about);
        self.action_map.insert(about.id.clone(), MenuAction::About);
        items.push(MenuItem::Action(about.id));

        items.push(MenuItem::Separator);

        host.extend_menu(&self.placement.menu, &self.placement.before, &items);
        crate::debug_info!(
            "MENU",
            "Installed {} layout entries into {:?} before {:?}",
            layouts.len(),
            self.placement.menu,
            self.placement.before
        );
    }

    /// Register a layout entry created after startup, above the delete action.
    pub fn add_layout<H: EditorHost>(&mut self, host: &mut H, spec: &ActionSpec, name: &str) {
        host.register_action(spec);
        self.action_map
            .insert(spec.id.clone(), MenuAction::SelectLayout(name.to_string()));
        host.extend_menu(
            &self.placement.menu,
            DELETE_LAYOUT_ACTION,
            &[MenuItem::Action(spec.id.clone())],
        );
    }

    /// Take a layout entry out of the menu.
    pub fn retire<H: EditorHost>(&mut self, host: &mut H, id: &ActionId) {
        self.action_map.remove(id);
        host.retire_action(id);
    }

    /// The action a triggered id stands for.
    pub fn resolve(&self, id: &ActionId) -> Option<&MenuAction> {
        self.action_map.get(id)
    }

    /// Id of the save action, for enabling/disabling it.
    pub fn save_action_id() -> ActionId {
        ActionId::new(SAVE_LAYOUT_ACTION)
    }
}
