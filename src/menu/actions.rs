//! Menu action definitions for startup-layers
//!
//! This module defines the `MenuAction` enum that represents every action
//! the extension adds to the editor's menu bar.

/// Action name (and label) of the save action.
pub const SAVE_LAYOUT_ACTION: &str = "Save current layers layout";

/// Action name (and label) of the delete action.
pub const DELETE_LAYOUT_ACTION: &str = "Delete selected layout";

/// Action name (and label) of the about action.
pub const ABOUT_ACTION: &str = "About startup layers";

/// Prefix of every layout entry's menu label.
pub const LAYOUT_LABEL_PREFIX: &str = "layout - ";

/// Actions that can be triggered from the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Snapshot the active map's layers into a named layout
    SaveLayout,
    /// Delete the currently selected layout
    DeleteSelectedLayout,
    /// Show information about the extension
    About,
    /// Make the named layout the one applied to new maps
    SelectLayout(String),
}

/// Menu label of a layout entry.
pub fn layout_label(name: &str) -> String {
    format!("{LAYOUT_LABEL_PREFIX}{name}")
}

/// Action name of a layout entry.
///
/// Spaces are not allowed in the editor's action names, and two layouts may
/// collide once spaces become underscores, hence the unique suffix.
pub fn layout_action_name(name: &str, unique: &str) -> String {
    format!("layout_{}_{}", name.replace(' ', "_"), unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_label() {
        assert_eq!(layout_label("combat"), "layout - combat");
    }

    #[test]
    fn test_layout_action_name() {
        assert_eq!(
            layout_action_name("default images", "000001"),
            "layout_default_images_000001"
        );
    }
}
