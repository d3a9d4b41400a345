//! Layout naming rules and storage file names.
//!
//! Covers:
//! - Reserved built-in layout names (`is_reserved_layout_name`)
//! - Layout name → file name mapping (`sanitize_layout_name`, `config_file_name`)
//! - The fixed file names inside the storage directory

use regex::Regex;
use std::sync::OnceLock;

/// Built-in layout shipped with the extension.
pub const DEFAULT_LAYOUT: &str = "default";

/// Built-in layout with image layers, shipped with the extension.
pub const DEFAULT_IMAGES_LAYOUT: &str = "default images";

/// Names that can never be written or deleted by the user.
pub const RESERVED_LAYOUT_NAMES: [&str; 2] = [DEFAULT_LAYOUT, DEFAULT_IMAGES_LAYOUT];

/// Starter layout seeded on first run: no layers at all.
pub const BLANK_LAYOUT: &str = "blank";

/// Starter layout seeded on first run: a single pre-selected object layer.
pub const ONE_OBJECT_LAYER_LAYOUT: &str = "one object layer";

/// Directory name under `<root>/storage`.
pub const STORAGE_SUBDIR: &str = "startup_layers";

/// Single-line file holding the selected layout name.
pub const OPTIONS_FILE_NAME: &str = "options.ini";

/// Extension of layout files (without the dot).
pub const CONFIG_EXTENSION: &str = "config";

/// Longest layout name in bytes: 248 + ".config" = 255, the usual
/// path-component limit.
pub const MAX_LAYOUT_NAME_BYTES: usize = 248;

/// Returns `true` for the built-in names that users may not overwrite or delete.
pub fn is_reserved_layout_name(name: &str) -> bool {
    RESERVED_LAYOUT_NAMES.contains(&name)
}

/// File name of a layout inside the storage directory.
pub fn config_file_name(name: &str) -> String {
    format!("{name}.{CONFIG_EXTENSION}")
}

/// Layout name of a storage file name, or `None` if it is not a layout file.
///
/// A bare `.config` has no usable name and is not a layout file.
pub fn layout_name_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(CONFIG_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|name| !name.is_empty())
}

fn forbidden_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[<>:"/\\|?*\x00-\x1F\x7F-\x9F]"#).expect("forbidden character pattern")
    })
}

fn device_names() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(CON|PRN|AUX|NUL|COM[1-9]|LPT[1-9])$").expect("device name pattern")
    })
}

/// Whitespace trimmed from both ends of a name. U+0085 is a C1 control
/// here and gets replaced like the others.
fn is_trimmed_space(c: char) -> bool {
    c != '\u{85}' && (c.is_whitespace() || c == '\u{feff}')
}

/// Turn user input into a name that is safe to use as a file stem.
///
/// Newlines become spaces, surrounding whitespace is trimmed, characters
/// that are invalid in file names on any supported platform become `_`,
/// Windows device names get a trailing `_`, and the result is cut to
/// [`MAX_LAYOUT_NAME_BYTES`] on a character boundary.
///
/// An empty result means the user gave no usable name.
pub fn sanitize_layout_name(raw: &str) -> String {
    let joined = raw.replace("\r\n", " ").replace('\n', " ");
    let trimmed = joined.trim_matches(is_trimmed_space);
    let mut name = forbidden_chars().replace_all(trimmed, "_").into_owned();
    if device_names().is_match(&name) {
        name.push('_');
    }

    if name.len() > MAX_LAYOUT_NAME_BYTES {
        let mut cut = MAX_LAYOUT_NAME_BYTES;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }
    name
}
