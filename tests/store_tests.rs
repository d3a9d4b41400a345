use startup_layers::layer::codec::parse_layout;
use startup_layers::layer::{LayerKind, LayerSnapshot};
use startup_layers::{LayoutError, LayoutStore};
use startup_layers_config::{
    BLANK_LAYOUT, DEFAULT_IMAGES_LAYOUT, DEFAULT_LAYOUT, ONE_OBJECT_LAYER_LAYOUT,
};
use std::fs;
use tempfile::tempdir;

fn dir_listing(store: &LayoutStore) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(store.dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_bootstrap_seeds_starter_layouts() {
    let temp = tempdir().unwrap();
    let store = LayoutStore::new(temp.path().join("storage").join("startup_layers"));

    assert!(store.ensure_builtins().unwrap());
    assert_eq!(
        dir_listing(&store),
        vec!["blank.config", "one object layer.config", "options.ini"]
    );
    assert_eq!(store.read_selection().unwrap(), DEFAULT_LAYOUT);
    assert_eq!(store.read_layout(BLANK_LAYOUT).unwrap(), "");

    let one = parse_layout(&store.read_layout(ONE_OBJECT_LAYER_LAYOUT).unwrap()).unwrap();
    assert_eq!(
        one,
        vec![LayerSnapshot {
            selected: true,
            ..LayerSnapshot::default()
        }]
    );
    assert_eq!(one[0].kind, LayerKind::ObjectLayer);
}

#[test]
fn test_bootstrap_is_idempotent() {
    let temp = tempdir().unwrap();
    let store = LayoutStore::new(temp.path());
    assert!(store.ensure_builtins().unwrap());

    store.write_selection("combat").unwrap();
    store.write_layout(BLANK_LAYOUT, "\"0\": {}").unwrap();
    let before = dir_listing(&store);

    assert!(!store.ensure_builtins().unwrap());
    assert_eq!(dir_listing(&store), before);
    assert_eq!(store.read_selection().unwrap(), "combat");
    assert_eq!(store.read_layout(BLANK_LAYOUT).unwrap(), "\"0\": {}");
}

#[test]
fn test_missing_options_restores_only_deleted_starters() {
    let temp = tempdir().unwrap();
    let store = LayoutStore::new(temp.path());
    store.ensure_builtins().unwrap();

    store.write_layout(ONE_OBJECT_LAYER_LAYOUT, "").unwrap();
    store.remove_layout(BLANK_LAYOUT).unwrap();
    fs::remove_file(store.options_path()).unwrap();

    assert!(store.ensure_builtins().unwrap());
    assert!(store.contains(BLANK_LAYOUT));
    // Existing starters are not overwritten.
    assert_eq!(store.read_layout(ONE_OBJECT_LAYER_LAYOUT).unwrap(), "");
}

#[test]
fn test_reserved_names_never_touch_disk() {
    let temp = tempdir().unwrap();
    let store = LayoutStore::new(temp.path());
    store.ensure_builtins().unwrap();
    let before = dir_listing(&store);

    for name in [DEFAULT_LAYOUT, DEFAULT_IMAGES_LAYOUT] {
        assert!(matches!(
            store.write_layout(name, ""),
            Err(LayoutError::ReservedName(n)) if n == name
        ));
        assert!(matches!(
            store.remove_layout(name),
            Err(LayoutError::ReservedName(_))
        ));
        assert!(!parse_layout(&store.read_layout(name).unwrap())
            .unwrap()
            .is_empty());
    }
    assert_eq!(dir_listing(&store), before);
}

#[test]
fn test_stored_copy_of_builtin_is_ignored() {
    let temp = tempdir().unwrap();
    let store = LayoutStore::new(temp.path());
    fs::write(store.config_path(DEFAULT_LAYOUT), "\"0\": {\"name\": \"hijack\"}").unwrap();
    fs::write(store.config_path("town"), "").unwrap();

    let names: Vec<_> = store.list_config_names().unwrap().into_iter().collect();
    assert_eq!(names, vec!["town"]);
    let default = parse_layout(&store.read_layout(DEFAULT_LAYOUT).unwrap()).unwrap();
    assert!(default.iter().all(|snapshot| snapshot.name != "hijack"));
}

#[test]
fn test_bare_extension_file_is_not_a_layout() {
    let temp = tempdir().unwrap();
    let store = LayoutStore::new(temp.path());
    fs::write(temp.path().join(".config"), "\"0\": {\"name\": \"nameless\"}").unwrap();
    fs::write(store.config_path("town"), "").unwrap();

    let names: Vec<_> = store.list_config_names().unwrap().into_iter().collect();
    assert_eq!(names, vec!["town"]);
}

#[test]
fn test_empty_name_reads_default_layout() {
    let temp = tempdir().unwrap();
    let store = LayoutStore::new(temp.path());
    assert_eq!(
        store.read_layout("").unwrap(),
        store.read_layout(DEFAULT_LAYOUT).unwrap()
    );
}
