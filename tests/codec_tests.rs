mod common;

use common::layer;
use startup_layers::LayoutError;
use startup_layers::host::memory::{MemoryLayer, MemoryMap};
use startup_layers::host::{LiveLayer, MapDocument, PropertyValue};
use startup_layers::layer::codec::{capture_layout, capture_snapshots, decode_layout, encode_layout};
use startup_layers::layer::{Color, DEPTH_PROPERTY, LayerKind, LayerSnapshot};

fn sample_map() -> MemoryMap {
    let mut sky = layer(LayerKind::ImageLayer, "sky", false, -1000.0);
    sky.set_opacity(0.5);
    sky.set_locked(true);

    let mut ground = layer(LayerKind::TileLayer, "ground", false, -200.0);
    ground.set_tint_color(Color::rgba(16, 32, 64, 128));

    let mut hidden = layer(LayerKind::ObjectLayer, "collision", false, 12.5);
    hidden.set_visible(false);
    hidden.set_opacity(0.25);

    let mut plain = MemoryLayer::named(LayerKind::TileLayer, "no depth");
    plain.set_property(DEPTH_PROPERTY, PropertyValue::Int(7));

    MemoryMap::from_layers(vec![
        sky,
        ground,
        layer(LayerKind::ObjectLayer, "instances", true, 0.0),
        hidden,
        plain,
    ])
}

#[test]
fn test_round_trip_reconstructs_every_field() {
    let original = sample_map();
    let text = capture_layout(&original, |_| {}).unwrap();

    let mut rebuilt = MemoryMap::new();
    let snapshots = decode_layout(&mut rebuilt, &text, 0).unwrap();

    assert_eq!(snapshots.len(), original.layer_count());
    assert_eq!(
        capture_snapshots(&rebuilt).unwrap(),
        capture_snapshots(&original).unwrap()
    );
    assert_eq!(
        rebuilt.layer_names(),
        vec!["sky", "ground", "instances", "collision", "no depth"]
    );
}

#[test]
fn test_capture_modifier_clears_selection() {
    let original = sample_map();
    let text = capture_layout(&original, |snapshot| snapshot.selected = false).unwrap();

    let mut rebuilt = MemoryMap::new();
    decode_layout(&mut rebuilt, &text, 0).unwrap();
    assert!(rebuilt.selected_indices().is_empty());
    assert!(original.layer_at(2).unwrap().selected());
}

#[test]
fn test_group_record_is_skipped_without_gap() {
    let text = encode_layout(&[
        LayerSnapshot {
            name: "bottom".to_string(),
            kind: LayerKind::TileLayer,
            ..LayerSnapshot::default()
        },
        LayerSnapshot {
            name: "folder".to_string(),
            kind: LayerKind::GroupLayer,
            ..LayerSnapshot::default()
        },
        LayerSnapshot {
            name: "top".to_string(),
            ..LayerSnapshot::default()
        },
    ])
    .unwrap();

    let mut map = MemoryMap::with_placeholder();
    let snapshots = decode_layout(&mut map, &text, 1).unwrap();

    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[1].kind, LayerKind::GroupLayer);
    assert_eq!(map.layer_names(), vec!["Tile Layer 1", "bottom", "top"]);
    assert!(map.layer_at(1).unwrap().is_tile_layer());
    assert!(map.layer_at(2).unwrap().is_object_layer());
}

#[test]
fn test_decode_preserves_key_order_past_nine() {
    let snapshots: Vec<LayerSnapshot> = (0..12u8)
        .map(|i| LayerSnapshot {
            name: format!("layer {i}"),
            depth: f64::from(i),
            ..LayerSnapshot::default()
        })
        .collect();
    let text = encode_layout(&snapshots).unwrap();

    let mut map = MemoryMap::new();
    decode_layout(&mut map, &text, 0).unwrap();
    let names = map.layer_names();
    assert_eq!(names.len(), 12);
    for (i, name) in names.iter().enumerate() {
        assert_eq!(*name, format!("layer {i}"));
    }
}

#[test]
fn test_malformed_record_leaves_tree_untouched() {
    let good = encode_layout(&[LayerSnapshot::default()]).unwrap();
    let text = format!("{good},\n\"1\":\n{{\n\t\"type\": \"PolygonLayer\"\n}}");

    let mut map = MemoryMap::with_placeholder();
    let err = decode_layout(&mut map, &text, 1).unwrap_err();
    assert!(matches!(err, LayoutError::MalformedRecord(_)));
    assert_eq!(map.layer_names(), vec!["Tile Layer 1"]);
}

#[test]
fn test_insertion_past_end_is_a_host_error() {
    let text = encode_layout(&[LayerSnapshot::default()]).unwrap();
    let mut map = MemoryMap::new();
    assert!(matches!(
        decode_layout(&mut map, &text, 3),
        Err(LayoutError::Host(_))
    ));
}

#[test]
fn test_unknown_live_kind_fails_capture() {
    let map = MemoryMap::from_layers(vec![
        MemoryLayer::named(LayerKind::TileLayer, "fine"),
        MemoryLayer::with_predicates("odd", [false, true, true, false]),
    ]);
    assert!(matches!(
        capture_layout(&map, |_| {}),
        Err(LayoutError::UnknownLayerKind(name)) if name == "odd"
    ));
}

#[test]
fn test_empty_map_encodes_to_empty_layout() {
    let text = capture_layout(&MemoryMap::new(), |_| {}).unwrap();
    assert_eq!(text, "");

    let mut map = MemoryMap::with_placeholder();
    assert!(decode_layout(&mut map, &text, 1).unwrap().is_empty());
    assert_eq!(map.layer_count(), 1);
}

#[test]
fn test_layout_with_text_depth_still_loads() {
    let text = "\"0\":\n{\n\t\"name\": \"walls\",\n\t\"type\": \"TileLayer\",\n\t\"depth\": \"5\"\n},\n\"1\":\n{\n\t\"name\": \"props\",\n\t\"depth\": 3\n}";

    let mut map = MemoryMap::new();
    let snapshots = decode_layout(&mut map, text, 0).unwrap();
    assert_eq!(map.layer_names(), vec!["walls", "props"]);
    assert_eq!(snapshots[0].depth, 0.0);
    assert_eq!(
        map.layer_at(1).unwrap().property(DEPTH_PROPERTY),
        Some(PropertyValue::Float(3.0))
    );
}
