//! Layout record text format.
//!
//! A layout is stored as the body of a JSON object, without the outer
//! braces, keyed by each layer's position in the stack:
//!
//! ```text
//! "0":
//! {
//! 	"name": "background",
//! 	"opacity": 1.0,
//! 	...
//! },
//! "1":
//! {
//! 	...
//! }
//! ```
//!
//! Keys must be `"0"`, `"1"`, ... without gaps; their numeric order is the
//! insertion order. An empty body is a valid layout with no layers.

use super::LayerSnapshot;
use crate::error::{LayoutError, Result};
use crate::host::MapDocument;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;

const INDENT: &[u8] = b"\t";

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| LayoutError::MalformedRecord(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| LayoutError::MalformedRecord(e.to_string()))
}

/// Serialize snapshots in stack order.
pub fn encode_layout(snapshots: &[LayerSnapshot]) -> Result<String> {
    let mut out = String::new();
    for (index, snapshot) in snapshots.iter().enumerate() {
        snapshot.validate()?;
        if index > 0 {
            out.push_str(",\n");
        }
        out.push_str(&format!("\"{index}\":\n"));
        out.push_str(&to_pretty_json(snapshot)?);
    }
    Ok(out)
}

/// Snapshot every layer of `doc`, bottom to top.
pub fn capture_snapshots<D: MapDocument>(doc: &D) -> Result<Vec<LayerSnapshot>> {
    (0..doc.layer_count())
        .map(|index| {
            let layer = doc.layer_at(index).ok_or_else(|| {
                LayoutError::Host(format!(
                    "layer {index} missing from a document reporting {} layers",
                    doc.layer_count()
                ))
            })?;
            LayerSnapshot::from_live_layer(layer)
        })
        .collect()
}

/// Snapshot `doc`, let `modify` adjust each snapshot, and encode the result.
pub fn capture_layout<D, F>(doc: &D, modify: F) -> Result<String>
where
    D: MapDocument,
    F: FnMut(&mut LayerSnapshot),
{
    let mut snapshots = capture_snapshots(doc)?;
    snapshots.iter_mut().for_each(modify);
    crate::debug_log!("CODEC", "Captured {} layers", snapshots.len());
    encode_layout(&snapshots)
}

/// Parse layout text into snapshots ordered by key.
///
/// # Errors
///
/// [`LayoutError::MalformedRecord`] for invalid JSON, unknown layer types,
/// keys that are not `0..n`, or out-of-range values.
pub fn parse_layout(text: &str) -> Result<Vec<LayerSnapshot>> {
    let wrapped = format!("{{\n{text}\n}}");
    let records: BTreeMap<usize, LayerSnapshot> =
        serde_json::from_str(&wrapped).map_err(|e| LayoutError::MalformedRecord(e.to_string()))?;

    for (expected, index) in records.keys().enumerate() {
        if *index != expected {
            return Err(LayoutError::MalformedRecord(format!(
                "layer keys must be contiguous from 0: expected {expected}, found {index}"
            )));
        }
    }

    let snapshots: Vec<LayerSnapshot> = records.into_values().collect();
    for snapshot in &snapshots {
        snapshot.validate()?;
    }
    Ok(snapshots)
}

/// Rebuild the layers of a layout inside `doc`.
///
/// Layers are inserted starting at `insertion_offset`, in key order. Records
/// that cannot be materialized (group layers) are skipped without leaving a
/// gap. The whole text is parsed before the tree is touched, so a malformed
/// record inserts nothing.
///
/// Returns every parsed snapshot, skipped ones included.
pub fn decode_layout<D: MapDocument>(
    doc: &mut D,
    text: &str,
    insertion_offset: usize,
) -> Result<Vec<LayerSnapshot>> {
    let snapshots = parse_layout(text)?;

    let mut skipped = 0;
    for (index, snapshot) in snapshots.iter().enumerate() {
        match snapshot.to_live_layer::<D::Layer>() {
            Some(layer) => doc.insert_layer_at(insertion_offset + index - skipped, layer)?,
            None => skipped += 1,
        }
    }

    crate::debug_info!(
        "CODEC",
        "Loaded {} of {} layers at offset {}",
        snapshots.len() - skipped,
        snapshots.len(),
        insertion_offset
    );
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Color, LayerKind};

    fn snapshot(name: &str, kind: LayerKind) -> LayerSnapshot {
        LayerSnapshot {
            name: name.to_string(),
            kind,
            ..LayerSnapshot::default()
        }
    }

    #[test]
    fn test_encode_empty_is_empty_text() {
        assert_eq!(encode_layout(&[]).unwrap(), "");
    }

    #[test]
    fn test_encode_format() {
        let text = encode_layout(&[LayerSnapshot {
            selected: true,
            ..LayerSnapshot::default()
        }])
        .unwrap();
        let expected = "\"0\":\n{\n\t\"name\": \"all\",\n\t\"opacity\": 1.0,\n\t\"tintColor\": \"#ffffff\",\n\t\"visible\": true,\n\t\"locked\": false,\n\t\"selected\": true,\n\t\"type\": \"ObjectLayer\",\n\t\"depth\": 0.0\n}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_encode_joins_without_trailing_separator() {
        let text = encode_layout(&[
            snapshot("a", LayerKind::TileLayer),
            snapshot("b", LayerKind::ObjectLayer),
        ])
        .unwrap();
        assert!(text.starts_with("\"0\":\n{"));
        assert!(text.contains("},\n\"1\":\n{"));
        assert!(text.ends_with('}'));
    }

    #[test]
    fn test_parse_orders_numerically() {
        let text = (0..12)
            .rev()
            .map(|i| format!("\"{i}\": {{\"name\": \"layer {i}\"}}"))
            .collect::<Vec<_>>()
            .join(",\n");
        let snapshots = parse_layout(&text).unwrap();
        let names: Vec<_> = snapshots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names[2], "layer 2");
        assert_eq!(names[10], "layer 10");
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_parse_fills_missing_fields_with_defaults() {
        let text = "\"0\": {\"name\": \"bare\", \"type\": \"TileLayer\"}";
        let snapshots = parse_layout(text).unwrap();
        assert_eq!(
            snapshots[0],
            LayerSnapshot {
                name: "bare".to_string(),
                kind: LayerKind::TileLayer,
                ..LayerSnapshot::default()
            }
        );
    }

    #[test]
    fn test_parse_accepts_legacy_integers_and_colors() {
        let text = "\"0\": \n{\n\t\"name\": \"old\",\n\t\"opacity\": 1,\n\t\"tintColor\": \"#80ff0000\",\n\t\"visible\": true,\n\t\"locked\": false,\n\t\"selected\": false,\n\t\"type\": \"ImageLayer\",\n\t\"depth\": 50\n}";
        let snapshot = &parse_layout(text).unwrap()[0];
        assert_eq!(snapshot.opacity, 1.0);
        assert_eq!(snapshot.depth, 50.0);
        assert_eq!(snapshot.tint_color, Color::rgba(255, 0, 0, 128));
    }

    #[test]
    fn test_parse_empty_and_blank() {
        assert!(parse_layout("").unwrap().is_empty());
        assert!(parse_layout("  \n\t").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        for bad in [
            "\"0\": {\"name\": \"x\"",
            "\"0\": {\"type\": \"PolygonLayer\"}",
            "\"1\": {\"name\": \"gap\"}",
            "\"0\": {}, \"2\": {}",
            "\"x\": {}",
            "\"0\": {\"opacity\": 3}",
            "{\"0\": {}}",
        ] {
            assert!(
                matches!(parse_layout(bad), Err(LayoutError::MalformedRecord(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_encode_rejects_invalid_opacity() {
        let mut bad = LayerSnapshot::default();
        bad.opacity = -0.5;
        assert!(encode_layout(&[bad]).is_err());
    }
}
