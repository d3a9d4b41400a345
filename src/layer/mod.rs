//! Layer snapshots: the persistable part of one live layer.
//!
//! A [`LayerSnapshot`] is created transiently while saving (from a live
//! layer) or loading (from a layout record) and is never stored as an
//! object, only as text through [`codec`].

pub mod codec;
mod color;

pub use color::{Color, ParseColorError};

use crate::error::{LayoutError, Result};
use crate::host::{LiveLayer, PropertyValue};
use serde::{Deserialize, Serialize};

/// Custom layer property that carries the stacking depth.
pub const DEPTH_PROPERTY: &str = "depth";

/// Kind of a layer, serialized with the editor's type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LayerKind {
    TileLayer,
    ImageLayer,
    #[default]
    ObjectLayer,
    GroupLayer,
}

impl LayerKind {
    /// Kind of a live layer, or `None` unless exactly one predicate holds.
    pub fn of<L: LiveLayer>(layer: &L) -> Option<Self> {
        let flags = [
            (layer.is_tile_layer(), LayerKind::TileLayer),
            (layer.is_image_layer(), LayerKind::ImageLayer),
            (layer.is_object_layer(), LayerKind::ObjectLayer),
            (layer.is_group_layer(), LayerKind::GroupLayer),
        ];
        let mut matching = flags.iter().filter(|(is, _)| *is).map(|(_, kind)| *kind);
        match (matching.next(), matching.next()) {
            (Some(kind), None) => Some(kind),
            _ => None,
        }
    }

    /// Editor type name, as written in layout records.
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::TileLayer => "TileLayer",
            LayerKind::ImageLayer => "ImageLayer",
            LayerKind::ObjectLayer => "ObjectLayer",
            LayerKind::GroupLayer => "GroupLayer",
        }
    }
}

/// Persistable attributes of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerSnapshot {
    pub name: String,
    /// `0.0..=1.0`
    pub opacity: f64,
    pub tint_color: Color,
    pub visible: bool,
    pub locked: bool,
    pub selected: bool,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Application-defined stacking depth, stored as a custom layer property.
    #[serde(deserialize_with = "lenient_depth")]
    pub depth: f64,
}

/// Older layouts stored the raw `depth` property, which may be any value.
/// Non-numbers load as 0, the same as when capturing a live layer.
fn lenient_depth<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or_else(|| {
        log::warn!("Non-numeric {DEPTH_PROPERTY} {value} in layout record, loading 0");
        0.0
    }))
}

impl Default for LayerSnapshot {
    /// A visible, unlocked, untinted object layer named "all".
    fn default() -> Self {
        Self {
            name: "all".to_string(),
            opacity: 1.0,
            tint_color: Color::WHITE,
            visible: true,
            locked: false,
            selected: false,
            kind: LayerKind::ObjectLayer,
            depth: 0.0,
        }
    }
}

impl LayerSnapshot {
    /// Copy the persistable attributes of a live layer.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownLayerKind`] when the layer does not report
    /// exactly one known kind.
    pub fn from_live_layer<L: LiveLayer>(layer: &L) -> Result<Self> {
        let kind = LayerKind::of(layer)
            .ok_or_else(|| LayoutError::UnknownLayerKind(layer.name().to_string()))?;

        let depth = match layer.property(DEPTH_PROPERTY) {
            None => 0.0,
            Some(value) => value.as_f64().unwrap_or_else(|| {
                log::warn!(
                    "Layer {:?} has a non-numeric {DEPTH_PROPERTY} property {:?}, saving 0",
                    layer.name(),
                    value
                );
                0.0
            }),
        };

        Ok(Self {
            name: layer.name().to_string(),
            opacity: layer.opacity(),
            tint_color: layer.tint_color(),
            visible: layer.visible(),
            locked: layer.locked(),
            selected: layer.selected(),
            kind,
            depth,
        })
    }

    /// Build a new live layer from this snapshot.
    ///
    /// Group layers are not supported: a warning is logged and `None` is
    /// returned so the caller skips this record.
    pub fn to_live_layer<L: LiveLayer>(&self) -> Option<L> {
        if self.kind == LayerKind::GroupLayer {
            log::warn!(
                "Group layers are not supported, skipping layer {:?}",
                self.name
            );
            return None;
        }

        let mut layer = L::new_of_kind(self.kind);
        layer.set_name(&self.name);
        layer.set_opacity(self.opacity);
        layer.set_tint_color(self.tint_color);
        layer.set_visible(self.visible);
        layer.set_locked(self.locked);
        layer.set_selected(self.selected);
        layer.set_property(DEPTH_PROPERTY, PropertyValue::Float(self.depth));
        Some(layer)
    }

    /// Check the numeric invariants of a snapshot.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(LayoutError::MalformedRecord(format!(
                "layer {:?} has opacity {} outside 0..=1",
                self.name, self.opacity
            )));
        }
        if !self.depth.is_finite() {
            return Err(LayoutError::MalformedRecord(format!(
                "layer {:?} has a non-finite depth",
                self.name
            )));
        }
        Ok(())
    }
}
