//! Scene elements pending compilation.
//!
//! An [`Element`] pairs an opaque geometry fragment with its material
//! fragment and layer name. Elements are built once by upstream encoders and
//! consumed exactly once by the scene compiler.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Layer assigned when the upstream element carries none.
pub const DEFAULT_LAYER: &str = "Default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Mesh,
    Line,
    Camera,
}

/// One scene object pending compilation.
///
/// `geometry` is an opaque serialized fragment carrying a `uuid` field for
/// meshes and lines, or camera parameters (a [`View`]) for cameras.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub geometry: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Value>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl Element {
    /// Mesh element. The layer name is mirrored into the attribute table
    /// under `layer`, where the viewer expects it.
    pub fn mesh(
        geometry: Value,
        material: Value,
        mut attributes: Map<String, Value>,
        layer: Option<String>,
    ) -> Self {
        let layer_name = layer.clone().unwrap_or_else(|| DEFAULT_LAYER.to_string());
        attributes.insert("layer".to_string(), Value::String(layer_name));
        Self {
            kind: ElementKind::Mesh,
            geometry,
            material: Some(material),
            attributes,
            layer,
        }
    }

    /// Polyline element. Lines carry no attribute table beyond the layer.
    pub fn line(geometry: Value, material: Value, layer: Option<String>) -> Self {
        let layer_name = layer.clone().unwrap_or_else(|| DEFAULT_LAYER.to_string());
        let mut attributes = Map::new();
        attributes.insert("layer".to_string(), Value::String(layer_name));
        Self {
            kind: ElementKind::Line,
            geometry,
            material: Some(material),
            attributes,
            layer,
        }
    }

    /// Camera element. Cameras never reach the geometry or material arrays;
    /// they only populate the document's view list.
    pub fn camera(view: &View) -> Result<Self> {
        Ok(Self {
            kind: ElementKind::Camera,
            geometry: serde_json::to_value(view)?,
            material: None,
            attributes: Map::new(),
            layer: None,
        })
    }

    pub fn layer_name(&self) -> &str {
        self.layer.as_deref().unwrap_or(DEFAULT_LAYER)
    }
}

/// A named camera position: where the eye sits and what it looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub eye: [f64; 3],
    pub target: [f64; 3],
}

/// Zip parallel attribute name/value lists into an attribute table.
/// The lists must be the same length.
pub fn attributes_from_pairs(names: &[String], values: &[String]) -> Result<Map<String, Value>> {
    if names.len() != values.len() {
        return Err(Error::AttributeCountMismatch {
            names: names.len(),
            values: values.len(),
        });
    }
    Ok(names
        .iter()
        .zip(values)
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mesh_constructor_seeds_layer_attribute() {
        let element = Element::mesh(
            json!({"uuid": "geo-1"}),
            json!({"type": "MeshBasicMaterial"}),
            Map::new(),
            Some("Walls".to_string()),
        );
        assert_eq!(element.attributes["layer"], json!("Walls"));
        assert_eq!(element.layer_name(), "Walls");
    }

    #[test]
    fn missing_layer_defaults() {
        let element = Element::line(json!({"uuid": "geo-2"}), json!({}), None);
        assert_eq!(element.layer_name(), DEFAULT_LAYER);
        assert_eq!(element.attributes["layer"], json!(DEFAULT_LAYER));
    }

    #[test]
    fn attribute_pairs_must_balance() {
        let names = vec!["a".to_string(), "b".to_string()];
        let values = vec!["1".to_string()];
        assert!(matches!(
            attributes_from_pairs(&names, &values),
            Err(Error::AttributeCountMismatch {
                names: 2,
                values: 1
            })
        ));
    }

    #[test]
    fn attribute_pairs_zip_in_order() {
        let names = vec!["a".to_string(), "b".to_string()];
        let values = vec!["1".to_string(), "2".to_string()];
        let table = attributes_from_pairs(&names, &values).unwrap();
        assert_eq!(table["a"], json!("1"));
        assert_eq!(table["b"], json!("2"));
    }

    #[test]
    fn camera_round_trips_view_parameters() {
        let view = View {
            name: "front".to_string(),
            eye: [0.0, -10.0, 2.0],
            target: [0.0, 0.0, 0.0],
        };
        let element = Element::camera(&view).unwrap();
        let back: View = serde_json::from_value(element.geometry).unwrap();
        assert_eq!(back, view);
    }
}
