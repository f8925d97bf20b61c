//! Statically-typed scene document tree, rendered to the three.js
//! "Object" scene format (4.3) in one serialization pass.

use serde::Serialize;
use serde_json::Value;

use crate::element::View;
use crate::error::Result;
use crate::material::MaterialFragment;

pub const FORMAT_VERSION: f64 = 4.3;
pub const FORMAT_TYPE: &str = "Object";
pub const GENERATOR: &str = "scenepack";

/// Row-major identity transform. Every exported node is emitted in world
/// coordinates, so the matrix is always identity.
pub const IDENTITY_MATRIX: [i32; 16] = [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1];

/// The compiled scene document.
///
/// `geometries` holds the opaque fragments in mesh-then-line input order;
/// `materials` holds the deduplicated fragments in first-seen order. Every
/// child node's `geometry`/`material` reference resolves into those arrays.
#[derive(Debug, Serialize)]
pub struct SceneDocument {
    pub metadata: Metadata,
    pub geometries: Vec<Value>,
    pub materials: Vec<MaterialFragment>,
    pub object: SceneNode,
}

impl SceneDocument {
    /// Render the whole document to a JSON string in memory.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub version: f64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub generator: &'static str,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            kind: FORMAT_TYPE,
            generator: GENERATOR,
        }
    }
}

/// The root scene-graph node.
#[derive(Debug, Serialize)]
pub struct SceneNode {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub matrix: [i32; 16],
    pub children: Vec<ChildNode>,
    #[serde(rename = "userData")]
    pub user_data: SceneUserData,
}

/// One child per geometry, referencing its geometry and resolved material
/// by uuid.
#[derive(Debug, Serialize)]
pub struct ChildNode {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: String,
    pub material: String,
    pub matrix: [i32; 16],
    #[serde(rename = "userData")]
    pub user_data: Value,
}

#[derive(Debug, Serialize)]
pub struct SceneUserData {
    pub views: Vec<View>,
    pub layers: Vec<LayerEntry>,
}

#[derive(Debug, Serialize)]
pub struct LayerEntry {
    pub name: String,
}
