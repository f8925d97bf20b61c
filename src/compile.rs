//! The scene compiler: a single pass over a flat element list that
//! partitions by kind, deduplicates materials globally, builds scene-graph
//! children, and assembles the final document.
//!
//! Each stage hands an immutable record to the next; one invocation owns all
//! of its state, so the pipeline is safe to call from anywhere.

use std::fs;

use itertools::Itertools;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::document::{
    ChildNode, IDENTITY_MATRIX, LayerEntry, Metadata, SceneDocument, SceneNode, SceneUserData,
};
use crate::element::{DEFAULT_LAYER, Element, ElementKind, View};
use crate::error::{Error, Result};
use crate::material::{MaterialFragment, new_uuid};
use crate::path::validate_output_path;

/// Message returned when the caller has not asked for a write yet.
pub const PROMPT_MESSAGE: &str = "set the write flag to true to write the scene JSON to disk";
/// Message returned after a successful write.
pub const SUCCESS_MESSAGE: &str = "scene JSON written successfully";

/// A mesh or line element after partitioning: its opaque geometry fragment,
/// the geometry's uuid, its parsed material, and the node userData it will
/// carry.
struct GeometryEntry {
    geometry: Value,
    geometry_id: String,
    material: MaterialFragment,
    user_data: Value,
}

/// Output of the partition stage. Bucket order preserves input order.
struct Partitioned {
    meshes: Vec<GeometryEntry>,
    lines: Vec<GeometryEntry>,
    views: Vec<View>,
    /// Distinct layer names in first-seen order.
    layers: Vec<String>,
}

/// Output of the dedup stage.
struct DedupedMaterials {
    /// Deduplicated fragments in first-seen order. Duplicates are dropped,
    /// never null-padded.
    kept: Vec<MaterialFragment>,
    /// Resolved material uuid per geometry, mesh entries first then lines.
    resolved: Vec<String>,
}

/// Compile a flat element list into a scene document.
///
/// Pure in-memory transformation; file I/O belongs to [`export`] or the
/// caller.
pub fn compile(elements: Vec<Element>) -> Result<SceneDocument> {
    let parts = partition(elements)?;
    let deduped = dedup_materials(&parts.meshes, &parts.lines);
    let children = build_children(&parts, &deduped.resolved);

    debug!(
        geometries = parts.meshes.len() + parts.lines.len(),
        materials = deduped.kept.len(),
        views = parts.views.len(),
        layers = parts.layers.len(),
        "compiled scene"
    );

    let geometries = parts
        .meshes
        .into_iter()
        .chain(parts.lines)
        .map(|entry| entry.geometry)
        .collect();

    Ok(SceneDocument {
        metadata: Metadata::default(),
        geometries,
        materials: deduped.kept,
        object: SceneNode {
            uuid: new_uuid(),
            kind: "Scene",
            matrix: IDENTITY_MATRIX,
            children,
            user_data: SceneUserData {
                views: parts.views,
                layers: parts
                    .layers
                    .into_iter()
                    .map(|name| LayerEntry { name })
                    .collect(),
            },
        },
    })
}

/// Validate the target path, compile, serialize fully in memory, then write.
///
/// When `write` is false nothing happens and the prompt message is returned,
/// so a host can wire the compiler up before committing to disk output.
/// Returns the status message on success; on any error no file is touched.
pub fn export(write: bool, path: &str, elements: Vec<Element>) -> Result<String> {
    if !write {
        return Ok(PROMPT_MESSAGE.to_string());
    }

    let target = validate_output_path(path)?;
    let document = compile(elements)?;
    let rendered = document.to_json()?;
    fs::write(&target, rendered)?;

    debug!(target = %target.display(), "wrote scene JSON");
    Ok(SUCCESS_MESSAGE.to_string())
}

fn partition(elements: Vec<Element>) -> Result<Partitioned> {
    let mut meshes = Vec::new();
    let mut lines = Vec::new();
    let mut views: Vec<View> = Vec::new();
    let mut layer_names = Vec::new();

    for element in elements {
        let Element {
            kind,
            geometry,
            material,
            attributes,
            layer,
        } = element;

        match kind {
            ElementKind::Camera => {
                let view: View =
                    serde_json::from_value(geometry).map_err(Error::malformed("camera"))?;
                if views.iter().any(|v| v.name == view.name) {
                    warn!(name = %view.name, "dropping view with duplicate name");
                    continue;
                }
                views.push(view);
            }
            ElementKind::Mesh | ElementKind::Line => {
                let layer_name = layer.unwrap_or_else(|| DEFAULT_LAYER.to_string());
                layer_names.push(layer_name.clone());

                let material = material.ok_or(Error::MissingMaterial)?;
                let material: MaterialFragment =
                    serde_json::from_value(material).map_err(Error::malformed("material"))?;
                let geometry_id = geometry
                    .get("uuid")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or(Error::MissingGeometryId)?;

                let user_data = if kind == ElementKind::Mesh {
                    Value::Object(attributes)
                } else {
                    json!({ "layer": layer_name })
                };
                let entry = GeometryEntry {
                    geometry,
                    geometry_id,
                    material,
                    user_data,
                };
                if kind == ElementKind::Mesh {
                    meshes.push(entry);
                } else {
                    lines.push(entry);
                }
            }
        }
    }

    Ok(Partitioned {
        meshes,
        lines,
        views,
        layers: layer_names.into_iter().unique().collect(),
    })
}

/// Global material dedup: mesh materials first, then line materials, all in
/// one shared collection keyed by the per-type structural equality rule.
fn dedup_materials(meshes: &[GeometryEntry], lines: &[GeometryEntry]) -> DedupedMaterials {
    let mut kept: Vec<MaterialFragment> = Vec::new();
    let mut resolved = Vec::with_capacity(meshes.len() + lines.len());

    for entry in meshes.iter().chain(lines) {
        let id = match kept.iter().find(|m| m.equivalent(&entry.material)) {
            Some(existing) => existing.uuid().to_string(),
            None => {
                let id = entry.material.uuid().to_string();
                kept.push(entry.material.clone());
                id
            }
        };
        resolved.push(id);
    }

    DedupedMaterials { kept, resolved }
}

/// One child node per geometry, meshes then lines, the child index running
/// across both groups.
fn build_children(parts: &Partitioned, resolved: &[String]) -> Vec<ChildNode> {
    let mut children = Vec::with_capacity(resolved.len());
    for (index, entry) in parts.meshes.iter().chain(&parts.lines).enumerate() {
        let (kind, name) = if index < parts.meshes.len() {
            ("Mesh", format!("mesh{index}"))
        } else {
            ("Line", format!("line {index}"))
        };
        children.push(ChildNode {
            uuid: new_uuid(),
            name,
            kind,
            geometry: entry.geometry_id.clone(),
            material: resolved[index].clone(),
            matrix: IDENTITY_MATRIX,
            user_data: entry.user_data.clone(),
        });
    }
    children
}
