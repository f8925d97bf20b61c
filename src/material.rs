//! Typed material fragments and the per-element material encoders.
//!
//! Encoders produce one fragment per element with a fresh uuid; they never
//! deduplicate. Deduplication happens once, in the scene compiler, using the
//! per-type [`MaterialFragment::equivalent`] rule (uuids excluded).

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::color::Color;

pub const DEFAULT_SHININESS: f64 = 30.0;
pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_LINEWIDTH: f64 = 1.0;

/// three.js DoubleSide. All exported geometry renders double-sided.
const SIDE_DOUBLE: u8 = 2;

/// Flat shading constant for Lambert materials.
const SHADING_FLAT: u8 = 1;

/// A material fragment, tagged by its declared `type` on the wire.
///
/// The scene compiler treats incoming fragments as opaque JSON and
/// deserializes them through this enum; an unknown `type` surfaces as a
/// malformed-fragment error rather than a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialFragment {
    MeshFaceMaterial(FaceMaterial),
    MeshPhongMaterial(PhongMaterial),
    MeshLambertMaterial(LambertMaterial),
    MeshBasicMaterial(BasicMaterial),
    LineBasicMaterial(LineMaterial),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaceMaterial {
    pub uuid: String,
    pub materials: Vec<FacePaletteEntry>,
}

/// One slot of a face-material palette: a double-sided basic material
/// holding a single hex color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacePaletteEntry {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub side: u8,
    pub color: String,
}

impl FacePaletteEntry {
    pub fn new(color: String) -> Self {
        Self {
            uuid: new_uuid(),
            kind: "MeshBasicMaterial".to_string(),
            side: SIDE_DOUBLE,
            color,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhongMaterial {
    pub uuid: String,
    pub color: String,
    pub ambient: String,
    pub emissive: String,
    pub specular: String,
    pub shininess: f64,
    pub opacity: f64,
    pub transparent: bool,
    pub wireframe: bool,
    pub side: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LambertMaterial {
    pub uuid: String,
    pub color: String,
    pub ambient: String,
    pub emissive: String,
    pub side: u8,
    pub opacity: f64,
    pub transparent: bool,
    pub shading: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasicMaterial {
    pub uuid: String,
    pub color: String,
    pub transparent: bool,
    pub side: u8,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineMaterial {
    pub uuid: String,
    pub color: String,
    pub linewidth: f64,
    pub opacity: f64,
}

impl MaterialFragment {
    /// Shiny mesh material. Optional inputs fall back to their declared
    /// defaults: black ambient/emissive, dark gray specular, shininess 30,
    /// opacity 1.0.
    pub fn phong(
        color: Color,
        ambient: Option<Color>,
        emissive: Option<Color>,
        specular: Option<Color>,
        shininess: Option<f64>,
        opacity: Option<f64>,
    ) -> Self {
        let mut opacity = opacity.unwrap_or(DEFAULT_OPACITY);
        if !(0.0..=1.0).contains(&opacity) {
            warn!(opacity, "opacity must be between 0 and 1; resetting to 1");
            opacity = DEFAULT_OPACITY;
        }
        // An opaque opacity input combined with a translucent diffuse color
        // means the caller encoded transparency in the alpha channel.
        if opacity == DEFAULT_OPACITY && color.is_translucent() {
            opacity = color.alpha_opacity();
        }
        Self::MeshPhongMaterial(PhongMaterial {
            uuid: new_uuid(),
            color: color.hex(),
            ambient: ambient.unwrap_or(Color::BLACK).hex(),
            emissive: emissive.unwrap_or(Color::BLACK).hex(),
            specular: specular.unwrap_or(Color::DARK_GRAY).hex(),
            shininess: shininess.unwrap_or(DEFAULT_SHININESS),
            opacity,
            transparent: true,
            wireframe: false,
            side: SIDE_DOUBLE,
        })
    }

    /// Matte mesh material with flat shading.
    pub fn lambert(
        color: Color,
        ambient: Option<Color>,
        emissive: Option<Color>,
        opacity: Option<f64>,
    ) -> Self {
        let opacity = effective_opacity(color, opacity);
        Self::MeshLambertMaterial(LambertMaterial {
            uuid: new_uuid(),
            color: color.hex(),
            ambient: ambient.unwrap_or(Color::BLACK).hex(),
            emissive: emissive.unwrap_or(Color::BLACK).hex(),
            side: SIDE_DOUBLE,
            opacity,
            transparent: opacity < DEFAULT_OPACITY,
            shading: SHADING_FLAT,
        })
    }

    /// Unlit mesh material.
    pub fn basic(color: Color, opacity: Option<f64>) -> Self {
        let opacity = effective_opacity(color, opacity);
        Self::MeshBasicMaterial(BasicMaterial {
            uuid: new_uuid(),
            color: color.hex(),
            transparent: opacity < DEFAULT_OPACITY,
            side: SIDE_DOUBLE,
            opacity,
        })
    }

    /// Polyline material.
    pub fn line(color: Color, linewidth: Option<f64>, opacity: Option<f64>) -> Self {
        Self::LineBasicMaterial(LineMaterial {
            uuid: new_uuid(),
            color: color.hex(),
            linewidth: linewidth.unwrap_or(DEFAULT_LINEWIDTH),
            opacity: effective_opacity(color, opacity),
        })
    }

    pub fn uuid(&self) -> &str {
        match self {
            Self::MeshFaceMaterial(m) => &m.uuid,
            Self::MeshPhongMaterial(m) => &m.uuid,
            Self::MeshLambertMaterial(m) => &m.uuid,
            Self::MeshBasicMaterial(m) => &m.uuid,
            Self::LineBasicMaterial(m) => &m.uuid,
        }
    }

    /// Structural equivalence: same declared type and every type-specific
    /// field equal by value. Generated uuids are excluded, including those of
    /// face-palette entries.
    pub fn equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MeshFaceMaterial(a), Self::MeshFaceMaterial(b)) => {
                a.materials.len() == b.materials.len()
                    && a.materials
                        .iter()
                        .zip(&b.materials)
                        .all(|(x, y)| x.kind == y.kind && x.side == y.side && x.color == y.color)
            }
            (Self::MeshPhongMaterial(a), Self::MeshPhongMaterial(b)) => {
                a.color == b.color
                    && a.ambient == b.ambient
                    && a.emissive == b.emissive
                    && a.specular == b.specular
                    && a.shininess == b.shininess
                    && a.opacity == b.opacity
                    && a.transparent == b.transparent
                    && a.wireframe == b.wireframe
                    && a.side == b.side
            }
            (Self::MeshLambertMaterial(a), Self::MeshLambertMaterial(b)) => {
                a.color == b.color
                    && a.ambient == b.ambient
                    && a.emissive == b.emissive
                    && a.side == b.side
                    && a.opacity == b.opacity
                    && a.transparent == b.transparent
                    && a.shading == b.shading
            }
            (Self::MeshBasicMaterial(a), Self::MeshBasicMaterial(b)) => {
                a.color == b.color
                    && a.transparent == b.transparent
                    && a.side == b.side
                    && a.opacity == b.opacity
            }
            (Self::LineBasicMaterial(a), Self::LineBasicMaterial(b)) => {
                a.color == b.color && a.linewidth == b.linewidth && a.opacity == b.opacity
            }
            _ => false,
        }
    }

    /// Serialize to the opaque fragment form consumed by the scene compiler.
    pub fn to_value(&self) -> serde_json::Value {
        // A closed set of unit-keyed structs cannot fail to serialize.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Opacity defaulting shared by the non-Phong encoders: explicit value wins,
/// otherwise a translucent diffuse alpha channel, otherwise fully opaque.
fn effective_opacity(color: Color, opacity: Option<f64>) -> f64 {
    match opacity {
        Some(o) if o != DEFAULT_OPACITY => o,
        _ if color.is_translucent() => color.alpha_opacity(),
        _ => DEFAULT_OPACITY,
    }
}

pub(crate) fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phong_red() -> MaterialFragment {
        MaterialFragment::phong(Color::rgb(255, 0, 0), None, None, None, None, None)
    }

    #[test]
    fn phong_defaults() {
        let MaterialFragment::MeshPhongMaterial(m) = phong_red() else {
            panic!("wrong variant");
        };
        assert_eq!(m.color, "#FF0000");
        assert_eq!(m.ambient, "#000000");
        assert_eq!(m.emissive, "#000000");
        assert_eq!(m.specular, "#A9A9A9");
        assert_eq!(m.shininess, 30.0);
        assert_eq!(m.opacity, 1.0);
        assert!(m.transparent);
        assert!(!m.wireframe);
        assert_eq!(m.side, 2);
    }

    #[test]
    fn phong_out_of_range_opacity_resets_to_one() {
        let MaterialFragment::MeshPhongMaterial(m) =
            MaterialFragment::phong(Color::WHITE, None, None, None, None, Some(1.5))
        else {
            panic!("wrong variant");
        };
        assert_eq!(m.opacity, 1.0);
    }

    #[test]
    fn phong_derives_opacity_from_alpha() {
        let MaterialFragment::MeshPhongMaterial(m) = MaterialFragment::phong(
            Color::rgba(10, 20, 30, 51),
            None,
            None,
            None,
            None,
            Some(1.0),
        ) else {
            panic!("wrong variant");
        };
        assert_eq!(m.opacity, 0.2);
        assert!(m.transparent);
    }

    #[test]
    fn explicit_opacity_beats_alpha_channel() {
        let MaterialFragment::MeshBasicMaterial(m) =
            MaterialFragment::basic(Color::rgba(0, 0, 0, 51), Some(0.75))
        else {
            panic!("wrong variant");
        };
        assert_eq!(m.opacity, 0.75);
        assert!(m.transparent);
    }

    #[test]
    fn equivalence_ignores_uuid() {
        let a = phong_red();
        let b = phong_red();
        assert_ne!(a.uuid(), b.uuid());
        assert!(a.equivalent(&b));
    }

    #[test]
    fn equivalence_requires_matching_fields() {
        let a = phong_red();
        let b = MaterialFragment::phong(Color::rgb(0, 255, 0), None, None, None, None, None);
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn equivalence_requires_matching_type() {
        let a = MaterialFragment::basic(Color::WHITE, None);
        let b = MaterialFragment::line(Color::WHITE, None, None);
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn face_palettes_compare_entrywise() {
        let palette = |colors: &[&str]| {
            MaterialFragment::MeshFaceMaterial(FaceMaterial {
                uuid: new_uuid(),
                materials: colors
                    .iter()
                    .map(|c| FacePaletteEntry::new(c.to_string()))
                    .collect(),
            })
        };
        assert!(palette(&["#FF0000", "#00FF00"]).equivalent(&palette(&["#FF0000", "#00FF00"])));
        assert!(!palette(&["#FF0000"]).equivalent(&palette(&["#FF0000", "#00FF00"])));
        assert!(!palette(&["#FF0000"]).equivalent(&palette(&["#0000FF"])));
    }

    #[test]
    fn wire_shape_is_type_tagged() {
        let value = phong_red().to_value();
        assert_eq!(value["type"], "MeshPhongMaterial");
        assert_eq!(value["color"], "#FF0000");
        assert!(value["uuid"].is_string());

        let back: MaterialFragment = serde_json::from_value(value).unwrap();
        assert!(matches!(back, MaterialFragment::MeshPhongMaterial(_)));
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let value = serde_json::json!({"type": "MeshStandardMaterial", "uuid": "x"});
        assert!(serde_json::from_value::<MaterialFragment>(value).is_err());
    }
}
