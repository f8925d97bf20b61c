//! Per-face material encoding: a deduplicated color palette plus a face
//! index array mapping every mesh face to a palette slot.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::material::{FaceMaterial, FacePaletteEntry, MaterialFragment, new_uuid};

/// Attribute key under which the face index array is stored, as a CSV
/// string. The viewer reads this back to assign per-face material slots.
pub const INDEX_ATTRIBUTE: &str = "faceMaterialIndexes";

/// Mesh face topology. Quads occupy two material slots because the viewer
/// renders them as two triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    Triangle,
    Quad,
}

/// Output of [`encode`]: the `MeshFaceMaterial` fragment plus the per-face
/// palette indexes (one per triangle, two per quad).
#[derive(Debug, Clone)]
pub struct FaceMaterialSet {
    pub fragment: MaterialFragment,
    pub indexes: Vec<usize>,
}

impl FaceMaterialSet {
    /// Render the index array as a CSV string, one trailing comma per entry
    /// (the viewer's expected wire format).
    pub fn index_csv(&self) -> String {
        self.indexes.iter().map(|i| format!("{i},")).collect()
    }

    /// Merge the index array into an element's attribute table under
    /// [`INDEX_ATTRIBUTE`].
    pub fn merge_into(&self, attributes: &mut Map<String, Value>) {
        attributes.insert(INDEX_ATTRIBUTE.to_string(), Value::String(self.index_csv()));
    }
}

/// Encode one color per face into a palette + index array.
///
/// Faces drive the iteration; when the color list is shorter, the cursor
/// clamps to the last color (longest-list iteration). An empty color list is
/// an error; an empty face list yields an empty palette and index array.
pub fn encode(faces: &[FaceKind], colors: &[Color]) -> Result<FaceMaterialSet> {
    if colors.is_empty() {
        return Err(Error::EmptyColorList);
    }

    let mut palette: Vec<String> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut indexes = Vec::with_capacity(faces.len());

    for (cursor, face) in faces.iter().enumerate() {
        let color = colors[cursor.min(colors.len() - 1)];
        let key = color.hex();
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            palette.push(key);
            palette.len() - 1
        });
        indexes.push(slot);
        if *face == FaceKind::Quad {
            indexes.push(slot);
        }
    }

    let fragment = MaterialFragment::MeshFaceMaterial(FaceMaterial {
        uuid: new_uuid(),
        materials: palette.into_iter().map(FacePaletteEntry::new).collect(),
    });
    Ok(FaceMaterialSet { fragment, indexes })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_len(set: &FaceMaterialSet) -> usize {
        match &set.fragment {
            MaterialFragment::MeshFaceMaterial(m) => m.materials.len(),
            other => panic!("unexpected fragment: {other:?}"),
        }
    }

    #[test]
    fn two_triangles_one_color() {
        let set = encode(
            &[FaceKind::Triangle, FaceKind::Triangle],
            &[Color::rgb(255, 0, 0)],
        )
        .unwrap();
        assert_eq!(palette_len(&set), 1);
        assert_eq!(set.indexes, vec![0, 0]);
    }

    #[test]
    fn quads_get_two_slots() {
        let set = encode(
            &[FaceKind::Triangle, FaceKind::Quad],
            &[Color::rgb(255, 0, 0), Color::rgb(0, 255, 0)],
        )
        .unwrap();
        assert_eq!(palette_len(&set), 2);
        assert_eq!(set.indexes, vec![0, 1, 1]);
    }

    #[test]
    fn cursor_clamps_to_last_color() {
        let set = encode(
            &[FaceKind::Triangle, FaceKind::Triangle, FaceKind::Triangle],
            &[Color::rgb(255, 0, 0), Color::rgb(0, 255, 0)],
        )
        .unwrap();
        assert_eq!(set.indexes, vec![0, 1, 1]);
    }

    #[test]
    fn palette_entries_are_unique() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let set = encode(&[FaceKind::Triangle; 4], &[red, blue, red, blue]).unwrap();
        assert_eq!(palette_len(&set), 2);
        assert_eq!(set.indexes, vec![0, 1, 0, 1]);
        assert!(set.indexes.iter().all(|&i| i < 2));
    }

    #[test]
    fn index_count_matches_face_topology() {
        let faces = [FaceKind::Quad, FaceKind::Triangle, FaceKind::Quad];
        let set = encode(&faces, &[Color::WHITE]).unwrap();
        // two quads at 2 slots each + one triangle
        assert_eq!(set.indexes.len(), 5);
    }

    #[test]
    fn empty_colors_is_an_error() {
        assert!(matches!(
            encode(&[FaceKind::Triangle], &[]),
            Err(Error::EmptyColorList)
        ));
    }

    #[test]
    fn no_faces_yields_empty_output() {
        let set = encode(&[], &[Color::WHITE]).unwrap();
        assert_eq!(palette_len(&set), 0);
        assert!(set.indexes.is_empty());
        assert_eq!(set.index_csv(), "");
    }

    #[test]
    fn csv_has_trailing_commas() {
        let set = encode(&[FaceKind::Triangle, FaceKind::Triangle], &[Color::WHITE]).unwrap();
        assert_eq!(set.index_csv(), "0,0,");
    }

    #[test]
    fn merge_into_writes_the_index_attribute() {
        let set = encode(&[FaceKind::Triangle], &[Color::WHITE]).unwrap();
        let mut attributes = Map::new();
        set.merge_into(&mut attributes);
        assert_eq!(attributes[INDEX_ATTRIBUTE], Value::String("0,".to_string()));
    }
}
