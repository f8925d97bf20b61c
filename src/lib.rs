//! Compiles CAD scene elements (meshes, polylines, cameras) into a single
//! three.js Object-format (4.3) scene JSON document.
//!
//! Three operations make up the public surface: per-face material encoding
//! ([`face_material::encode`]), per-element material encoding (the
//! [`material::MaterialFragment`] constructors), and scene compilation
//! ([`compile()`] / [`export()`]). Encoders hand the compiler opaque JSON
//! fragments; the compiler deduplicates materials, wires up cross-reference
//! identifiers, and emits one well-formed document.

/// ARGB colors and the hex encoding used as palette keys.
pub mod color;
/// The scene compiler: partition, material dedup, document assembly, write.
pub mod compile;
/// Typed output document tree (three.js Object format 4.3).
pub mod document;
/// Scene elements pending compilation.
pub mod element;
/// Error definitions
pub mod error;
/// Per-face material encoding (color palette + face index array).
pub mod face_material;
/// Typed material fragments and the per-element encoders.
pub mod material;
/// Output path validation rules.
pub mod path;

pub use compile::{compile, export};
pub use error::{Error, Result};
