use thiserror::Error;

use crate::path::PathError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected equal numbers of attribute names and values ({names} names, {values} values)")]
    AttributeCountMismatch { names: usize, values: usize },
    #[error("at least one face color is required")]
    EmptyColorList,
    #[error("element has no material fragment")]
    MissingMaterial,
    #[error("geometry fragment has no uuid field")]
    MissingGeometryId,
    #[error("malformed {kind} fragment: {source}")]
    MalformedFragment {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid output path: {0}")]
    Path(#[from] PathError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Adapter for `map_err` when deserializing a collaborator-supplied
    /// fragment, so the report names which fragment kind was malformed.
    pub(crate) fn malformed(kind: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::MalformedFragment { kind, source }
    }
}
