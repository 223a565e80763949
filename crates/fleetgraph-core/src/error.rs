use thiserror::Error;

/// Failures at the boundary where upstream resource objects are normalized.
///
/// The graph pipeline itself is infallible; these only surface from the adapter.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),
    #[error("Resource of kind {kind} has no metadata.name")]
    MissingName { kind: String },
    #[error("Malformed resource snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}
