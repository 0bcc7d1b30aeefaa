use std::path::PathBuf;

use thiserror::Error;

use crate::source::TypeIdentity;

pub type Result<T> = std::result::Result<T, FacadeError>;

/// Everything that can stop a facade from being generated or loaded.
///
/// None of these are worth retrying: they point at a defect in the reflected
/// catalog or at a build that ran out of order.
#[derive(Error, Debug)]
pub enum FacadeError {
    #[error("Alias '{alias}' is requested by both {first} and {second}")]
    DuplicateAlias {
        alias: String,
        first: TypeIdentity,
        second: TypeIdentity,
    },

    #[error("Alias '{alias}' points at '{name}' in module '{module}', which the engine does not provide")]
    UnresolvedSource {
        module: String,
        name: String,
        alias: String,
    },

    #[error("'{name}' in module '{module}' is claimed by both {first_type} and {second_type}")]
    AmbiguousSource {
        module: String,
        name: String,
        first_type: String,
        second_type: String,
    },

    #[error("Facade was generated from catalog {artifact}, but the engine runs catalog {engine}")]
    StaleArtifact { artifact: String, engine: String },

    #[error("Alias '{alias}' is not a usable script identifier: {reason}")]
    InvalidAlias { alias: String, reason: &'static str },

    #[error("Catalog entry '{alias}' has an unusable {field} {value:?}: {reason}")]
    InvalidEntry {
        alias: String,
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Modules '{first}' and '{second}' would both be imported as '{binding}'")]
    BindingCollision {
        binding: String,
        first: String,
        second: String,
    },

    #[error("Invalid facade config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Alias '{0}' is not exported by the facade")]
    UnknownAlias(String),

    #[error("Failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FacadeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
