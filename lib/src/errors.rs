//! Error types for fragment processing and server configuration.

use std::path::PathBuf;

/// A failure inside a storage engine or while serializing a response.
///
/// Unknown datasets and unresolvable pattern terms are not errors; they are
/// answered with a not-found page and an empty fragment respectively.
#[derive(thiserror::Error, Debug)]
pub enum FragmentError {
    #[error("dictionary store failure: {0}")]
    Dictionary(#[from] rdfdict::DictError),
    #[error("oxigraph store failure: {0}")]
    Storage(#[from] oxigraph::store::StorageError),
    #[error("cannot write response: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Internal(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid base URL '{0}'")]
    BaseUrl(String),
    #[error("invalid dataset name '{0}': names must be non-empty and must not contain '/'")]
    InvalidName(String),
    #[error("dataset '{0}' is registered twice")]
    Duplicate(String),
    #[error("dataset '{name}': unknown data source type '{kind}'")]
    UnknownType { name: String, kind: String },
    #[error("dataset '{name}': invalid settings: {source}")]
    Settings {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("dataset '{name}': unknown RDF format '{format}'")]
    UnknownFormat { name: String, format: String },
    #[error("dataset '{name}' could not be loaded: {source}")]
    Load {
        name: String,
        #[source]
        source: FragmentError,
    },
}
