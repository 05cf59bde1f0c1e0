use thiserror::Error;

/// Problems found while building the run configuration.
///
/// All of these surface once at startup, before any record is fetched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid field path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("unknown analysis mode `{mode}` for field `{field}` (expected presence, count or raw)")]
    UnknownMode { field: String, mode: String },

    #[error("analysis mode for field `{field}` must be a string")]
    ModeNotString { field: String },

    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("failed to read config file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file `{path}`: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// A single record could not be retrieved.
///
/// Never fatal for a batch: the identifier simply produces no row.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog returned HTTP {status} for `{id}`")]
    Status { id: String, status: u16 },

    #[error("request for `{id}` failed: {message}")]
    Transport { id: String, message: String },

    #[error("response for `{id}` is not valid JSON: {source}")]
    Decode {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("response for `{id}` has no `message` payload")]
    MissingMessage { id: String },
}
