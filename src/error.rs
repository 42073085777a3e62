use camino::Utf8PathBuf;

/// Failures at the edges: reading reports and profiles, writing results.
#[derive(Debug, thiserror::Error)]
pub enum MutsenseError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid mutation report {path}: {source}")]
    Json {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid rules profile {path}: {source}")]
    Toml {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, MutsenseError>;
