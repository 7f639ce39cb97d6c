use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("unsupported platform host: {0}")]
    UnsupportedPlatform(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing metadata tag: {0}")]
    MissingMetadata(&'static str),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("malformed manifest: {0}")]
    Manifest(String),
}
