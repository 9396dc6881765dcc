use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("thumbnail request was superseded")]
    Aborted,
    #[error("thumbnail segment has no URIs")]
    NoUris,
    #[error("request for '{uri}' failed: {source}")]
    Request {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request for '{uri}' returned HTTP {status}")]
    Status { uri: String, status: u16 },
    #[error("'{uri}' is an offline asset and cannot be fetched over HTTP")]
    Offline { uri: String },
    #[error("container has no '{box_type}' box")]
    MissingBox { box_type: String },
    #[error("container box at offset {offset} is truncated or malformed")]
    MalformedBox { offset: usize },
    #[error("unsupported thumbnail image type '{mime}'")]
    UnsupportedFormat { mime: String },
    #[error("failed to decode thumbnail image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("thumbnail resolution failed: {message}")]
    Resolve { message: String },
}

impl ThumbnailError {
    /// Superseded requests are expected and never reported.
    pub fn is_aborted(&self) -> bool {
        matches!(self, ThumbnailError::Aborted)
    }
}
