use thiserror::Error;

/// Failures surfaced by the catalog services. The HTTP layer maps the
/// not-found variants to 404 and everything else to 500.
#[derive(Debug, Error)]
pub enum Error {
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("story not found: {topic}/{story}")]
    StoryNotFound { topic: String, story: String },

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("github api error ({status}): {message}")]
    Github { status: u16, message: String },

    #[error("github request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected content encoding {encoding:?} for {path}")]
    UnexpectedEncoding { path: String, encoding: String },

    #[error("story content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("story content is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed story json in {path}: {source}")]
    MalformedStory {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TopicNotFound(_) | Self::StoryNotFound { .. } | Self::PathNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
