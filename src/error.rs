use reqwest::StatusCode;

/// Failure to obtain HTML from the site. The only hard error a source operation returns.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: StatusCode },
}

impl NetworkError {
    pub fn url(&self) -> &str {
        match self {
            NetworkError::Transport { url, .. } | NetworkError::Status { url, .. } => url,
        }
    }

    /// HTTP status for non-success responses, `None` for transport failures
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            NetworkError::Status { status, .. } => Some(*status),
            NetworkError::Transport { source, .. } => source.status(),
        }
    }
}

/// Errors that can occur while loading a [`crate::config::Config`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid base url {0:?}: expected an absolute http(s) url")]
    InvalidBaseUrl(String),
}

pub type SourceResult<T> = Result<T, NetworkError>;
