/// Shared error type used across all Zapflow crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider {endpoint}: {message}")]
    Provider {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    #[error("config: {0}")]
    Config(String),

    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a provider error for a failed HTTP call.
    pub fn provider(endpoint: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }
}
