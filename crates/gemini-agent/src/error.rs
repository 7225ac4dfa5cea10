use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Google Cloud Project ID or Location is not configured.")]
    NotConfigured,

    #[error("Failed to initialize the AI model client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("[{status}] {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("Failed to decode model response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ChatError {
    /// Extra detail carried by API errors, if any.
    pub fn details(&self) -> Option<&str> {
        match self {
            ChatError::Api { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}
