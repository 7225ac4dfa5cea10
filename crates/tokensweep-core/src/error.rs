use thiserror::Error;

/// Transport-level failure of an outbound gateway call.
///
/// Non-success HTTP statuses are *not* errors; they are reported through
/// [`crate::gateway::Fetch`] and [`crate::gateway::Disable`].
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid gateway url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV file seems empty or headers are missing")]
    Empty,

    #[error("required column(s) {missing} not found in CSV. Found headers: {found}")]
    MissingColumns { missing: String, found: String },

    #[error("no valid entries with email addresses found in the file")]
    NoValidEntries,

    #[error("please enter an email address")]
    MissingEmail,

    #[error("error parsing CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown prime status: {0}")]
    InvalidPrimeStatus(String),

    #[error("unknown brand: {0}")]
    InvalidBrand(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
