use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/// Error type used throughout the crate. Nothing is recovered locally; every
/// variant is terminal for the operation that produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection failure or non-success HTTP status from the inventory API.
    #[error("inventory API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cache file `{path:?}`: {source}")]
    CacheIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cache file `{path:?}` does not contain valid JSON: {source}")]
    CacheDecode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A record is missing a field the extraction requires.
    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/*--------------------------------------------------------------------------------------
  Log Error Function
--------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) fn log_error(error: &Error) {
    log::error!("{}", error);
}
