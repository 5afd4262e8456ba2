use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("control id '{0}' does not carry an operation id")]
    InvalidControlId(String),
    #[error("category value '{0}' is not a category id")]
    InvalidCategoryValue(String),
    #[error("invalid context url '{url}': {source}")]
    InvalidContextUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Failure to obtain a decodable answer from the update endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}
