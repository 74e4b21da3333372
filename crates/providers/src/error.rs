/// An error occurring while talking to an upstream service.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request failed or returned a non-success status.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The GraphQL endpoint answered with an error payload.
    #[error("graphql error: {0}")]
    GraphQl(String),
    /// The response is missing data or has an unexpected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(&'static str),
    /// The price API did not return a usable USD price for the token.
    #[error("no usd price for token {0}")]
    MissingPrice(String),
    /// The application id is not a positive integer.
    #[error("invalid app id {0:?}")]
    InvalidAppId(String),
    /// The requested page does not exist; pages start at 1.
    #[error("invalid page {0}, pages start at 1")]
    InvalidPage(u32),
    /// Other error.
    #[error("{0}")]
    Other(&'static str),
}
