use reqwest::StatusCode;

/// Errors surfaced by the TimeSolv client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request to TimeSolv failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the API, with the body text preserved.
    #[error("TimeSolv API returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse TimeSolv response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no valid access token; complete the OAuth2 flow first")]
    NotAuthorized,

    #[error("OAuth2 state mismatch on callback")]
    StateMismatch,
}
