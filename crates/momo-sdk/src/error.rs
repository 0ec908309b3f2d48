use thiserror::Error;

/// Errors returned by MoMo SDK operations.
#[derive(Debug, Error)]
pub enum MomoError {
    /// The user lookup did not come back as a 200 with a readable record.
    ///
    /// The message is fixed; status and body are kept for callers that
    /// want to inspect them. `status` is `None` when no response arrived.
    #[error("Unknown error when fetching user")]
    UnknownUserResponse { status: Option<u16>, body: String },

    #[error("{operation} failed with unexpected status {status}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("token error: {0}")]
    Token(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
