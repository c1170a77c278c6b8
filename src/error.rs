use thiserror::Error;

/// Errors raised inside a poll cycle. All of them are recoverable: the loop
/// logs them, reports them to the chat and carries on.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("homework API is unreachable: {0}")]
    Network(#[source] reqwest::Error),
    #[error("homework API answered with status {status}")]
    Upstream { status: u16 },
    #[error("unexpected homework API response: {0}")]
    Schema(String),
}

impl PollError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }
}
